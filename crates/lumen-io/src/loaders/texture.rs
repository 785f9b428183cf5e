// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Texture loading and mip generation.

use crate::loader::{AssetLoader, LoadContext};
use anyhow::{Context, Result};
use image::{imageops, imageops::FilterType, RgbaImage};
use lumen_core::asset::{Asset, FilterMode};

/// One level of a texture's mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// RGBA8 texel data.
    pub pixels: Vec<u8>,
}

/// A decoded texture held in CPU memory, ready to be uploaded.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    /// Width of the base level in texels.
    pub width: u32,
    /// Height of the base level in texels.
    pub height: u32,
    /// RGBA8 texel data of the base level.
    pub pixels: Vec<u8>,
    /// Levels below the base, each half the size of the previous one.
    pub mips: Vec<MipLevel>,
    /// The filter the texture should be sampled with.
    pub filter: FilterMode,
}

impl Asset for CpuTexture {}

impl CpuTexture {
    /// Number of levels including the base.
    pub fn mip_level_count(&self) -> u32 {
        1 + self.mips.len() as u32
    }
}

/// Decodes the entry's first source with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureLoader;

impl AssetLoader<CpuTexture> for TextureLoader {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<CpuTexture> {
        let config = ctx.texture_config();
        let bytes = ctx.source_bytes(0)?;

        let img = image::load_from_memory(&bytes).context("Failed to decode image from memory")?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mips = if config.generate_mips {
            mip_chain(&rgba, config.filter)
        } else {
            Vec::new()
        };

        Ok(CpuTexture {
            width,
            height,
            pixels: rgba.into_raw(),
            mips,
            filter: config.filter,
        })
    }
}

/// Halves `base` until both sides reach one texel.
fn mip_chain(base: &RgbaImage, filter: FilterMode) -> Vec<MipLevel> {
    let filter = match filter {
        FilterMode::Nearest => FilterType::Nearest,
        FilterMode::Linear => FilterType::Triangle,
    };

    let mut levels = Vec::new();
    let mut current = base.clone();
    let (mut width, mut height) = base.dimensions();

    while width > 1 || height > 1 {
        width = (width / 2).max(1);
        height = (height / 2).max(1);
        let next = imageops::resize(&current, width, height, filter);
        levels.push(MipLevel {
            width,
            height,
            pixels: next.as_raw().clone(),
        });
        current = next;
    }

    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_mip_chain_stops_at_one_texel() {
        let base = RgbaImage::from_pixel(8, 2, Rgba([10, 20, 30, 255]));
        let levels = mip_chain(&base, FilterMode::Nearest);

        let sizes: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(4, 1), (2, 1), (1, 1)]);
        assert_eq!(levels[0].pixels.len(), 4 * 4);
        assert_eq!(&levels[2].pixels, &[10, 20, 30, 255]);
    }

    #[test]
    fn test_single_texel_has_no_mips() {
        let base = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        assert!(mip_chain(&base, FilterMode::Linear).is_empty());
    }
}
