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

//! Per-type configuration payloads carried by registry entries.
//!
//! The cache stores these without interpreting them; only the loader for the
//! matching resource type reads them.

use serde::{Deserialize, Serialize};

/// Sampling filter applied when a texture is minified or magnified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Picks the closest texel. Suited to pixel art.
    #[default]
    Nearest,
    /// Blends neighbouring texels.
    Linear,
}

/// Options for texture assets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// The filter used for sampling and for building the mip chain.
    pub filter: FilterMode,
    /// Whether a full mip chain is generated on load.
    pub generate_mips: bool,
}

/// Options for mesh assets parsed from OBJ data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Split polygons with more than three vertices into triangles.
    pub triangulate: bool,
    /// Re-index so positions, normals, and texture coordinates share one index buffer.
    pub single_index: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            triangulate: true,
            single_index: true,
        }
    }
}

/// The closed set of configuration payloads an entry may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssetConfig {
    /// The resource type needs no configuration.
    #[default]
    None,
    /// Texture options.
    Texture(TextureConfig),
    /// Mesh options.
    Mesh(MeshConfig),
}

impl AssetConfig {
    /// Returns the texture payload, if this is one.
    pub fn texture(&self) -> Option<&TextureConfig> {
        match self {
            Self::Texture(config) => Some(config),
            _ => None,
        }
    }

    /// Returns the mesh payload, if this is one.
    pub fn mesh(&self) -> Option<&MeshConfig> {
        match self {
            Self::Mesh(config) => Some(config),
            _ => None,
        }
    }
}

impl From<TextureConfig> for AssetConfig {
    fn from(config: TextureConfig) -> Self {
        Self::Texture(config)
    }
}

impl From<MeshConfig> for AssetConfig {
    fn from(config: MeshConfig) -> Self {
        Self::Mesh(config)
    }
}
