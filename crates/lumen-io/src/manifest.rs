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

//! JSON manifests that register many assets at once.
//!
//! ```json
//! {
//!   "textures": { "grass": "textures/grass.png",
//!                 "ui":    { "path": "textures/ui.png", "filter": "linear", "generate_mips": true } },
//!   "shaders":  { "basic": { "vertex": "shaders/basic.vert", "fragment": "shaders/basic.frag" } },
//!   "meshes":   { "quad":  "meshes/quad.obj" }
//! }
//! ```
//!
//! Every path is resolved through the cache's resolver. Entries register as
//! [`CpuTexture`], [`ShaderSource`], and [`MeshData`].

use crate::{
    cache::AssetCache,
    entry::{RegisterOptions, Source},
    loaders::{CpuTexture, MeshData, ShaderSource},
};
use lumen_core::{
    asset::{Asset, AssetConfig, AssetId, FilterMode, MeshConfig, TextureConfig},
    AssetError,
};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

/// The parsed form of a manifest file.
#[derive(Debug, Default, Deserialize)]
pub struct AssetManifest {
    /// Texture entries by id.
    #[serde(default)]
    pub textures: BTreeMap<String, TextureEntry>,
    /// Shader entries by id.
    #[serde(default)]
    pub shaders: BTreeMap<String, ShaderEntry>,
    /// Mesh entries by id.
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
}

/// A texture: a bare path, or a path with options.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextureEntry {
    /// Path only; default options.
    Path(String),
    /// Path and options.
    Detailed {
        /// Path of the image file.
        path: String,
        /// Sampling filter.
        #[serde(default)]
        filter: FilterMode,
        /// Whether to build a mip chain.
        #[serde(default)]
        generate_mips: bool,
    },
}

/// A shader: one file per stage.
#[derive(Debug, Deserialize)]
pub struct ShaderEntry {
    /// Path of the vertex stage.
    pub vertex: String,
    /// Path of the fragment stage.
    pub fragment: String,
}

/// A mesh: a bare path, or a path with options.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    /// Path only; default options.
    Path(String),
    /// Path and options.
    Detailed {
        /// Path of the OBJ file.
        path: String,
        /// See [`MeshConfig::triangulate`].
        #[serde(default = "enabled")]
        triangulate: bool,
        /// See [`MeshConfig::single_index`].
        #[serde(default = "enabled")]
        single_index: bool,
    },
}

fn enabled() -> bool {
    true
}

impl AssetManifest {
    /// Parses manifest JSON.
    ///
    /// # Errors
    /// [`AssetError::Manifest`] if the text is not a valid manifest.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(|e| AssetError::Manifest(e.to_string()))
    }
}

impl AssetCache {
    /// Registers every entry of the manifest at `path`.
    ///
    /// The manifest file itself is opened as given; the paths inside it go
    /// through the cache's resolver. Returns the number of entries
    /// registered.
    ///
    /// # Errors
    /// [`AssetError::Io`] if the file cannot be read, [`AssetError::Manifest`]
    /// if it cannot be parsed. Nothing is registered in either case.
    pub fn register_manifest(
        &mut self,
        path: impl AsRef<Path>,
        options: RegisterOptions,
    ) -> Result<usize, AssetError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| {
            log::error!("[AssetCache] Failed to open manifest '{}': {source}", path.display());
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.register_manifest_str(&json, options)
    }

    /// Registers every entry of a manifest given as JSON text.
    ///
    /// Entries that fail (bad id, duplicate) are logged and skipped.
    ///
    /// # Errors
    /// [`AssetError::Manifest`] if `json` cannot be parsed.
    pub fn register_manifest_str(
        &mut self,
        json: &str,
        options: RegisterOptions,
    ) -> Result<usize, AssetError> {
        let manifest = AssetManifest::from_json(json).inspect_err(|e| {
            log::error!("[AssetCache] {e}");
        })?;

        let mut registered = 0;

        for (name, entry) in manifest.textures {
            let (path, config) = match entry {
                TextureEntry::Path(path) => (path, TextureConfig::default()),
                TextureEntry::Detailed {
                    path,
                    filter,
                    generate_mips,
                } => (
                    path,
                    TextureConfig {
                        filter,
                        generate_mips,
                    },
                ),
            };
            registered += self.register_from_manifest::<CpuTexture>(
                &name,
                vec![Source::Path(path)],
                config.into(),
                options,
            );
        }

        for (name, entry) in manifest.shaders {
            registered += self.register_from_manifest::<ShaderSource>(
                &name,
                Source::from_strs([entry.vertex, entry.fragment], true),
                AssetConfig::None,
                options,
            );
        }

        for (name, entry) in manifest.meshes {
            let (path, config) = match entry {
                MeshEntry::Path(path) => (path, MeshConfig::default()),
                MeshEntry::Detailed {
                    path,
                    triangulate,
                    single_index,
                } => (
                    path,
                    MeshConfig {
                        triangulate,
                        single_index,
                    },
                ),
            };
            registered += self.register_from_manifest::<MeshData>(
                &name,
                vec![Source::Path(path)],
                config.into(),
                options,
            );
        }

        log::info!("[AssetCache] Registered {registered} asset(s) from manifest");
        Ok(registered)
    }

    /// Returns 1 if the entry registered, 0 otherwise. Failures are already logged.
    fn register_from_manifest<T: Asset>(
        &mut self,
        name: &str,
        sources: Vec<Source>,
        config: AssetConfig,
        options: RegisterOptions,
    ) -> usize {
        let Ok(id) = AssetId::named(name) else {
            return 0;
        };
        usize::from(self.register::<T>(id, sources, config, options).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_entry_forms() {
        let manifest = AssetManifest::from_json(
            r#"{
                "textures": {
                    "grass": "grass.png",
                    "ui": { "path": "ui.png", "filter": "linear", "generate_mips": true }
                },
                "shaders": { "basic": { "vertex": "a.vert", "fragment": "a.frag" } },
                "meshes": {
                    "quad": "quad.obj",
                    "raw": { "path": "raw.obj", "triangulate": false }
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(&manifest.textures["grass"], TextureEntry::Path(p) if p == "grass.png"));
        assert!(matches!(
            &manifest.textures["ui"],
            TextureEntry::Detailed {
                filter: FilterMode::Linear,
                generate_mips: true,
                ..
            }
        ));
        assert_eq!(manifest.shaders["basic"].fragment, "a.frag");
        match &manifest.meshes["raw"] {
            MeshEntry::Detailed {
                triangulate,
                single_index,
                ..
            } => {
                assert!(!triangulate);
                assert!(single_index);
            }
            other => panic!("unexpected mesh entry {other:?}"),
        }
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert!(manifest.textures.is_empty());
        assert!(manifest.shaders.is_empty());
        assert!(manifest.meshes.is_empty());
    }

    #[test]
    fn test_invalid_json_is_a_manifest_error() {
        assert!(matches!(
            AssetManifest::from_json("{ textures: "),
            Err(AssetError::Manifest(_))
        ));
    }
}
