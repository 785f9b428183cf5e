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

//! # Lumen IO
//!
//! The asset cache and everything it needs to turn registered sources into
//! constructed resources: source validation, the loader registry, built-in
//! loaders, JSON manifests, RON settings, and hot-reload bookkeeping.
//!
//! ```no_run
//! use lumen_core::{asset::{AssetConfig, AssetId}, vfs::DiskVfs};
//! use lumen_io::{AssetCache, RegisterOptions, ShaderSource, Source};
//!
//! # fn main() -> Result<(), lumen_core::AssetError> {
//! let mut cache = AssetCache::new(DiskVfs::new("assets")).with_default_loaders();
//! let id = AssetId::named("basic")?;
//! cache.register::<ShaderSource>(
//!     id,
//!     Source::from_strs(["shaders/basic.vert", "shaders/basic.frag"], true),
//!     AssetConfig::None,
//!     RegisterOptions::default(),
//! )?;
//! let shader = cache.use_asset::<ShaderSource>(&id)?;
//! println!("{} bytes of vertex source", shader.vertex.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod entry;
mod loader;
pub mod loaders;
mod manifest;
mod settings;

pub use cache::{AssetCache, CacheStats};
pub use entry::{EntryStatus, RegisterOptions, Source, SourceDescriptor, SourceOrigin};
pub use loader::{AssetLoader, FnLoader, LoadContext};
pub use loaders::{CpuTexture, MeshData, MipLevel, ObjMeshLoader, ShaderSource, ShaderSourceLoader, TextureLoader};
pub use manifest::{AssetManifest, MeshEntry, ShaderEntry, TextureEntry};
pub use settings::CacheSettings;
