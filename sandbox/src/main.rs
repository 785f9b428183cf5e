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

//! Registers the sandbox assets, uses a few of them, and prints the registry.
//!
//! Usage: `sandbox [settings.ron]` (defaults to `sandbox/assets/settings.ron`).

use anyhow::{Context, Result};
use lumen_core::{
    asset::{AssetConfig, AssetId},
    AssetError,
};
use lumen_io::{AssetCache, CacheSettings, CpuTexture, MeshData, ShaderSource, Source};
use std::path::PathBuf;

const FLAT_VERTEX: &str = "#version 330 core\nlayout (location = 0) in vec3 aPos;\nvoid main() { gl_Position = vec4(aPos, 1.0); }\n";
const FLAT_FRAGMENT: &str = "#version 330 core\nout vec4 colour;\nvoid main() { colour = vec4(1.0); }\n";

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sandbox/assets/settings.ron"));
    let settings = CacheSettings::load(&settings_path)
        .with_context(|| format!("Failed to read settings from '{}'", settings_path.display()))?;

    let mut cache = AssetCache::with_settings(&settings)?.with_default_loaders();
    let options = settings.register_options();

    if let Some(manifest) = &settings.manifest {
        cache.register_manifest(manifest, options)?;
    }

    let flat = AssetId::named("flat")?;
    cache.register::<ShaderSource>(
        flat,
        Source::from_strs([FLAT_VERTEX, FLAT_FRAGMENT], false),
        AssetConfig::None,
        options,
    )?;

    cache.log_registry();

    for name in ["basic", "flat"] {
        match cache.use_asset::<ShaderSource>(&AssetId::named(name)?) {
            Ok(shader) => log::info!(
                "Shader '{name}': {} vertex bytes, {} fragment bytes",
                shader.vertex.len(),
                shader.fragment.len()
            ),
            Err(e) => log::warn!("Shader '{name}' unavailable: {e}"),
        }
    }

    for name in ["quad", "quad_raw"] {
        if let Ok(mesh) = cache.use_asset::<MeshData>(&AssetId::named(name)?) {
            log::info!(
                "Mesh '{name}': {} vertices, {} indices",
                mesh.vertex_count(),
                mesh.indices.len()
            );
        }
    }

    // Registered with a path that does not exist: stays registered, never loads.
    let missing = AssetId::named("missing")?;
    if cache.use_asset::<CpuTexture>(&missing).is_err() {
        log::info!(
            "Texture 'missing' registered={} loaded={}",
            cache.query_asset(&missing),
            cache.is_loaded(&missing)
        );
    }

    // Asking for the wrong type is refused without constructing anything.
    match cache.use_asset::<MeshData>(&flat) {
        Err(AssetError::TypeMismatch {
            expected, requested, ..
        }) => log::info!("'flat' holds `{expected}`, not `{requested}`"),
        Err(e) => log::warn!("'flat' as a mesh: {e}"),
        Ok(_) => log::warn!("'flat' unexpectedly loaded as a mesh"),
    }

    cache.log_registry();

    let stale = cache.stale_assets();
    if !stale.is_empty() {
        log::info!("{} asset(s) changed on disk since registration", stale.len());
    }

    let stats = cache.stats();
    log::info!(
        "Cache stats: registered={} constructed={} hits={} failures={}",
        stats.registered,
        stats.constructions,
        stats.hits,
        stats.failures
    );

    cache.clear();
    Ok(())
}
