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

use anyhow::{bail, Result};
use lumen_core::{
    asset::{Asset, AssetConfig, AssetHandle, AssetId},
    vfs::DiskVfs,
    AssetError,
};
use lumen_io::{AssetCache, AssetLoader, LoadContext, RegisterOptions, Source};
use std::{
    cell::Cell,
    fs::File,
    path::Path,
    rc::Rc,
    time::{Duration, SystemTime},
};
use tempfile::tempdir;

// --- Test Setup: stub resources and a counting loader ---
#[derive(Debug)]
struct TextureStub {
    bytes: Vec<u8>,
}
impl Asset for TextureStub {}

#[derive(Debug)]
struct ShaderStub {
    vertex: String,
    fragment: String,
}
impl Asset for ShaderStub {}

struct CountingTextureLoader {
    calls: Rc<Cell<u32>>,
}

impl AssetLoader<TextureStub> for CountingTextureLoader {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<TextureStub> {
        self.calls.set(self.calls.get() + 1);
        let bytes = ctx.source_bytes(0)?.into_owned();
        Ok(TextureStub { bytes })
    }
}

struct ShaderStubLoader;

impl AssetLoader<ShaderStub> for ShaderStubLoader {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<ShaderStub> {
        Ok(ShaderStub {
            vertex: ctx.source_text(0)?,
            fragment: ctx.source_text(1)?,
        })
    }
}

fn id(name: &str) -> AssetId {
    AssetId::named(name).unwrap()
}

fn cache_at(root: &Path) -> (AssetCache, Rc<Cell<u32>>) {
    let calls = Rc::new(Cell::new(0));
    let mut cache = AssetCache::new(DiskVfs::new(root));
    cache.register_loader::<TextureStub>(CountingTextureLoader {
        calls: calls.clone(),
    });
    cache.register_loader::<ShaderStub>(ShaderStubLoader);
    (cache, calls)
}

fn register_texture(cache: &mut AssetCache, name: &str, source: Source, options: RegisterOptions) {
    cache
        .register::<TextureStub>(id(name), vec![source], AssetConfig::None, options)
        .unwrap();
}
// ---

#[test]
fn test_repeated_use_constructs_once() {
    let dir = tempdir().unwrap();
    let (mut cache, calls) = cache_at(dir.path());
    register_texture(&mut cache, "tex", Source::inline("pixels"), RegisterOptions::default());

    let first = cache.use_asset::<TextureStub>(&id("tex")).unwrap();
    for _ in 0..4 {
        let again = cache.use_asset::<TextureStub>(&id("tex")).unwrap();
        assert!(AssetHandle::ptr_eq(&first, &again));
    }

    assert_eq!(calls.get(), 1);
    assert_eq!(first.bytes, b"pixels");
}

#[test]
fn test_duplicate_registration_keeps_first_entry() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    register_texture(&mut cache, "tex", Source::inline("first"), RegisterOptions::default());

    let err = cache
        .register::<TextureStub>(
            id("tex"),
            vec![Source::inline("second")],
            AssetConfig::None,
            RegisterOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, AssetError::AlreadyRegistered(_)));

    let sources = cache.sources(&id("tex")).unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].label(), "<inline, 5 bytes>");
    assert_eq!(cache.use_asset::<TextureStub>(&id("tex")).unwrap().bytes, b"first");
    assert_eq!(cache.stats().registered, 1);
}

#[test]
fn test_unload_then_reregister_constructs_afresh() {
    let dir = tempdir().unwrap();
    let (mut cache, calls) = cache_at(dir.path());
    register_texture(&mut cache, "tex", Source::inline("old"), RegisterOptions::default());
    let old = cache.use_asset::<TextureStub>(&id("tex")).unwrap();

    assert!(cache.unload(&id("tex")));
    assert!(!cache.query_asset(&id("tex")));
    assert!(matches!(
        cache.use_asset::<TextureStub>(&id("tex")),
        Err(AssetError::NotRegistered(_))
    ));

    register_texture(&mut cache, "tex", Source::inline("new"), RegisterOptions::default());
    let new = cache.use_asset::<TextureStub>(&id("tex")).unwrap();

    assert!(!AssetHandle::ptr_eq(&old, &new));
    assert_eq!(new.bytes, b"new");
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_wrong_type_constructs_nothing() {
    let dir = tempdir().unwrap();
    let (mut cache, calls) = cache_at(dir.path());
    register_texture(&mut cache, "tex", Source::inline("x"), RegisterOptions::default());

    let err = cache.use_asset::<ShaderStub>(&id("tex")).unwrap_err();

    match err {
        AssetError::TypeMismatch {
            expected, requested, ..
        } => {
            assert!(expected.ends_with("TextureStub"));
            assert!(requested.ends_with("ShaderStub"));
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
    assert_eq!(calls.get(), 0);
    assert!(!cache.is_loaded(&id("tex")));
}

#[test]
fn test_failed_construction_is_retried() {
    let dir = tempdir().unwrap();
    let mut cache = AssetCache::new(DiskVfs::new(dir.path()));
    let attempts = Rc::new(Cell::new(0));
    let seen = attempts.clone();
    cache.register_loader_fn(move |_ctx| {
        seen.set(seen.get() + 1);
        if seen.get() == 1 {
            bail!("device lost");
        }
        Ok(TextureStub { bytes: vec![1] })
    });
    register_texture(&mut cache, "tex", Source::inline("x"), RegisterOptions::default());

    let err = cache.use_asset::<TextureStub>(&id("tex")).unwrap_err();
    assert!(matches!(err, AssetError::LoadFailed { .. }));
    assert!(!cache.is_loaded(&id("tex")));
    assert!(cache.get::<TextureStub>(&id("tex")).is_none());

    let handle = cache.use_asset::<TextureStub>(&id("tex")).unwrap();
    assert_eq!(handle.bytes, vec![1]);
    assert_eq!(attempts.get(), 2);
    assert!(cache.is_loaded(&id("tex")));
}

#[test]
fn test_missing_file_fails_but_stays_registered() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    register_texture(
        &mut cache,
        "tex_A",
        Source::path("textures/does_not_exist.png"),
        RegisterOptions::default(),
    );

    assert!(!cache.sources(&id("tex_A")).unwrap()[0].is_path_valid());

    let err = cache.use_asset::<TextureStub>(&id("tex_A")).unwrap_err();
    assert!(matches!(err, AssetError::LoadFailed { .. }));
    assert!(cache.query_asset(&id("tex_A")));
    assert!(!cache.is_loaded(&id("tex_A")));
}

#[test]
fn test_inline_shader_sources() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    cache
        .register::<ShaderStub>(
            id("shader_B"),
            Source::from_strs(["void vs() {}", "void fs() {}"], false),
            AssetConfig::None,
            RegisterOptions::default(),
        )
        .unwrap();

    let shader = cache.use_asset::<ShaderStub>(&id("shader_B")).unwrap();
    assert_eq!(shader.vertex, "void vs() {}");
    assert_eq!(shader.fragment, "void fs() {}");

    let again = cache.use_asset::<ShaderStub>(&id("shader_B")).unwrap();
    assert!(AssetHandle::ptr_eq(&shader, &again));
}

#[test]
fn test_reregistration_reads_the_new_file() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("first.png"), b"first file").unwrap();
    std::fs::write(dir.path().join("second.png"), b"second file").unwrap();
    let (mut cache, _) = cache_at(dir.path());

    register_texture(&mut cache, "tex_C", Source::path("first.png"), RegisterOptions::hot_reload());
    let source = &cache.sources(&id("tex_C")).unwrap()[0];
    assert!(source.is_path_valid());
    assert!(source.is_hot_reloadable());
    assert_eq!(cache.use_asset::<TextureStub>(&id("tex_C")).unwrap().bytes, b"first file");

    assert!(cache.unload(&id("tex_C")));
    register_texture(&mut cache, "tex_C", Source::path("second.png"), RegisterOptions::hot_reload());

    assert_eq!(cache.use_asset::<TextureStub>(&id("tex_C")).unwrap().bytes, b"second file");
}

#[test]
fn test_unload_with_live_handle_still_removes_entry() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    register_texture(&mut cache, "tex", Source::inline("kept"), RegisterOptions::default());

    let held = cache.use_asset::<TextureStub>(&id("tex")).unwrap();
    assert_eq!(AssetHandle::strong_count(&held), 2);
    assert_eq!(cache.external_refs(&id("tex")), Some(1));

    assert!(cache.unload(&id("tex")));
    assert_eq!(cache.external_refs(&id("tex")), None);
    assert!(!cache.query_asset(&id("tex")));
    // The cache released its share; the caller's handle is now the only one.
    assert_eq!(AssetHandle::strong_count(&held), 1);
    assert_eq!(held.bytes, b"kept");
}

#[test]
fn test_clear_unloads_everything() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    for name in ["a", "b", "c"] {
        register_texture(&mut cache, name, Source::inline(name), RegisterOptions::default());
    }
    cache.use_asset::<TextureStub>(&id("b")).unwrap();

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().unloads, 3);
    for name in ["a", "b", "c"] {
        assert!(!cache.query_asset(&id(name)));
    }
}

#[test]
fn test_stale_assets_reports_rewritten_files() {
    let dir = tempdir().unwrap();
    let watched = dir.path().join("watched.png");
    let unwatched = dir.path().join("unwatched.png");
    std::fs::write(&watched, b"v1").unwrap();
    std::fs::write(&unwatched, b"v1").unwrap();
    let (mut cache, _) = cache_at(dir.path());

    register_texture(&mut cache, "watched", Source::path("watched.png"), RegisterOptions::hot_reload());
    register_texture(&mut cache, "unwatched", Source::path("unwatched.png"), RegisterOptions::default());
    register_texture(&mut cache, "inline", Source::inline("v1"), RegisterOptions::hot_reload());
    assert!(cache.stale_assets().is_empty());

    let later = SystemTime::now() + Duration::from_secs(60);
    for path in [&watched, &unwatched] {
        std::fs::write(path, b"v2").unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    assert_eq!(cache.stale_assets(), vec![id("watched")]);
}

#[test]
fn test_stale_assets_are_sorted_by_id() {
    let dir = tempdir().unwrap();
    let names: Vec<String> = (0..12).rev().map(|i| format!("f{i:02}")).collect();
    for name in &names {
        std::fs::write(dir.path().join(format!("{name}.png")), b"v1").unwrap();
    }
    let (mut cache, _) = cache_at(dir.path());
    for name in &names {
        register_texture(
            &mut cache,
            name,
            Source::path(format!("{name}.png")),
            RegisterOptions::hot_reload(),
        );
    }

    let later = SystemTime::now() + Duration::from_secs(60);
    for name in &names {
        File::options()
            .write(true)
            .open(dir.path().join(format!("{name}.png")))
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    let mut expected: Vec<AssetId> = names.iter().map(|name| id(name)).collect();
    expected.sort_by_key(|id| id.to_string());
    assert_eq!(cache.stale_assets(), expected);
    assert_eq!(cache.stale_assets()[0], id("f00"));
}

#[test]
fn test_uuid_ids_work_like_named_ids() {
    let dir = tempdir().unwrap();
    let (mut cache, _) = cache_at(dir.path());
    let long = AssetId::from_name_v5("textures/environment/skybox/north.png");

    cache
        .register::<TextureStub>(long, vec![Source::inline("sky")], AssetConfig::None, RegisterOptions::default())
        .unwrap();

    assert!(cache.query_asset(&AssetId::from_name_v5("textures/environment/skybox/north.png")));
    assert_eq!(cache.use_asset::<TextureStub>(&long).unwrap().bytes, b"sky");
}
