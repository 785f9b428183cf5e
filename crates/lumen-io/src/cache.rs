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

//! The asset cache: a registry of lazily constructed, type-erased resources.

use crate::{
    entry::{AssetEntry, EntryStatus, RegisterOptions, Source, SourceDescriptor},
    loader::{AssetLoader, FnLoader, LoadContext, LoaderRegistry},
    loaders::{CpuTexture, MeshData, ObjMeshLoader, ShaderSource, ShaderSourceLoader, TextureLoader},
    settings::CacheSettings,
};
use lumen_core::{
    asset::{Asset, AssetConfig, AssetHandle, AssetId},
    vfs::{DiskVfs, PathResolver},
    AssetError,
};
use std::{any::type_name, collections::HashMap, fs, path::PathBuf};

/// Counters describing what the cache has done since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Successful registrations.
    pub registered: u64,
    /// Successful constructions.
    pub constructions: u64,
    /// `use` calls answered from an already constructed instance.
    pub hits: u64,
    /// Constructions that failed.
    pub failures: u64,
    /// Entries removed by `unload`, `clear`, or an overwrite.
    pub unloads: u64,
}

/// A registry mapping [`AssetId`]s to lazily constructed resources.
///
/// Registration is cheap: it validates paths and stores the definition, but
/// never runs a loader. The first [`use_asset`](Self::use_asset) of an entry
/// constructs the resource; later calls return the same instance.
///
/// The cache owns one share of every constructed resource. Handles given out
/// by `use_asset` are additional shares, and [`unload`](Self::unload) warns
/// when any of them are still alive.
///
/// The cache is single-threaded by construction (`!Send`), matching the
/// thread that owns the rendering context.
pub struct AssetCache {
    resolver: Box<dyn PathResolver>,
    entries: HashMap<AssetId, AssetEntry>,
    loaders: LoaderRegistry,
    stats: CacheStats,
}

impl AssetCache {
    /// Creates an empty cache that validates paths through `resolver`.
    pub fn new(resolver: impl PathResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            entries: HashMap::new(),
            loaders: LoaderRegistry::default(),
            stats: CacheStats::default(),
        }
    }

    /// Creates a cache rooted at `settings.root`, or at the executable's
    /// directory when no root is configured.
    ///
    /// # Errors
    /// Returns [`AssetError::Io`] if the executable's location is unknown.
    pub fn with_settings(settings: &CacheSettings) -> Result<Self, AssetError> {
        let vfs = match &settings.root {
            Some(root) => DiskVfs::new(root),
            None => DiskVfs::from_executable().map_err(|source| AssetError::Io {
                path: PathBuf::from("<current executable>"),
                source,
            })?,
        };
        Ok(Self::new(vfs))
    }

    /// Registers the built-in loaders for [`CpuTexture`], [`ShaderSource`],
    /// and [`MeshData`].
    pub fn with_default_loaders(mut self) -> Self {
        self.register_loader::<CpuTexture>(TextureLoader);
        self.register_loader::<ShaderSource>(ShaderSourceLoader);
        self.register_loader::<MeshData>(ObjMeshLoader);
        self
    }

    /// Sets the default construction routine for resources of type `T`.
    ///
    /// A previously registered loader for `T` is replaced.
    pub fn register_loader<T: Asset>(&mut self, loader: impl AssetLoader<T> + 'static) {
        if self.loaders.register::<T>(loader) {
            log::info!("[AssetCache] Replaced loader for `{}`", type_name::<T>());
        } else {
            log::debug!("[AssetCache] Registered loader for `{}`", type_name::<T>());
        }
    }

    /// Sets a closure as the default construction routine for `T`.
    pub fn register_loader_fn<T, F>(&mut self, f: F)
    where
        T: Asset,
        F: Fn(&LoadContext<'_>) -> anyhow::Result<T> + 'static,
    {
        self.register_loader::<T>(FnLoader::new(f));
    }

    /// Returns `true` if a loader is registered for `T`.
    pub fn has_loader<T: Asset>(&self) -> bool {
        self.loaders.contains::<T>()
    }

    /// Number of registered loaders.
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    /// Registers an entry for a resource of type `T`.
    ///
    /// Path sources are resolved now. A path that does not resolve is logged
    /// and kept; it is resolved once more when the entry is first used. With
    /// `options.hot_reload`, the modification time of each resolved file is
    /// recorded; failing to read it only disables hot-reload for that source.
    ///
    /// No loader runs here.
    ///
    /// # Errors
    /// [`AssetError::AlreadyRegistered`] if `id` exists and
    /// `options.allow_overwrite` is not set. The existing entry is untouched.
    pub fn register<T: Asset>(
        &mut self,
        id: AssetId,
        sources: Vec<Source>,
        config: AssetConfig,
        options: RegisterOptions,
    ) -> Result<(), AssetError> {
        if let Some(existing) = self.entries.get(&id) {
            if !options.allow_overwrite {
                log::warn!(
                    "[AssetCache] '{id}' is already registered as `{}`; registration skipped",
                    existing.type_name
                );
                return Err(AssetError::AlreadyRegistered(id));
            }
            log::info!("[AssetCache] Overwriting '{id}'");
            self.unload(&id);
        }

        let sources = sources
            .into_iter()
            .map(|source| self.describe(&id, source, options.hot_reload))
            .collect();

        self.entries.insert(id, AssetEntry::new::<T>(sources, config));
        self.stats.registered += 1;
        log::debug!("[AssetCache] Registered '{id}' as `{}`", type_name::<T>());
        Ok(())
    }

    fn describe(&self, id: &AssetId, source: Source, hot_reload: bool) -> SourceDescriptor {
        let relative = match source {
            Source::Inline(data) => return SourceDescriptor::inline(data),
            Source::Path(relative) => relative,
        };

        let Some(resolved) = self.resolver.resolve(&relative) else {
            log::warn!("[AssetCache] '{id}': path '{relative}' does not resolve to a file");
            return SourceDescriptor::path(relative, None, None);
        };

        let last_modified = if hot_reload {
            match fs::metadata(&resolved).and_then(|meta| meta.modified()) {
                Ok(time) => Some(time),
                Err(e) => {
                    log::warn!(
                        "[AssetCache] '{id}': cannot read modification time of '{}', hot-reload disabled for it: {e}",
                        resolved.display()
                    );
                    None
                }
            }
        } else {
            None
        };

        SourceDescriptor::path(relative, Some(resolved), last_modified)
    }

    /// Returns the resource registered under `id`, constructing it with the
    /// loader registered for `T` if this is the first use.
    ///
    /// A failed construction leaves the entry unloaded, so the next call
    /// tries again.
    ///
    /// # Errors
    /// [`AssetError::NotRegistered`], [`AssetError::TypeMismatch`],
    /// [`AssetError::NoLoader`], or [`AssetError::LoadFailed`].
    pub fn use_asset<T: Asset>(&mut self, id: &AssetId) -> Result<AssetHandle<T>, AssetError> {
        let entry = checked_entry::<T>(&mut self.entries, id)?;

        if let Some(handle) = entry.handle::<T>() {
            self.stats.hits += 1;
            return Ok(handle);
        }

        let Some(loader) = self.loaders.get::<T>() else {
            log::warn!(
                "[AssetCache] Cannot construct '{id}': no loader registered for `{}`",
                type_name::<T>()
            );
            return Err(AssetError::NoLoader(type_name::<T>()));
        };

        let ctx = LoadContext::new(id, &entry.sources, &entry.config, &*self.resolver);
        let result = loader.load(&ctx);
        finish(entry, &mut self.stats, id, result)
    }

    /// Like [`use_asset`](Self::use_asset), but constructs with `constructor`
    /// instead of the registered loader.
    ///
    /// `constructor` only runs when the entry is not loaded yet.
    ///
    /// # Errors
    /// [`AssetError::NotRegistered`], [`AssetError::TypeMismatch`], or
    /// [`AssetError::LoadFailed`].
    pub fn use_with<T, F>(&mut self, id: &AssetId, constructor: F) -> Result<AssetHandle<T>, AssetError>
    where
        T: Asset,
        F: FnOnce(&LoadContext<'_>) -> anyhow::Result<T>,
    {
        let entry = checked_entry::<T>(&mut self.entries, id)?;

        if let Some(handle) = entry.handle::<T>() {
            self.stats.hits += 1;
            return Ok(handle);
        }

        let ctx = LoadContext::new(id, &entry.sources, &entry.config, &*self.resolver);
        let result = constructor(&ctx);
        finish(entry, &mut self.stats, id, result)
    }

    /// Returns the resource if it is already constructed and of type `T`.
    ///
    /// Never constructs and never logs.
    pub fn get<T: Asset>(&self, id: &AssetId) -> Option<AssetHandle<T>> {
        self.entries.get(id).and_then(AssetEntry::handle::<T>)
    }

    /// Returns `true` if an entry exists under `id`, loaded or not.
    pub fn query_asset(&self, id: &AssetId) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns `true` if the entry under `id` exists and is constructed.
    pub fn is_loaded(&self, id: &AssetId) -> bool {
        self.entries.get(id).is_some_and(AssetEntry::is_loaded)
    }

    /// Number of handles to the resource under `id` held outside the cache.
    ///
    /// `None` if nothing is registered under `id`; `Some(0)` for entries that
    /// are not constructed or whose handles have all been dropped.
    pub fn external_refs(&self, id: &AssetId) -> Option<usize> {
        self.entries.get(id).map(AssetEntry::external_refs)
    }

    /// Removes the entry under `id` and drops the cache's share of its
    /// resource.
    ///
    /// If handles to the resource are still alive, a warning is logged and
    /// the entry is removed anyway; the resource itself lives on until the
    /// last handle is dropped. Returns `false` if nothing was registered.
    pub fn unload(&mut self, id: &AssetId) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            log::warn!("[AssetCache] Cannot unload '{id}': not registered");
            return false;
        };

        let external = entry.external_refs();
        if external > 0 {
            log::warn!(
                "[AssetCache] '{id}' is still referenced by {external} handle(s); it will outlive its entry"
            );
        }

        drop(entry);
        self.stats.unloads += 1;
        log::info!("[AssetCache] '{id}' has been unloaded");
        true
    }

    /// Unloads every entry, one `unload` call per identifier.
    pub fn clear(&mut self) {
        let ids: Vec<AssetId> = self.entries.keys().copied().collect();
        for id in ids {
            self.unload(&id);
        }
    }

    /// Identifiers of entries with at least one hot-reloadable source whose
    /// file changed since registration.
    ///
    /// Sorted by identifier text. The cache does not reload anything itself;
    /// callers `unload` and `register` the returned ids again.
    pub fn stale_assets(&self) -> Vec<AssetId> {
        let mut stale = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.sources.iter().any(SourceDescriptor::should_reload))
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        stale.sort_by_key(|id| id.to_string());
        stale
    }

    /// The sources recorded for `id`.
    pub fn sources(&self, id: &AssetId) -> Option<&[SourceDescriptor]> {
        self.entries.get(id).map(|entry| entry.sources.as_slice())
    }

    /// The configuration payload recorded for `id`.
    pub fn config(&self, id: &AssetId) -> Option<&AssetConfig> {
        self.entries.get(id).map(|entry| &entry.config)
    }

    /// A snapshot of every entry, sorted by identifier text.
    pub fn entries(&self) -> Vec<EntryStatus> {
        let mut statuses: Vec<EntryStatus> = self
            .entries
            .iter()
            .map(|(id, entry)| entry.status(*id))
            .collect();
        statuses.sort_by_key(|status| status.id.to_string());
        statuses
    }

    /// Logs one line per entry at info level.
    pub fn log_registry(&self) {
        log::info!("[AssetCache] {} registered asset(s)", self.entries.len());
        for (index, status) in self.entries().iter().enumerate() {
            log::info!(
                "[Entry {index}] '{}' `{}` {} sources={} first={}",
                status.id,
                status.type_name,
                if status.loaded { "Loaded" } else { "Registered" },
                status.source_count,
                status.first_source.as_deref().unwrap_or("-"),
            );
        }
    }

    /// Counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Looks up `id` and checks it was registered for `T`, logging on failure.
fn checked_entry<'e, T: Asset>(
    entries: &'e mut HashMap<AssetId, AssetEntry>,
    id: &AssetId,
) -> Result<&'e mut AssetEntry, AssetError> {
    let Some(entry) = entries.get_mut(id) else {
        log::warn!("[AssetCache] use() called on unregistered asset '{id}'");
        return Err(AssetError::NotRegistered(*id));
    };

    if !entry.holds::<T>() {
        log::warn!(
            "[AssetCache] '{id}' was registered as `{}` but requested as `{}`",
            entry.type_name,
            type_name::<T>()
        );
        return Err(AssetError::TypeMismatch {
            id: *id,
            expected: entry.type_name,
            requested: type_name::<T>(),
        });
    }

    Ok(entry)
}

/// Stores a successful construction, or reports a failed one without
/// marking the entry loaded.
fn finish<T: Asset>(
    entry: &mut AssetEntry,
    stats: &mut CacheStats,
    id: &AssetId,
    result: anyhow::Result<T>,
) -> Result<AssetHandle<T>, AssetError> {
    match result {
        Ok(asset) => {
            stats.constructions += 1;
            log::info!("[AssetCache] Constructed '{id}' as `{}`", type_name::<T>());
            Ok(entry.store(asset))
        }
        Err(e) => {
            stats.failures += 1;
            log::error!("[AssetCache] Failed to construct '{id}': {e:#}");
            Err(AssetError::LoadFailed {
                id: *id,
                source: e.into(),
            })
        }
    }
}
