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

//! Registry entries and the source descriptors they are built from.

use lumen_core::asset::{Asset, AssetConfig, AssetHandle, AssetId};
use std::{
    any::{Any, TypeId},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::SystemTime,
};

/// A source as supplied by the caller at registration time.
///
/// The caller states explicitly whether a source is a path or inline data.
/// A path that fails to resolve is never reinterpreted as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A path resolved through the cache's [`PathResolver`](lumen_core::vfs::PathResolver).
    Path(String),
    /// Raw bytes handed straight to the loader.
    Inline(Vec<u8>),
}

impl Source {
    /// Creates a path source.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Creates an inline source.
    pub fn inline(data: impl Into<Vec<u8>>) -> Self {
        Self::Inline(data.into())
    }

    /// Builds a source list from strings. With `from_files` every string is a
    /// path; otherwise every string is inline data.
    pub fn from_strs<I, S>(items: I, from_files: bool) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items
            .into_iter()
            .map(|item| {
                let item = item.into();
                if from_files {
                    Self::Path(item)
                } else {
                    Self::Inline(item.into_bytes())
                }
            })
            .collect()
    }
}

/// Options that shape a single registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Record modification times of path sources for [`stale_assets`](crate::AssetCache::stale_assets).
    pub hot_reload: bool,
    /// Replace an existing entry instead of rejecting the registration.
    pub allow_overwrite: bool,
}

impl RegisterOptions {
    /// Options with hot-reload bookkeeping enabled.
    pub fn hot_reload() -> Self {
        Self {
            hot_reload: true,
            ..Self::default()
        }
    }

    /// Options that replace any existing entry.
    pub fn overwrite() -> Self {
        Self {
            allow_overwrite: true,
            ..Self::default()
        }
    }
}

/// Where a registered source's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// A path, with its absolute form if it resolved at registration.
    Path {
        /// The path exactly as supplied.
        relative: String,
        /// The absolute path, or `None` if resolution failed.
        resolved: Option<PathBuf>,
    },
    /// Inline bytes.
    Inline(Vec<u8>),
}

/// A source after registration-time validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    origin: SourceOrigin,
    last_modified: Option<SystemTime>,
}

impl SourceDescriptor {
    pub(crate) fn inline(data: Vec<u8>) -> Self {
        Self {
            origin: SourceOrigin::Inline(data),
            last_modified: None,
        }
    }

    pub(crate) fn path(
        relative: String,
        resolved: Option<PathBuf>,
        last_modified: Option<SystemTime>,
    ) -> Self {
        Self {
            origin: SourceOrigin::Path { relative, resolved },
            last_modified,
        }
    }

    /// Where the bytes come from.
    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// `true` if this is a path that resolved at registration.
    pub fn is_path_valid(&self) -> bool {
        self.resolved_path().is_some()
    }

    /// The absolute path, if this is a resolved path source.
    pub fn resolved_path(&self) -> Option<&Path> {
        match &self.origin {
            SourceOrigin::Path {
                resolved: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }

    /// The modification time captured for hot-reload, if any.
    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// `true` if a modification time was captured at registration.
    pub fn is_hot_reloadable(&self) -> bool {
        self.last_modified.is_some()
    }

    /// Short label for logs: the path as supplied, or the inline length.
    pub fn label(&self) -> String {
        match &self.origin {
            SourceOrigin::Path { relative, .. } => relative.clone(),
            SourceOrigin::Inline(data) => format!("<inline, {} bytes>", data.len()),
        }
    }

    /// Returns `true` if the file changed since registration.
    ///
    /// Only hot-reloadable sources can report a change. A file that can no
    /// longer be read counts as changed.
    pub fn should_reload(&self) -> bool {
        let (Some(path), Some(recorded)) = (self.resolved_path(), self.last_modified) else {
            return false;
        };

        match fs::metadata(path).and_then(|meta| meta.modified()) {
            Ok(current) => current != recorded,
            Err(e) => {
                log::debug!("[AssetCache] Cannot stat '{}': {e}", path.display());
                true
            }
        }
    }
}

/// One slot of the registry.
pub(crate) struct AssetEntry {
    pub(crate) sources: Vec<SourceDescriptor>,
    pub(crate) config: AssetConfig,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    /// Present iff the entry is loaded.
    pub(crate) instance: Option<Rc<dyn Any>>,
}

impl AssetEntry {
    pub(crate) fn new<T: Asset>(sources: Vec<SourceDescriptor>, config: AssetConfig) -> Self {
        Self {
            sources,
            config,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance: None,
        }
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.instance.is_some()
    }

    pub(crate) fn holds<T: Asset>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns a typed handle to the instance, if loaded and of type `T`.
    pub(crate) fn handle<T: Asset>(&self) -> Option<AssetHandle<T>> {
        let instance = self.instance.as_ref()?;
        Rc::clone(instance)
            .downcast::<T>()
            .ok()
            .map(AssetHandle::from_rc)
    }

    pub(crate) fn store<T: Asset>(&mut self, asset: T) -> AssetHandle<T> {
        let shared = Rc::new(asset);
        self.instance = Some(Rc::clone(&shared) as Rc<dyn Any>);
        AssetHandle::from_rc(shared)
    }

    /// Number of shares held outside the cache.
    pub(crate) fn external_refs(&self) -> usize {
        self.instance
            .as_ref()
            .map_or(0, |instance| Rc::strong_count(instance) - 1)
    }

    pub(crate) fn status(&self, id: AssetId) -> EntryStatus {
        EntryStatus {
            id,
            type_name: self.type_name,
            loaded: self.is_loaded(),
            source_count: self.sources.len(),
            first_source: self.sources.first().map(SourceDescriptor::label),
        }
    }
}

/// A read-only snapshot of one registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    /// The entry's identifier.
    pub id: AssetId,
    /// The resource type the entry was registered for.
    pub type_name: &'static str,
    /// Whether the resource has been constructed.
    pub loaded: bool,
    /// Number of registered sources.
    pub source_count: usize,
    /// Label of the first source, if any.
    pub first_source: Option<String>,
}
