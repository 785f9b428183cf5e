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

//! The construction side of the cache: loader contract, load context, and the
//! type-erased registry that maps a resource type to its loader.

use crate::entry::{SourceDescriptor, SourceOrigin};
use anyhow::Result;
use lumen_core::{
    asset::{Asset, AssetConfig, AssetId, MeshConfig, TextureConfig},
    vfs::PathResolver,
    AssetError,
};
use std::{
    any::{Any, TypeId},
    borrow::Cow,
    collections::HashMap,
    fs,
    marker::PhantomData,
};

/// A construction routine for resources of type `A`.
///
/// The cache decides *when* a loader runs (the first `use` of an entry) and
/// *how long* the result lives; the loader decides *how* the sources and
/// configuration become an `A`.
pub trait AssetLoader<A: Asset> {
    /// Builds the resource from the entry described by `ctx`.
    fn load(&self, ctx: &LoadContext<'_>) -> Result<A>;
}

/// Adapts a closure into an [`AssetLoader`].
pub struct FnLoader<A, F> {
    f: F,
    _asset: PhantomData<fn() -> A>,
}

impl<A, F> FnLoader<A, F>
where
    A: Asset,
    F: Fn(&LoadContext<'_>) -> Result<A>,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _asset: PhantomData,
        }
    }
}

impl<A, F> AssetLoader<A> for FnLoader<A, F>
where
    A: Asset,
    F: Fn(&LoadContext<'_>) -> Result<A>,
{
    fn load(&self, ctx: &LoadContext<'_>) -> Result<A> {
        (self.f)(ctx)
    }
}

/// Everything a loader may read about the entry it is constructing.
pub struct LoadContext<'a> {
    id: &'a AssetId,
    sources: &'a [SourceDescriptor],
    config: &'a AssetConfig,
    resolver: &'a dyn PathResolver,
}

impl<'a> LoadContext<'a> {
    pub(crate) fn new(
        id: &'a AssetId,
        sources: &'a [SourceDescriptor],
        config: &'a AssetConfig,
        resolver: &'a dyn PathResolver,
    ) -> Self {
        Self {
            id,
            sources,
            config,
            resolver,
        }
    }

    /// The identifier of the entry being constructed.
    pub fn id(&self) -> &AssetId {
        self.id
    }

    /// The entry's sources, in registration order.
    pub fn sources(&self) -> &'a [SourceDescriptor] {
        self.sources
    }

    /// The entry's configuration payload.
    pub fn config(&self) -> &AssetConfig {
        self.config
    }

    /// The texture payload, or the default if the entry carries none.
    pub fn texture_config(&self) -> TextureConfig {
        self.config.texture().copied().unwrap_or_default()
    }

    /// The mesh payload, or the default if the entry carries none.
    pub fn mesh_config(&self) -> MeshConfig {
        self.config.mesh().copied().unwrap_or_default()
    }

    /// The resolver the cache was built with.
    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver
    }

    /// Returns the bytes of source `index`.
    ///
    /// Inline data is borrowed. A path is read from disk; a path that did not
    /// resolve at registration is resolved once more, so files created after
    /// registration are picked up.
    ///
    /// # Errors
    /// [`AssetError::MissingSource`] for an out-of-range index,
    /// [`AssetError::SourceUnresolved`] if the path still does not resolve,
    /// [`AssetError::Io`] if reading the file fails.
    pub fn source_bytes(&self, index: usize) -> Result<Cow<'a, [u8]>, AssetError> {
        let source = self.sources.get(index).ok_or(AssetError::MissingSource {
            id: *self.id,
            index,
        })?;

        match source.origin() {
            SourceOrigin::Inline(data) => Ok(Cow::Borrowed(data.as_slice())),
            SourceOrigin::Path { relative, resolved } => {
                let path = resolved
                    .clone()
                    .or_else(|| self.resolver.resolve(relative))
                    .ok_or_else(|| AssetError::SourceUnresolved {
                        id: *self.id,
                        index,
                        path: relative.clone(),
                    })?;

                fs::read(&path)
                    .map(Cow::Owned)
                    .map_err(|source| AssetError::Io { path, source })
            }
        }
    }

    /// Returns source `index` as UTF-8 text.
    ///
    /// # Errors
    /// As [`source_bytes`](Self::source_bytes), plus
    /// [`AssetError::InvalidText`] if the bytes are not UTF-8.
    pub fn source_text(&self, index: usize) -> Result<String, AssetError> {
        let bytes = self.source_bytes(index)?;
        String::from_utf8(bytes.into_owned()).map_err(|_| AssetError::InvalidText {
            id: *self.id,
            index,
        })
    }
}

/// Maps a resource type to its boxed loader.
///
/// Each value is a `Box<dyn AssetLoader<A>>` erased to `dyn Any`, keyed by
/// `TypeId::of::<A>()`, so lookups downcast back to the exact loader type.
#[derive(Default)]
pub(crate) struct LoaderRegistry {
    loaders: HashMap<TypeId, Box<dyn Any>>,
}

impl LoaderRegistry {
    /// Registers `loader` for `A`. Returns `true` if it replaced a previous one.
    pub(crate) fn register<A: Asset>(&mut self, loader: impl AssetLoader<A> + 'static) -> bool {
        let boxed: Box<dyn AssetLoader<A>> = Box::new(loader);
        self.loaders
            .insert(TypeId::of::<A>(), Box::new(boxed))
            .is_some()
    }

    pub(crate) fn get<A: Asset>(&self) -> Option<&dyn AssetLoader<A>> {
        self.loaders
            .get(&TypeId::of::<A>())
            .and_then(|boxed| boxed.downcast_ref::<Box<dyn AssetLoader<A>>>())
            .map(|loader| loader.as_ref())
    }

    pub(crate) fn contains<A: Asset>(&self) -> bool {
        self.loaders.contains_key(&TypeId::of::<A>())
    }

    pub(crate) fn len(&self) -> usize {
        self.loaders.len()
    }
}
