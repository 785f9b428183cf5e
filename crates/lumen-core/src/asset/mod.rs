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

//! Provides the foundational traits and primitive types for Lumen's asset system.
//!
//! This module defines the "common language" for asset-related operations.
//! It has no knowledge of how assets are registered, loaded, or stored; that
//! lives in `lumen-io`.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be cached.
//! - [`AssetId`]: the opaque key under which an asset is registered.
//! - [`AssetHandle`]: a shared, reference-counted view of a constructed asset.
//! - [`AssetConfig`]: the closed set of per-type configuration payloads.

mod config;
mod handle;
mod id;

pub use config::*;
pub use handle::*;
pub use id::*;

/// A marker trait for types that can be managed by the asset cache.
///
/// Only `'static` is required. Assets frequently wrap handles that belong to
/// the thread owning the rendering context, so neither `Send` nor `Sync` is
/// demanded here.
///
/// # Examples
///
/// ```
/// use lumen_core::asset::Asset;
///
/// // A simple struct representing a texture.
/// struct Texture {
///     // ... fields
/// }
///
/// // By implementing Asset, `Texture` can now be stored in the cache.
/// impl Asset for Texture {}
/// ```
pub trait Asset: 'static {}
