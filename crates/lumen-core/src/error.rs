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

//! Defines the error type shared by every asset operation.

use crate::asset::AssetId;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error produced by a resource's construction routine.
pub type LoadError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error raised by asset registration, construction, or teardown.
///
/// Every variant is recoverable: the operation that produced it had no
/// effect beyond what its documentation states, and retrying is safe.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The identifier could not be encoded.
    #[error("invalid asset id '{0}': named ids must hold 1 to 16 bytes")]
    InvalidId(String),

    /// An entry already exists under this identifier and overwrite was not allowed.
    #[error("asset '{0}' is already registered")]
    AlreadyRegistered(AssetId),

    /// No entry exists under this identifier.
    #[error("asset '{0}' is not registered")]
    NotRegistered(AssetId),

    /// The entry was registered for a different resource type.
    #[error("asset '{id}' was registered as `{expected}` but requested as `{requested}`")]
    TypeMismatch {
        /// The entry's identifier.
        id: AssetId,
        /// The type recorded at registration.
        expected: &'static str,
        /// The type the caller asked for.
        requested: &'static str,
    },

    /// No construction routine is known for the requested type.
    #[error("no loader registered for `{0}`")]
    NoLoader(&'static str),

    /// The construction routine ran and failed. The entry stays unloaded.
    #[error("failed to load asset '{id}': {source}")]
    LoadFailed {
        /// The entry's identifier.
        id: AssetId,
        /// The loader's error.
        #[source]
        source: LoadError,
    },

    /// A path source did not resolve to an existing file.
    #[error("source {index} of asset '{id}' ('{path}') does not resolve to a file")]
    SourceUnresolved {
        /// The entry's identifier.
        id: AssetId,
        /// Position of the source in the entry.
        index: usize,
        /// The path as given at registration.
        path: String,
    },

    /// A loader asked for a source index the entry does not have.
    #[error("asset '{id}' has no source at index {index}")]
    MissingSource {
        /// The entry's identifier.
        id: AssetId,
        /// The requested position.
        index: usize,
    },

    /// A source was expected to hold UTF-8 text.
    #[error("source {index} of asset '{id}' is not valid UTF-8")]
    InvalidText {
        /// The entry's identifier.
        id: AssetId,
        /// Position of the source in the entry.
        index: usize,
    },

    /// Reading a file failed.
    #[error("I/O error on '{}'", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An asset manifest could not be read or parsed.
    #[error("invalid asset manifest: {0}")]
    Manifest(String),

    /// A settings file could not be parsed.
    #[error("invalid cache settings: {0}")]
    Settings(String),
}
