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

//! Virtual File System (VFS) module for validating and resolving asset paths.
//!
//! The asset cache never touches raw paths directly. It asks a
//! [`PathResolver`] to turn a project-relative path into an absolute one and
//! treats a failed resolution as "this file does not exist". [`DiskVfs`] is
//! the resolver backed by the real filesystem; tests and tools may supply
//! their own.

use std::{
    io,
    path::{Path, PathBuf},
};

/// Resolves project-relative paths to existing absolute paths.
pub trait PathResolver {
    /// Returns the absolute path of `relative` if it names an existing file
    /// or directory, `None` otherwise.
    fn resolve(&self, relative: &str) -> Option<PathBuf>;

    /// Returns `true` if `path` exists, without any root-relative lookup.
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// A [`PathResolver`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskVfs {
    root: PathBuf,
}

impl DiskVfs {
    /// Creates a resolver rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a resolver rooted at the directory of the running executable.
    ///
    /// # Errors
    /// Returns the error of [`std::env::current_exe`].
    pub fn from_executable() -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let root = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        log::debug!("[VFS] Root set to executable directory '{}'", root.display());
        Ok(Self::new(root))
    }

    /// The directory relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PathResolver for DiskVfs {
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        if relative.is_empty() {
            return None;
        }

        let candidate = Path::new(relative);
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        // `canonicalize` fails for paths that do not exist.
        match joined.canonicalize() {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("[VFS] Failed to resolve '{relative}': {e}");
                None
            }
        }
    }
}

impl<R: PathResolver + ?Sized> PathResolver for Box<R> {
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        (**self).resolve(relative)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
