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

//! Cache settings read from a RON file.

use crate::entry::RegisterOptions;
use lumen_core::AssetError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// How a cache is rooted and what registrations default to.
///
/// ```ron
/// (
///     root: Some("assets"),
///     hot_reload: true,
///     allow_overwrite: false,
///     manifest: Some("assets/manifest.json"),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory relative asset paths are resolved against. `None` uses the
    /// executable's directory.
    pub root: Option<PathBuf>,
    /// Default for [`RegisterOptions::hot_reload`].
    pub hot_reload: bool,
    /// Default for [`RegisterOptions::allow_overwrite`].
    pub allow_overwrite: bool,
    /// A manifest to register at startup.
    pub manifest: Option<PathBuf>,
}

impl CacheSettings {
    /// Parses settings from RON text. Missing fields take their defaults.
    ///
    /// # Errors
    /// [`AssetError::Settings`] if the text is not valid RON for this type.
    pub fn from_ron_str(text: &str) -> Result<Self, AssetError> {
        ron::from_str(text).map_err(|e| AssetError::Settings(e.to_string()))
    }

    /// Reads settings from `path`, or returns the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    /// [`AssetError::Io`] if the file exists but cannot be read,
    /// [`AssetError::Settings`] if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "[CacheSettings] '{}' not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text)
    }

    /// Registration options derived from these settings.
    pub fn register_options(&self) -> RegisterOptions {
        RegisterOptions {
            hot_reload: self.hot_reload,
            allow_overwrite: self.allow_overwrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings = CacheSettings::from_ron_str("(hot_reload: true)").unwrap();
        assert!(settings.hot_reload);
        assert!(!settings.allow_overwrite);
        assert_eq!(settings.root, None);
        assert!(settings.register_options().hot_reload);
    }

    #[test]
    fn test_full_ron() {
        let settings = CacheSettings::from_ron_str(
            r#"(root: Some("assets"), hot_reload: false, allow_overwrite: true, manifest: Some("assets/manifest.json"))"#,
        )
        .unwrap();
        assert_eq!(settings.root, Some(PathBuf::from("assets")));
        assert_eq!(settings.manifest, Some(PathBuf::from("assets/manifest.json")));
        assert!(settings.register_options().allow_overwrite);
    }

    #[test]
    fn test_invalid_ron_is_a_settings_error() {
        assert!(matches!(
            CacheSettings::from_ron_str("(hot_reload: maybe)"),
            Err(AssetError::Settings(_))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CacheSettings::load(dir.path().join("settings.ron")).unwrap();
        assert_eq!(settings, CacheSettings::default());
    }
}
