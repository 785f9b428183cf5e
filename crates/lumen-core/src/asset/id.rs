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

use crate::error::AssetError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Maximum number of bytes a named identifier can hold.
pub const ID16_CAPACITY: usize = 16;

/// A short name stored as a fixed-size byte array.
///
/// Comparing and hashing an `Id16` never touches the heap, which keeps
/// registry lookups cheap while still letting callers pick readable keys
/// such as `"player_tex"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id16 {
    bytes: [u8; ID16_CAPACITY],
    len: u8,
}

impl Id16 {
    /// Encodes `name` into a fixed-size identifier.
    ///
    /// # Errors
    /// Returns [`AssetError::InvalidId`] if `name` is empty or longer than
    /// [`ID16_CAPACITY`] bytes.
    pub fn new(name: &str) -> Result<Self, AssetError> {
        if name.is_empty() || name.len() > ID16_CAPACITY {
            log::warn!(
                "[AssetId] '{name}' is {} bytes long; ids must hold 1 to {ID16_CAPACITY} bytes",
                name.len()
            );
            return Err(AssetError::InvalidId(name.to_owned()));
        }

        let mut bytes = [0u8; ID16_CAPACITY];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Ok(Self {
            bytes,
            len: name.len() as u8,
        })
    }

    /// Returns the name this identifier was built from.
    pub fn as_str(&self) -> &str {
        // Built from a whole `&str`, so the prefix is always valid UTF-8.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Returns the encoded bytes, without padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Renders each byte as two lowercase hex digits.
    pub fn hex(&self) -> String {
        self.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Id16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id16").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Id16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Id16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Id16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Id16::new(&name).map_err(de::Error::custom)
    }
}

/// The opaque key under which an asset is registered.
///
/// An id is either a short human-readable name or a UUID. Both encodings are
/// `Copy` and hash without allocating. Two ids of different encodings never
/// compare equal, even if the UUID was derived from the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    /// A name of up to 16 bytes.
    Name(Id16),
    /// A random or name-derived UUID.
    Uuid(Uuid),
}

impl AssetId {
    /// Creates a named identifier.
    ///
    /// # Errors
    /// Returns [`AssetError::InvalidId`] if `name` is empty or longer than
    /// [`ID16_CAPACITY`] bytes.
    pub fn named(name: &str) -> Result<Self, AssetError> {
        Id16::new(name).map(Self::Name)
    }

    /// Creates a new, random (version 4) identifier.
    pub fn random() -> Self {
        Self::Uuid(Uuid::new_v4())
    }

    /// Creates a deterministic (version 5) identifier from an arbitrary name.
    ///
    /// Useful for keys that exceed the 16-byte named form, such as full
    /// relative paths.
    pub fn from_name_v5(name: &str) -> Self {
        Self::Uuid(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// Returns a hex rendering: name bytes for named ids, the simple UUID
    /// form otherwise.
    pub fn hex(&self) -> String {
        match self {
            Self::Name(name) => name.hex(),
            Self::Uuid(uuid) => uuid.simple().to_string(),
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => fmt::Display::fmt(name, f),
            Self::Uuid(uuid) => fmt::Display::fmt(&uuid.hyphenated(), f),
        }
    }
}

impl FromStr for AssetId {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::named(s)
    }
}

impl TryFrom<&str> for AssetId {
    type Error = AssetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::named(value)
    }
}

impl From<Uuid> for AssetId {
    fn from(uuid: Uuid) -> Self {
        Self::Uuid(uuid)
    }
}
