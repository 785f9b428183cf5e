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

//! Shader source pairs.

use crate::loader::{AssetLoader, LoadContext};
use anyhow::{ensure, Context, Result};
use lumen_core::asset::Asset;

/// The vertex and fragment stages of a shader program, as text.
///
/// Compilation is the renderer's business; this only gathers the sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
}

impl Asset for ShaderSource {}

/// Reads two sources, vertex then fragment, each from a file or inline text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaderSourceLoader;

impl AssetLoader<ShaderSource> for ShaderSourceLoader {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<ShaderSource> {
        let count = ctx.sources().len();
        ensure!(
            count == 2,
            "expected 2 shader sources (vertex, fragment), got {count}"
        );

        let vertex = ctx.source_text(0).context("Failed to read vertex stage")?;
        let fragment = ctx.source_text(1).context("Failed to read fragment stage")?;

        Ok(ShaderSource { vertex, fragment })
    }
}
