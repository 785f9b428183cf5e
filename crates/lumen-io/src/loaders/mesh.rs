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

//! Defines a loader for OBJ mesh assets.

use crate::loader::{AssetLoader, LoadContext};
use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use lumen_core::asset::Asset;

/// Vertex data of a mesh, ready to be packed into GPU buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, if the source had any.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Texture coordinates, if the source had any.
    pub tex_coords: Option<Vec<[f32; 2]>>,
    /// Index buffer.
    pub indices: Vec<u32>,
}

impl Asset for MeshData {}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles described by the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Parses the entry's first source as Wavefront OBJ text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjMeshLoader;

impl AssetLoader<MeshData> for ObjMeshLoader {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<MeshData> {
        let config = ctx.mesh_config();
        let bytes = ctx.source_bytes(0)?;
        let obj_text = std::str::from_utf8(&bytes).context("OBJ file is not valid UTF-8")?;

        let (models, _materials) = tobj::load_obj_buf(
            &mut std::io::Cursor::new(obj_text),
            &tobj::LoadOptions {
                triangulate: config.triangulate,
                single_index: config.single_index,
                ..Default::default()
            },
            |_| Ok((Vec::new(), AHashMap::new())),
        )
        .context("Failed to parse OBJ file")?;

        // tobj yields an empty model for input without faces; only the first
        // model with geometry is kept.
        let Some(model) = models
            .into_iter()
            .find(|model| !model.mesh.positions.is_empty())
        else {
            bail!("No geometry found in OBJ file");
        };
        let mesh = model.mesh;

        let positions = mesh
            .positions
            .chunks_exact(3)
            .map(|v| [v[0], v[1], v[2]])
            .collect();

        let normals = (!mesh.normals.is_empty()).then(|| {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        });

        let tex_coords = (!mesh.texcoords.is_empty()).then(|| {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| [t[0], t[1]])
                .collect()
        });

        Ok(MeshData {
            positions,
            normals,
            tex_coords,
            indices: mesh.indices,
        })
    }
}
