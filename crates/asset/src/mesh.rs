//! CPU-side mesh representation produced by the assembler.

use std::sync::Arc;

use crate::texture::TextureData;

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed, deduplicated vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// One drawable unit: flat vertex/index data plus resolved material maps.
/// Immutable once built; the texture `Arc`s are shared with the cache.
#[derive(Clone, Debug)]
pub struct AssembledMesh {
    pub data: MeshData,
    pub specular_exponent: f32,
    pub diffuse: Option<Arc<TextureData>>,
    pub specular: Option<Arc<TextureData>>,
    pub bump: Option<Arc<TextureData>>,
}

/// Ordered collection of assembled meshes composing one logical model.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub meshes: Vec<AssembledMesh>,
}

impl Model {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.data.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.data.triangle_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(data.is_valid());
        assert!(!MeshData::default().is_valid());
    }

    #[test]
    fn model_counts_sum_over_meshes() {
        let mesh = AssembledMesh {
            data: MeshData::new(vec![MeshVertex::default(); 3], vec![0, 1, 2]),
            specular_exponent: 32.0,
            diffuse: None,
            specular: None,
            bump: None,
        };
        let model = Model {
            meshes: vec![mesh.clone(), mesh],
        };
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(model.triangle_count(), 2);
    }
}
