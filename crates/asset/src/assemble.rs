//! Mesh assembly: normal synthesis, vertex deduplication, material binding.
//!
//! This is the bridge from the parsed pool/index representation to the flat
//! vertex and index arrays the renderer uploads.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;
use crate::mesh::{AssembledMesh, MeshData, MeshVertex, Model};
use crate::mtl::DEFAULT_SPECULAR_EXPONENT;
use crate::obj::{IndexTriple, NO_INDEX, ObjModel, SubMesh, VertexPools};
use crate::texture::TextureCache;

/// Compute smoothed per-vertex normals for a sub-mesh that has none.
///
/// One fresh normal-pool slot is allocated per distinct position index the
/// faces reference; every triangle accumulates its unnormalized edge cross
/// product into its three corner slots, so larger triangles weigh more.
/// Degenerate triangles contribute zero and the final normalization guards
/// against zero-length vectors, so no NaN ever reaches the pool. Sets
/// `has_normals`, which makes a second call a no-op.
pub fn synthesize_normals(pools: &mut VertexPools, sub: &mut SubMesh) {
    if sub.has_normals {
        return;
    }

    let base = pools.normals.len();
    let mut slots: HashMap<u32, u32> = HashMap::new();

    for triple in &mut sub.faces {
        let next = (base + slots.len()) as u32;
        triple.normal = *slots.entry(triple.position).or_insert(next);
    }
    pools.normals.resize(base + slots.len(), [0.0; 3]);

    for tri in sub.faces.chunks_exact(3) {
        let Some(positions) = corner_positions(pools, tri) else {
            // Out-of-range position index; assembly reports it later.
            continue;
        };
        let [a, b, c] = positions;
        let weighted = (b - a).cross(c - a);

        for triple in tri {
            let slot = &mut pools.normals[triple.normal as usize];
            *slot = (Vec3::from_array(*slot) + weighted).to_array();
        }
    }

    for slot in &mut pools.normals[base..] {
        let v = Vec3::from_array(*slot);
        if v.length_squared() > 0.0 {
            *slot = v.normalize().to_array();
        }
    }

    sub.has_normals = true;
}

fn corner_positions(pools: &VertexPools, tri: &[IndexTriple]) -> Option<[Vec3; 3]> {
    let mut out = [Vec3::ZERO; 3];
    for (v, triple) in out.iter_mut().zip(tri) {
        *v = Vec3::from_array(*pools.positions.get(triple.position as usize)?);
    }
    Some(out)
}

/// Collapse a sub-mesh's index triples into flat, deduplicated vertex arrays
/// plus a matching triangle index list.
///
/// Output slots are assigned in first-seen order; corners sharing an index
/// triple share one slot, so the vertex count never exceeds three times the
/// triangle count.
pub fn assemble_sub_mesh(pools: &VertexPools, sub: &SubMesh) -> Result<MeshData, AssetError> {
    let mut unique: HashMap<IndexTriple, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(sub.faces.len());

    for triple in &sub.faces {
        let slot = match unique.get(triple) {
            Some(&slot) => slot,
            None => {
                let vertex = resolve_vertex(pools, sub, triple)?;
                let slot = vertices.len() as u32;
                vertices.push(vertex);
                unique.insert(*triple, slot);
                slot
            }
        };
        indices.push(slot);
    }

    Ok(MeshData::new(vertices, indices))
}

fn resolve_vertex(
    pools: &VertexPools,
    sub: &SubMesh,
    triple: &IndexTriple,
) -> Result<MeshVertex, AssetError> {
    let position = *pools
        .positions
        .get(triple.position as usize)
        .ok_or(AssetError::IndexOutOfBounds {
            pool: "position",
            index: triple.position,
            len: pools.positions.len(),
        })?;

    let normal = if sub.has_normals && triple.normal != NO_INDEX {
        *pools
            .normals
            .get(triple.normal as usize)
            .ok_or(AssetError::IndexOutOfBounds {
                pool: "normal",
                index: triple.normal,
                len: pools.normals.len(),
            })?
    } else {
        [0.0, 0.0, 1.0]
    };

    let uv = if sub.has_uvs && triple.uv != NO_INDEX {
        *pools
            .uvs
            .get(triple.uv as usize)
            .ok_or(AssetError::IndexOutOfBounds {
                pool: "uv",
                index: triple.uv,
                len: pools.uvs.len(),
            })?
    } else {
        [0.0, 0.0]
    };

    Ok(MeshVertex::new(position, normal, uv))
}

/// Turn a parsed model into draw-ready meshes with resolved textures.
///
/// Normals are synthesized where missing, every sub-mesh is deduplicated, and
/// material names are resolved against the model's table; a name the table
/// does not contain fails the whole build. The texture cache is owned by the
/// caller and threaded through by reference, so repeated map paths load once.
pub fn build_model(
    obj: &mut ObjModel,
    cache: &mut TextureCache,
    base_dir: &Path,
) -> Result<Model, AssetError> {
    let ObjModel {
        pools,
        objects,
        materials,
    } = obj;

    let mut meshes = Vec::with_capacity(objects.len());

    for sub in objects.iter_mut() {
        synthesize_normals(pools, sub);
        let data = assemble_sub_mesh(pools, sub)?;

        let mut mesh = AssembledMesh {
            data,
            specular_exponent: DEFAULT_SPECULAR_EXPONENT,
            diffuse: None,
            specular: None,
            bump: None,
        };

        if let Some(name) = &sub.material {
            let material = materials.get(name).ok_or_else(|| AssetError::UnknownMaterial {
                object: sub.name.clone(),
                material: name.clone(),
            })?;
            mesh.specular_exponent = material.specular_exponent;
            if let Some(rel) = &material.diffuse_map {
                mesh.diffuse = Some(cache.load(&base_dir.join(rel))?);
            }
            if let Some(rel) = &material.specular_map {
                mesh.specular = Some(cache.load(&base_dir.join(rel))?);
            }
            if let Some(rel) = &material.bump_map {
                mesh.bump = Some(cache.load(&base_dir.join(rel))?);
            }
        }

        meshes.push(mesh);
    }

    if meshes.is_empty() {
        return Err(AssetError::EmptyModel);
    }

    Ok(Model { meshes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::load_model_from_str;

    fn right_triangle() -> ObjModel {
        load_model_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").expect("parse")
    }

    #[test]
    fn synthesized_normal_of_flat_triangle_is_plus_z() {
        let mut model = right_triangle();
        let ObjModel { pools, objects, .. } = &mut model;
        let sub = &mut objects[0];

        synthesize_normals(pools, sub);
        assert!(sub.has_normals);

        let data = assemble_sub_mesh(pools, sub).expect("assemble");
        for vertex in &data.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn degenerate_triangle_yields_zero_normal_not_nan() {
        let mut model = load_model_from_str("v 1 1 1\nf 1 1 1\n").expect("parse");
        let ObjModel { pools, objects, .. } = &mut model;
        let sub = &mut objects[0];

        synthesize_normals(pools, sub);
        let data = assemble_sub_mesh(pools, sub).expect("assemble");
        for vertex in &data.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 0.0]);
            assert!(vertex.normal.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn synthesis_is_idempotent() {
        let mut model = right_triangle();
        let ObjModel { pools, objects, .. } = &mut model;
        let sub = &mut objects[0];

        synthesize_normals(pools, sub);
        let pool_len = pools.normals.len();
        let faces = sub.faces.clone();

        synthesize_normals(pools, sub);
        assert_eq!(pools.normals.len(), pool_len);
        assert_eq!(sub.faces, faces);
    }

    #[test]
    fn all_distinct_corners_stay_distinct() {
        // Two triangles, six distinct corners.
        let mut model =
            load_model_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 2 0 0\nv 3 0 0\nv 2 1 0\nf 1 2 3\nf 4 5 6\n")
                .expect("parse");
        let ObjModel { pools, objects, .. } = &mut model;
        let sub = &mut objects[0];
        synthesize_normals(pools, sub);

        let data = assemble_sub_mesh(pools, sub).expect("assemble");
        assert_eq!(data.vertices.len(), 6);
        assert_eq!(data.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn shared_corner_maps_to_one_slot() {
        // Both triangles reuse corner 1; five unique triples remain.
        let mut model =
            load_model_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nv 2 1 0\nf 1 2 3\nf 1 4 5\n")
                .expect("parse");
        let ObjModel { pools, objects, .. } = &mut model;
        let sub = &mut objects[0];
        synthesize_normals(pools, sub);

        let data = assemble_sub_mesh(pools, sub).expect("assemble");
        assert_eq!(data.vertices.len(), 5);
        assert_eq!(data.indices[0], data.indices[3]);
    }

    #[test]
    fn dedup_key_uses_all_three_fields() {
        // Same position, different normal sub-index: two output slots.
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nvn 0 1 0\nf 1//1 2//1 3//1\nf 1//2 2//1 3//1\n";
        let model = load_model_from_str(src).expect("parse");

        let data = assemble_sub_mesh(&model.pools, &model.objects[0]).expect("assemble");
        assert_eq!(data.vertices.len(), 4);
        assert_ne!(data.indices[0], data.indices[3]);
    }

    #[test]
    fn out_of_range_face_index_is_structural() {
        let model = load_model_from_str("v 0 0 0\nf 1 2 3\n").expect("parse");
        let err = assemble_sub_mesh(&model.pools, &model.objects[0]).unwrap_err();
        assert!(matches!(err, AssetError::IndexOutOfBounds { pool: "position", .. }));
    }

    #[test]
    fn unknown_material_fails_the_build() {
        let mut model =
            load_model_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl ghost\nf 1 2 3\n")
                .expect("parse");
        let mut cache = TextureCache::new();
        let err = build_model(&mut model, &mut cache, Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            AssetError::UnknownMaterial { ref material, .. } if material == "ghost"
        ));
    }

    #[test]
    fn build_twice_yields_identical_buffers() {
        let mut model = right_triangle();
        let mut cache = TextureCache::new();

        let first = build_model(&mut model, &mut cache, Path::new(".")).expect("first build");
        let second = build_model(&mut model, &mut cache, Path::new(".")).expect("second build");

        assert_eq!(first.meshes.len(), second.meshes.len());
        for (a, b) in first.meshes.iter().zip(&second.meshes) {
            assert_eq!(a.data, b.data);
        }
    }

    #[test]
    fn empty_model_is_an_error() {
        let mut model = load_model_from_str("# nothing\n").expect("parse");
        let mut cache = TextureCache::new();
        let err = build_model(&mut model, &mut cache, Path::new(".")).unwrap_err();
        assert!(matches!(err, AssetError::EmptyModel));
    }
}
