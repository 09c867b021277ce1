//! Asset pipeline: OBJ/MTL parsing, mesh assembly, texture cache.
//!
//! Flow: [`obj::load_model_from_path`] parses text into pools + sub-meshes
//! (pulling in `mtllib` material tables), then [`assemble::build_model`]
//! synthesizes missing normals, deduplicates vertices and resolves textures
//! through a caller-owned [`texture::TextureCache`].

pub mod assemble;
pub mod error;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod texture;
pub mod tokenize;

pub use error::AssetError;
