//! Error type for the asset pipeline.
//!
//! Routine per-line format variance in OBJ/MTL files is not an error at all
//! (such lines are skipped and counted by the parsers); this enum covers the
//! hard failures: unreadable files, structurally invalid model/material
//! pairings and out-of-range indices discovered at assembly time.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A material property directive appeared before any `newmtl`.
    #[error("material property '{directive}' before any newmtl")]
    OrphanMaterialProperty { directive: String },

    /// A sub-mesh names a material the material table does not contain.
    #[error("object '{object}' references unknown material '{material}'")]
    UnknownMaterial { object: String, material: String },

    /// A face index points past the end of its attribute pool.
    #[error("{pool} index {index} out of bounds (pool len {len})")]
    IndexOutOfBounds {
        pool: &'static str,
        index: u32,
        len: usize,
    },

    #[error("model contained no triangles")]
    EmptyModel,
}
