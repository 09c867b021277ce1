//! OBJ model parser: vertex pools, per-object sub-meshes, material binding.
//!
//! The file is split into per-object line ranges on `o` markers; each range is
//! handed to the sub-mesh parser, which appends raw attributes to the shared
//! pools and collects face index triples. Lines this loader does not
//! understand (`g`, `s`, polygonal faces, ...) are skipped per line, never
//! aborting the parse; only unreadable files are hard errors here.

use std::fs;
use std::path::Path;

use crate::error::AssetError;
use crate::mtl::{self, MaterialTable};
use crate::tokenize::tokenize;

/// Sentinel for an absent uv/normal sub-index in a face corner.
pub const NO_INDEX: u32 = u32::MAX;

/// One face corner: zero-based offsets into the shared vertex pools.
///
/// Equality and hashing are structural over all three fields; this is the
/// deduplication key used by the assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexTriple {
    pub position: u32,
    pub uv: u32,
    pub normal: u32,
}

/// Append-only attribute arena shared by every sub-mesh of one model.
/// Mutated only while parsing (and by normal synthesis); read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexPools {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

/// One named drawable group: its face list (always a multiple of 3) plus
/// indices into the shared pools.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMesh {
    pub name: String,
    pub faces: Vec<IndexTriple>,
    pub material: Option<String>,
    pub has_normals: bool,
    pub has_uvs: bool,
}

impl SubMesh {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }
}

/// Parsed model: pools + ordered sub-meshes + material table.
#[derive(Clone, Debug, Default)]
pub struct ObjModel {
    pub pools: VertexPools,
    pub objects: Vec<SubMesh>,
    pub materials: MaterialTable,
}

/// What a line-directive handler did with its line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineOutcome {
    /// Directive recognized and applied.
    Applied,
    /// Not ours: comment, unknown directive, or handled by the model parser.
    Ignored,
    /// Recognized directive with a malformed payload; line dropped.
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SkipReason {
    MissingField,
    BadNumber,
    BadFaceArity,
}

/// Load an OBJ model from a file path. `mtllib` references resolve relative
/// to the model's directory.
pub fn load_model_from_path(path: impl AsRef<Path>) -> Result<ObjModel, AssetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_model(&text, path.parent())
}

/// Parse an OBJ string literal. Without a base directory `mtllib` directives
/// are skipped with a warning, so the resulting material table is empty.
pub fn load_model_from_str(text: &str) -> Result<ObjModel, AssetError> {
    parse_model(text, None)
}

fn parse_model(text: &str, base_dir: Option<&Path>) -> Result<ObjModel, AssetError> {
    let lines = tokenize(text, '\n');

    let mut materials = MaterialTable::default();

    // Object boundaries: content before the first `o` marker belongs to an
    // implicit unnamed sub-mesh, so early geometry is never silently dropped.
    let mut boundaries: Vec<(usize, String)> = vec![(0, String::new())];

    for (i, raw) in lines.iter().enumerate() {
        let fields = tokenize(raw.trim(), ' ');
        match fields.first() {
            Some(&"o") => {
                let name = fields.get(1).copied().unwrap_or("");
                boundaries.push((i + 1, name.to_string()));
            }
            Some(&"mtllib") if fields.len() >= 2 => {
                let rel = fields[1..].join(" ");
                match base_dir {
                    Some(dir) => {
                        let path = dir.join(&rel);
                        let text = fs::read_to_string(&path).map_err(|source| AssetError::Io {
                            path: path.clone(),
                            source,
                        })?;
                        let table = mtl::parse_mtl(&text)?;
                        log::info!("mtllib {}: {} material(s)", path.display(), table.len());
                        materials.merge(table);
                    }
                    None => log::warn!("mtllib '{rel}' ignored: no base directory"),
                }
            }
            _ => {}
        }
    }

    let mut pools = VertexPools::default();
    let mut objects = Vec::with_capacity(boundaries.len());

    for (which, &(start, ref name)) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(which + 1)
            .map_or(lines.len(), |&(next, _)| next.saturating_sub(1));
        objects.push(parse_sub_mesh(name, &lines[start..end], &mut pools));
    }

    // A sub-mesh without faces has nothing to draw; this also removes the
    // implicit unnamed sub-mesh when the file starts with an `o` marker.
    objects.retain(|o| !o.faces.is_empty());

    log::debug!(
        "obj: {} object(s), {} position(s), {} normal(s), {} uv(s)",
        objects.len(),
        pools.positions.len(),
        pools.normals.len(),
        pools.uvs.len()
    );

    Ok(ObjModel {
        pools,
        objects,
        materials,
    })
}

/// Consume one object's line range, filling the shared pools and the
/// sub-mesh's face list.
fn parse_sub_mesh(name: &str, lines: &[&str], pools: &mut VertexPools) -> SubMesh {
    let mut sub = SubMesh::new(name);
    let mut skipped = 0usize;

    for raw in lines {
        let line = raw.trim();
        match parse_line(line, pools, &mut sub) {
            LineOutcome::Applied | LineOutcome::Ignored => {}
            LineOutcome::Skipped(reason) => {
                log::debug!("obj: skipping line '{line}' ({reason:?})");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        let shown = if sub.name.is_empty() { "<unnamed>" } else { &sub.name };
        log::warn!("obj: object '{shown}': skipped {skipped} malformed line(s)");
    }

    sub
}

fn parse_line(line: &str, pools: &mut VertexPools, sub: &mut SubMesh) -> LineOutcome {
    let fields = tokenize(line, ' ');
    let Some(&directive) = fields.first() else {
        return LineOutcome::Ignored;
    };

    match directive {
        "v" => match parse_vec3(&fields) {
            Some(v) => {
                pools.positions.push(v);
                LineOutcome::Applied
            }
            None => LineOutcome::Skipped(SkipReason::BadNumber),
        },
        "vn" => match parse_vec3(&fields) {
            Some(v) => {
                pools.normals.push(v);
                sub.has_normals = true;
                LineOutcome::Applied
            }
            None => LineOutcome::Skipped(SkipReason::BadNumber),
        },
        "vt" => match parse_vec2(&fields) {
            Some(v) => {
                pools.uvs.push(v);
                sub.has_uvs = true;
                LineOutcome::Applied
            }
            None => LineOutcome::Skipped(SkipReason::BadNumber),
        },
        "f" => parse_face(&fields, sub),
        "usemtl" => match fields.get(1) {
            // Last occurrence wins if repeated within one object.
            Some(&name) => {
                sub.material = Some(name.to_string());
                LineOutcome::Applied
            }
            None => LineOutcome::Skipped(SkipReason::MissingField),
        },
        _ => LineOutcome::Ignored,
    }
}

fn parse_vec3(fields: &[&str]) -> Option<[f32; 3]> {
    Some([
        fields.get(1)?.parse().ok()?,
        fields.get(2)?.parse().ok()?,
        fields.get(3)?.parse().ok()?,
    ])
}

fn parse_vec2(fields: &[&str]) -> Option<[f32; 2]> {
    Some([fields.get(1)?.parse().ok()?, fields.get(2)?.parse().ok()?])
}

/// Triangles only: faces with any other corner count are out of scope and
/// skipped. Corners append in source order, no winding normalization.
fn parse_face(fields: &[&str], sub: &mut SubMesh) -> LineOutcome {
    if fields.len() != 4 {
        return LineOutcome::Skipped(SkipReason::BadFaceArity);
    }

    let mut corners = [IndexTriple {
        position: 0,
        uv: NO_INDEX,
        normal: NO_INDEX,
    }; 3];

    for (slot, token) in corners.iter_mut().zip(&fields[1..]) {
        match parse_face_corner(token) {
            Some(triple) => *slot = triple,
            None => return LineOutcome::Skipped(SkipReason::BadNumber),
        }
    }

    sub.faces.extend_from_slice(&corners);
    LineOutcome::Applied
}

/// Parse one `pos[/uv][/normal]` corner. Sub-indices are 1-based in the file
/// and converted to 0-based here; absent ones become `NO_INDEX`.
///
/// Plain `split` (not [`tokenize`]) on purpose: the empty middle field of
/// `1//3` is significant.
fn parse_face_corner(token: &str) -> Option<IndexTriple> {
    let mut parts = token.split('/');

    let position = to_zero_based(parts.next()?)?;
    let uv = match parts.next() {
        Some("") | None => NO_INDEX,
        Some(t) => to_zero_based(t)?,
    };
    let normal = match parts.next() {
        Some("") | None => NO_INDEX,
        Some(t) => to_zero_based(t)?,
    };

    Some(IndexTriple {
        position,
        uv,
        normal,
    })
}

fn to_zero_based(token: &str) -> Option<u32> {
    let raw: u32 = token.parse().ok()?;
    // OBJ indices are 1-based; 0 is malformed.
    raw.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
# sample
o first
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
usemtl stone
f 1/1/1 2/2/1 3/3/1
o second
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";

    #[test]
    fn face_indices_convert_to_zero_based() {
        let model = load_model_from_str("v 0 0 0\nf 1/2/3 4/5/6 7/8/9\n").expect("parse");
        let faces = &model.objects[0].faces;
        assert_eq!(faces.len(), 3);
        assert_eq!(faces[0], IndexTriple { position: 0, uv: 1, normal: 2 });
        assert_eq!(faces[1], IndexTriple { position: 3, uv: 4, normal: 5 });
        assert_eq!(faces[2], IndexTriple { position: 6, uv: 7, normal: 8 });
    }

    #[test]
    fn corner_forms() {
        assert_eq!(
            parse_face_corner("7"),
            Some(IndexTriple { position: 6, uv: NO_INDEX, normal: NO_INDEX })
        );
        assert_eq!(
            parse_face_corner("7/2"),
            Some(IndexTriple { position: 6, uv: 1, normal: NO_INDEX })
        );
        assert_eq!(
            parse_face_corner("7//3"),
            Some(IndexTriple { position: 6, uv: NO_INDEX, normal: 2 })
        );
        assert_eq!(parse_face_corner("0"), None);
        assert_eq!(parse_face_corner("x/1/1"), None);
    }

    #[test]
    fn splits_objects_on_o_markers() {
        let model = load_model_from_str(TWO_OBJECTS).expect("parse");
        assert_eq!(model.objects.len(), 2);

        let first = &model.objects[0];
        assert_eq!(first.name, "first");
        assert_eq!(first.triangle_count(), 1);
        assert_eq!(first.material.as_deref(), Some("stone"));
        assert!(first.has_normals);
        assert!(first.has_uvs);

        let second = &model.objects[1];
        assert_eq!(second.name, "second");
        assert!(!second.has_normals);
        assert!(!second.has_uvs);
        assert_eq!(second.faces[0].position, 3);

        assert_eq!(model.pools.positions.len(), 6);
        assert_eq!(model.pools.normals.len(), 1);
        assert_eq!(model.pools.uvs.len(), 3);
    }

    #[test]
    fn pre_marker_content_becomes_implicit_sub_mesh() {
        let model =
            load_model_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no named\n").expect("parse");
        assert_eq!(model.objects.len(), 1);
        assert_eq!(model.objects[0].name, "");
        assert_eq!(model.objects[0].triangle_count(), 1);
    }

    #[test]
    fn faceless_objects_are_dropped() {
        let model = load_model_from_str("o empty\nv 0 0 0\no also_empty\n").expect("parse");
        assert!(model.objects.is_empty());
        // Pool content survives even when no sub-mesh references it.
        assert_eq!(model.pools.positions.len(), 1);
    }

    #[test]
    fn usemtl_last_occurrence_wins() {
        let model = load_model_from_str("v 0 0 0\nusemtl a\nusemtl b\nf 1 1 1\n").expect("parse");
        assert_eq!(model.objects[0].material.as_deref(), Some("b"));
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
v not numbers here
vt 0.5
f 1 2
f 1 2 3 4
usemtl
f 1 2 3
s 1
g group
";
        let model = load_model_from_str(src).expect("parse");
        assert_eq!(model.pools.positions.len(), 3);
        assert!(model.pools.uvs.is_empty());
        let sub = &model.objects[0];
        // Only the well-formed triangle survived.
        assert_eq!(sub.triangle_count(), 1);
        assert!(sub.material.is_none());
    }

    #[test]
    fn quad_faces_are_out_of_scope() {
        let model = load_model_from_str("v 0 0 0\nf 1 1 1 1\n").expect("parse");
        assert!(model.objects.is_empty());
    }
}
