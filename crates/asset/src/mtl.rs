//! MTL material-library parser.
//!
//! Only the directives the renderer consumes are understood: `newmtl`, `Ns`,
//! `map_Kd`, `map_Ks`, `map_Bump`. Everything else (Ka/Kd/Ks colors, `illum`,
//! `d`, ...) is ignored; malformed property lines are skipped without aborting
//! the parse.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::AssetError;
use crate::tokenize::tokenize;

pub const DEFAULT_SPECULAR_EXPONENT: f32 = 32.0;

/// One named material record: shading parameters plus up to three map paths.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub specular_exponent: f32,
    pub diffuse_map: Option<PathBuf>,
    pub specular_map: Option<PathBuf>,
    pub bump_map: Option<PathBuf>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specular_exponent: DEFAULT_SPECULAR_EXPONENT,
            diffuse_map: None,
            specular_map: None,
            bump_map: None,
        }
    }
}

/// Name-keyed material records from one `mtllib` parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialTable {
    materials: HashMap<String, Material>,
}

impl MaterialTable {
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Absorb another table; records from `other` win on name clashes.
    pub fn merge(&mut self, other: MaterialTable) {
        self.materials.extend(other.materials);
    }

    fn insert(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }
}

/// Parse an MTL text blob into a material table.
///
/// Property lines mutate the most recently started record. A property line
/// before any `newmtl` has no record to mutate and fails the parse; that is
/// the only hard failure here.
pub fn parse_mtl(text: &str) -> Result<MaterialTable, AssetError> {
    let mut table = MaterialTable::default();
    let mut current: Option<Material> = None;
    let mut skipped = 0usize;

    for line in tokenize(text, '\n') {
        let line = line.trim();
        let fields = tokenize(line, ' ');
        let Some(&directive) = fields.first() else {
            continue;
        };

        match directive {
            "newmtl" => match fields.get(1) {
                Some(&name) => {
                    if let Some(done) = current.replace(Material::new(name)) {
                        table.insert(done);
                    }
                }
                None => {
                    log::debug!("mtl: newmtl without a name, skipping");
                    skipped += 1;
                }
            },
            "Ns" => {
                let record = current_record(&mut current, directive)?;
                match fields.get(1).and_then(|t| t.parse::<f32>().ok()) {
                    Some(ns) => record.specular_exponent = ns,
                    None => {
                        log::debug!("mtl: bad Ns line '{line}', skipping");
                        skipped += 1;
                    }
                }
            }
            "map_Kd" | "map_Ks" | "map_Bump" => {
                let record = current_record(&mut current, directive)?;
                if fields.len() < 2 {
                    log::debug!("mtl: {directive} without a path, skipping");
                    skipped += 1;
                    continue;
                }
                // Remainder of the line is the path; tolerate spaces in names.
                let path = PathBuf::from(fields[1..].join(" "));
                match directive {
                    "map_Kd" => record.diffuse_map = Some(path),
                    "map_Ks" => record.specular_map = Some(path),
                    _ => record.bump_map = Some(path),
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        table.insert(done);
    }
    if skipped > 0 {
        log::warn!("mtl: skipped {skipped} malformed line(s)");
    }

    Ok(table)
}

/// Property lines need a started record; anything else is a structural error.
fn current_record<'a>(
    current: &'a mut Option<Material>,
    directive: &str,
) -> Result<&'a mut Material, AssetError> {
    current.as_mut().ok_or_else(|| AssetError::OrphanMaterialProperty {
        directive: directive.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# comment
newmtl stone
Ns 96.0
map_Kd textures/stone_diffuse.png
map_Ks textures/stone_spec.png
map_Bump textures/stone_bump.png

newmtl flat
Ns 8.5
";

    #[test]
    fn parses_records_and_maps() {
        let table = parse_mtl(SAMPLE).expect("parse sample mtl");
        assert_eq!(table.len(), 2);

        let stone = table.get("stone").expect("stone record");
        assert_eq!(stone.specular_exponent, 96.0);
        assert_eq!(
            stone.diffuse_map.as_deref(),
            Some(std::path::Path::new("textures/stone_diffuse.png"))
        );
        assert!(stone.specular_map.is_some());
        assert!(stone.bump_map.is_some());

        let flat = table.get("flat").expect("flat record");
        assert_eq!(flat.specular_exponent, 8.5);
        assert!(flat.diffuse_map.is_none());
    }

    #[test]
    fn property_before_newmtl_is_an_error() {
        let err = parse_mtl("Ns 10.0\n").unwrap_err();
        assert!(matches!(
            err,
            AssetError::OrphanMaterialProperty { ref directive } if directive == "Ns"
        ));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let table = parse_mtl("newmtl a\nNs not_a_number\nKd 1 1 1\nbogus\n").expect("parse");
        let a = table.get("a").expect("record a");
        assert_eq!(a.specular_exponent, DEFAULT_SPECULAR_EXPONENT);
    }

    #[test]
    fn duplicate_names_last_wins() {
        let table = parse_mtl("newmtl a\nNs 1\nnewmtl a\nNs 2\n").expect("parse");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("a").unwrap().specular_exponent, 2.0);
    }
}
