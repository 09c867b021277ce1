//! Texture loading and the path-keyed texture cache.
//!
//! All image data is normalized to RGBA8 on load. The cache is an explicit
//! object owned by the caller and passed through the assembler, not process
//! state; entries live as long as the cache does and are never evicted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AssetError;

/// Texture data in CPU-friendly RGBA8 form, before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Wrap raw RGBA8 pixels with their dimensions.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "data size doesn't match RGBA8 dimensions"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decode an image file (PNG/JPEG) into RGBA8.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        log::info!("loading texture {}", path.display());

        let img = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::new_rgba8(width, height, rgba.into_raw()))
    }

    /// Checkerboard stand-in for meshes without a diffuse map.
    pub fn placeholder(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                if ((x / 8) + (y / 8)) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[128, 128, 128, 255]);
                }
            }
        }
        Self::new_rgba8(size, size, data)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width * self.height * 4) as usize
    }
}

/// Path-keyed cache of loaded textures; lookup-or-create, never double-loads.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<PathBuf, Arc<TextureData>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached texture for `path`, loading it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<TextureData>, AssetError> {
        self.load_with(path, TextureData::load)
    }

    /// Same as [`load`](Self::load) with an injected loader; the loader runs
    /// only on a cache miss.
    pub fn load_with(
        &mut self,
        path: &Path,
        loader: impl FnOnce(&Path) -> Result<TextureData, AssetError>,
    ) -> Result<Arc<TextureData>, AssetError> {
        if let Some(existing) = self.entries.get(path) {
            return Ok(existing.clone());
        }
        let loaded = Arc::new(loader(path)?);
        self.entries.insert(path.to_path_buf(), loaded.clone());
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> TextureData {
        TextureData::new_rgba8(width, height, vec![200; (width * height * 4) as usize])
    }

    #[test]
    fn placeholder_is_valid_rgba8() {
        let tex = TextureData::placeholder(32);
        assert!(tex.is_valid());
        assert_eq!(tex.data.len(), 32 * 32 * 4);
    }

    #[test]
    fn cache_returns_same_texture_for_same_path() {
        let mut cache = TextureCache::new();
        let path = Path::new("stone_diffuse.png");

        let first = cache
            .load_with(path, |_| Ok(solid(4, 4)))
            .expect("first load");
        let second = cache
            .load_with(path, |_| panic!("must not reload a cached path"))
            .expect("cache hit");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_loads_each_path_at_most_once() {
        let mut cache = TextureCache::new();
        let mut loads = 0usize;

        for _ in 0..3 {
            cache
                .load_with(Path::new("a.png"), |_| {
                    loads += 1;
                    Ok(solid(2, 2))
                })
                .expect("load a");
        }
        cache
            .load_with(Path::new("b.png"), |_| {
                loads += 1;
                Ok(solid(2, 2))
            })
            .expect("load b");

        assert_eq!(loads, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = TextureCache::new();
        let path = Path::new("broken.png");

        let err = cache.load_with(path, |p| {
            Err(AssetError::Io {
                path: p.to_path_buf(),
                source: std::io::Error::other("boom"),
            })
        });
        assert!(err.is_err());
        assert!(cache.is_empty());

        cache.load_with(path, |_| Ok(solid(2, 2))).expect("retry");
        assert_eq!(cache.len(), 1);
    }
}
