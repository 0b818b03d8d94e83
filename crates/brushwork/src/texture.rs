//! CPU-side arena of stamp textures.
//!
//! The registry hands out dense, stable [`TextureId`]s. Stamp instances carry
//! the id as their texture index and the renderer mirrors every registered
//! texture on the GPU, re-uploading whichever ones are flagged dirty.

use crate::color::Color;
use crate::error::{Error, Result};
use rayon::prelude::*;

const BYTES_PER_PIXEL: usize = 4;

/// Index of a texture inside a [`TextureRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// RGBA8 pixels plus an upload flag.
#[derive(Debug, Clone)]
pub struct StampTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    dirty: bool,
}

impl StampTexture {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            dirty: true,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Row-parallel fill. `f(x, y)` returns the texel color.
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(u32, u32) -> Color + Sync,
    {
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        if row_bytes == 0 {
            return;
        }
        self.pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                    let c = f(x as u32, y as u32);
                    px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
                }
            });
        self.dirty = true;
    }

    /// Opaque disc of diameter `width`, transparent outside.
    pub fn fill_circle(&mut self, color: Color) {
        let center_x = (self.width / 2) as i64;
        let center_y = (self.height / 2) as i64;
        let r = (self.width / 2) as i64;
        self.fill_with(|x, y| {
            let dx = x as i64 - center_x;
            let dy = y as i64 - center_y;
            let a = if dx * dx + dy * dy < r * r { 0xff } else { 0 };
            Color { a, ..color }
        });
    }
}

/// Owns every stamp texture by index.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<StampTexture>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a zeroed `width x height` texture and returns its id.
    pub fn register(&mut self, width: u32, height: u32) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(StampTexture::new(width.max(1), height.max(1)));
        log::debug!("registered stamp texture {:?} ({}x{})", id, width, height);
        id
    }

    /// Registers a white circular stamp of the given diameter.
    pub fn register_circle_stamp(&mut self, diameter: u32) -> TextureId {
        let id = self.register(diameter, diameter);
        self.textures[id.0 as usize].fill_circle(Color::WHITE);
        id
    }

    pub fn get(&self, id: TextureId) -> Result<&StampTexture> {
        self.textures
            .get(id.0 as usize)
            .ok_or(Error::UnknownTexture(id))
    }

    pub fn get_mut(&mut self, id: TextureId) -> Result<&mut StampTexture> {
        self.textures
            .get_mut(id.0 as usize)
            .ok_or(Error::UnknownTexture(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &StampTexture)> {
        self.textures
            .iter()
            .enumerate()
            .map(|(i, t)| (TextureId(i as u32), t))
    }

    /// Textures changed since their last upload.
    pub fn dirty(&self) -> impl Iterator<Item = (TextureId, &StampTexture)> {
        self.iter().filter(|(_, t)| t.is_dirty())
    }

    pub fn mark_uploaded(&mut self, id: TextureId) -> Result<()> {
        self.get_mut(id)?.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_stable() {
        let mut reg = TextureRegistry::new();
        let a = reg.register(4, 4);
        let b = reg.register(8, 2);
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(reg.get(b).unwrap().width(), 8);
        assert_eq!(reg.get(b).unwrap().pixels().len(), 8 * 2 * 4);
        assert!(matches!(
            reg.get(TextureId::new(7)),
            Err(Error::UnknownTexture(_))
        ));
    }

    #[test]
    fn circle_stamp_is_opaque_inside_only() {
        let mut reg = TextureRegistry::new();
        let id = reg.register_circle_stamp(16);
        let tex = reg.get(id).unwrap();
        let alpha = |x: usize, y: usize| tex.pixels()[(y * 16 + x) * 4 + 3];
        assert_eq!(alpha(8, 8), 0xff);
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(15, 15), 0);
        assert_eq!(&tex.pixels()[(8 * 16 + 8) * 4..][..3], &[255, 255, 255]);
    }

    #[test]
    fn dirty_tracking_follows_uploads_and_fills() {
        let mut reg = TextureRegistry::new();
        let a = reg.register(2, 2);
        let b = reg.register(2, 2);
        assert_eq!(reg.dirty().count(), 2);

        reg.mark_uploaded(a).unwrap();
        reg.mark_uploaded(b).unwrap();
        assert_eq!(reg.dirty().count(), 0);

        reg.get_mut(b).unwrap().fill_circle(Color::WHITE);
        assert!(reg.get(b).unwrap().is_dirty());
        let dirty: Vec<TextureId> = reg.dirty().map(|(id, _)| id).collect();
        assert_eq!(dirty, vec![b]);
    }
}
