// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::mask::{Mask, MaskWriter};
use crate::pixel::{self, Rgba, ALPHA, BYTES_PER_PIXEL, TRANSPARENT};
use crate::BitmapError;

/// Identifies a store for the lifetime of the process.
///
/// Backends key their derived resources (offscreen pixmaps, uploaded pixels) by this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreId(usize);

/// The pixels of one decoded or rendered image and its transparency stencil.
///
/// The buffer holds `width * height` pixels in row-major order without any padding between rows,
/// each pixel four bytes in the order red, green, blue, alpha. Writers access it directly through
/// [`PixelStore::pixels_mut`] or [`PixelStore::as_bytes_mut`] and must call
/// [`PixelStore::modified`] afterwards, before the image is drawn again.
///
/// The stencil is derived data. It is present only when the last call to `modified` saw at least
/// one pixel below the alpha threshold while the store was not flagged opaque.
pub struct PixelStore {
    id: StoreId,
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    opaque: bool,
    mask: Option<Mask>,
    generation: u64,
}

impl PixelStore {
    /// Allocate a zeroed store.
    ///
    /// The `opaque` flag marks images without a meaningful alpha channel, such as JPEG. It only
    /// takes effect on the next call to [`PixelStore::modified`].
    ///
    /// # Errors
    /// When either dimension is zero, when the buffer size overflows, or when the allocation
    /// itself is refused.
    pub fn new(width: u32, height: u32, opaque: bool) -> Result<Self, BitmapError> {
        let count = Self::pixel_count(width, height)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| BitmapError::OutOfMemory {
                bytes: count * BYTES_PER_PIXEL,
            })?;
        pixels.resize(count, TRANSPARENT);

        static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
        let id = StoreId(NEXT_ID.fetch_add(1, Ordering::Relaxed));

        log::trace!("created bitmap {:?} {}x{} opaque={}", id, width, height, opaque);

        Ok(PixelStore {
            id,
            width,
            height,
            pixels,
            opaque,
            mask: None,
            generation: 0,
        })
    }

    fn pixel_count(width: u32, height: u32) -> Result<usize, BitmapError> {
        let invalid = BitmapError::InvalidDimensions { width, height };

        if width == 0 || height == 0 {
            return Err(invalid);
        }

        (width as usize)
            .checked_mul(height as usize)
            .filter(|count| count.checked_mul(BYTES_PER_PIXEL).is_some())
            .ok_or(invalid)
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The number of bytes of one row, always `width * 4`.
    pub fn rowstride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Bytes per pixel, always 4.
    pub fn bpp(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// The caller supplied opacity flag, not an inspection of the pixels.
    pub fn opaque(&self) -> bool {
        self.opaque
    }

    /// Overwrite the opacity flag.
    ///
    /// Nothing is recomputed here, the flag is observed by the next [`PixelStore::modified`].
    pub fn set_opaque(&mut self, opaque: bool) {
        self.opaque = opaque;
    }

    /// Determine whether every pixel actually passes the alpha test.
    ///
    /// A store with a stencil is never opaque. Otherwise this scans the whole buffer and stops at
    /// the first pixel below the threshold.
    pub fn test_opaque(&self) -> bool {
        if self.mask.is_some() {
            return false;
        }

        self.pixels.iter().all(|&px| pixel::is_visible(px))
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    /// The stencil computed by the last [`PixelStore::modified`], if any pixel was transparent.
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Incremented by every call to [`PixelStore::modified`].
    ///
    /// Backends compare this against the generation of their cached upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// The buffer as raw bytes, `rowstride() * height()` of them.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// The buffer as mutable raw bytes, for decoders writing interleaved samples.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }

    /// The pixels of a single row.
    pub fn row(&self, y: u32) -> &[Rgba] {
        let width = self.width as usize;
        let start = y as usize * width;
        &self.pixels[start..start + width]
    }

    /// Get a single pixel.
    ///
    /// # Panics
    /// When the coordinate is outside the store.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width, "Column outside of bitmap");
        self.row(y)[x as usize]
    }

    /// Bring derived state up to date after the pixels were written.
    ///
    /// For a store flagged opaque any stencil is dropped and the alpha sample of every pixel is
    /// set to fully opaque. Otherwise every pixel is tested against the alpha threshold: pixels
    /// below it are cleared to transparent black and masked out, all others are kept. The stencil
    /// is only retained when at least one pixel was masked out.
    pub fn modified(&mut self) {
        self.generation = self.generation.wrapping_add(1);

        if self.opaque {
            self.mask = None;
            self.pixels.iter_mut().for_each(|px| px[ALPHA] = 0xff);
            log::debug!("bitmap {:?} modified, opaque", self.id);
            return;
        }

        let mut writer = MaskWriter::new(self.width, self.height);

        for row in self.pixels.chunks_exact_mut(self.width as usize) {
            for px in row {
                let visible = pixel::is_visible(*px);
                if !visible {
                    *px = TRANSPARENT;
                }
                writer.push(visible);
            }
            writer.next_line();
        }

        self.mask = if writer.has_transparency() {
            Some(writer.finish())
        } else {
            None
        };

        log::debug!(
            "bitmap {:?} modified, mask={}",
            self.id,
            self.mask.is_some()
        );
    }
}

impl fmt::Debug for PixelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelStore")
            .field("id", &self.id)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opaque", &self.opaque)
            .field("mask", &self.mask)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u32, height: u32, opaque: bool, px: Rgba) -> PixelStore {
        let mut store = PixelStore::new(width, height, opaque).unwrap();
        store.pixels_mut().iter_mut().for_each(|p| *p = px);
        store
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            PixelStore::new(0, 4, false).unwrap_err(),
            BitmapError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
        assert!(PixelStore::new(4, 0, true).is_err());
    }

    #[test]
    fn created_zeroed_without_mask() {
        let store = PixelStore::new(3, 2, false).unwrap();
        assert_eq!(store.as_bytes().len(), 3 * 2 * 4);
        assert!(store.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(store.rowstride(), 12);
        assert_eq!(store.bpp(), 4);
        assert!(!store.has_mask());
        assert!(!store.opaque());
    }

    #[test]
    fn ids_are_distinct() {
        let a = PixelStore::new(1, 1, false).unwrap();
        let b = PixelStore::new(1, 1, false).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn opaque_flag_is_verbatim() {
        let mut store = filled(2, 2, false, [0, 0, 0, 0]);
        store.set_opaque(true);
        assert!(store.opaque());
        // Not recomputed until modified.
        assert!(!store.test_opaque());
        store.modified();
        assert!(store.test_opaque());
    }

    #[test]
    fn opaque_round_trip() {
        let mut store = PixelStore::new(5, 3, true).unwrap();
        for (i, px) in store.pixels_mut().iter_mut().enumerate() {
            *px = [i as u8, 0x10, 0x20, (i * 37) as u8];
        }
        store.modified();

        assert!(!store.has_mask());
        assert!(store.test_opaque());
        assert_eq!(store.pixel(1, 0), [1, 0x10, 0x20, 0xff]);
    }

    #[test]
    fn threshold_single_pixel() {
        let mut store = filled(1, 1, false, [1, 2, 3, 0x80]);
        store.modified();
        assert!(!store.has_mask());
        assert_eq!(store.pixel(0, 0), [1, 2, 3, 0x80]);

        store.pixels_mut()[0] = [1, 2, 3, 0x7f];
        store.modified();
        let mask = store.mask().unwrap();
        assert!(!mask.get(0, 0));
        assert_eq!(mask.as_bytes(), &[0]);
        assert_eq!(store.pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn mask_replaced_and_dropped() {
        let mut store = filled(9, 2, false, [0, 0, 0, 0xff]);
        store.pixels_mut()[0] = TRANSPARENT;
        store.modified();
        assert!(store.has_mask());
        assert_eq!(store.mask().unwrap().as_bytes(), &[0xfe, 0x01, 0xff, 0x01]);

        store.pixels_mut()[0] = [0, 0, 0, 0xff];
        store.pixels_mut()[17] = TRANSPARENT;
        store.modified();
        assert_eq!(store.mask().unwrap().as_bytes(), &[0xff, 0x01, 0xff, 0x00]);

        store.pixels_mut()[17] = [0, 0, 0, 0xff];
        store.modified();
        assert!(!store.has_mask());
        assert!(store.test_opaque());
    }

    #[test]
    fn opaque_store_discards_mask() {
        let mut store = filled(2, 2, false, TRANSPARENT);
        store.modified();
        assert!(store.has_mask());

        store.set_opaque(true);
        store.modified();
        assert!(!store.has_mask());
    }

    #[test]
    fn test_opaque_is_idempotent() {
        let mut store = filled(4, 4, false, [0, 0, 0, 0xff]);
        store.pixels_mut()[15] = [0, 0, 0, 0x10];
        // Not modified yet, so no mask: the scan itself finds the pixel.
        assert!(!store.test_opaque());
        assert!(!store.test_opaque());
        assert_eq!(store.pixel(3, 3), [0, 0, 0, 0x10]);
    }

    #[test]
    fn generation_advances() {
        let mut store = filled(1, 1, false, [0; 4]);
        let before = store.generation();
        store.modified();
        assert_eq!(store.generation(), before + 1);
    }
}
