// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Nearest-neighbour resampling.
use alloc::vec::Vec;

use crate::mask::{Mask, MaskWriter};
use crate::pixel::{self, Rgba, BYTES_PER_PIXEL};
use crate::{BitmapError, PixelStore};

/// An axis aligned rectangle of pixels, in unsigned pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A resampled image with its own stencil.
#[derive(Clone, Debug)]
pub struct Scaled {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    mask: Mask,
    transparent: bool,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// The region covering the whole store.
    pub fn whole(store: &PixelStore) -> Self {
        Region::new(0, 0, store.width(), store.height())
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(width) && bottom <= u64::from(height)
    }
}

impl Scaled {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// The stencil of the sampled pixels.
    ///
    /// This is always computed, check [`Scaled::has_transparency`] to see if it masks anything.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Whether any sampled pixel was below the alpha threshold.
    pub fn has_transparency(&self) -> bool {
        self.transparent
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height, "Coordinate outside of scaled image");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Split into the pixels and the stencil.
    pub fn into_parts(self) -> (Vec<Rgba>, Mask) {
        (self.pixels, self.mask)
    }
}

/// Resample a region of the store to `width` by `height` pixels.
///
/// This is [`scale_window`] with the window covering the whole target.
pub fn scale(
    store: &PixelStore,
    source: Region,
    width: u32,
    height: u32,
) -> Result<Scaled, BitmapError> {
    scale_window(store, source, (width, height), Region::new(0, 0, width, height))
}

/// Resample part of a region of the store as if scaled to `target` size.
///
/// The scale factors are source pixels per target pixel, `source.width / target.0` and
/// `source.height / target.1`. The target pixel `(tx, ty)` takes the source pixel at
/// `(source.x + floor(tx * scale_x), source.y + floor(ty * scale_y))`, computed exactly in
/// integers. Only the target pixels within `window` are produced, so a clipped placement does not
/// resample its hidden parts.
///
/// The target size must not be zero, which the plotting layer rejects before getting here.
///
/// # Errors
/// When the source region is empty or reaches outside of the store, or when the result could not
/// be allocated.
pub fn scale_window(
    store: &PixelStore,
    source: Region,
    target: (u32, u32),
    window: Region,
) -> Result<Scaled, BitmapError> {
    if source.is_empty() || !source.fits_within(store.width(), store.height()) {
        return Err(BitmapError::SourceOutOfBounds {
            x: source.x,
            y: source.y,
            width: source.width,
            height: source.height,
        });
    }

    debug_assert!(target.0 > 0 && target.1 > 0, "Scaled to an empty target");

    let count = window.width as usize * window.height as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| BitmapError::OutOfMemory {
            bytes: count * BYTES_PER_PIXEL,
        })?;

    // `floor(at * len / target)` in integers, exact on whole-number factors.
    let sample = |at: u32, len: u32, target: u32| {
        let offset = u64::from(at) * u64::from(len) / u64::from(target);
        (offset as u32).min(len - 1)
    };

    let mut writer = MaskWriter::new(window.width, window.height);

    for iy in 0..window.height {
        let sy = source.y + sample(window.y + iy, source.height, target.1);
        let row = store.row(sy);

        for ix in 0..window.width {
            let sx = source.x + sample(window.x + ix, source.width, target.0);
            let px = row[sx as usize];
            pixels.push(px);
            writer.push(pixel::is_visible(px));
        }

        writer.next_line();
    }

    let transparent = writer.has_transparency();
    log::trace!(
        "scaled {:?} of bitmap {:?} to {}x{}, window {:?}",
        source,
        store.id(),
        target.0,
        target.1,
        window
    );

    Ok(Scaled {
        width: window.width,
        height: window.height,
        pixels,
        mask: writer.finish(),
        transparent,
    })
}
