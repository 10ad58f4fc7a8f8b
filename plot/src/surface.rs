// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
use crate::backend::BackendError;
use crate::geom::Rect;

/// A window sized matrix of packed pixels that backends draw into.
///
/// This stands in for the X drawable or the GL framebuffer. Rows are contiguous, without padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Drawable<P> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

impl<P: Copy> Drawable<P> {
    /// Allocate a drawable filled with `background`.
    ///
    /// # Errors
    /// When the pixel count overflows or the allocation is refused.
    pub fn new(width: u32, height: u32, background: P) -> Result<Self, BackendError> {
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BackendError::SurfaceAllocation { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| BackendError::SurfaceAllocation { width, height })?;
        pixels.resize(count, background);

        Ok(Drawable {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The rectangle covering the whole drawable.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn as_slice(&self) -> &[P] {
        &self.pixels
    }

    pub fn fill(&mut self, value: P) {
        self.pixels.fill(value);
    }

    /// Read a pixel, `None` outside of the drawable.
    pub fn get(&self, x: i32, y: i32) -> Option<P> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    /// Mutable access to a pixel, `None` outside of the drawable.
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut P> {
        self.index(x, y).map(move |idx| &mut self.pixels[idx])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.bounds().contains(x, y) {
            return None;
        }

        Some(y as usize * self.width as usize + x as usize)
    }
}

impl<P: bytemuck::Pod> Drawable<P> {
    /// The pixels as native endian bytes, for handing to a presentation layer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl<P> core::fmt::Debug for Drawable<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Drawable")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
