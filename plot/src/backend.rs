// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
use nsmotif_bitmap::{BitmapError, PixelStore, Rgba, StoreId};

use crate::geom::{Point, Rect};
use crate::tile::{ScaledCopy, TileCopy};

/// A drawing backend able to put pixel stores on screen.
///
/// There is one implementation per drawing model and the host selects one at startup. All of
/// them share the placement geometry of [`crate::tile::resolve`], the backend only executes the
/// individual copies.
///
/// Backends keep a *pen* like an X graphics context: the clip set by [`BlitBackend::set_clip`] or
/// a stencil installed by [`BlitBackend::set_clip_mask`] stays in effect for all following draws
/// until replaced. Whoever installs a stencil is responsible for restoring the clip rectangle.
///
/// Calls occur on the thread that owns the window.
pub trait BlitBackend {
    fn name(&self) -> &str;

    /// Size of the drawable, in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Restrict all following draws to `clip`, replacing any stencil.
    fn set_clip(&mut self, clip: Rect);

    /// Restrict all following draws to the set bits of the stencil of an uploaded store, with the
    /// stencil's top left at `origin`.
    ///
    /// Backends that composite with real alpha may ignore this.
    fn set_clip_mask(&mut self, id: StoreId, origin: Point) -> Result<(), BackendError>;

    /// Create or refresh the backend resource derived from the store.
    ///
    /// Cheap when the store was not modified since the last upload.
    fn upload_image(&mut self, store: &PixelStore) -> Result<(), BackendError>;

    /// Copy a region of an uploaded store, unscaled.
    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError>;

    /// Draw the visible window of a resampled store.
    ///
    /// When the store has a stencil the backend may install a stencil of the resampled image on
    /// the pen, which the caller restores afterwards like any other.
    fn draw_scaled(&mut self, store: &PixelStore, copy: &ScaledCopy) -> Result<(), BackendError>;

    /// Drop the resources derived from a store. Unknown ids are ignored.
    fn release(&mut self, id: StoreId);

    /// Read back one pixel of the drawable, if the backend keeps one in memory.
    fn read_pixel(&self, x: i32, y: i32) -> Option<Rgba>;
}

/// A backend could not complete a drawing operation.
///
/// These are recoverable: the blit in question is skipped and the next redraw tries again.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The offscreen surface for an image or the drawable could not be created.
    #[error("cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    /// A store was drawn without having been uploaded first.
    #[error("bitmap {0:?} has not been uploaded")]
    UnknownImage(StoreId),
    /// Resampling the store failed.
    #[error(transparent)]
    Bitmap(#[from] BitmapError),
}

impl<B: BlitBackend + ?Sized> BlitBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn surface_size(&self) -> (u32, u32) {
        (**self).surface_size()
    }

    fn set_clip(&mut self, clip: Rect) {
        (**self).set_clip(clip)
    }

    fn set_clip_mask(&mut self, id: StoreId, origin: Point) -> Result<(), BackendError> {
        (**self).set_clip_mask(id, origin)
    }

    fn upload_image(&mut self, store: &PixelStore) -> Result<(), BackendError> {
        (**self).upload_image(store)
    }

    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError> {
        (**self).draw_tile(store, copy)
    }

    fn draw_scaled(&mut self, store: &PixelStore, copy: &ScaledCopy) -> Result<(), BackendError> {
        (**self).draw_scaled(store, copy)
    }

    fn release(&mut self, id: StoreId) {
        (**self).release(id)
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        (**self).read_pixel(x, y)
    }
}
