// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! The core X11 drawing model.
//!
//! Every store gets an offscreen pixmap of packed `0xAABBGGRR` words and, if it has one, a
//! 1-bit clip mask. Copies are plain area copies through the pen: either clipped to a rectangle
//! or stenciled by a clip mask, never alpha blended.
use std::collections::HashMap;
use std::rc::Rc;

use nsmotif_bitmap::{scale_window, Mask, PixelOrder, PixelStore, Region, Rgba, StoreId};

use crate::backend::{BackendError, BlitBackend};
use crate::geom::{Point, Rect};
use crate::surface::Drawable;
use crate::tile::{ScaledCopy, TileCopy};

/// Pixmaps dimensions are 16-bit on the wire, limited to the positive `i16` range.
pub const MAX_PIXMAP_DIMENSION: u32 = i16::MAX as u32;

/// Software rendition of drawing through an X graphics context.
pub struct StencilBackend {
    window: Drawable<u32>,
    pen: Pen,
    pixmaps: HashMap<StoreId, Pixmap>,
}

/// The clip attribute of the graphics context.
#[derive(Clone, Debug)]
enum Pen {
    Rect(Rect),
    Stencil { mask: Rc<Mask>, origin: Point },
}

/// The server side copy of a store.
struct Pixmap {
    generation: u64,
    width: u32,
    words: Vec<u32>,
    mask: Option<Rc<Mask>>,
}

const ORDER: PixelOrder = PixelOrder::Abgr8888;

impl StencilBackend {
    /// Create a backend drawing into a `width` by `height` window cleared to `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self, BackendError> {
        let window = Drawable::new(width, height, ORDER.pack(background))?;
        let pen = Pen::Rect(window.bounds());

        Ok(StencilBackend {
            window,
            pen,
            pixmaps: HashMap::new(),
        })
    }

    /// The window contents, as packed words.
    pub fn window(&self) -> &Drawable<u32> {
        &self.window
    }

    /// The word order of the window and pixmaps.
    pub fn order(&self) -> PixelOrder {
        ORDER
    }

    /// Number of stores with a live pixmap.
    pub fn pixmap_count(&self) -> usize {
        self.pixmaps.len()
    }

    fn create_pixmap(store: &PixelStore) -> Result<Pixmap, BackendError> {
        let (width, height) = (store.width(), store.height());

        if width > MAX_PIXMAP_DIMENSION || height > MAX_PIXMAP_DIMENSION {
            return Err(BackendError::SurfaceAllocation { width, height });
        }

        let count = store.pixels().len();
        let mut words = Vec::new();
        words
            .try_reserve_exact(count)
            .map_err(|_| BackendError::SurfaceAllocation { width, height })?;
        words.extend(store.pixels().iter().map(|&px| ORDER.pack(px)));

        Ok(Pixmap {
            generation: store.generation(),
            width,
            words,
            mask: store.mask().cloned().map(Rc::new),
        })
    }

    /// Copy the `area` of `src`, a matrix `src_stride` words wide, through the pen to `dst`.
    fn copy_area(&mut self, src: &[u32], src_stride: usize, area: Region, dst: Point) {
        for row in 0..area.height {
            let y = dst.y + row as i32;
            let start = (area.y + row) as usize * src_stride + area.x as usize;
            let line = &src[start..start + area.width as usize];

            for (col, &word) in line.iter().enumerate() {
                let x = dst.x + col as i32;
                if !self.pen.allows(x, y) {
                    continue;
                }

                if let Some(target) = self.window.get_mut(x, y) {
                    *target = word;
                }
            }
        }
    }
}

impl Pen {
    fn allows(&self, x: i32, y: i32) -> bool {
        match self {
            Pen::Rect(rect) => rect.contains(x, y),
            Pen::Stencil { mask, origin } => {
                let (mx, my) = (x - origin.x, y - origin.y);
                if mx < 0 || my < 0 {
                    return false;
                }

                let (mx, my) = (mx as u32, my as u32);
                mx < mask.width() && my < mask.height() && mask.get(mx, my)
            }
        }
    }
}

impl BlitBackend for StencilBackend {
    fn name(&self) -> &str {
        "stencil"
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.window.width(), self.window.height())
    }

    fn set_clip(&mut self, clip: Rect) {
        self.pen = Pen::Rect(clip);
    }

    fn set_clip_mask(&mut self, id: StoreId, origin: Point) -> Result<(), BackendError> {
        let pixmap = self
            .pixmaps
            .get(&id)
            .ok_or(BackendError::UnknownImage(id))?;

        if let Some(mask) = &pixmap.mask {
            self.pen = Pen::Stencil {
                mask: Rc::clone(mask),
                origin,
            };
        }

        Ok(())
    }

    fn upload_image(&mut self, store: &PixelStore) -> Result<(), BackendError> {
        let current = self
            .pixmaps
            .get(&store.id())
            .is_some_and(|pixmap| pixmap.generation == store.generation());

        if current {
            return Ok(());
        }

        // A stale pixmap is freed before its replacement is created.
        self.pixmaps.remove(&store.id());
        let pixmap = Self::create_pixmap(store)?;
        log::debug!(
            "uploaded bitmap {:?} generation {} mask={}",
            store.id(),
            pixmap.generation,
            pixmap.mask.is_some()
        );
        self.pixmaps.insert(store.id(), pixmap);
        Ok(())
    }

    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError> {
        // Take the pixmap out so we can draw through `self` while reading it.
        let pixmap = self
            .pixmaps
            .remove(&store.id())
            .ok_or(BackendError::UnknownImage(store.id()))?;

        self.copy_area(&pixmap.words, pixmap.width as usize, copy.src, copy.dst);
        self.pixmaps.insert(store.id(), pixmap);
        Ok(())
    }

    fn draw_scaled(&mut self, store: &PixelStore, copy: &ScaledCopy) -> Result<(), BackendError> {
        let target = (copy.target.width as u32, copy.target.height as u32);
        let scaled = scale_window(store, Region::whole(store), target, copy.window)?;
        let (width, height) = (scaled.width(), scaled.height());

        if width > MAX_PIXMAP_DIMENSION || height > MAX_PIXMAP_DIMENSION {
            return Err(BackendError::SurfaceAllocation { width, height });
        }

        let dst = copy.dst();
        let (pixels, mask) = scaled.into_parts();
        let words: Vec<u32> = pixels.iter().map(|&px| ORDER.pack(px)).collect();

        if store.has_mask() {
            self.pen = Pen::Stencil {
                mask: Rc::new(mask),
                origin: dst,
            };
        }

        self.copy_area(&words, width as usize, Region::new(0, 0, width, height), dst);
        Ok(())
    }

    fn release(&mut self, id: StoreId) {
        if self.pixmaps.remove(&id).is_some() {
            log::debug!("released pixmap of bitmap {:?}", id);
        }
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.window.get(x, y).map(|word| ORDER.unpack(word))
    }
}
