// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! The OpenGL drawing model.
//!
//! Stores are uploaded as textures of `0xRRGGBBAA` words and drawn as quads with source-over
//! blending inside a scissor rectangle. Alpha is real, so the 1-bit stencil is never consulted.
use std::collections::HashMap;

use nsmotif_bitmap::{scale_window, PixelOrder, PixelStore, Region, Rgba, StoreId};

use crate::backend::{BackendError, BlitBackend};
use crate::geom::{Point, Rect};
use crate::surface::Drawable;
use crate::tile::{ScaledCopy, TileCopy};

/// The largest texture edge the renderer accepts.
pub const MAX_TEXTURE_SIZE: u32 = 8192;

const ORDER: PixelOrder = PixelOrder::Rgba8888;

/// Software rendition of a blending GL context.
pub struct BlendBackend {
    framebuffer: Drawable<u32>,
    scissor: Rect,
    textures: HashMap<StoreId, Texture>,
}

struct Texture {
    generation: u64,
    width: u32,
    words: Vec<u32>,
}

impl BlendBackend {
    /// Create a backend with a `width` by `height` framebuffer cleared to `background`.
    pub fn new(width: u32, height: u32, background: Rgba) -> Result<Self, BackendError> {
        let framebuffer = Drawable::new(width, height, ORDER.pack(background))?;
        let scissor = framebuffer.bounds();

        Ok(BlendBackend {
            framebuffer,
            scissor,
            textures: HashMap::new(),
        })
    }

    pub fn framebuffer(&self) -> &Drawable<u32> {
        &self.framebuffer
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn upload(width: u32, height: u32, pixels: &[Rgba]) -> Result<Vec<u32>, BackendError> {
        if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
            return Err(BackendError::SurfaceAllocation { width, height });
        }

        let mut words = Vec::new();
        words
            .try_reserve_exact(pixels.len())
            .map_err(|_| BackendError::SurfaceAllocation { width, height })?;
        words.resize(pixels.len(), 0);
        ORDER.pack_into(pixels, &mut words);
        Ok(words)
    }

    fn blend_area(&mut self, src: &[u32], src_stride: usize, area: Region, dst: Point) {
        for row in 0..area.height {
            let y = dst.y + row as i32;
            let start = (area.y + row) as usize * src_stride + area.x as usize;
            let line = &src[start..start + area.width as usize];

            for (col, &word) in line.iter().enumerate() {
                let x = dst.x + col as i32;
                if !self.scissor.contains(x, y) {
                    continue;
                }

                if let Some(target) = self.framebuffer.get_mut(x, y) {
                    let over = source_over(ORDER.unpack(word), ORDER.unpack(*target));
                    *target = ORDER.pack(over);
                }
            }
        }
    }
}

/// `GL_SRC_ALPHA, GL_ONE_MINUS_SRC_ALPHA` on straight alpha, rounded to nearest.
fn source_over(src: Rgba, dst: Rgba) -> Rgba {
    let alpha = u32::from(src[3]);
    let keep = 255 - alpha;
    let mix = |s: u8, d: u8| ((u32::from(s) * alpha + u32::from(d) * keep + 127) / 255) as u8;

    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (alpha + (u32::from(dst[3]) * keep + 127) / 255) as u8,
    ]
}

impl BlitBackend for BlendBackend {
    fn name(&self) -> &str {
        "blend"
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.framebuffer.width(), self.framebuffer.height())
    }

    fn set_clip(&mut self, clip: Rect) {
        self.scissor = clip;
    }

    fn set_clip_mask(&mut self, _: StoreId, _: Point) -> Result<(), BackendError> {
        Ok(())
    }

    fn upload_image(&mut self, store: &PixelStore) -> Result<(), BackendError> {
        if let Some(texture) = self.textures.get(&store.id()) {
            if texture.generation == store.generation() {
                return Ok(());
            }
        }

        self.textures.remove(&store.id());
        let words = Self::upload(store.width(), store.height(), store.pixels())?;
        log::debug!(
            "uploaded texture for bitmap {:?} generation {}",
            store.id(),
            store.generation()
        );

        self.textures.insert(
            store.id(),
            Texture {
                generation: store.generation(),
                width: store.width(),
                words,
            },
        );
        Ok(())
    }

    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError> {
        let texture = self
            .textures
            .remove(&store.id())
            .ok_or(BackendError::UnknownImage(store.id()))?;

        self.blend_area(&texture.words, texture.width as usize, copy.src, copy.dst);
        self.textures.insert(store.id(), texture);
        Ok(())
    }

    fn draw_scaled(&mut self, store: &PixelStore, copy: &ScaledCopy) -> Result<(), BackendError> {
        let target = (copy.target.width as u32, copy.target.height as u32);
        let scaled = scale_window(store, Region::whole(store), target, copy.window)?;
        let (width, height) = (scaled.width(), scaled.height());
        let words = Self::upload(width, height, scaled.pixels())?;

        self.blend_area(
            &words,
            width as usize,
            Region::new(0, 0, width, height),
            copy.dst(),
        );
        Ok(())
    }

    fn release(&mut self, id: StoreId) {
        if self.textures.remove(&id).is_some() {
            log::debug!("released texture of bitmap {:?}", id);
        }
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.framebuffer.get(x, y).map(|word| ORDER.unpack(word))
    }
}
