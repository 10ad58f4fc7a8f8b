// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
use nsmotif_bitmap::{PixelStore, Rgba, StoreId};

use crate::backend::{BackendError, BlitBackend};
use crate::geom::{Point, Rect};
use crate::tile::{ScaledCopy, TileCopy};

/// A backend call, as seen by [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Upload(StoreId),
    Clip(Rect),
    ClipMask(StoreId, Point),
    Tile(StoreId, TileCopy),
    Scaled(StoreId, ScaledCopy),
    Release(StoreId),
}

/// Draws nothing and records every call, for checking what the plotter asks of a backend.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    ops: Vec<Op>,
    refuse_uploads: bool,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        RecordingBackend {
            width,
            height,
            ..Self::default()
        }
    }

    /// Make every following upload fail as if the server ran out of pixmap memory.
    pub fn refuse_uploads(&mut self, refuse: bool) {
        self.refuse_uploads = refuse;
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Take the recorded calls, leaving the record empty.
    pub fn take_ops(&mut self) -> Vec<Op> {
        core::mem::take(&mut self.ops)
    }

    /// The clip in effect after the recorded calls, `None` while a stencil is installed.
    pub fn current_clip(&self) -> Option<Rect> {
        self.ops
            .iter()
            .rev()
            .find_map(|op| match op {
                Op::Clip(rect) => Some(Some(*rect)),
                Op::ClipMask(..) => Some(None),
                _ => None,
            })
            .flatten()
    }
}

impl BlitBackend for RecordingBackend {
    fn name(&self) -> &str {
        "record"
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_clip(&mut self, clip: Rect) {
        self.ops.push(Op::Clip(clip));
    }

    fn set_clip_mask(&mut self, id: StoreId, origin: Point) -> Result<(), BackendError> {
        self.ops.push(Op::ClipMask(id, origin));
        Ok(())
    }

    fn upload_image(&mut self, store: &PixelStore) -> Result<(), BackendError> {
        if self.refuse_uploads {
            return Err(BackendError::SurfaceAllocation {
                width: store.width(),
                height: store.height(),
            });
        }

        self.ops.push(Op::Upload(store.id()));
        Ok(())
    }

    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError> {
        self.ops.push(Op::Tile(store.id(), *copy));
        Ok(())
    }

    fn draw_scaled(&mut self, store: &PixelStore, copy: &ScaledCopy) -> Result<(), BackendError> {
        self.ops.push(Op::Scaled(store.id(), *copy));
        Ok(())
    }

    fn release(&mut self, id: StoreId) {
        self.ops.push(Op::Release(id));
    }

    fn read_pixel(&self, _: i32, _: i32) -> Option<Rgba> {
        None
    }
}
