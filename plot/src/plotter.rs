// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! The bitmap entries of a frontend's plotter table.
use nsmotif_bitmap::{BitmapError, PixelStore};

use crate::backend::{BackendError, BlitBackend};
use crate::geom::Rect;
use crate::tile::{self, BitmapFlags, BlitPlan, TileCopy};

/// Draws pixel stores through a backend, within an ambient clip rectangle.
///
/// This owns what the X port kept in its graphics context: the current clip. Every blit that
/// installs a stencil on the backend's pen puts the clip back before returning, whether or not
/// the blit succeeded.
#[derive(Debug)]
pub struct Plotter<B> {
    backend: B,
    clip: Rect,
}

/// A blit was abandoned.
///
/// Nothing is retried. The next redraw of the affected area simply tries again.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("backend {backend} failed: {source}")]
    Backend {
        backend: String,
        #[source]
        source: BackendError,
    },
    #[error("cannot resample bitmap: {0}")]
    Bitmap(#[from] BitmapError),
}

impl<B: BlitBackend> Plotter<B> {
    /// Start plotting with the clip covering the whole surface of the backend.
    pub fn new(mut backend: B) -> Self {
        let (width, height) = backend.surface_size();
        let extent = |len: u32| i32::try_from(len).unwrap_or(i32::MAX);
        let clip = Rect::new(0, 0, extent(width), extent(height));
        backend.set_clip(clip);

        Plotter { backend, clip }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// The ambient clip rectangle.
    pub fn clip_rect(&self) -> Rect {
        self.clip
    }

    /// Set the ambient clip rectangle and program it on the backend.
    pub fn set_clip(&mut self, clip: Rect) {
        self.clip = clip;
        self.backend.set_clip(clip);
    }

    /// Set the ambient clip from its corners, the way the core passes it.
    pub fn clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.set_clip(Rect::from_corners(x0, y0, x1, y1));
    }

    /// Plot a bitmap with its first tile at `x, y` sized `width` by `height`.
    ///
    /// Returns the number of copies issued to the backend. A placement that is empty or entirely
    /// clipped away issues none and is not an error. The background colour is accepted for the
    /// plotter table's sake and has no effect, transparency is handled by the store's stencil.
    ///
    /// # Errors
    /// When the backend cannot create the surfaces for this store. The blit is skipped, the clip
    /// is restored and the plotter stays usable.
    #[allow(clippy::too_many_arguments)]
    pub fn bitmap(
        &mut self,
        store: &PixelStore,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        _background: u32,
        flags: BitmapFlags,
    ) -> Result<usize, PlotError> {
        let placement = Rect::new(x, y, width, height);
        let plan = tile::resolve((store.width(), store.height()), placement, self.clip, flags);

        if plan.is_empty() {
            log::trace!("bitmap {:?} at {:?} is not visible", store.id(), placement);
            return Ok(0);
        }

        let result = self.draw_plan(store, &plan);

        if store.has_mask() || result.is_err() {
            self.backend.set_clip(self.clip);
        }

        match result {
            Ok(()) => {
                log::debug!(
                    "plotted bitmap {:?} at {:?} with {} copies",
                    store.id(),
                    placement,
                    plan.len()
                );
                Ok(plan.len())
            }
            Err(err) => {
                log::warn!("skipped bitmap {:?} at {:?}: {}", store.id(), placement, err);
                Err(self.wrap(err))
            }
        }
    }

    /// Destroy a store together with everything the backend derived from it.
    ///
    /// Passing nothing is allowed and does nothing.
    pub fn destroy_bitmap(&mut self, store: Option<PixelStore>) {
        if let Some(store) = store {
            self.backend.release(store.id());
            log::trace!("destroyed bitmap {:?}", store.id());
        }
    }

    fn draw_plan(&mut self, store: &PixelStore, plan: &BlitPlan) -> Result<(), BackendError> {
        match plan {
            BlitPlan::Empty => Ok(()),
            BlitPlan::Copy(copy) => {
                self.backend.upload_image(store)?;
                self.draw_tile(store, copy)
            }
            BlitPlan::Tiled(tiles) => {
                self.backend.upload_image(store)?;
                tiles.iter().try_for_each(|copy| self.draw_tile(store, copy))
            }
            BlitPlan::Scaled(copy) => self.backend.draw_scaled(store, copy),
        }
    }

    fn draw_tile(&mut self, store: &PixelStore, copy: &TileCopy) -> Result<(), BackendError> {
        if store.has_mask() {
            self.backend.set_clip_mask(store.id(), copy.mask_origin())?;
        }

        self.backend.draw_tile(store, copy)
    }

    fn wrap(&self, err: BackendError) -> PlotError {
        match err {
            BackendError::Bitmap(err) => PlotError::Bitmap(err),
            source => PlotError::Backend {
                backend: self.backend.name().into(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{Op, RecordingBackend};
    use crate::geom::Point;
    use nsmotif_bitmap::{Region, Rgba};

    const SOLID: Rgba = [0x40, 0x80, 0xc0, 0xff];

    fn solid(width: u32, height: u32) -> PixelStore {
        let mut store = PixelStore::new(width, height, false).unwrap();
        store.pixels_mut().fill(SOLID);
        store.modified();
        store
    }

    fn holed(width: u32, height: u32) -> PixelStore {
        let mut store = solid(width, height);
        store.pixels_mut()[0] = [0; 4];
        store.modified();
        store
    }

    #[test]
    fn starts_with_surface_clip() {
        let plotter = Plotter::new(RecordingBackend::new(64, 32));
        assert_eq!(plotter.clip_rect(), Rect::new(0, 0, 64, 32));
        assert_eq!(plotter.backend().ops(), &[Op::Clip(Rect::new(0, 0, 64, 32))]);
    }

    #[test]
    fn clip_from_corners() {
        let mut plotter = Plotter::new(RecordingBackend::new(64, 32));
        plotter.clip(4, 2, 20, 12);

        assert_eq!(plotter.clip_rect(), Rect::new(4, 2, 16, 10));
        assert_eq!(plotter.backend().current_clip(), Some(Rect::new(4, 2, 16, 10)));
    }

    #[test]
    fn extreme_clip_does_not_overflow() {
        let store = solid(4, 4);
        let mut plotter = Plotter::new(RecordingBackend::new(u32::MAX, 16));
        assert_eq!(plotter.clip_rect(), Rect::new(0, 0, i32::MAX, 16));

        plotter.clip(i32::MIN, 0, 8, 8);
        assert_eq!(plotter.clip_rect(), Rect::new(i32::MIN, 0, i32::MAX, 8));
        assert_eq!(
            plotter
                .bitmap(&store, 0, 0, 4, 4, 0, BitmapFlags::empty())
                .unwrap(),
            0
        );
        assert_eq!(
            plotter
                .bitmap(&store, -20, 0, 4, 4, 0, BitmapFlags::empty())
                .unwrap(),
            1
        );
    }

    #[test]
    fn opaque_copy_keeps_clip() {
        let store = solid(8, 8);
        let mut plotter = Plotter::new(RecordingBackend::new(64, 32));
        plotter.backend_mut().take_ops();

        let count = plotter
            .bitmap(&store, 3, 4, 8, 8, 0xffffff, BitmapFlags::empty())
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            plotter.backend().ops(),
            &[
                Op::Upload(store.id()),
                Op::Tile(
                    store.id(),
                    TileCopy {
                        src: Region::new(0, 0, 8, 8),
                        dst: Point::new(3, 4),
                    }
                ),
            ]
        );
    }

    #[test]
    fn masked_tiles_align_stencil_and_restore() {
        let store = holed(10, 10);
        let mut plotter = Plotter::new(RecordingBackend::new(100, 100));
        plotter.clip(0, 0, 25, 10);
        plotter.backend_mut().take_ops();

        let count = plotter
            .bitmap(&store, 0, 0, 10, 10, 0, BitmapFlags::REPEAT_X)
            .unwrap();
        assert_eq!(count, 3);

        let origins: Vec<_> = plotter
            .backend()
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::ClipMask(_, origin) => Some(*origin),
                _ => None,
            })
            .collect();
        assert_eq!(origins, [Point::new(0, 0), Point::new(10, 0), Point::new(20, 0)]);
        assert_eq!(plotter.backend().current_clip(), Some(Rect::new(0, 0, 25, 10)));
    }

    #[test]
    fn invisible_placement_issues_nothing() {
        let store = solid(4, 4);
        let mut plotter = Plotter::new(RecordingBackend::new(16, 16));
        plotter.backend_mut().take_ops();

        assert_eq!(plotter.bitmap(&store, 20, 0, 4, 4, 0, BitmapFlags::empty()).unwrap(), 0);
        assert_eq!(plotter.bitmap(&store, 0, 0, 0, 4, 0, BitmapFlags::empty()).unwrap(), 0);
        assert_eq!(plotter.bitmap(&store, 0, 0, 4, -4, 0, BitmapFlags::REPEAT_Y).unwrap(), 0);
        assert!(plotter.backend().ops().is_empty());
    }

    #[test]
    fn failed_upload_restores_clip() {
        let store = holed(4, 4);
        let mut plotter = Plotter::new(RecordingBackend::new(16, 16));
        plotter.clip(1, 1, 15, 15);
        plotter.backend_mut().refuse_uploads(true);

        let err = plotter
            .bitmap(&store, 0, 0, 4, 4, 0, BitmapFlags::empty())
            .unwrap_err();
        assert!(matches!(err, PlotError::Backend { .. }));
        assert_eq!(plotter.backend().current_clip(), Some(Rect::new(1, 1, 14, 14)));

        plotter.backend_mut().refuse_uploads(false);
        assert_eq!(plotter.bitmap(&store, 0, 0, 4, 4, 0, BitmapFlags::empty()).unwrap(), 1);
    }

    #[test]
    fn destroy_releases_backend_resources() {
        let store = solid(2, 2);
        let id = store.id();
        let mut plotter = Plotter::new(RecordingBackend::new(16, 16));
        plotter.destroy_bitmap(None);
        plotter.destroy_bitmap(Some(store));

        assert_eq!(plotter.backend().ops().last(), Some(&Op::Release(id)));
    }
}
