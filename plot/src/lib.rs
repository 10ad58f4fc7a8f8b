// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Bitmap plotting for the Motif frontend.
//!
//! The plotter takes a [`PixelStore`](nsmotif_bitmap::PixelStore) and a placement from the
//! layout core, resolves the placement against the clip rectangle into individual copies and
//! hands those to a drawing backend. Placements may be scaled or repeated along either axis.
//!
//! Two drawing models exist, selected once at startup through [`PlotConfig`]:
//! 1. the stencil backend, mirroring core X11 with 1-bit clip masks,
//! 2. the blend backend, mirroring an OpenGL context with alpha blending.
//!
//! ```
//! use nsmotif_bitmap::PixelStore;
//! use nsmotif_plot::{BitmapFlags, BlitBackend, Plotter, StencilBackend};
//!
//! let backend = StencilBackend::new(64, 64, [0xff; 4])?;
//! let mut plotter = Plotter::new(backend);
//!
//! let mut store = PixelStore::new(10, 10, false)?;
//! store.pixels_mut().fill([0x20, 0x40, 0x80, 0xff]);
//! store.modified();
//!
//! // Repeat across a 25 pixel wide band: two full tiles and a truncated one.
//! plotter.clip(0, 0, 25, 10);
//! let copies = plotter.bitmap(&store, 0, 0, 10, 10, 0, BitmapFlags::REPEAT_X)?;
//! assert_eq!(copies, 3);
//! assert_eq!(plotter.backend().read_pixel(24, 9), Some([0x20, 0x40, 0x80, 0xff]));
//! assert_eq!(plotter.backend().read_pixel(25, 0), Some([0xff; 4]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(unsafe_code)]

mod backend;
mod backends;
mod config;
pub mod geom;
mod plotter;
mod surface;
pub mod tile;

pub use self::backend::{BackendError, BlitBackend};
pub use self::backends::{
    BlendBackend, Op, RecordingBackend, StencilBackend, MAX_PIXMAP_DIMENSION, MAX_TEXTURE_SIZE,
};
pub use self::config::{BackendKind, ConfigError, PlotConfig, BACKEND_ENV};
pub use self::geom::{Point, Rect};
pub use self::plotter::{PlotError, Plotter};
pub use self::surface::Drawable;
pub use self::tile::{BitmapFlags, BlitPlan, ScaledCopy, TileCopy};
