// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! # Pixel stores
//!
//! Owned RGBA buffers for decoded images together with the 1-bit transparency stencil that the
//! core X11 drawing model understands.
//!
//! A decoder allocates a [`PixelStore`], writes straight into its buffer and then calls
//! [`PixelStore::modified`]. That classifies every pixel against a fixed 50% alpha threshold,
//! clears the transparent ones and packs a row-aligned [`Mask`]. Plotting code can then ask for
//! the opacity classification, read the pixels, or produce a nearest-neighbour resample with
//! [`scale`].
//!
//! ## Usage
//!
//! ```
//! use nsmotif_bitmap::PixelStore;
//!
//! let mut store = PixelStore::new(4, 4, false)?;
//!
//! // Everything opaque white, except for a single hole.
//! store.pixels_mut().iter_mut().for_each(|p| *p = [0xff; 4]);
//! store.pixels_mut()[2 * 4 + 2] = [0, 0, 0, 0];
//! store.modified();
//!
//! let mask = store.mask().expect("a hole produces a mask");
//! assert!(!mask.get(2, 2));
//! assert!(mask.get(1, 2));
//! assert!(!store.test_opaque());
//! # Ok::<(), nsmotif_bitmap::BitmapError>(())
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![deny(unsafe_code)]
extern crate alloc;

mod error;
mod mask;
pub mod pixel;
mod scale;
mod store;

pub use self::error::BitmapError;
pub use self::mask::{Mask, MaskWriter};
pub use self::pixel::{PixelOrder, Rgba};
pub use self::scale::{scale, scale_window, Region, Scaled};
pub use self::store::{PixelStore, StoreId};
