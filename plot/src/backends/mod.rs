// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! The drawing models a frontend can run on.
mod blend;
mod record;
mod stencil;

pub use self::blend::{BlendBackend, MAX_TEXTURE_SIZE};
pub use self::record::{Op, RecordingBackend};
pub use self::stencil::{StencilBackend, MAX_PIXMAP_DIMENSION};
