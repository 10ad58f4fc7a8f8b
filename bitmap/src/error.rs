// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers

/// Failure to create or sample a pixel store.
///
/// None of these are fatal to the process. A decoder that fails to create its store should skip
/// rendering that one image.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BitmapError {
    /// One of the dimensions was zero, or the pixel count does not fit into memory indices.
    #[error("invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// The allocator refused to provide the pixel buffer.
    #[error("could not allocate {bytes} bytes of pixel data")]
    OutOfMemory { bytes: usize },
    /// A sampled source rectangle reaches outside of the store.
    #[error("source rectangle {x},{y} {width}x{height} is outside the bitmap")]
    SourceOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
