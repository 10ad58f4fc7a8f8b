// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
use alloc::vec::Vec;
use core::fmt;

/// A packed 1-bit-per-pixel transparency stencil.
///
/// Bits are packed eight pixels to a byte with the leftmost pixel in the least significant bit,
/// which is the order of X bitmap data. Every row starts on a fresh byte: a row whose width is not
/// a multiple of eight ends in a partially used byte padded with zero bits.
///
/// A set bit means the pixel is drawn, a clear bit means it is masked out.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Packs mask bits row by row.
///
/// Push one bit per pixel and call [`MaskWriter::next_line`] at the end of each row. The writer
/// remembers whether any clear bit was pushed, as an all-set mask is usually not worth keeping.
pub struct MaskWriter {
    width: u32,
    height: u32,
    data: Vec<u8>,
    value: u8,
    bit: u8,
    transparent: bool,
}

impl Mask {
    /// The number of bytes occupied by one row of `width` pixels.
    pub const fn bytes_per_row(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        Self::bytes_per_row(self.width)
    }

    /// The packed bits, `stride() * height()` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The packed bits of a single row.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Test the bit of one pixel.
    ///
    /// # Panics
    /// When the coordinate is outside the mask.
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(x < self.width && y < self.height, "Coordinate outside of mask");
        let byte = self.row(y)[x as usize / 8];
        byte >> (x % 8) & 1 == 1
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.data.len())
            .finish()
    }
}

impl MaskWriter {
    /// Prepare a writer for a `width` by `height` stencil.
    pub fn new(width: u32, height: u32) -> Self {
        let len = Mask::bytes_per_row(width) * height as usize;
        MaskWriter {
            width,
            height,
            data: Vec::with_capacity(len),
            value: 0,
            bit: 0,
            transparent: false,
        }
    }

    /// Append the bit for the next pixel of the current row.
    #[inline]
    pub fn push(&mut self, visible: bool) {
        self.value = (self.value >> 1) | if visible { 0x80 } else { 0 };
        self.transparent |= !visible;
        self.bit += 1;

        if self.bit == 8 {
            self.data.push(self.value);
            self.value = 0;
            self.bit = 0;
        }
    }

    /// Flush the partially filled byte, if any, so the next row starts byte aligned.
    pub fn next_line(&mut self) {
        if self.bit > 0 {
            self.value >>= 8 - self.bit;
            self.data.push(self.value);
            self.value = 0;
            self.bit = 0;
        }
    }

    /// Whether any pixel pushed so far was masked out.
    pub fn has_transparency(&self) -> bool {
        self.transparent
    }

    /// Finish the last row and return the stencil.
    pub fn finish(mut self) -> Mask {
        self.next_line();
        debug_assert_eq!(
            self.data.len(),
            Mask::bytes_per_row(self.width) * self.height as usize,
            "Bits pushed for every pixel"
        );

        Mask {
            width: self.width,
            height: self.height,
            data: self.data,
        }
    }
}
