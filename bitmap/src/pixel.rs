// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Channel layout of stored pixels and the orders backends want them in.
//!
//! The store always keeps pixels as four bytes in the order red, green, blue, alpha. This is what
//! the NetSurf image decoders write. Any other order is the business of the backend that uploads
//! the pixels, see [`PixelOrder`].

/// One stored pixel: red, green, blue, alpha.
pub type Rgba = [u8; 4];

/// Number of bytes of one stored pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Index of the alpha sample within an [`Rgba`] pixel.
pub const ALPHA: usize = 3;

/// Alpha samples with this bit set are treated as opaque, all others as fully transparent.
///
/// This is a plain 50% test on the top bit of the sample, so `0x80` is opaque and `0x7f` is not.
pub const ALPHA_THRESHOLD: u8 = 0x80;

/// The value a transparent pixel is cleared to.
pub const TRANSPARENT: Rgba = [0; 4];

/// Whether the pixel survives the binary alpha test.
#[inline]
pub const fn is_visible(pixel: Rgba) -> bool {
    pixel[ALPHA] & ALPHA_THRESHOLD != 0
}

/// Word order of a 32-bit pixel as consumed by a drawing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelOrder {
    /// `0xRRGGBBAA`, the byte order `GL_RGBA`/`GL_UNSIGNED_BYTE` reads on a big-endian host.
    Rgba8888,
    /// `0xAABBGGRR`, the 24-bit TrueColor ZPixmap order of the IRIX visuals with alpha in the
    /// otherwise unused top byte.
    Abgr8888,
}

impl PixelOrder {
    /// Pack a stored pixel into a word of this order.
    #[inline]
    pub const fn pack(self, [r, g, b, a]: Rgba) -> u32 {
        match self {
            PixelOrder::Rgba8888 => u32::from_be_bytes([r, g, b, a]),
            PixelOrder::Abgr8888 => u32::from_be_bytes([a, b, g, r]),
        }
    }

    /// Recover the stored pixel from a word of this order.
    #[inline]
    pub const fn unpack(self, word: u32) -> Rgba {
        let [w0, w1, w2, w3] = word.to_be_bytes();
        match self {
            PixelOrder::Rgba8888 => [w0, w1, w2, w3],
            PixelOrder::Abgr8888 => [w3, w2, w1, w0],
        }
    }

    /// The mask that selects the alpha sample within a packed word.
    pub const fn alpha_mask(self) -> u32 {
        match self {
            PixelOrder::Rgba8888 => 0x0000_00ff,
            PixelOrder::Abgr8888 => 0xff00_0000,
        }
    }

    /// Pack a whole row or image of pixels.
    pub fn pack_into(self, pixels: &[Rgba], words: &mut [u32]) {
        for (word, &pixel) in words.iter_mut().zip(pixels) {
            *word = self.pack(pixel);
        }
    }
}
