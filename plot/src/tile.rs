// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Resolve a bitmap placement into the copies that draw it.
//!
//! The core lays out a bitmap as one explicitly placed tile at `(x, y)` with a requested size.
//! With repeat flags the image continues from that tile in both directions along the flagged
//! axes, as far as the current clip rectangle reaches. Without flags a requested size that differs
//! from the image size scales the single tile.
//!
//! Nothing in here touches pixels. The result is a [`BlitPlan`] which the plotter hands to a
//! backend one copy at a time.
use bitflags::bitflags;
use nsmotif_bitmap::Region;

use crate::geom::{Point, Rect};

bitflags! {
    /// Repetition of a bitmap placement.
    pub struct BitmapFlags: u8 {
        /// Repeat the image horizontally across the clip rectangle.
        const REPEAT_X = 0b01;
        /// Repeat the image vertically across the clip rectangle.
        const REPEAT_Y = 0b10;
    }
}

/// Copy a region of the source, unscaled, with its top left at `dst`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCopy {
    pub src: Region,
    pub dst: Point,
}

/// Draw part of the source resampled to the size of `target`.
///
/// Only the `window` of the target, in coordinates relative to the target's top left, is visible
/// within the clip rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaledCopy {
    pub target: Rect,
    pub window: Region,
}

/// The copies needed for one bitmap placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlitPlan {
    /// Nothing of the placement is visible.
    Empty,
    /// A single unscaled copy.
    Copy(TileCopy),
    /// A single resampled copy.
    Scaled(ScaledCopy),
    /// A grid of unscaled copies, row by row.
    Tiled(Vec<TileCopy>),
}

impl TileCopy {
    /// The device rectangle this copy covers.
    pub fn dst_rect(&self) -> Rect {
        Rect::new(
            self.dst.x,
            self.dst.y,
            self.src.width as i32,
            self.src.height as i32,
        )
    }

    /// Where the top left of the source image, and thus of its stencil, lands for this copy.
    pub fn mask_origin(&self) -> Point {
        Point::new(
            self.dst.x - self.src.x as i32,
            self.dst.y - self.src.y as i32,
        )
    }
}

impl ScaledCopy {
    /// The device position of the top left visible pixel.
    pub fn dst(&self) -> Point {
        Point::new(
            self.target.x + self.window.x as i32,
            self.target.y + self.window.y as i32,
        )
    }

    /// The device rectangle this copy covers.
    pub fn dst_rect(&self) -> Rect {
        let dst = self.dst();
        Rect::new(
            dst.x,
            dst.y,
            self.window.width as i32,
            self.window.height as i32,
        )
    }
}

impl BlitPlan {
    /// The number of copy operations.
    pub fn len(&self) -> usize {
        match self {
            BlitPlan::Empty => 0,
            BlitPlan::Copy(_) | BlitPlan::Scaled(_) => 1,
            BlitPlan::Tiled(tiles) => tiles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One axis of the placement while it is being clipped.
///
/// `src` is the offset into the source of the pixel drawn at `draw`, `len` the visible extent.
#[derive(Clone, Copy, Debug)]
struct Axis {
    src: i64,
    draw: i64,
    len: i64,
}

/// A run of pixels along one axis of a tile grid.
#[derive(Clone, Copy, Debug)]
struct Span {
    src: i64,
    draw: i64,
    len: i64,
}

impl Axis {
    fn placed(at: i32, len: i32) -> Self {
        Axis {
            src: 0,
            draw: at.into(),
            len: len.into(),
        }
    }

    /// Extend across the whole clip extent, keeping the phase of tiles anchored at the placement.
    fn repeat(&mut self, source: i64, clip_at: i32, clip_len: i32) {
        let clip_at = i64::from(clip_at);
        self.src = (clip_at - self.draw).rem_euclid(source);
        self.draw = clip_at;
        self.len = clip_len.into();
    }

    /// Cut both ends to the clip extent, moving the source offset along with the start.
    fn clip(&mut self, clip_at: i32, clip_len: i32) {
        let start = i64::from(clip_at);
        let end = start + i64::from(clip_len);

        if self.draw < start {
            let cut = start - self.draw;
            self.src += cut;
            self.len -= cut;
            self.draw = start;
        }

        if self.draw + self.len > end {
            self.len = end - self.draw;
        }
    }

    /// The part of the source that fits without repeating.
    fn first_span(&self, source: i64) -> Span {
        Span {
            src: self.src,
            draw: self.draw,
            len: (source - self.src).min(self.len),
        }
    }

    fn spans(&self, source: i64, repeat: bool) -> Vec<Span> {
        let first = self.first_span(source);
        if first.len <= 0 {
            return Vec::new();
        }

        let mut spans = vec![first];

        if repeat {
            let mut at = first.len;
            while at < self.len {
                let len = source.min(self.len - at);
                spans.push(Span {
                    src: 0,
                    draw: self.draw + at,
                    len,
                });
                at += len;
            }
        }

        spans
    }
}

fn tile(x: Span, y: Span) -> TileCopy {
    // Spans are bounded by the source extent, which is a `u32`, and by the clip, an `i32`.
    TileCopy {
        src: Region::new(x.src as u32, y.src as u32, x.len as u32, y.len as u32),
        dst: Point::new(x.draw as i32, y.draw as i32),
    }
}

/// Compute the copies that draw a `source` sized image placed at `placement`.
///
/// The clip rectangle bounds everything: no copy reaches outside of it, and repeated axes extend
/// exactly across it. Tiles stay anchored at the placement, so moving the clip never shifts the
/// pattern. Partial tiles at the edges are truncated rather than stretched.
///
/// The image is resampled only when no repeat flag is set and the placement size differs from the
/// image size. An empty placement, clip or source yields [`BlitPlan::Empty`].
pub fn resolve(source: (u32, u32), placement: Rect, clip: Rect, flags: BitmapFlags) -> BlitPlan {
    let (source_width, source_height) = (i64::from(source.0), i64::from(source.1));

    if placement.is_empty() || clip.is_empty() || source_width == 0 || source_height == 0 {
        return BlitPlan::Empty;
    }

    let repeat_x = flags.contains(BitmapFlags::REPEAT_X);
    let repeat_y = flags.contains(BitmapFlags::REPEAT_Y);

    let mut x = Axis::placed(placement.x, placement.width);
    let mut y = Axis::placed(placement.y, placement.height);

    if repeat_x {
        x.repeat(source_width, clip.x, clip.width);
    }

    if repeat_y {
        y.repeat(source_height, clip.y, clip.height);
    }

    x.clip(clip.x, clip.width);
    y.clip(clip.y, clip.height);

    if x.len <= 0 || y.len <= 0 {
        return BlitPlan::Empty;
    }

    let tiled = (repeat_x && x.len > source_width - x.src)
        || (repeat_y && y.len > source_height - y.src);

    if tiled {
        let columns = x.spans(source_width, repeat_x);
        let rows = y.spans(source_height, repeat_y);

        let tiles: Vec<_> = rows
            .iter()
            .flat_map(|&row| columns.iter().map(move |&column| tile(column, row)))
            .collect();

        log::trace!(
            "tiling {}x{} image into {:?}: {} copies",
            source.0,
            source.1,
            placement,
            tiles.len()
        );

        return if tiles.is_empty() {
            BlitPlan::Empty
        } else {
            BlitPlan::Tiled(tiles)
        };
    }

    let scaled = flags.is_empty()
        && (i64::from(placement.width) != source_width
            || i64::from(placement.height) != source_height);

    if scaled {
        // Without repetition the source offset is the clipped distance in target pixels.
        return BlitPlan::Scaled(ScaledCopy {
            target: placement,
            window: Region::new(x.src as u32, y.src as u32, x.len as u32, y.len as u32),
        });
    }

    let (column, row) = (x.first_span(source_width), y.first_span(source_height));
    if column.len <= 0 || row.len <= 0 {
        return BlitPlan::Empty;
    }

    BlitPlan::Copy(tile(column, row))
}
