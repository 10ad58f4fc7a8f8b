// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `nsmotif` developers
//! Signed device coordinates.
//!
//! Layout hands us placements that can start left of or above the window and can even have a
//! negative extent, so unlike the pixel store everything here is `i32`.

/// A point in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// An axis aligned rectangle given by its top left corner and extent.
///
/// A rectangle with a width or height of zero or less covers no pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert from the corner form `x0,y0 .. x1,y1` that the core's plotters use.
    ///
    /// Extents that do not fit an `i32` saturate.
    pub const fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// The overlap of two rectangles, `None` if they do not share a pixel.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        let rect = Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y));
        (!rect.is_empty()).then_some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners() {
        let rect = Rect::from_corners(-4, 2, 6, 12);
        assert_eq!(rect, Rect::new(-4, 2, 10, 10));
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 12);
        assert!(rect.contains(-4, 2));
        assert!(!rect.contains(6, 2));
    }

    #[test]
    fn empty_extents() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::new(0, 0, 5, -1).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, -5, 10, 10)),
            Some(Rect::new(5, 0, 5, 5))
        );
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
        assert_eq!(a.intersect(&Rect::new(2, 2, 0, 4)), None);
    }

    #[test]
    fn extreme_corners_saturate() {
        let rect = Rect::from_corners(i32::MIN, 0, 8, i32::MAX);
        assert_eq!(rect, Rect::new(i32::MIN, 0, i32::MAX, i32::MAX));
        assert_eq!(rect.right(), -1);
        assert_eq!(rect.bottom(), i32::MAX);

        let far = Rect::new(i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX);
        assert_eq!(far.right(), i32::MAX);
        assert!(far.contains(i32::MAX - 1, i32::MAX - 1));

        assert_eq!(
            rect.intersect(&Rect::new(-100, 0, i32::MAX, 4)),
            Some(Rect::new(-100, 0, 99, 4))
        );
    }
}
