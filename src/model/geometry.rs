//! Integer pixel geometry shared by image and display space.

use std::ops::{Add, Sub};

/// A pixel position, in either image space or display space.
///
/// Arithmetic saturates at the `i32` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// The four corners of an annotation, in the order the handles reported them.
pub type Quad = [Point; 4];

/// An axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Corners shrunk by `margin` on every side, as TL, TR, BR, BL.
    pub fn inset_corners(&self, margin: i32) -> Quad {
        let top_left = Point::new(self.x, self.y);
        let bottom_right = top_left + Point::new(to_i32(self.width), to_i32(self.height));
        let inner = Point::new(margin, margin);
        let (tl, br) = (top_left + inner, bottom_right - inner);
        [
            tl,
            Point::new(br.x, tl.y),
            br,
            Point::new(tl.x, br.y),
        ]
    }
}

/// Pixel extent as a signed coordinate, saturating at `i32::MAX`.
pub(crate) fn to_i32(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_corners_literal_order() {
        let rect = Rect::new(0, 0, 800, 600);
        assert_eq!(
            rect.inset_corners(50),
            [
                Point::new(50, 50),
                Point::new(750, 50),
                Point::new(750, 550),
                Point::new(50, 550),
            ]
        );
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(10, 20) + Point::new(5, -5);
        assert_eq!(p, Point::new(15, 15));
        assert_eq!(p - Point::new(15, 15), Point::default());
    }

    #[test]
    fn test_point_arithmetic_saturates() {
        let far = Point::new(2_000_000_000, -2_000_000_000);
        assert_eq!(far + far, Point::new(i32::MAX, i32::MIN));
        assert_eq!(
            far - Point::new(-1_000_000_000, 1_000_000_000),
            Point::new(i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn test_inset_corners_of_huge_rect() {
        let corners = Rect::new(0, 0, u32::MAX, 10).inset_corners(5);
        assert_eq!(corners[2], Point::new(i32::MAX - 5, 5));
    }
}
