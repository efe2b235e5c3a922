//! Basic geometric types in page space
//!
//! Page space has its origin at the top-left corner of the page and y grows
//! downward, which is how text runs and table cells are reported by layout
//! engines. [`Rectangle::to_pdf_rect`] flips into PDF user space.

use serde::{Deserialize, Serialize};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Extent to the right
    pub width: f64,
    /// Extent downward
    pub height: f64,
}

impl Rectangle {
    /// Create a rectangle from position and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two opposite corners
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the center point
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// True when either extent is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Overlapping region of two rectangles, if they share any area
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rectangle::from_corners(left, top, right, bottom))
        } else {
            None
        }
    }

    pub fn overlap_area(&self, other: &Rectangle) -> f64 {
        self.intersection(other).map_or(0.0, |r| r.area())
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Whether `other` lies entirely inside this rectangle, allowing `tolerance` slack
    pub fn contains(&self, other: &Rectangle, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }

    /// Shrink every edge by `margin`
    pub fn inset(&self, margin: f64) -> Rectangle {
        Rectangle::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }

    /// Largest square centred inside this rectangle
    pub fn centered_square(&self) -> Rectangle {
        let side = self.width.min(self.height);
        let center = self.center();
        Rectangle::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
    }

    /// `[llx lly urx ury]` in PDF user space for a page of the given height
    pub fn to_pdf_rect(&self, page_height: f64) -> [f64; 4] {
        [
            self.x,
            page_height - self.bottom(),
            self.right(),
            page_height - self.y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);

        let origin = Point::origin();
        assert_eq!(origin.x, 0.0);
        assert_eq!(origin.y, 0.0);
    }

    #[test]
    fn test_rectangle() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 100.0);

        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 120.0);
        assert_eq!(rect.area(), 10_000.0);

        let center = rect.center();
        assert_eq!(center.x, 60.0);
        assert_eq!(center.y, 70.0);
    }

    #[test]
    fn test_from_corners_normalises_order() {
        let rect = Rectangle::from_corners(60.0, 50.0, 10.0, 20.0);
        assert_eq!(rect, Rectangle::new(10.0, 20.0, 50.0, 30.0));
    }

    #[test]
    fn test_intersection() {
        let a = Rectangle::new(0.0, 0.0, 100.0, 20.0);
        let b = Rectangle::new(90.0, 5.0, 50.0, 20.0);
        assert_eq!(a.intersection(&b), Some(Rectangle::new(90.0, 5.0, 10.0, 15.0)));
        assert_eq!(a.overlap_area(&b), 150.0);

        let far = Rectangle::new(200.0, 200.0, 5.0, 5.0);
        assert_eq!(a.intersection(&far), None);
        assert_eq!(a.overlap_area(&far), 0.0);
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_union_and_contains() {
        let a = Rectangle::new(10.0, 10.0, 10.0, 10.0);
        let b = Rectangle::new(30.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, Rectangle::new(10.0, 5.0, 30.0, 15.0));
        assert!(u.contains(&a, 0.0));
        assert!(u.contains(&b, 0.0));
        assert!(!a.contains(&u, 0.0));
    }

    #[test]
    fn test_inset_and_degenerate() {
        let cell = Rectangle::new(0.0, 0.0, 120.0, 20.0);
        assert_eq!(cell.inset(1.0), Rectangle::new(1.0, 1.0, 118.0, 18.0));
        assert!(!cell.inset(1.0).is_degenerate());
        assert!(cell.inset(10.0).is_degenerate());
        assert_eq!(cell.inset(10.0).area(), 0.0);
    }

    #[test]
    fn test_centered_square() {
        let rect = Rectangle::new(0.0, 0.0, 100.0, 20.0);
        assert_eq!(rect.centered_square(), Rectangle::new(40.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_to_pdf_rect_flips_y() {
        let rect = Rectangle::new(50.0, 100.0, 200.0, 20.0);
        assert_eq!(rect.to_pdf_rect(792.0), [50.0, 672.0, 250.0, 692.0]);
    }
}
