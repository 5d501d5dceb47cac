//! Axis-aligned rectangles for dirty tracking and clipping.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the right edge.
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    /// One past the bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// True bounding union of two rectangles.
    ///
    /// This is the minimal rectangle covering both inputs. Positions and
    /// extents are combined together, so disjoint writes are fully covered.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Overlap of two rectangles, `None` when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_overlapping() {
        let a = Rect::new(2, 2, 4, 4);
        let b = Rect::new(4, 0, 4, 4);
        assert_eq!(a.union(&b), Rect::new(2, 0, 6, 6));
    }

    #[test]
    fn test_union_disjoint_covers_both() {
        // The gap between disjoint writes is covered; a max-extent-only
        // policy would miss the far corner.
        let a = Rect::new(0, 0, 1, 1);
        let b = Rect::new(10, 20, 1, 1);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0, 0, 11, 21));
        assert!(u.contains_point(0, 0));
        assert!(u.contains_point(10, 20));
    }

    #[test]
    fn test_union_with_empty() {
        let a = Rect::new(3, 3, 2, 2);
        let empty = Rect::new(9, 9, 0, 5);
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(3, 3, 5, 5);
        assert_eq!(a.intersect(&b), Some(Rect::new(3, 3, 2, 2)));
        let c = Rect::new(5, 0, 2, 2);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_contains_point_edges() {
        let r = Rect::new(1, 1, 2, 2);
        assert!(r.contains_point(1, 1));
        assert!(r.contains_point(2, 2));
        assert!(!r.contains_point(3, 1));
        assert!(!r.contains_point(0, 1));
    }
}
