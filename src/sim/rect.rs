//! Axis-aligned rectangles in screen space
//!
//! Origin is the top-left corner of the playfield, y grows downwards.

use glam::Vec2;

/// An axis-aligned rectangle (top-left position + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Same rectangle scaled around its centre
    pub fn scaled(&self, ratio: f32) -> Rect {
        let size = self.size * ratio;
        Rect {
            pos: self.center() - size * 0.5,
            size,
        }
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Whether a y coordinate falls inside the vertical span `[top, bottom)`
    #[inline]
    pub fn spans_row(&self, y: f32) -> bool {
        y >= self.top() && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_scaled_keeps_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let s = r.scaled(0.8);
        assert_eq!(s.center(), r.center());
        assert!((s.size.x - 80.0).abs() < 1e-4);
        assert!((s.size.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_spans_row_is_half_open() {
        let r = Rect::new(0.0, 100.0, 10.0, 30.0);
        assert!(r.spans_row(100.0));
        assert!(r.spans_row(129.9));
        assert!(!r.spans_row(130.0));
        assert!(!r.spans_row(99.9));
    }
}
