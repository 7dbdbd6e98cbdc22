//! Geometry primitives shared by the graph model and the layout engine

use serde::Serialize;

/// A 2D point in the diagram coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a graph object
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is not positive
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A mutable axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-sized rectangle at the origin
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Grow the rectangle by `amount` on every side.
    ///
    /// A dimension that would end up zero or negative is left untouched,
    /// together with its coordinate.
    pub fn inflate(&mut self, amount: f64) {
        let width = self.width + amount * 2.0;
        if width > 0.0 {
            self.x -= amount;
            self.width = width;
        }
        let height = self.height + amount * 2.0;
        if height > 0.0 {
            self.y -= amount;
            self.height = height;
        }
    }

    /// Expand in place to the smallest rectangle containing both. `None` is a no-op.
    pub fn union(&mut self, other: Option<&Rect>) {
        let Some(other) = other else {
            return;
        };
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        *self = Rect::new(x, y, right - x, bottom - y);
    }

    /// Bounding rectangle of a list; zero rectangle at the origin when empty
    pub fn union_all(rects: &[Rect]) -> Rect {
        let Some((first, rest)) = rects.split_first() else {
            return Rect::zero();
        };
        let mut bounds = *first;
        for rect in rest {
            bounds.union(Some(rect));
        }
        bounds
    }
}

/// Running minimum and maximum of a stream of values.
///
/// Both bounds start at `0`, so the tracked range always contains zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn extent(&self) -> f64 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center_x(), 25.0);
        assert_eq!(rect.center_y(), 40.0);
    }

    #[test]
    fn test_inflate_grows_every_side() {
        let mut rect = Rect::new(30.0, 180.0, 150.0, 60.0);
        rect.inflate(5.0);
        assert_eq!(rect, Rect::new(25.0, 175.0, 160.0, 70.0));
    }

    #[test]
    fn test_inflate_never_collapses_dimension() {
        let mut rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        rect.inflate(-3.0);
        // width 10 - 6 = 4 stays positive, height 4 - 6 would be negative
        assert_eq!(rect, Rect::new(3.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_union_with_none_is_noop() {
        let mut rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        rect.union(None);
        assert_eq!(rect, Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_union_expands() {
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        rect.union(Some(&Rect::new(20.0, -5.0, 5.0, 5.0)));
        assert_eq!(rect, Rect::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn test_union_all_empty_is_zero() {
        assert_eq!(Rect::union_all(&[]), Rect::zero());
    }

    #[test]
    fn test_union_all() {
        let bounds = Rect::union_all(&[
            Rect::new(10.0, 10.0, 10.0, 10.0),
            Rect::new(50.0, 0.0, 10.0, 5.0),
        ]);
        assert_eq!(bounds, Rect::new(10.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn test_min_max_starts_at_zero() {
        let mut range = MinMax::new();
        range.update(30.0);
        range.update(70.0);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 70.0);

        range.update(-4.0);
        assert_eq!(range.min, -4.0);
        assert_eq!(range.extent(), 74.0);
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::default().is_empty());
        assert!(Size::new(10.0, 0.0).is_empty());
        assert!(!Size::new(10.0, 1.0).is_empty());
    }
}
