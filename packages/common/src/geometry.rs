//! 2-D geometry primitives shared by the tree model and the engine.
//!
//! All coordinates are viewport pixels, f64 to match what renderers report
//! for bounding boxes.

use serde::{Deserialize, Serialize};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Hit-test containment. Edges count as inside, matching how browsers
    /// resolve `elementFromPoint` on exact boundaries.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Translate by an offset, returning a new rect.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// One of the eight resize handle directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeDirection {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeDirection {
    /// Handle pulls the top edge (shrinking couples with a translate shift).
    pub fn has_north(&self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    pub fn has_south(&self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    pub fn has_east(&self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Handle pulls the left edge.
    pub fn has_west(&self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(110.0, 70.0)));
        assert!(r.contains(Point::new(50.0, 40.0)));
        assert!(!r.contains(Point::new(9.9, 40.0)));
        assert!(!r.contains(Point::new(50.0, 70.1)));
    }

    #[test]
    fn test_direction_axes() {
        assert!(ResizeDirection::Nw.has_north());
        assert!(ResizeDirection::Nw.has_west());
        assert!(!ResizeDirection::Nw.has_south());
        assert!(!ResizeDirection::Nw.has_east());
        assert!(ResizeDirection::Se.has_south());
        assert!(ResizeDirection::Se.has_east());
    }

    #[test]
    fn test_direction_serde_names() {
        let json = serde_json::to_string(&ResizeDirection::Nw).unwrap();
        assert_eq!(json, r#""nw""#);
        let dir: ResizeDirection = serde_json::from_str(r#""se""#).unwrap();
        assert_eq!(dir, ResizeDirection::Se);
    }
}
