use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in target pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Overlap area between two rectangles. Zero when disjoint or when
    /// either rectangle is degenerate.
    pub fn overlap_area(&self, other: &Rect) -> f32 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            0.0
        } else {
            (right - left) * (bottom - top)
        }
    }
}

/// Clamp a top-left position so a box of the given size stays inside the
/// canvas. When the box is larger than the canvas the position pins at 0
/// and the overflow is accepted; the result is never negative.
pub fn clamp_position(pos: f32, box_extent: f32, canvas_extent: f32) -> f32 {
    let max = (canvas_extent - box_extent).max(0.0);
    pos.clamp(0.0, max)
}

/// One of the four canvas corners that offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Iteration order used for dominant-anchor tie breaking: first max wins.
    pub const ALL: [Anchor; 4] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
    ];

    /// The quadrant of a canvas that this anchor claims. The four quadrants
    /// are equal and tile the canvas exactly.
    pub fn quadrant(&self, canvas_width: f32, canvas_height: f32) -> Rect {
        let half_w = canvas_width / 2.0;
        let half_h = canvas_height / 2.0;
        match self {
            Anchor::TopLeft => Rect::new(0.0, 0.0, half_w, half_h),
            Anchor::TopRight => Rect::new(half_w, 0.0, half_w, half_h),
            Anchor::BottomLeft => Rect::new(0.0, half_h, half_w, half_h),
            Anchor::BottomRight => Rect::new(half_w, half_h, half_w, half_h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_area_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 0.0);
    }

    #[test]
    fn test_overlap_area_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.overlap_area(&b), 25.0);
    }

    #[test]
    fn test_overlap_area_contained() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(outer.overlap_area(&inner), 400.0);
        assert_eq!(inner.overlap_area(&outer), 400.0);
    }

    #[test]
    fn test_overlap_area_degenerate_box() {
        let zero = Rect::new(5.0, 5.0, 0.0, 0.0);
        let canvas = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(zero.overlap_area(&canvas), 0.0);
    }

    #[test]
    fn test_quadrants_tile_canvas() {
        let total: f32 = Anchor::ALL
            .iter()
            .map(|a| a.quadrant(400.0, 300.0).area())
            .sum();
        assert_eq!(total, 400.0 * 300.0);
    }

    #[test]
    fn test_clamp_position_inside() {
        assert_eq!(clamp_position(50.0, 20.0, 100.0), 50.0);
    }

    #[test]
    fn test_clamp_position_past_edge() {
        assert_eq!(clamp_position(95.0, 20.0, 100.0), 80.0);
        assert_eq!(clamp_position(-5.0, 20.0, 100.0), 0.0);
    }

    #[test]
    fn test_clamp_position_content_larger_than_canvas() {
        // Box wider than the canvas pins at 0, never negative
        assert_eq!(clamp_position(10.0, 200.0, 100.0), 0.0);
    }
}
