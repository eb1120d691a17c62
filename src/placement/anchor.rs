use crate::geometry::{Anchor, Rect};

/// Reclassify which corner a box belongs to after a drag: the anchor whose
/// canvas quadrant overlaps the box the most wins, ties broken by
/// `Anchor::ALL` order (first max wins). Falls back to the caller's anchor
/// when no quadrant has positive overlap (degenerate box or canvas).
pub fn infer_dominant_anchor(
    overlay: &Rect,
    canvas_width: f32,
    canvas_height: f32,
    fallback: Anchor,
) -> Anchor {
    let mut best = fallback;
    let mut best_area = 0.0f32;
    for anchor in Anchor::ALL {
        let area = overlay.overlap_area(&anchor.quadrant(canvas_width, canvas_height));
        if area > best_area {
            best = anchor;
            best_area = area;
        }
    }
    best
}

/// Per-edge offsets implied by a box under a given anchor. Exact inverse of
/// the forward placement in `resolve`: re-resolving the derived offsets
/// reproduces the box.
pub fn derive_offsets_for_anchor(
    anchor: Anchor,
    overlay: &Rect,
    canvas_width: f32,
    canvas_height: f32,
) -> (f32, f32) {
    match anchor {
        Anchor::TopLeft => (overlay.x, overlay.y),
        Anchor::TopRight => (canvas_width - overlay.right(), overlay.y),
        Anchor::BottomLeft => (overlay.x, canvas_height - overlay.bottom()),
        Anchor::BottomRight => (
            canvas_width - overlay.right(),
            canvas_height - overlay.bottom(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_each_quadrant() {
        let cases = [
            (Rect::new(10.0, 10.0, 50.0, 20.0), Anchor::TopLeft),
            (Rect::new(340.0, 10.0, 50.0, 20.0), Anchor::TopRight),
            (Rect::new(10.0, 370.0, 50.0, 20.0), Anchor::BottomLeft),
            (Rect::new(340.0, 370.0, 50.0, 20.0), Anchor::BottomRight),
        ];
        for (overlay, expected) in cases {
            assert_eq!(
                infer_dominant_anchor(&overlay, 400.0, 400.0, Anchor::TopLeft),
                expected,
                "box at ({}, {})",
                overlay.x,
                overlay.y
            );
        }
    }

    #[test]
    fn test_infer_centered_box_ties_to_first_anchor() {
        // Dead center overlaps all four quadrants equally; iteration order
        // says TopLeft wins.
        let overlay = Rect::new(180.0, 180.0, 40.0, 40.0);
        assert_eq!(
            infer_dominant_anchor(&overlay, 400.0, 400.0, Anchor::BottomRight),
            Anchor::TopLeft
        );
    }

    #[test]
    fn test_infer_degenerate_box_uses_fallback() {
        let overlay = Rect::new(100.0, 100.0, 0.0, 0.0);
        assert_eq!(
            infer_dominant_anchor(&overlay, 400.0, 400.0, Anchor::BottomRight),
            Anchor::BottomRight
        );
    }

    #[test]
    fn test_infer_zero_canvas_uses_fallback() {
        let overlay = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            infer_dominant_anchor(&overlay, 0.0, 0.0, Anchor::BottomLeft),
            Anchor::BottomLeft
        );
    }

    #[test]
    fn test_derive_offsets_all_anchors() {
        let overlay = Rect::new(216.0, 276.0, 80.0, 20.0);
        assert_eq!(
            derive_offsets_for_anchor(Anchor::TopLeft, &overlay, 320.0, 320.0),
            (216.0, 276.0)
        );
        assert_eq!(
            derive_offsets_for_anchor(Anchor::TopRight, &overlay, 320.0, 320.0),
            (24.0, 276.0)
        );
        assert_eq!(
            derive_offsets_for_anchor(Anchor::BottomLeft, &overlay, 320.0, 320.0),
            (216.0, 24.0)
        );
        assert_eq!(
            derive_offsets_for_anchor(Anchor::BottomRight, &overlay, 320.0, 320.0),
            (24.0, 24.0)
        );
    }
}
