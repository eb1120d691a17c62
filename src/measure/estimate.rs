use super::MeasuredContentBox;
use crate::spec::{IconPosition, WatermarkSpec};

// Rough glyph advance and line height as fractions of the font size.
// Estimates only ever feed provisional clamp bounds while the authoritative
// measurement is still loading; they are never used for visible placement.
const GLYPH_ADVANCE_RATIO: f32 = 0.6;
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Character-count heuristic for the content footprint at base scale.
pub fn estimate(spec: &WatermarkSpec) -> MeasuredContentBox {
    let glyph_count = spec.text.chars().count() as f32;
    let text_w = glyph_count * spec.font_size_px * GLYPH_ADVANCE_RATIO;
    let text_h = if spec.text.is_empty() {
        0.0
    } else {
        spec.font_size_px * LINE_HEIGHT_RATIO
    };

    // Icons are assumed square at the font size until decoded.
    let icon_edge = if spec.icon_enabled {
        spec.font_size_px * spec.icon_scale
    } else {
        0.0
    };

    let (mut width, mut height) = if icon_edge > 0.0 {
        match spec.icon_position {
            IconPosition::Left | IconPosition::Right => {
                (text_w + spec.icon_gap_px + icon_edge, text_h.max(icon_edge))
            }
            IconPosition::Top | IconPosition::Bottom => {
                (text_w.max(icon_edge), text_h + spec.icon_gap_px + icon_edge)
            }
        }
    } else {
        (text_w, text_h)
    };

    let inset = super::decoration_inset(spec);
    width += inset * 2.0;
    height += inset * 2.0;

    MeasuredContentBox { width, height }
}
