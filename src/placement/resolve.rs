use super::{coords, derive_offsets_for_anchor};
use crate::geometry::{Anchor, Rect, clamp_position};
use crate::measure::MeasuredContentBox;
use crate::spec::{RenderTarget, WatermarkSpec};
use serde::{Deserialize, Serialize};

/// Final overlay rectangle in target pixel space. Always inside the canvas
/// unless the content itself is larger, in which case the position pins at
/// 0 and the overflow is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ResolvedPlacement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Forward placement: scale the measured content box for the target, apply
/// the anchor-relative offsets, clamp to canvas bounds. Total: every input
/// produces a valid rectangle, degenerate geometry included.
///
/// `measured` is the base-scale footprint from the content measurer; glyph
/// metrics are linear in scale, so the per-target box is the base box times
/// `preview_scale`.
pub fn resolve(
    spec: &WatermarkSpec,
    target: &RenderTarget,
    measured: &MeasuredContentBox,
) -> ResolvedPlacement {
    let scale = coords::preview_scale(spec, target);
    let box_w = measured.width * scale;
    let box_h = measured.height * scale;

    let (dx, dy) = coords::pixel_offset(spec, target);
    let (w, h) = (target.width_f(), target.height_f());

    let (x, y) = match spec.anchor {
        Anchor::TopLeft => (dx, dy),
        Anchor::TopRight => (w - dx - box_w, dy),
        Anchor::BottomLeft => (dx, h - dy - box_h),
        Anchor::BottomRight => (w - dx - box_w, h - dy - box_h),
    };

    ResolvedPlacement {
        x: clamp_position(x, box_w, w),
        y: clamp_position(y, box_h, h),
        width: box_w,
        height: box_h,
    }
}

/// Re-derive the spec-level offsets that reproduce a placement under the
/// given anchor, in the spec's active position mode. Used by the drag
/// controller to fold a moved rectangle back into the declarative model.
pub fn offsets_in_mode(
    spec: &WatermarkSpec,
    target: &RenderTarget,
    anchor: Anchor,
    overlay: &Rect,
) -> (f32, f32) {
    let (dx, dy) = derive_offsets_for_anchor(anchor, overlay, target.width_f(), target.height_f());
    match spec.position_mode {
        crate::spec::PositionMode::Pixel => (dx, dy),
        crate::spec::PositionMode::Ratio => {
            let w = target.width_f();
            let h = target.height_f();
            if w <= 0.0 || h <= 0.0 {
                (0.0, 0.0)
            } else {
                (dx / w, dy / h)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::infer_dominant_anchor;
    use crate::spec::{AdaptiveScaleMode, PositionMode};

    fn base_spec() -> WatermarkSpec {
        WatermarkSpec {
            anchor: Anchor::BottomRight,
            position_mode: PositionMode::Pixel,
            offset_x: 24.0,
            offset_y: 24.0,
            base_canvas_width: 320.0,
            adaptive_scale_mode: AdaptiveScaleMode::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_a_bottom_right_pixel() {
        let spec = base_spec();
        let target = RenderTarget::new(320, 320);
        let measured = MeasuredContentBox {
            width: 80.0,
            height: 20.0,
        };
        let placed = resolve(&spec, &target, &measured);
        assert_eq!(
            placed,
            ResolvedPlacement {
                x: 216.0,
                y: 276.0,
                width: 80.0,
                height: 20.0
            }
        );
    }

    #[test]
    fn test_scenario_b_ratio_mode_scaled_target() {
        let spec = WatermarkSpec {
            position_mode: PositionMode::Ratio,
            offset_x: 0.075,
            offset_y: 0.075,
            adaptive_scale_mode: AdaptiveScaleMode::LongEdge,
            ..base_spec()
        };
        let target = RenderTarget::new(640, 640);
        // Base box 80x20 scales 2x under LongEdge against base 320
        let measured = MeasuredContentBox {
            width: 80.0,
            height: 20.0,
        };
        let placed = resolve(&spec, &target, &measured);
        assert_eq!(
            placed,
            ResolvedPlacement {
                x: 432.0,
                y: 552.0,
                width: 160.0,
                height: 40.0
            }
        );
    }

    #[test]
    fn test_clamp_never_negative() {
        let spec = WatermarkSpec {
            offset_x: 1000.0,
            offset_y: 1000.0,
            ..base_spec()
        };
        let target = RenderTarget::new(100, 100);
        let measured = MeasuredContentBox {
            width: 40.0,
            height: 10.0,
        };
        let placed = resolve(&spec, &target, &measured);
        assert_eq!((placed.x, placed.y), (0.0, 0.0));
    }

    #[test]
    fn test_content_larger_than_canvas_pins_at_zero() {
        let spec = base_spec();
        let target = RenderTarget::new(50, 50);
        let measured = MeasuredContentBox {
            width: 200.0,
            height: 80.0,
        };
        let placed = resolve(&spec, &target, &measured);
        assert_eq!((placed.x, placed.y), (0.0, 0.0));
        assert_eq!(placed.width, 200.0);
    }

    #[test]
    fn test_ratio_offsets_with_unscaled_content() {
        // AdaptiveScaleMode::None + Ratio: position tracks the target's raw
        // size while the content box does not scale. Preserved as-is.
        let spec = WatermarkSpec {
            anchor: Anchor::TopLeft,
            position_mode: PositionMode::Ratio,
            offset_x: 0.5,
            offset_y: 0.5,
            adaptive_scale_mode: AdaptiveScaleMode::None,
            ..base_spec()
        };
        let target = RenderTarget::new(1000, 800);
        let measured = MeasuredContentBox {
            width: 80.0,
            height: 20.0,
        };
        let placed = resolve(&spec, &target, &measured);
        assert_eq!((placed.x, placed.y), (500.0, 400.0));
        assert_eq!((placed.width, placed.height), (80.0, 20.0));
    }

    #[test]
    fn test_round_trip_fixed_point_every_anchor() {
        let target = RenderTarget::new(320, 320);
        let measured = MeasuredContentBox {
            width: 80.0,
            height: 20.0,
        };
        for anchor in Anchor::ALL {
            let spec = WatermarkSpec {
                anchor,
                ..base_spec()
            };
            let placed = resolve(&spec, &target, &measured);
            let rect = placed.rect();

            let inferred =
                infer_dominant_anchor(&rect, target.width_f(), target.height_f(), anchor);
            let (ox, oy) = offsets_in_mode(&spec, &target, inferred, &rect);
            let rederived = spec.with_anchor_and_offsets(inferred, ox, oy);
            let replaced = resolve(&rederived, &target, &measured);

            assert_eq!(
                placed, replaced,
                "placement must be a fixed point for {:?}",
                anchor
            );
        }
    }
}
