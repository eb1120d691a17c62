use crate::spec::{AdaptiveScaleMode, PositionMode, RenderTarget, WatermarkSpec};

/// Scale factor applied to font, icon, gap, and decoration metrics for a
/// given target. `AdaptiveScaleMode::None` is always exactly 1.0 no matter
/// how large the target is: content keeps its nominal pixel size.
pub fn preview_scale(spec: &WatermarkSpec, target: &RenderTarget) -> f32 {
    let basis = match spec.adaptive_scale_mode {
        AdaptiveScaleMode::None => return 1.0,
        AdaptiveScaleMode::LongEdge => target.width_f().max(target.height_f()),
        AdaptiveScaleMode::ShortEdge => target.width_f().min(target.height_f()),
        AdaptiveScaleMode::Width => target.width_f(),
        AdaptiveScaleMode::Height => target.height_f(),
    };
    if spec.base_canvas_width <= 0.0 {
        1.0
    } else {
        basis / spec.base_canvas_width
    }
}

/// Offsets in target pixels. Pixel mode passes the stored values through
/// unchanged (they are literal distances from the anchor edges, never
/// rescaled by target size); ratio mode multiplies by the live canvas
/// dimensions.
pub fn pixel_offset(spec: &WatermarkSpec, target: &RenderTarget) -> (f32, f32) {
    match spec.position_mode {
        PositionMode::Pixel => (spec.offset_x, spec.offset_y),
        PositionMode::Ratio => (
            spec.offset_x * target.width_f(),
            spec.offset_y * target.height_f(),
        ),
    }
}

/// Explicit pixel → ratio mode toggle against the reference size. A no-op
/// when the spec is already in ratio mode.
pub fn to_ratio_offsets(spec: &WatermarkSpec) -> WatermarkSpec {
    if spec.position_mode == PositionMode::Ratio || spec.base_canvas_width <= 0.0 {
        return spec.clone();
    }
    WatermarkSpec {
        position_mode: PositionMode::Ratio,
        offset_x: spec.offset_x / spec.base_canvas_width,
        offset_y: spec.offset_y / spec.base_canvas_width,
        ..spec.clone()
    }
}

/// Explicit ratio → pixel mode toggle against the reference size.
pub fn to_pixel_offsets(spec: &WatermarkSpec) -> WatermarkSpec {
    if spec.position_mode == PositionMode::Pixel {
        return spec.clone();
    }
    WatermarkSpec {
        position_mode: PositionMode::Pixel,
        offset_x: spec.offset_x * spec.base_canvas_width,
        offset_y: spec.offset_y * spec.base_canvas_width,
        ..spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with(mode: AdaptiveScaleMode) -> WatermarkSpec {
        WatermarkSpec {
            adaptive_scale_mode: mode,
            base_canvas_width: 320.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_preview_scale_none_is_always_one() {
        let spec = spec_with(AdaptiveScaleMode::None);
        for target in [
            RenderTarget::new(320, 320),
            RenderTarget::new(1920, 1080),
            RenderTarget::new(64, 64),
        ] {
            assert_eq!(preview_scale(&spec, &target), 1.0);
        }
    }

    #[test]
    fn test_preview_scale_long_edge() {
        let spec = spec_with(AdaptiveScaleMode::LongEdge);
        let target = RenderTarget::new(640, 480);
        assert_eq!(preview_scale(&spec, &target), 640.0 / 320.0);
    }

    #[test]
    fn test_preview_scale_short_edge_and_axes() {
        let target = RenderTarget::new(640, 480);
        assert_eq!(
            preview_scale(&spec_with(AdaptiveScaleMode::ShortEdge), &target),
            1.5
        );
        assert_eq!(
            preview_scale(&spec_with(AdaptiveScaleMode::Width), &target),
            2.0
        );
        assert_eq!(
            preview_scale(&spec_with(AdaptiveScaleMode::Height), &target),
            1.5
        );
    }

    #[test]
    fn test_pixel_offset_pixel_mode_is_literal() {
        let spec = WatermarkSpec {
            position_mode: PositionMode::Pixel,
            offset_x: 24.0,
            offset_y: 12.0,
            ..Default::default()
        };
        // Target size must not rescale pixel offsets
        assert_eq!(
            pixel_offset(&spec, &RenderTarget::new(1280, 720)),
            (24.0, 12.0)
        );
    }

    #[test]
    fn test_pixel_offset_ratio_mode_scales_with_target() {
        let spec = WatermarkSpec {
            position_mode: PositionMode::Ratio,
            offset_x: 0.075,
            offset_y: 0.1,
            ..Default::default()
        };
        assert_eq!(
            pixel_offset(&spec, &RenderTarget::new(640, 640)),
            (48.0, 64.0)
        );
    }

    #[test]
    fn test_mode_toggle_round_trip() {
        let spec = WatermarkSpec {
            position_mode: PositionMode::Pixel,
            offset_x: 24.0,
            offset_y: 24.0,
            base_canvas_width: 320.0,
            ..Default::default()
        };
        let ratio = to_ratio_offsets(&spec);
        assert_eq!(ratio.position_mode, PositionMode::Ratio);
        assert!((ratio.offset_x - 0.075).abs() < 1e-6);

        let back = to_pixel_offsets(&ratio);
        assert_eq!(back.position_mode, PositionMode::Pixel);
        assert!((back.offset_x - spec.offset_x).abs() < 1e-4);
        assert!((back.offset_y - spec.offset_y).abs() < 1e-4);
    }

    #[test]
    fn test_mode_toggle_is_idempotent() {
        let spec = WatermarkSpec {
            position_mode: PositionMode::Ratio,
            offset_x: 0.25,
            offset_y: 0.5,
            ..Default::default()
        };
        let same = to_ratio_offsets(&spec);
        assert_eq!(same.offset_x, spec.offset_x);
        assert_eq!(same.offset_y, spec.offset_y);
    }
}
