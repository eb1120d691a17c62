// Render module - composites the watermark onto a final image through the
// exact same resolve() path the previews use, which is what makes preview
// geometry and rendered geometry agree.
use crate::measure::{MeasureError, Measurer, decoration_inset};
use crate::placement::{ResolvedPlacement, preview_scale, resolve};
use crate::spec::{Color, IconPosition, RenderTarget, WatermarkSpec};
use ab_glyph::PxScale;
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect as PixelRect;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Measurement failed: {0}")]
    Measure(#[from] MeasureError),

    #[error("Font '{0}' not loaded")]
    FontUnavailable(String),
}

fn rgba(color: Color) -> Rgba<u8> {
    Rgba([color.r, color.g, color.b, color.a])
}

/// Apply the watermark, returning the original image unchanged (with a
/// logged error) when an asset cannot be loaded. Never fatal.
pub async fn apply_watermark(
    image: DynamicImage,
    spec: &WatermarkSpec,
    measurer: &Measurer,
) -> DynamicImage {
    match render_watermark(&image, spec, measurer).await {
        Ok(watermarked) => watermarked,
        Err(e) => {
            error!("Failed to render watermark: {}", e);
            image
        }
    }
}

/// Resolve the overlay rectangle for the image's own size and composite
/// text, icon, and decoration into it.
pub async fn render_watermark(
    image: &DynamicImage,
    spec: &WatermarkSpec,
    measurer: &Measurer,
) -> Result<DynamicImage, RenderError> {
    let mut base = image.to_rgba8();
    let target = RenderTarget::new(base.width(), base.height());

    let measured = measurer.measure_blocking(spec).await?;
    let placement = resolve(spec, &target, &measured);
    if placement.width < 1.0 || placement.height < 1.0 {
        return Ok(DynamicImage::ImageRgba8(base));
    }

    let overlay = paint_overlay(spec, &target, &placement, measurer).await?;
    image::imageops::overlay(
        &mut base,
        &overlay,
        placement.x.round() as i64,
        placement.y.round() as i64,
    );
    Ok(DynamicImage::ImageRgba8(base))
}

/// Paint the overlay box into its own buffer at placement size, then fade
/// it by the spec opacity. Compositing a pre-faded buffer keeps opacity a
/// single multiply instead of threading it through every draw call.
async fn paint_overlay(
    spec: &WatermarkSpec,
    target: &RenderTarget,
    placement: &ResolvedPlacement,
    measurer: &Measurer,
) -> Result<RgbaImage, RenderError> {
    let scale = preview_scale(spec, target);
    let box_w = placement.width.round().max(1.0) as u32;
    let box_h = placement.height.round().max(1.0) as u32;
    let mut overlay = RgbaImage::from_pixel(box_w, box_h, Rgba([0, 0, 0, 0]));

    if spec.background_enabled {
        let radius = if spec.rounded_background_enabled {
            (spec.corner_radius_px * scale).round() as i32
        } else {
            0
        };
        fill_rounded_rect_mut(&mut overlay, radius, rgba(spec.background_color));
    }

    if spec.border_enabled && spec.border_width_px > 0.0 {
        let thickness = (spec.border_width_px * scale).round().max(1.0) as u32;
        draw_border_mut(&mut overlay, thickness, rgba(spec.border_color));
    }

    let font = measurer
        .font(&spec.font_key)
        .await
        .ok_or_else(|| RenderError::FontUnavailable(spec.font_key.clone()))?;

    let inset = (decoration_inset(spec) * scale).round() as i32;
    let content_w = box_w as i32 - inset * 2;
    let content_h = box_h as i32 - inset * 2;

    let font_scale = PxScale::from(spec.font_size_px * scale);
    let (text_w, text_h) = if spec.text.is_empty() {
        (0, 0)
    } else {
        let (w, h) = text_size(font_scale, font.as_ref(), &spec.text);
        (w as i32, h as i32)
    };

    let icon = match (spec.icon_enabled, &spec.icon_ref) {
        (true, Some(icon_ref)) => measurer.icon(icon_ref).await,
        _ => None,
    };
    let scaled_icon = icon.map(|icon| {
        let icon_w = ((icon.width() as f32 * spec.icon_scale * scale).round() as u32).max(1);
        let icon_h = ((icon.height() as f32 * spec.icon_scale * scale).round() as u32).max(1);
        image::imageops::resize(
            icon.as_ref(),
            icon_w,
            icon_h,
            image::imageops::FilterType::Lanczos3,
        )
    });

    let gap = (spec.icon_gap_px * scale).round() as i32;
    let (text_pos, icon_pos) = layout_content(
        spec.icon_position,
        (content_w, content_h),
        (text_w, text_h),
        scaled_icon
            .as_ref()
            .map(|i| (i.width() as i32, i.height() as i32)),
        gap,
    );

    if let (Some(icon), Some((ix, iy))) = (&scaled_icon, icon_pos) {
        image::imageops::overlay(
            &mut overlay,
            icon,
            (inset + ix) as i64,
            (inset + iy) as i64,
        );
    }

    if !spec.text.is_empty() {
        draw_text_mut(
            &mut overlay,
            rgba(spec.text_color),
            inset + text_pos.0,
            inset + text_pos.1,
            font_scale,
            font.as_ref(),
            &spec.text,
        );
    }

    if spec.opacity < 1.0 {
        let opacity = spec.opacity.clamp(0.0, 1.0);
        for pixel in overlay.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
        }
    }

    Ok(overlay)
}

/// Positions of text and icon inside the content area, each centered on
/// the cross axis.
fn layout_content(
    position: IconPosition,
    (content_w, content_h): (i32, i32),
    (text_w, text_h): (i32, i32),
    icon: Option<(i32, i32)>,
    gap: i32,
) -> ((i32, i32), Option<(i32, i32)>) {
    let center_y = |h: i32| ((content_h - h) / 2).max(0);
    let center_x = |w: i32| ((content_w - w) / 2).max(0);

    let Some((icon_w, icon_h)) = icon else {
        return ((center_x(text_w), center_y(text_h)), None);
    };

    match position {
        IconPosition::Left => (
            (icon_w + gap, center_y(text_h)),
            Some((0, center_y(icon_h))),
        ),
        IconPosition::Right => (
            (0, center_y(text_h)),
            Some((text_w + gap, center_y(icon_h))),
        ),
        IconPosition::Top => (
            (center_x(text_w), icon_h + gap),
            Some((center_x(icon_w), 0)),
        ),
        IconPosition::Bottom => (
            (center_x(text_w), 0),
            Some((center_x(icon_w), text_h + gap)),
        ),
    }
}

/// Fill the whole buffer with a color, optionally rounding the corners by
/// clearing nothing and drawing a cross of rectangles plus corner discs.
fn fill_rounded_rect_mut(img: &mut RgbaImage, radius: i32, color: Rgba<u8>) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let radius = radius.clamp(0, w.min(h) / 2);
    if radius == 0 {
        draw_filled_rect_mut(
            img,
            PixelRect::at(0, 0).of_size(w as u32, h as u32),
            color,
        );
        return;
    }

    if w - 2 * radius > 0 {
        draw_filled_rect_mut(
            img,
            PixelRect::at(radius, 0).of_size((w - 2 * radius) as u32, h as u32),
            color,
        );
    }
    if h - 2 * radius > 0 {
        draw_filled_rect_mut(
            img,
            PixelRect::at(0, radius).of_size(w as u32, (h - 2 * radius) as u32),
            color,
        );
    }
    for (cx, cy) in [
        (radius, radius),
        (w - radius - 1, radius),
        (radius, h - radius - 1),
        (w - radius - 1, h - radius - 1),
    ] {
        draw_filled_circle_mut(img, (cx, cy), radius, color);
    }
}

/// Hollow border of the given thickness along the buffer edge.
fn draw_border_mut(img: &mut RgbaImage, thickness: u32, color: Rgba<u8>) {
    let (w, h) = (img.width(), img.height());
    let t = thickness.min(w / 2).min(h / 2).max(1);
    draw_filled_rect_mut(img, PixelRect::at(0, 0).of_size(w, t), color);
    draw_filled_rect_mut(
        img,
        PixelRect::at(0, (h - t) as i32).of_size(w, t),
        color,
    );
    draw_filled_rect_mut(img, PixelRect::at(0, 0).of_size(t, h), color);
    draw_filled_rect_mut(
        img,
        PixelRect::at((w - t) as i32, 0).of_size(t, h),
        color,
    );
}
