// Content measurement module - computes the rendered footprint of the
// overlay's text + icon + decoration, tolerant of fonts and icons that
// finish loading arbitrarily late.
mod cache;
mod error;
mod estimate;
mod loader;

pub use cache::MeasureCache;
pub use error::MeasureError;
pub use estimate::estimate;
pub use loader::{AssetLoader, FsAssetLoader};

use ab_glyph::{FontVec, PxScale};
use image::RgbaImage;
use imageproc::drawing::text_size;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error};

use crate::spec::{IconPosition, WatermarkSpec};

/// Text inset on each side when a background is drawn, at base scale.
const BACKGROUND_INSET_PX: f32 = 8.0;

/// Content footprint at base scale (`base_canvas_width` reference). The
/// per-target box is this times `preview_scale`; glyph metrics are linear
/// in scale so nothing is lost by measuring once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredContentBox {
    pub width: f32,
    pub height: f32,
}

/// Outcome of a measurement attempt. `Pending` means an asset is still
/// loading: callers hide the overlay rather than showing a guessed size
/// that snaps once the real metrics land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureOutcome {
    Ready(MeasuredContentBox),
    Pending,
}

impl MeasureOutcome {
    pub fn ready(self) -> Option<MeasuredContentBox> {
        match self {
            MeasureOutcome::Ready(measured) => Some(measured),
            MeasureOutcome::Pending => None,
        }
    }
}

/// Decoration padding added on each side of the content.
pub(crate) fn decoration_inset(spec: &WatermarkSpec) -> f32 {
    let border = if spec.border_enabled {
        spec.border_width_px
    } else {
        0.0
    };
    let background = if spec.background_enabled {
        BACKGROUND_INSET_PX
    } else {
        0.0
    };
    border + background
}

/// Combine measured text and icon boxes per the spec's icon position, then
/// pad for decoration. Pure; the asset-dependent part is only obtaining
/// `text_w`/`text_h` and `icon_dims`.
pub(crate) fn combine_footprint(
    spec: &WatermarkSpec,
    text_w: f32,
    text_h: f32,
    icon_dims: Option<(u32, u32)>,
) -> MeasuredContentBox {
    let (mut width, mut height) = match icon_dims {
        Some((iw, ih)) => {
            let icon_w = iw as f32 * spec.icon_scale;
            let icon_h = ih as f32 * spec.icon_scale;
            match spec.icon_position {
                IconPosition::Left | IconPosition::Right => (
                    text_w + spec.icon_gap_px + icon_w,
                    text_h.max(icon_h),
                ),
                IconPosition::Top | IconPosition::Bottom => (
                    text_w.max(icon_w),
                    text_h + spec.icon_gap_px + icon_h,
                ),
            }
        }
        None => (text_w, text_h),
    };

    let inset = decoration_inset(spec);
    width += inset * 2.0;
    height += inset * 2.0;

    MeasuredContentBox { width, height }
}

fn text_footprint(font: &FontVec, spec: &WatermarkSpec) -> (f32, f32) {
    if spec.text.is_empty() {
        return (0.0, 0.0);
    }
    let scale = PxScale::from(spec.font_size_px);
    let (w, h) = text_size(scale, font, &spec.text);
    (w as f32, h as f32)
}

/// Measures overlay content against loaded assets, kicking off one-shot
/// load tasks for anything not yet available. Load completions that arrive
/// after the owning session is gone simply land in the shared maps and are
/// never read.
pub struct Measurer {
    loader: Arc<dyn AssetLoader>,
    fonts: Arc<RwLock<HashMap<String, Arc<FontVec>>>>,
    icons: Arc<RwLock<HashMap<String, Arc<RgbaImage>>>>,
    in_flight: Arc<RwLock<HashSet<String>>>,
}

impl Measurer {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            fonts: Arc::new(RwLock::new(HashMap::new())),
            icons: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Non-blocking measurement: returns `Pending` (and requests the
    /// missing assets) until both font and icon are loaded, then the
    /// base-scale footprint.
    pub async fn measure(&self, spec: &WatermarkSpec) -> MeasureOutcome {
        let font = self.fonts.read().await.get(&spec.font_key).cloned();
        let font = match font {
            Some(font) => font,
            None => {
                self.request_font(&spec.font_key).await;
                return MeasureOutcome::Pending;
            }
        };

        let icon_dims = match self.wanted_icon(spec) {
            Some(icon_ref) => {
                let icon = self.icons.read().await.get(icon_ref).cloned();
                match icon {
                    Some(icon) => Some(icon.dimensions()),
                    None => {
                        self.request_icon(icon_ref).await;
                        return MeasureOutcome::Pending;
                    }
                }
            }
            None => None,
        };

        let (text_w, text_h) = text_footprint(&font, spec);
        MeasureOutcome::Ready(combine_footprint(spec, text_w, text_h, icon_dims))
    }

    /// Blocking variant for the renderer path: awaits the loads inline
    /// instead of spawning.
    pub async fn measure_blocking(
        &self,
        spec: &WatermarkSpec,
    ) -> Result<MeasuredContentBox, MeasureError> {
        self.ensure_font(&spec.font_key).await?;
        if let Some(icon_ref) = self.wanted_icon(spec) {
            let icon_ref = icon_ref.to_string();
            self.ensure_icon(&icon_ref).await?;
        }
        match self.measure(spec).await {
            MeasureOutcome::Ready(measured) => Ok(measured),
            // Both ensures returned, so the assets are in the maps; a
            // pending outcome here would mean they were evicted mid-call.
            MeasureOutcome::Pending => Err(MeasureError::FontNotFound(spec.font_key.clone())),
        }
    }

    pub async fn font(&self, font_key: &str) -> Option<Arc<FontVec>> {
        self.fonts.read().await.get(font_key).cloned()
    }

    pub async fn icon(&self, icon_ref: &str) -> Option<Arc<RgbaImage>> {
        self.icons.read().await.get(icon_ref).cloned()
    }

    /// An icon enabled without a reference is degenerate geometry, not an
    /// error: measured as text-only.
    fn wanted_icon<'a>(&self, spec: &'a WatermarkSpec) -> Option<&'a str> {
        if spec.icon_enabled {
            spec.icon_ref.as_deref()
        } else {
            None
        }
    }

    async fn ensure_font(&self, font_key: &str) -> Result<(), MeasureError> {
        if self.fonts.read().await.contains_key(font_key) {
            return Ok(());
        }
        let font = self.loader.load_font(font_key).await?;
        self.fonts
            .write()
            .await
            .insert(font_key.to_string(), Arc::new(font));
        Ok(())
    }

    async fn ensure_icon(&self, icon_ref: &str) -> Result<(), MeasureError> {
        if self.icons.read().await.contains_key(icon_ref) {
            return Ok(());
        }
        let icon = self.loader.load_icon(icon_ref).await?;
        self.icons
            .write()
            .await
            .insert(icon_ref.to_string(), Arc::new(icon));
        Ok(())
    }

    async fn request_font(&self, font_key: &str) {
        let tag = format!("font:{}", font_key);
        if !self.in_flight.write().await.insert(tag.clone()) {
            return;
        }
        let loader = self.loader.clone();
        let fonts = self.fonts.clone();
        let in_flight = self.in_flight.clone();
        let font_key = font_key.to_string();
        tokio::spawn(async move {
            match loader.load_font(&font_key).await {
                Ok(font) => {
                    debug!("Font '{}' ready", font_key);
                    fonts.write().await.insert(font_key, Arc::new(font));
                }
                Err(e) => {
                    error!("Failed to load font '{}': {}", font_key, e);
                }
            }
            in_flight.write().await.remove(&tag);
        });
    }

    async fn request_icon(&self, icon_ref: &str) {
        let tag = format!("icon:{}", icon_ref);
        if !self.in_flight.write().await.insert(tag.clone()) {
            return;
        }
        let loader = self.loader.clone();
        let icons = self.icons.clone();
        let in_flight = self.in_flight.clone();
        let icon_ref = icon_ref.to_string();
        tokio::spawn(async move {
            match loader.load_icon(&icon_ref).await {
                Ok(icon) => {
                    debug!("Icon '{}' decoded", icon_ref);
                    icons.write().await.insert(icon_ref, Arc::new(icon));
                }
                Err(e) => {
                    error!("Failed to load icon '{}': {}", icon_ref, e);
                }
            }
            in_flight.write().await.remove(&tag);
        });
    }
}
