use crate::geometry::Anchor;
use serde::{Deserialize, Serialize};

/// Whether offsets are absolute pixels (at the reference size) or a ratio
/// of the live canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    Pixel,
    Ratio,
}

/// Policy selecting which canvas dimension drives the content's size scale
/// factor for a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveScaleMode {
    None,
    LongEdge,
    ShortEdge,
    Width,
    Height,
}

/// Where the icon sits relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconPosition {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    pub const BLACK: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// One destination canvas (preview or final).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f(&self) -> f32 {
        self.height as f32
    }
}

/// Declarative watermark specification. An immutable value: the editing
/// surface produces a new spec for every field change, the engine only
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSpec {
    pub text: String,
    pub font_key: String,
    pub font_size_px: f32,
    pub opacity: f32,
    pub position_mode: PositionMode,
    pub anchor: Anchor,
    /// Interpreted per `position_mode`: literal pixels at the
    /// `base_canvas_width` reference, or a ratio of the canvas dimension.
    pub offset_x: f32,
    pub offset_y: f32,
    #[serde(default)]
    pub icon_enabled: bool,
    /// Opaque handle resolved by the asset-loading collaborator.
    #[serde(default)]
    pub icon_ref: Option<String>,
    #[serde(default = "default_icon_position")]
    pub icon_position: IconPosition,
    #[serde(default)]
    pub icon_gap_px: f32,
    #[serde(default = "default_icon_scale")]
    pub icon_scale: f32,
    #[serde(default)]
    pub border_enabled: bool,
    #[serde(default)]
    pub background_enabled: bool,
    #[serde(default)]
    pub rounded_background_enabled: bool,
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    #[serde(default = "default_text_color")]
    pub border_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default)]
    pub border_width_px: f32,
    #[serde(default)]
    pub corner_radius_px: f32,
    /// Reference square size all pixel-mode numbers and font sizes are
    /// expressed against.
    pub base_canvas_width: f32,
    pub adaptive_scale_mode: AdaptiveScaleMode,
}

fn default_icon_position() -> IconPosition {
    IconPosition::Left
}

fn default_icon_scale() -> f32 {
    1.0
}

fn default_text_color() -> Color {
    Color::WHITE
}

fn default_background_color() -> Color {
    Color::BLACK
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_key: "default".to_string(),
            font_size_px: 20.0,
            opacity: 1.0,
            position_mode: PositionMode::Pixel,
            anchor: Anchor::BottomRight,
            offset_x: 24.0,
            offset_y: 24.0,
            icon_enabled: false,
            icon_ref: None,
            icon_position: IconPosition::Left,
            icon_gap_px: 8.0,
            icon_scale: 1.0,
            border_enabled: false,
            background_enabled: false,
            rounded_background_enabled: false,
            text_color: Color::WHITE,
            border_color: Color::WHITE,
            background_color: Color::BLACK,
            border_width_px: 0.0,
            corner_radius_px: 0.0,
            base_canvas_width: 320.0,
            adaptive_scale_mode: AdaptiveScaleMode::None,
        }
    }
}

impl WatermarkSpec {
    /// Signature over every input that affects the measured footprint.
    /// Used as the measurement cache key; position and color inputs are
    /// deliberately excluded because they never change glyph or icon
    /// layout.
    pub fn content_signature(&self) -> String {
        use sha2::{Digest, Sha256};

        // Variable-length fields carry a length prefix so adjacent fields
        // can never alias ("ab"+"cd" vs "abc"+"d").
        fn update_str(hasher: &mut Sha256, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Sha256::new();
        update_str(&mut hasher, &self.text);
        update_str(&mut hasher, &self.font_key);
        hasher.update(self.font_size_px.to_le_bytes());
        hasher.update([self.icon_enabled as u8]);
        match &self.icon_ref {
            Some(icon_ref) => {
                hasher.update([1u8]);
                update_str(&mut hasher, icon_ref);
            }
            None => hasher.update([0u8]),
        }
        hasher.update([self.icon_position as u8]);
        hasher.update(self.icon_gap_px.to_le_bytes());
        hasher.update(self.icon_scale.to_le_bytes());
        hasher.update([
            self.border_enabled as u8,
            self.background_enabled as u8,
        ]);
        hasher.update(self.border_width_px.to_le_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn with_anchor_and_offsets(&self, anchor: Anchor, offset_x: f32, offset_y: f32) -> Self {
        Self {
            anchor,
            offset_x,
            offset_y,
            ..self.clone()
        }
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}
