use super::MeasureError;
use ab_glyph::FontVec;
use async_trait::async_trait;
use image::RgbaImage;
use std::path::PathBuf;
use tracing::debug;

/// Seam to the font/asset-loading collaborator. Production reads from the
/// configured asset directories; tests inject stubs that complete
/// instantly, late, or not at all.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load_font(&self, font_key: &str) -> Result<FontVec, MeasureError>;
    async fn load_icon(&self, icon_ref: &str) -> Result<RgbaImage, MeasureError>;
}

/// Filesystem-backed loader: fonts are `<font_directory>/<key>` (with a
/// `.ttf` fallback extension), icons are image files under
/// `<icon_directory>`.
pub struct FsAssetLoader {
    font_directory: PathBuf,
    icon_directory: PathBuf,
}

impl FsAssetLoader {
    pub fn new(font_directory: PathBuf, icon_directory: PathBuf) -> Self {
        Self {
            font_directory,
            icon_directory,
        }
    }

    fn font_path(&self, font_key: &str) -> PathBuf {
        let direct = self.font_directory.join(font_key);
        if direct.exists() {
            direct
        } else {
            self.font_directory.join(format!("{}.ttf", font_key))
        }
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load_font(&self, font_key: &str) -> Result<FontVec, MeasureError> {
        let path = self.font_path(font_key);
        if !path.exists() {
            return Err(MeasureError::FontNotFound(font_key.to_string()));
        }
        debug!("Loading font '{}' from {:?}", font_key, path);
        let bytes = tokio::fs::read(&path).await?;
        FontVec::try_from_vec(bytes).map_err(|_| MeasureError::InvalidFont(font_key.to_string()))
    }

    async fn load_icon(&self, icon_ref: &str) -> Result<RgbaImage, MeasureError> {
        let path = self.icon_directory.join(icon_ref);
        debug!("Loading icon '{}' from {:?}", icon_ref, path);
        let bytes = tokio::fs::read(&path).await?;
        let img = image::load_from_memory(&bytes)?;
        Ok(img.to_rgba8())
    }
}
