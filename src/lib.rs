use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

pub mod drag;
pub mod geometry;
pub mod measure;
pub mod placement;
pub mod preview;
pub mod render;
pub mod spec;

use measure::{FsAssetLoader, MeasureCache, Measurer};
use preview::PreviewSession;
use spec::{RenderTarget, WatermarkSpec};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub app: AppConfig,
    pub assets: AssetConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    pub font_directory: PathBuf,
    pub icon_directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Target canvases rendered side by side from one spec.
    pub targets: Vec<TargetConfig>,
    /// Index of the drag-enabled main editing canvas.
    #[serde(default)]
    pub main_target: usize,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TargetConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "Sukashi".to_string(),
                log_level: "info".to_string(),
            },
            assets: AssetConfig {
                font_directory: PathBuf::from("fonts"),
                icon_directory: PathBuf::from("icons"),
            },
            preview: PreviewConfig {
                targets: vec![
                    TargetConfig {
                        width: 320,
                        height: 320,
                    },
                    TargetConfig {
                        width: 640,
                        height: 640,
                    },
                    TargetConfig {
                        width: 1280,
                        height: 720,
                    },
                ],
                main_target: 0,
            },
        }
    }
}

impl Config {
    pub fn render_targets(&self) -> Vec<RenderTarget> {
        self.preview
            .targets
            .iter()
            .map(|t| RenderTarget::new(t.width, t.height))
            .collect()
    }
}

/// Wire up a preview session from configuration: filesystem asset loader,
/// one measurer, one injected measurement cache.
pub fn create_session(config: &Config, spec: WatermarkSpec) -> PreviewSession {
    let loader = Arc::new(FsAssetLoader::new(
        config.assets.font_directory.clone(),
        config.assets.icon_directory.clone(),
    ));
    let main_target = config
        .preview
        .main_target
        .min(config.preview.targets.len().saturating_sub(1));
    PreviewSession::new(
        spec,
        config.render_targets(),
        main_target,
        Arc::new(Measurer::new(loader)),
        Arc::new(MeasureCache::new()),
    )
}

/// Measurer over the configured asset directories, for the render path.
pub fn create_measurer(config: &Config) -> Measurer {
    Measurer::new(Arc::new(FsAssetLoader::new(
        config.assets.font_directory.clone(),
        config.assets.icon_directory.clone(),
    )))
}
