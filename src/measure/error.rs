use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Failed to parse font '{0}'")]
    InvalidFont(String),

    #[error("Font '{0}' not found")]
    FontNotFound(String),
}
