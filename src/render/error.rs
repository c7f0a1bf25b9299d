use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("nothing to draw: {0}")]
    EmptyTrack(String),
}
