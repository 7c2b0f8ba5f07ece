use depthtrack_sensor::DeviceError;
use render::RenderError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("unable to write {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
