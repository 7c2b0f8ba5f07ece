use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};

use crate::SampleError;

/// Where rendered windows end up
pub trait FrameSink {
    fn present(&mut self, window: &str, index: u64, image: &DynamicImage) -> Result<(), SampleError>;
}

/// Writes every window as `<window>_<frame>.png`
pub struct PngSink {
    dir: PathBuf,
}

impl PngSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, SampleError> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }
}

impl FrameSink for PngSink {
    fn present(&mut self, window: &str, index: u64, image: &DynamicImage) -> Result<(), SampleError> {
        let path = self.dir.join(format!("{}_{index:06}.png", window.to_lowercase()));
        tracing::trace!(path = %path.display(), "writing frame");
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| SampleError::Sink { path, source })
    }
}
