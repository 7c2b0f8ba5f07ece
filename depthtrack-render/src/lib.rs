//! Turns vendor frame buffers into displayable images and draws tracking
//! results over them.

mod convert;
mod overlay;

pub use convert::{color_image, depth_image, user_image};
pub use overlay::{load_font, Overlay};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{kind} buffer holds {actual} values, expected {expected}")]
    BufferSize {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("user labels are {labels} but the depth frame is {depth}")]
    ResolutionMismatch {
        labels: depthtrack_common::Resolution,
        depth: depthtrack_common::Resolution,
    },

    #[error("maximum depth must be greater than zero")]
    InvalidMaxDepth,

    #[error("unable to read font: {0}")]
    FontIo(#[from] std::io::Error),

    #[error("invalid font data")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}
