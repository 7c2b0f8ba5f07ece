use depthtrack_common::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::DeviceError;

/// A captured session replayed by [`crate::ReplayDevice`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Frames per second of the capture
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// False to replay as an SDK without a tracking license
    #[serde(default = "default_licensed")]
    pub licensed: bool,
    /// Byte order the color frames are handed out in, BGR like the camera SDK
    #[serde(default = "default_color_order")]
    pub color_order: ChannelOrder,
    pub frames: Vec<RecordedFrame>,
}

/// One captured frame. Image paths are relative to the recording file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordedFrame {
    pub timestamp: i64,
    /// 8-bit color image
    pub color: Option<PathBuf>,
    /// 16-bit grayscale image, millimetres
    pub depth: Option<PathBuf>,
    /// 16-bit grayscale image, user id per pixel
    pub labels: Option<PathBuf>,
    pub users: Vec<User>,
    pub skeletons: Vec<Skeleton>,
    pub hands: Vec<UserHands>,
    pub gestures: Vec<Gesture>,
    /// Instances document as produced by the engine
    pub instances: Option<serde_json::Value>,
}

fn default_frame_rate() -> u32 {
    30
}

fn default_licensed() -> bool {
    true
}

fn default_color_order() -> ChannelOrder {
    ChannelOrder::Bgr
}

impl Recording {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }
}
