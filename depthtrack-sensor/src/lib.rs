//! The tracking SDK as seen by the samples: a device that is configured with
//! dotted keys, has sensor and tracker modules enabled on it, and is then
//! stepped one frame at a time.

use depthtrack_common::*;
use std::fmt;

pub mod config;
mod error;
pub mod recording;
mod replay;

pub use config::DeviceConfig;
pub use error::DeviceError;
pub use recording::{RecordedFrame, Recording};
pub use replay::ReplayDevice;

/// Sensors and trackers provided by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Color,
    Depth,
    User,
    Skeleton,
    Hand,
    Gesture,
    Face,
}

impl Module {
    /// Trackers need a license, raw sensors do not
    pub fn is_tracker(self) -> bool {
        !matches!(self, Module::Color | Module::Depth)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Module::Color => "color",
            Module::Depth => "depth",
            Module::User => "user",
            Module::Skeleton => "skeleton",
            Module::Hand => "hand",
            Module::Gesture => "gesture",
            Module::Face => "face",
        };
        f.write_str(name)
    }
}

/// A depth camera driven by the tracking middleware
pub trait Device {
    /// Current value of a configuration key
    fn config_value(&self, key: &str) -> Option<String>;
    /// Override a configuration key, takes effect from the next frame
    fn set_config_value(&mut self, key: &str, value: &str);

    /// Create a sensor or tracker module
    fn enable(&mut self, module: Module) -> Result<(), DeviceError>;
    /// Start streaming
    fn run(&mut self) -> Result<(), DeviceError>;
    /// Block until the next frame is available, false once the stream ended
    fn update(&mut self) -> Result<bool, DeviceError>;
    /// Wait for a tracker to finish processing the current frame
    fn wait_update(&mut self, module: Module) -> Result<(), DeviceError>;

    fn color_frame(&self) -> Option<&ColorFrame>;
    fn depth_frame(&self) -> Option<&DepthFrame>;
    fn user_frame(&self) -> Option<&UserFrame>;
    fn skeletons(&self) -> &[Skeleton];
    fn hand_data(&self) -> &[UserHands];
    /// Gestures completed since the previous frame
    fn gestures(&self) -> &[Gesture];
    /// Instances document of the current frame
    fn instances_json(&self) -> String;

    /// Stop streaming and free the device
    fn release(&mut self);
}

/// Read and parse a configuration value of a device
pub fn read_config<T>(device: &dyn Device, key: &str) -> Result<T, DeviceError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    config::parse_value(key, device.config_value(key).as_deref())
}
