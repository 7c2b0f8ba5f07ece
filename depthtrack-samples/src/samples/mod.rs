//! One sample per tracking feature. A sample configures the device, enables
//! the modules it needs, and turns every device frame into named windows.

use clap::ValueEnum;
use depthtrack_sensor::config::*;
use depthtrack_sensor::{read_config, Device};
use image::DynamicImage;

use crate::{SampleError, SampleSettings};

mod align;
mod color;
mod depth;
mod face;
mod gesture;
mod hand;
mod skeleton;
mod user;

/// A rendered image and the window it belongs to
pub struct Window {
    pub name: &'static str,
    pub image: DynamicImage,
}

impl Window {
    fn new(name: &'static str, image: impl Into<DynamicImage>) -> Self {
        Self {
            name,
            image: image.into(),
        }
    }
}

pub trait Sample {
    /// Configure the device and create the modules this sample reads
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError>;
    /// Render the frame the device currently holds
    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleKind {
    /// Color stream
    Color,
    /// Depth stream as grayscale
    Depth,
    /// Color and depth registered to each other
    Align,
    /// Segmented users over depth
    User,
    /// Joints of tracked skeletons
    Skeleton,
    /// Hand pointers and clicks
    Hand,
    /// Gesture events
    Gesture,
    /// Face rectangles, landmarks and attributes
    Face,
}

impl SampleKind {
    pub fn build(self, settings: &SampleSettings) -> Result<Box<dyn Sample>, SampleError> {
        Ok(match self {
            SampleKind::Color => Box::new(color::ColorSample::new(settings)),
            SampleKind::Depth => Box::new(depth::DepthSample::new(settings)),
            SampleKind::Align => Box::new(align::AlignSample::new(settings)),
            SampleKind::User => Box::new(user::UserSample::new(settings)),
            SampleKind::Skeleton => Box::new(skeleton::SkeletonSample::new(settings)?),
            SampleKind::Hand => Box::new(hand::HandSample::new(settings)?),
            SampleKind::Gesture => Box::new(gesture::GestureSample::new(settings)?),
            SampleKind::Face => Box::new(face::FaceSample::new(settings)?),
        })
    }
}

fn set_color_size(device: &mut dyn Device, settings: &SampleSettings) {
    let res = settings.color_resolution;
    device.set_config_value(RGB_PROCESS_WIDTH, &res.w.to_string());
    device.set_config_value(RGB_PROCESS_HEIGHT, &res.h.to_string());
}

fn set_depth_size(device: &mut dyn Device, settings: &SampleSettings) {
    let res = settings.depth_resolution;
    device.set_config_value(DEPTH_PROCESS_WIDTH, &res.w.to_string());
    device.set_config_value(DEPTH_PROCESS_HEIGHT, &res.h.to_string());
}

fn max_depth(device: &dyn Device) -> Result<u16, SampleError> {
    let max_depth = read_config::<u16>(device, DEPTH_PROCESS_MAX_DEPTH)?;
    tracing::info!(max_depth, "depth range");
    Ok(max_depth)
}

/// Color frame of the device as an image to draw on
fn color_canvas(device: &dyn Device) -> Result<Option<image::RgbImage>, SampleError> {
    match device.color_frame() {
        Some(frame) => Ok(Some(render::color_image(frame)?)),
        None => Ok(None),
    }
}
