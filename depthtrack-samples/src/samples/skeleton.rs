use depthtrack_sensor::{Device, Module};
use render::Overlay;

use super::{color_canvas, set_color_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Every confident joint of every tracked skeleton over the color stream
pub struct SkeletonSample {
    settings: SampleSettings,
    overlay: Overlay,
}

impl SkeletonSample {
    pub fn new(settings: &SampleSettings) -> Result<Self, SampleError> {
        Ok(Self {
            settings: settings.clone(),
            overlay: settings.overlay()?,
        })
    }
}

impl Sample for SkeletonSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        device.enable(Module::Color)?;
        device.enable(Module::Skeleton)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Skeleton)?;
        let Some(mut image) = color_canvas(device)? else {
            return Ok(Vec::new());
        };
        for skeleton in device.skeletons() {
            for joint in &skeleton.joints {
                tracing::trace!(
                    user = skeleton.id,
                    joint = joint.kind.name(),
                    confidence = joint.confidence,
                    "joint"
                );
            }
        }
        self.overlay.skeleton_joints(&mut image, device.skeletons());
        Ok(vec![Window::new("Skeleton", image)])
    }
}
