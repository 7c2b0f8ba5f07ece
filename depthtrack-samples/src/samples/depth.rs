use depthtrack_sensor::{Device, Module};

use super::{max_depth, set_depth_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Depth as grayscale, near is white
pub struct DepthSample {
    settings: SampleSettings,
    max_depth: u16,
}

impl DepthSample {
    pub fn new(settings: &SampleSettings) -> Self {
        Self {
            settings: settings.clone(),
            max_depth: 0,
        }
    }
}

impl Sample for DepthSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_depth_size(device, &self.settings);
        device.enable(Module::Depth)?;
        self.max_depth = max_depth(device)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Depth)?;
        let Some(frame) = device.depth_frame() else {
            return Ok(Vec::new());
        };
        let image = render::depth_image(frame, self.max_depth)?;
        Ok(vec![Window::new("Depth", image)])
    }
}
