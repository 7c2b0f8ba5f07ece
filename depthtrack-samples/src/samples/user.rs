use depthtrack_sensor::{Device, Module};

use super::{max_depth, set_depth_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Segmented users painted over the depth image
pub struct UserSample {
    settings: SampleSettings,
    max_depth: u16,
}

impl UserSample {
    pub fn new(settings: &SampleSettings) -> Self {
        Self {
            settings: settings.clone(),
            max_depth: 0,
        }
    }
}

impl Sample for UserSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_depth_size(device, &self.settings);
        device.enable(Module::Depth)?;
        device.enable(Module::User)?;
        self.max_depth = max_depth(device)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::User)?;
        let (Some(depth), Some(users)) = (device.depth_frame(), device.user_frame()) else {
            return Ok(Vec::new());
        };
        let image = render::user_image(depth, users, self.max_depth, &self.settings.palette)?;
        Ok(vec![Window::new("User", image)])
    }
}
