use depthtrack_sensor::{Device, Module};
use render::Overlay;

use super::{color_canvas, set_color_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Hand pointers over the color stream
pub struct HandSample {
    settings: SampleSettings,
    overlay: Overlay,
}

impl HandSample {
    pub fn new(settings: &SampleSettings) -> Result<Self, SampleError> {
        Ok(Self {
            settings: settings.clone(),
            overlay: settings.overlay()?,
        })
    }
}

impl Sample for HandSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        device.enable(Module::Color)?;
        device.enable(Module::Hand)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Hand)?;
        let Some(mut image) = color_canvas(device)? else {
            return Ok(Vec::new());
        };
        for hands in device.hand_data() {
            tracing::trace!(user = hands.user_id, left = ?hands.left, right = ?hands.right, "hands");
        }
        self.overlay.hand_pointers(&mut image, device.hand_data());
        Ok(vec![Window::new("Hand", image)])
    }
}
