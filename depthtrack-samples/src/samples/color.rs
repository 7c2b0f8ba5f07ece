use depthtrack_sensor::{Device, Module};

use super::{color_canvas, set_color_size, Sample, Window};
use crate::{SampleError, SampleSettings};

pub struct ColorSample {
    settings: SampleSettings,
}

impl ColorSample {
    pub fn new(settings: &SampleSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }
}

impl Sample for ColorSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        device.enable(Module::Color)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Color)?;
        Ok(color_canvas(device)?
            .map(|image| Window::new("Color", image))
            .into_iter()
            .collect())
    }
}
