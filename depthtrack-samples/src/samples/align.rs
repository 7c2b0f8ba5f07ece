use depthtrack_sensor::config::DEPTH_TO_COLOR_REGISTRATION;
use depthtrack_sensor::{Device, Module};

use super::{color_canvas, max_depth, set_color_size, set_depth_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Color and depth side by side with depth registered to the color camera
pub struct AlignSample {
    settings: SampleSettings,
    max_depth: u16,
}

impl AlignSample {
    pub fn new(settings: &SampleSettings) -> Self {
        Self {
            settings: settings.clone(),
            max_depth: 0,
        }
    }
}

impl Sample for AlignSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        set_depth_size(device, &self.settings);
        device.set_config_value(DEPTH_TO_COLOR_REGISTRATION, "true");
        device.enable(Module::Color)?;
        device.enable(Module::Depth)?;
        self.max_depth = max_depth(device)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Depth)?;
        let mut windows = Vec::with_capacity(2);
        if let Some(image) = color_canvas(device)? {
            windows.push(Window::new("Color", image));
        }
        if let Some(frame) = device.depth_frame() {
            let image = render::depth_image(frame, self.max_depth)?;
            windows.push(Window::new("Depth", image));
        }
        Ok(windows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::tests::*;

    #[test]
    fn both_windows_and_registration() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(
            dir.path(),
            serde_json::json!({ "frames": [{ "color": "color.png", "depth": "depth.png" }] }),
        );
        let windows = one_frame(&mut AlignSample::new(&small_settings()), &mut device);

        let names: Vec<_> = windows.iter().map(|w| w.name).collect();
        assert_eq!(names, ["Color", "Depth"]);
        assert_eq!(device.config_value(DEPTH_TO_COLOR_REGISTRATION).as_deref(), Some("true"));
    }
}
