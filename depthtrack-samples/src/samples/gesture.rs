use depthtrack_common::Gesture;
use depthtrack_sensor::{Device, Module};
use render::Overlay;

use super::{color_canvas, set_color_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Logs every completed gesture and shows the hands that made it
pub struct GestureSample {
    settings: SampleSettings,
    overlay: Overlay,
}

impl GestureSample {
    pub fn new(settings: &SampleSettings) -> Result<Self, SampleError> {
        Ok(Self {
            settings: settings.clone(),
            overlay: settings.overlay()?,
        })
    }
}

/// `<user> GESTURE_<TYPE>`
fn describe(gesture: &Gesture) -> String {
    format!("{} {}", gesture.user_id, gesture.kind)
}

impl Sample for GestureSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        device.enable(Module::Color)?;
        device.enable(Module::Skeleton)?;
        device.enable(Module::Gesture)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Gesture)?;
        for gesture in device.gestures() {
            tracing::info!("{}", describe(gesture));
        }

        let Some(mut image) = color_canvas(device)? else {
            return Ok(Vec::new());
        };
        self.overlay.skeleton_hands(&mut image, device.skeletons());
        Ok(vec![Window::new("Gesture", image)])
    }
}
