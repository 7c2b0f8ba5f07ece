use depthtrack_sensor::config::{DEPTH_TO_COLOR_REGISTRATION, FACES_TO_USE, PROVIDER_DEPTH_TO_COLOR_REGISTRATION};
use depthtrack_sensor::{Device, Module};
use render::Overlay;

use super::{color_canvas, set_color_size, Sample, Window};
use crate::{SampleError, SampleSettings};

/// Face rectangles, landmarks, attributes and emotions from the instances
/// document of every frame
pub struct FaceSample {
    settings: SampleSettings,
    overlay: Overlay,
}

impl FaceSample {
    pub fn new(settings: &SampleSettings) -> Result<Self, SampleError> {
        Ok(Self {
            settings: settings.clone(),
            overlay: settings.overlay()?,
        })
    }
}

impl Sample for FaceSample {
    fn setup(&mut self, device: &mut dyn Device) -> Result<(), SampleError> {
        set_color_size(device, &self.settings);
        device.set_config_value(DEPTH_TO_COLOR_REGISTRATION, "true");
        device.set_config_value(PROVIDER_DEPTH_TO_COLOR_REGISTRATION, "true");
        device.set_config_value(FACES_TO_USE, "true");
        if !self.overlay.has_font() {
            tracing::warn!("no font configured, face attributes and emotion labels are not drawn");
        }
        device.enable(Module::Color)?;
        device.enable(Module::Skeleton)?;
        device.enable(Module::Face)?;
        Ok(())
    }

    fn process(&mut self, device: &mut dyn Device) -> Result<Vec<Window>, SampleError> {
        device.wait_update(Module::Face)?;
        let Some(mut image) = color_canvas(device)? else {
            return Ok(Vec::new());
        };

        match instances::parse(&device.instances_json()) {
            Ok(snapshot) => {
                tracing::debug!("{snapshot}");
                self.overlay.faces(&mut image, &snapshot);
            }
            Err(e) => tracing::warn!(error = %e, "unable to read face instances"),
        }
        Ok(vec![Window::new("Face", image)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::tests::*;

    fn face_frame(instances: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "frames": [{ "color": "color.png", "instances": instances }] })
    }

    #[test]
    fn face_rectangle_in_person_color() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(
            dir.path(),
            face_frame(serde_json::json!({
                "Timestamp": 7,
                "Instances": [{ "id": 6, "class": "human", "face": {
                    "rectangle": { "left": 0.0, "top": 0.0, "width": 1.0, "height": 1.0 },
                    "landmark": [],
                    "left_eye": { "x": 0.3, "y": 0.3 },
                    "right_eye": { "x": 0.6, "y": 0.3 },
                    "angles": { "yaw": 0, "pitch": 0, "roll": 0 },
                    "emotions": { "neutral": 0, "angry": 0, "surprise": 0, "happy": 0 },
                    "age": { "type": "adult", "years": 30.5 },
                    "gender": "female"
                }}]
            })),
        );
        let windows = one_frame(&mut FaceSample::new(&small_settings()).unwrap(), &mut device);

        let image = windows[0].image.to_rgb8();
        assert_eq!(windows[0].name, "Face");
        // user 6 is yellow, the rectangle outlines the whole frame
        assert!(image.pixels().all(|p| p.0 == [255, 255, 0]));
        assert_eq!(device.config_value(FACES_TO_USE).as_deref(), Some("true"));
    }

    #[test]
    fn runs_without_a_font() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = replay(dir.path(), serde_json::json!({ "frames": [] }));
        let mut sample = FaceSample::new(&small_settings()).unwrap();
        assert!(!sample.overlay.has_font());
        sample.setup(&mut device).unwrap();
    }

    #[test]
    fn malformed_instances_keep_the_frame() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(
            dir.path(),
            face_frame(serde_json::json!({ "Timestamp": 7, "Instances": [{ "id": 1, "class": "human", "face": {} }] })),
        );
        let windows = one_frame(&mut FaceSample::new(&small_settings()).unwrap(), &mut device);

        let image = windows[0].image.to_rgb8();
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(image.get_pixel(3, 1).0, [0, 0, 255]);
    }
}
