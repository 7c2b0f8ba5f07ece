use depthtrack_sensor::Device;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::samples::Sample;
use crate::sink::FrameSink;
use crate::SampleError;

/// Drive a sample until the stream ends, `limit` frames were shown or
/// `running` is cleared. The device is released on every exit path.
#[tracing::instrument(skip_all, fields(limit = ?limit))]
pub fn run(
    sample: &mut dyn Sample,
    device: &mut dyn Device,
    sink: &mut dyn FrameSink,
    limit: Option<u64>,
    running: &AtomicBool,
) -> Result<u64, SampleError> {
    let result = setup_and_loop(sample, device, sink, limit, running);
    device.release();
    result
}

fn setup_and_loop(
    sample: &mut dyn Sample,
    device: &mut dyn Device,
    sink: &mut dyn FrameSink,
    limit: Option<u64>,
    running: &AtomicBool,
) -> Result<u64, SampleError> {
    sample.setup(device)?;
    device.run()?;

    let mut shown = 0;
    while running.load(Ordering::SeqCst) {
        if limit.is_some_and(|limit| shown >= limit) {
            tracing::info!(shown, "frame limit reached");
            break;
        }
        if !device.update()? {
            break;
        }

        for window in sample.process(device)? {
            sink.present(window.name, shown, &window.image)?;
        }
        shown += 1;
    }
    Ok(shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::tests::*;
    use crate::samples::SampleKind;
    use depthtrack_sensor::{DeviceError, Module};
    use image::DynamicImage;

    /// Keeps what would have been shown
    #[derive(Default)]
    struct MemorySink {
        shown: Vec<(String, u64, (u32, u32))>,
    }

    impl FrameSink for MemorySink {
        fn present(&mut self, window: &str, index: u64, image: &DynamicImage) -> Result<(), SampleError> {
            self.shown.push((window.to_owned(), index, (image.width(), image.height())));
            Ok(())
        }
    }

    fn color_frames(count: usize) -> serde_json::Value {
        serde_json::json!({ "frames": vec![serde_json::json!({ "color": "color.png" }); count] })
    }

    #[test]
    fn runs_until_end_of_stream() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(dir.path(), color_frames(3));
        let mut sample = SampleKind::Color.build(&small_settings()).unwrap();
        let mut sink = MemorySink::default();

        let shown = run(sample.as_mut(), &mut device, &mut sink, None, &AtomicBool::new(true)).unwrap();
        assert_eq!(shown, 3);
        assert_eq!(
            sink.shown,
            [
                ("Color".to_owned(), 0, (4, 2)),
                ("Color".to_owned(), 1, (4, 2)),
                ("Color".to_owned(), 2, (4, 2)),
            ]
        );
        // released
        assert!(matches!(device.update(), Err(DeviceError::NotRunning)));
    }

    #[test]
    fn frame_limit_on_a_looping_recording() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(dir.path(), color_frames(2)).looping(true);
        let mut sample = SampleKind::Color.build(&small_settings()).unwrap();
        let mut sink = MemorySink::default();

        let shown = run(sample.as_mut(), &mut device, &mut sink, Some(5), &AtomicBool::new(true)).unwrap();
        assert_eq!(shown, 5);
        assert_eq!(sink.shown.len(), 5);
    }

    #[test]
    fn stop_signal_before_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(dir.path(), color_frames(2));
        let mut sample = SampleKind::Color.build(&small_settings()).unwrap();
        let mut sink = MemorySink::default();

        let shown = run(sample.as_mut(), &mut device, &mut sink, None, &AtomicBool::new(false)).unwrap();
        assert_eq!(shown, 0);
        assert!(sink.shown.is_empty());
    }

    #[test]
    fn missing_license_ends_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_images(dir.path());
        let mut device = replay(
            dir.path(),
            serde_json::json!({ "licensed": false, "frames": [{ "color": "color.png" }] }),
        );
        let mut sample = SampleKind::Gesture.build(&small_settings()).unwrap();
        let mut sink = MemorySink::default();

        let result = run(sample.as_mut(), &mut device, &mut sink, None, &AtomicBool::new(true));
        assert!(matches!(
            result,
            Err(SampleError::Device(DeviceError::LicenseNotAcquired(Module::Gesture)))
        ));
        assert!(sink.shown.is_empty());
        assert!(matches!(device.update(), Err(DeviceError::NotRunning)));
    }
}
