use depthtrack_common::*;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Luma};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::*;
use crate::{Device, DeviceConfig, DeviceError, Module, RecordedFrame, Recording};

type DepthMap = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Data of the frame the device currently points at
#[derive(Debug, Default)]
struct Current {
    color: Option<ColorFrame>,
    depth: Option<DepthFrame>,
    users: Option<UserFrame>,
    skeletons: Vec<Skeleton>,
    hands: Vec<UserHands>,
    gestures: Vec<Gesture>,
    instances: String,
}

/// Plays back a [`Recording`] as if it came from a live sensor
#[derive(Debug)]
pub struct ReplayDevice {
    recording: Recording,
    base_dir: PathBuf,
    config: DeviceConfig,
    enabled: HashSet<Module>,
    running: bool,
    looping: bool,
    realtime: bool,
    next: usize,
    last_frame: Option<Instant>,
    current: Current,
}

impl ReplayDevice {
    /// Load a recording manifest, images are resolved next to it
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P, config: DeviceConfig) -> Result<Self, DeviceError> {
        let path = path.as_ref();
        let recording = Recording::from_file(path)?;
        tracing::info!(frames = recording.frames.len(), "recording loaded");

        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(recording, base_dir, config))
    }

    pub fn new<P: Into<PathBuf>>(recording: Recording, base_dir: P, config: DeviceConfig) -> Self {
        Self {
            recording,
            base_dir: base_dir.into(),
            config,
            enabled: HashSet::new(),
            running: false,
            looping: false,
            realtime: false,
            next: 0,
            last_frame: None,
            current: Current::default(),
        }
    }

    /// Start over from the first frame once the recording ends
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Hold each frame for the recorded frame period
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    fn is_enabled(&self, module: Module) -> bool {
        self.enabled.contains(&module)
    }

    fn pace(&mut self) {
        if self.realtime && self.recording.frame_rate > 0 {
            let period = Duration::from_secs_f64(1.0 / self.recording.frame_rate as f64);
            if let Some(last) = self.last_frame {
                let elapsed = last.elapsed();
                if elapsed < period {
                    std::thread::sleep(period - elapsed);
                }
            }
        }
        self.last_frame = Some(Instant::now());
    }

    /// Processing size set through the configuration, if any
    fn process_size(&self, width: &str, height: &str) -> Result<Option<(u32, u32)>, DeviceError> {
        let w = self.config.parse_optional::<u32>(width)?;
        let h = self.config.parse_optional::<u32>(height)?;
        Ok(match (w, h) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, DeviceError> {
        let path = self.base_dir.join(path);
        image::open(&path).map_err(|source| DeviceError::Image { path, source })
    }

    fn load_color(&self, path: &Path) -> Result<ColorFrame, DeviceError> {
        let mut image = self.decode(path)?.to_rgb8();
        if let Some((w, h)) = self.process_size(RGB_PROCESS_WIDTH, RGB_PROCESS_HEIGHT)? {
            if image.dimensions() != (w, h) {
                image = imageops::resize(&image, w, h, FilterType::Triangle);
            }
        }

        let resolution = Resolution::new(image.width() as usize, image.height() as usize);
        let mut data = image.into_raw();
        if self.recording.color_order == ChannelOrder::Bgr {
            for pixel in data.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }

        Ok(ColorFrame {
            resolution,
            order: self.recording.color_order,
            data,
        })
    }

    /// Depth and label maps share the depth processing size, labels must not be interpolated
    fn load_depth_map(&self, path: &Path) -> Result<DepthMap, DeviceError> {
        let mut image = self.decode(path)?.to_luma16();
        if let Some((w, h)) = self.process_size(DEPTH_PROCESS_WIDTH, DEPTH_PROCESS_HEIGHT)? {
            if image.dimensions() != (w, h) {
                image = imageops::resize(&image, w, h, FilterType::Nearest);
            }
        }
        Ok(image)
    }

    fn load(&self, frame: &RecordedFrame) -> Result<Current, DeviceError> {
        let mut current = Current::default();

        if self.is_enabled(Module::Color) {
            if let Some(path) = &frame.color {
                current.color = Some(self.load_color(path)?);
            }
        }

        if self.is_enabled(Module::Depth) || self.is_enabled(Module::User) {
            if let Some(path) = &frame.depth {
                let map = self.load_depth_map(path)?;
                current.depth = Some(DepthFrame {
                    resolution: Resolution::new(map.width() as usize, map.height() as usize),
                    data: map.into_raw(),
                });
            }
        }

        if self.is_enabled(Module::User) {
            if let Some(path) = &frame.labels {
                let map = self.load_depth_map(path)?;
                current.users = Some(UserFrame {
                    resolution: Resolution::new(map.width() as usize, map.height() as usize),
                    labels: map.into_raw(),
                    users: frame.users.clone(),
                });
            }
        }

        if self.is_enabled(Module::Skeleton) || self.is_enabled(Module::Gesture) {
            current.skeletons = frame.skeletons.clone();
        }
        if self.is_enabled(Module::Hand) {
            current.hands = frame.hands.clone();
        }
        if self.is_enabled(Module::Gesture) {
            current.gestures = frame.gestures.clone();
        }

        current.instances = match &frame.instances {
            Some(document) => document.to_string(),
            None => serde_json::json!({ "Timestamp": frame.timestamp, "Instances": [] }).to_string(),
        };

        Ok(current)
    }
}

impl Device for ReplayDevice {
    fn config_value(&self, key: &str) -> Option<String> {
        self.config.get(key).map(str::to_owned)
    }

    fn set_config_value(&mut self, key: &str, value: &str) {
        tracing::debug!(key, value, "config value set");
        self.config.set(key, value);
    }

    fn enable(&mut self, module: Module) -> Result<(), DeviceError> {
        tracing::info!(%module, "module created");
        self.enabled.insert(module);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    fn run(&mut self) -> Result<(), DeviceError> {
        tracing::info!(frame_rate = self.recording.frame_rate, "replay started");
        self.running = true;
        self.next = 0;
        self.last_frame = None;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn update(&mut self) -> Result<bool, DeviceError> {
        if !self.running {
            return Err(DeviceError::NotRunning);
        }

        if self.next >= self.recording.frames.len() {
            if !self.looping || self.recording.frames.is_empty() {
                tracing::info!("end of recording");
                return Ok(false);
            }
            tracing::debug!("recording rewound");
            self.next = 0;
        }

        self.pace();
        self.current = self.load(&self.recording.frames[self.next])?;
        tracing::trace!(index = self.next, "frame loaded");
        self.next += 1;
        Ok(true)
    }

    fn wait_update(&mut self, module: Module) -> Result<(), DeviceError> {
        if !self.running {
            return Err(DeviceError::NotRunning);
        }
        if !self.is_enabled(module) {
            return Err(DeviceError::ModuleNotEnabled(module));
        }
        if module.is_tracker() && !self.recording.licensed {
            return Err(DeviceError::LicenseNotAcquired(module));
        }
        Ok(())
    }

    fn color_frame(&self) -> Option<&ColorFrame> {
        self.current.color.as_ref()
    }

    fn depth_frame(&self) -> Option<&DepthFrame> {
        self.current.depth.as_ref()
    }

    fn user_frame(&self) -> Option<&UserFrame> {
        self.current.users.as_ref()
    }

    fn skeletons(&self) -> &[Skeleton] {
        &self.current.skeletons
    }

    fn hand_data(&self) -> &[UserHands] {
        &self.current.hands
    }

    fn gestures(&self) -> &[Gesture] {
        &self.current.gestures
    }

    fn instances_json(&self) -> String {
        self.current.instances.clone()
    }

    #[tracing::instrument(skip(self))]
    fn release(&mut self) {
        tracing::info!("device released");
        self.running = false;
        self.enabled.clear();
        self.current = Current::default();
    }
}
