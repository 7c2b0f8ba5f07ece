use depthtrack_common::{Palette, Resolution};
use render::{Overlay, RenderError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::SampleError;

/// Presentation settings shared by every sample
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    /// Display colors, user n takes entry n - 1
    pub palette: Palette,
    /// Hand joints at or below this confidence are hidden
    pub joint_confidence: f32,
    /// TrueType font for face attributes, no text is drawn without one
    pub font: Option<PathBuf>,
    pub font_scale: f32,
    pub color_resolution: Resolution,
    pub depth_resolution: Resolution,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            joint_confidence: 0.2,
            font: None,
            font_scale: 1.0,
            color_resolution: Resolution::new(1280, 720),
            depth_resolution: Resolution::new(1280, 720),
        }
    }
}

impl SampleSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SampleError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn overlay(&self) -> Result<Overlay, RenderError> {
        let mut overlay = Overlay::new(self.palette.clone())
            .joint_confidence(self.joint_confidence)
            .font_scale(self.font_scale);
        if let Some(path) = &self.font {
            overlay = overlay.font(render::load_font(path)?);
        }
        Ok(overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = SampleSettings::default();
        assert_eq!(settings.color_resolution, Resolution::new(1280, 720));
        assert_eq!(settings.palette.len(), 6);
        assert!(settings.overlay().is_ok());
    }

    #[test]
    fn partial_file() {
        let settings: SampleSettings = serde_json::from_str(
            r#"{ "palette": [[255, 255, 255]], "depth_resolution": { "w": 640, "h": 480 } }"#,
        )
        .unwrap();
        assert_eq!(settings.palette.color_for(1), Some([255, 255, 255]));
        assert_eq!(settings.palette.color_for(2), None);
        assert_eq!(settings.depth_resolution, Resolution::new(640, 480));
        assert_eq!(settings.joint_confidence, 0.2);
    }

    #[test]
    fn missing_font() {
        let settings = SampleSettings {
            font: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Default::default()
        };
        assert!(matches!(settings.overlay(), Err(RenderError::FontIo(_))));
    }
}
