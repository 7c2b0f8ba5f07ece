use serde::{Deserialize, Serialize};
use std::fmt;

/// Joint names of the tracker skeleton, in SDK index order
pub const JOINTS: [&str; 25] = [
    "none",
    "head",
    "neck",
    "torso",
    "waist",
    "left_collar",
    "left_shoulder",
    "left_elbow",
    "left_wrist",
    "left_hand",
    "left_fingertip",
    "right_collar",
    "right_shoulder",
    "right_elbow",
    "right_wrist",
    "right_hand",
    "right_fingertip",
    "left_hip",
    "left_knee",
    "left_ankle",
    "left_foot",
    "right_hip",
    "right_knee",
    "right_ankle",
    "right_foot",
];

/// Joint of the tracker skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    None,
    Head,
    Neck,
    Torso,
    Waist,
    LeftCollar,
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    LeftHand,
    LeftFingertip,
    RightCollar,
    RightShoulder,
    RightElbow,
    RightWrist,
    RightHand,
    RightFingertip,
    LeftHip,
    LeftKnee,
    LeftAnkle,
    LeftFoot,
    RightHip,
    RightKnee,
    RightAnkle,
    RightFoot,
}

impl JointType {
    /// Name of the joint as listed in [`JOINTS`]
    pub fn name(self) -> &'static str {
        JOINTS[self as usize]
    }
}

/// Size of a frame in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub w: usize,
    pub h: usize,
}

impl Resolution {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h }
    }

    /// Number of pixels
    pub fn total(&self) -> usize {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Convert a normalized coordinate into pixel coordinates, truncating toward zero
    pub fn project(&self, x: f64, y: f64) -> (i32, i32) {
        ((x * self.w as f64) as i32, (y * self.h as f64) as i32)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Byte order of a packed 3-channel color pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// A color frame, 3 bytes per pixel, row-major
#[derive(Debug, Clone)]
pub struct ColorFrame {
    pub resolution: Resolution,
    pub order: ChannelOrder,
    pub data: Vec<u8>,
}

/// A depth frame in millimetres, row-major
#[derive(Debug, Clone)]
pub struct DepthFrame {
    pub resolution: Resolution,
    pub data: Vec<u16>,
}

/// Normalized bounding box of a segmented user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// A user found by the segmentation tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

/// Per-pixel user labels, 0 is background and n is the user with id n
#[derive(Debug, Clone)]
pub struct UserFrame {
    pub resolution: Resolution,
    pub labels: Vec<u16>,
    pub users: Vec<User>,
}

/// A single tracked joint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    #[serde(rename = "type")]
    pub kind: JointType,
    /// Normalized projection on the color image
    pub proj: glam::Vec2,
    /// Position in millimetres relative to the sensor
    #[serde(default)]
    pub real: glam::Vec3,
    pub confidence: f32,
}

/// Skeleton of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub id: i32,
    pub joints: Vec<Joint>,
}

impl Skeleton {
    pub fn joint(&self, kind: JointType) -> Option<&Joint> {
        self.joints.iter().find(|j| j.kind == kind)
    }
}

/// Hand pointer of a user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    /// Normalized pointer position
    pub x: f32,
    pub y: f32,
    /// True while the hand is grabbing
    #[serde(default)]
    pub click: bool,
    #[serde(default)]
    pub pressure: i32,
}

/// Both hands of one user, a hand is missing when the tracker lost it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHands {
    pub user_id: i32,
    #[serde(default)]
    pub left: Option<Hand>,
    #[serde(default)]
    pub right: Option<Hand>,
}

/// Gestures recognized by the gesture tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    Waving,
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    Push,
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GestureType::Waving => "GESTURE_WAVING",
            GestureType::SwipeLeft => "GESTURE_SWIPE_LEFT",
            GestureType::SwipeRight => "GESTURE_SWIPE_RIGHT",
            GestureType::SwipeUp => "GESTURE_SWIPE_UP",
            GestureType::SwipeDown => "GESTURE_SWIPE_DOWN",
            GestureType::Push => "GESTURE_PUSH",
        };
        f.write_str(name)
    }
}

/// A gesture completed by a user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    pub user_id: i32,
    #[serde(rename = "type")]
    pub kind: GestureType,
}

/// RGB color
pub type Color = [u8; 3];

/// Ordered list of display colors, the user with id n is drawn with entry n - 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub Vec<Color>);

impl Palette {
    /// Color assigned to a user id, None when the id falls outside the palette
    pub fn color_for(&self, id: i32) -> Option<Color> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette(vec![
            [0, 0, 255],   // Blue
            [0, 255, 0],   // Green
            [255, 0, 0],   // Red
            [0, 255, 255], // Cyan
            [255, 0, 255], // Magenta
            [255, 255, 0], // Yellow
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lookup() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(1), Some([0, 0, 255]));
        assert_eq!(palette.color_for(6), Some([255, 255, 0]));
        assert_eq!(palette.color_for(7), None);
        assert_eq!(palette.color_for(0), None);
        assert_eq!(palette.color_for(-3), None);
    }

    #[test]
    fn palette_from_json() {
        let palette: Palette = serde_json::from_str("[[1,2,3],[4,5,6]]").unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color_for(2), Some([4, 5, 6]));
    }

    #[test]
    fn joint_names_follow_enum_order() {
        assert_eq!(JointType::Head.name(), "head");
        assert_eq!(JointType::LeftHand.name(), "left_hand");
        assert_eq!(JointType::RightHand.name(), "right_hand");
        assert_eq!(JointType::RightFoot.name(), "right_foot");
    }

    #[test]
    fn skeleton_joint_lookup() {
        let skeleton: Skeleton = serde_json::from_str(
            r#"{"id":2,"joints":[{"type":"left_hand","proj":[0.25,0.5],"confidence":0.9}]}"#,
        )
        .unwrap();
        let hand = skeleton.joint(JointType::LeftHand).unwrap();
        assert_eq!(hand.proj, glam::Vec2::new(0.25, 0.5));
        assert!(skeleton.joint(JointType::RightHand).is_none());
    }

    #[test]
    fn gesture_names() {
        assert_eq!(GestureType::SwipeLeft.to_string(), "GESTURE_SWIPE_LEFT");
        let gesture: Gesture = serde_json::from_str(r#"{"user_id":1,"type":"push"}"#).unwrap();
        assert_eq!(gesture.kind, GestureType::Push);
    }

    #[test]
    fn project_truncates() {
        let resolution = Resolution::new(640, 480);
        assert_eq!(resolution.project(0.5, 0.5), (320, 240));
        assert_eq!(resolution.project(0.9999, 0.0), (639, 0));
    }
}
