use ab_glyph::{FontArc, PxScale};
use depthtrack_common::{Color, JointType, Palette, Resolution, Skeleton, User, UserHands};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut, draw_hollow_rect_mut,
    draw_text_mut,
};
use imageproc::rect::Rect;
use instances::{FaceResult, FrameSnapshot};
use std::path::Path;

use crate::RenderError;

const NEUTRAL: Color = [0, 0, 255];
const ANGRY: Color = [255, 0, 0];
const SURPRISE: Color = [255, 255, 0];
const HAPPY: Color = [0, 255, 0];

/// Load a TrueType/OpenType font used for overlay text
pub fn load_font<P: AsRef<Path>>(path: P) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path)?;
    Ok(FontArc::try_from_vec(bytes)?)
}

/// Rectangle with its top-left corner at (x, y), None when it has no area
fn rect(x: i32, y: i32, w: i32, h: i32) -> Option<Rect> {
    if w > 0 && h > 0 {
        Some(Rect::at(x, y).of_size(w as u32, h as u32))
    } else {
        None
    }
}

fn resolution_of(image: &RgbImage) -> Resolution {
    Resolution::new(image.width() as usize, image.height() as usize)
}

/// Draws tracking results over a frame using one color per user
#[derive(Clone)]
pub struct Overlay {
    palette: Palette,
    font: Option<FontArc>,
    font_scale: f32,
    joint_confidence: f32,
}

impl Overlay {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            font: None,
            font_scale: 1.0,
            joint_confidence: 0.2,
        }
    }

    /// Font for face attributes and emotion labels, text is skipped without one
    pub fn font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn font_scale(mut self, scale: f32) -> Self {
        self.font_scale = scale;
        self
    }

    /// Confidence threshold for joint dots. Full skeletons keep joints at the
    /// threshold, hand dots need more than it.
    pub fn joint_confidence(mut self, confidence: f32) -> Self {
        self.joint_confidence = confidence;
        self
    }

    /// False when text overlays are skipped for lack of a font
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn color(&self, id: i32) -> Option<Rgb<u8>> {
        let color = self.palette.color_for(id);
        if color.is_none() {
            tracing::trace!(id, palette = self.palette.len(), "user id outside the palette");
        }
        color.map(Rgb)
    }

    /// Bounding box of every segmented user
    pub fn users(&self, image: &mut RgbImage, users: &[User]) {
        let res = resolution_of(image);
        if res.is_empty() {
            return;
        }

        for user in users {
            let Some(color) = self.color(user.id) else { continue };
            let (x1, y1) = res.project(user.bbox.left as f64, user.bbox.top as f64);
            let (x2, y2) = res.project(user.bbox.right as f64, user.bbox.bottom as f64);
            if let Some(r) = rect(x1, y1, x2 - x1 + 1, y2 - y1 + 1) {
                draw_hollow_rect_mut(image, r, color);
            }
        }
    }

    /// A dot on every joint of every skeleton, skipping joints below the threshold
    pub fn skeleton_joints(&self, image: &mut RgbImage, skeletons: &[Skeleton]) {
        let res = resolution_of(image);
        if res.is_empty() {
            return;
        }

        for skeleton in skeletons {
            let Some(color) = self.color(skeleton.id) else { continue };
            for joint in &skeleton.joints {
                if joint.confidence < self.joint_confidence {
                    continue;
                }
                let center = res.project(joint.proj.x as f64, joint.proj.y as f64);
                draw_filled_circle_mut(image, center, 5, color);
            }
        }
    }

    /// A dot on both hand joints of every skeleton
    pub fn skeleton_hands(&self, image: &mut RgbImage, skeletons: &[Skeleton]) {
        let res = resolution_of(image);
        if res.is_empty() {
            return;
        }

        for skeleton in skeletons {
            let Some(color) = self.color(skeleton.id) else { continue };
            for kind in [JointType::LeftHand, JointType::RightHand] {
                let Some(joint) = skeleton.joint(kind) else { continue };
                if joint.confidence > self.joint_confidence {
                    let center = res.project(joint.proj.x as f64, joint.proj.y as f64);
                    draw_filled_circle_mut(image, center, 5, color);
                }
            }
        }
    }

    /// Hand pointers, filled while the hand is clicking
    pub fn hand_pointers(&self, image: &mut RgbImage, users_hands: &[UserHands]) {
        let res = resolution_of(image);
        if res.is_empty() {
            return;
        }

        for user_hands in users_hands {
            let Some(color) = self.color(user_hands.user_id) else { continue };
            for hand in [user_hands.left, user_hands.right].into_iter().flatten() {
                let center = res.project(hand.x as f64, hand.y as f64);
                if hand.click {
                    draw_filled_circle_mut(image, center, 20, color);
                } else {
                    // 2px ring
                    draw_hollow_circle_mut(image, center, 20, color);
                    draw_hollow_circle_mut(image, center, 19, color);
                }
            }
        }
    }

    /// Face rectangle, landmarks, attributes and emotion bars of every face
    pub fn faces(&self, image: &mut RgbImage, snapshot: &FrameSnapshot) {
        let res = resolution_of(image);
        if res.is_empty() {
            return;
        }

        for (person, face) in snapshot.faces() {
            let Some(color) = self.color(person.id) else { continue };

            let (x, y) = res.project(face.rectangle.x, face.rectangle.y);
            let (w, h) = res.project(face.rectangle.width, face.rectangle.height);
            if let Some(r) = rect(x, y, w, h) {
                draw_hollow_rect_mut(image, r, color);
            }

            for landmark in &face.landmarks {
                draw_filled_circle_mut(image, res.project(landmark.x, landmark.y), 5, color);
            }

            self.attributes(image, face, (x + w, y), color);
        }
    }

    /// Text and emotion bars to the right of the face, `org` is the top-right
    /// corner of the face rectangle
    fn attributes(&self, image: &mut RgbImage, face: &FaceResult, org: (i32, i32), color: Rgb<u8>) {
        let scale = self.font_scale;
        let offset = (30.0 * scale) as i32;
        let bar_width = (100.0 * scale) as i32;
        let bar_height = (20.0 * scale) as i32;

        let lines = [
            format!("age: {}", face.age.kind),
            format!("years: {:.1}", face.age.years),
            format!("gender: {}", face.gender),
        ];
        for (i, line) in lines.iter().enumerate() {
            self.text(image, line, (org.0, org.1 + offset * (i as i32 + 1)), color);
        }

        let bars = [
            ("neutral", face.emotions.neutral, NEUTRAL),
            ("angry", face.emotions.angry, ANGRY),
            ("surprise", face.emotions.surprise, SURPRISE),
            ("happy", face.emotions.happy, HAPPY),
        ];
        for (i, (label, intensity, bar_color)) in bars.into_iter().enumerate() {
            let baseline = org.1 + offset * (i as i32 + 4);
            let length = (intensity * bar_width as f64) as i32;
            if let Some(r) = rect(org.0, baseline - offset / 2, length, bar_height) {
                draw_filled_rect_mut(image, r, Rgb(bar_color));
            }
            self.text(image, label, (org.0 + bar_width, baseline), Rgb(bar_color));
        }
    }

    /// Draw a line of text whose baseline starts at `org`
    fn text(&self, image: &mut RgbImage, text: &str, org: (i32, i32), color: Rgb<u8>) {
        let Some(font) = &self.font else { return };
        let px = 24.0 * self.font_scale;
        draw_text_mut(image, color, org.0, org.1 - px as i32, PxScale::from(px), font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthtrack_common::{BoundingBox, Hand, Joint};

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    fn snapshot(landmarks: &str, happy: f64) -> FrameSnapshot {
        instances::parse(&format!(
            r#"{{"Timestamp":1,"Instances":[{{"id":2,"class":"human","face":{{
                "rectangle":{{"left":0.1,"top":0.1,"width":0.2,"height":0.2}},
                "landmark":{landmarks},
                "left_eye":{{"x":0.15,"y":0.15}},"right_eye":{{"x":0.25,"y":0.15}},
                "angles":{{"yaw":0,"pitch":0,"roll":0}},
                "emotions":{{"happy":{happy},"neutral":0,"angry":0,"surprise":0}},
                "age":{{"type":"adult","years":30}},"gender":"male"}}}}]}}"#
        ))
        .unwrap()
    }

    #[test]
    fn face_rectangle_in_user_color() {
        let mut image = RgbImage::new(100, 100);
        Overlay::new(Palette::default()).faces(&mut image, &snapshot("[]", 0.0));
        assert_eq!(image.get_pixel(10, 10), &Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(29, 29), &Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(20, 20), &BLACK);
    }

    #[test]
    fn happy_bar_scales_with_intensity() {
        let mut image = RgbImage::new(400, 400);
        Overlay::new(Palette::default()).faces(&mut image, &snapshot("[]", 0.5));
        // org = (120, 40), happy bar starts at y = 40 + 7 * 30 - 15
        assert_eq!(image.get_pixel(120, 235), &Rgb(HAPPY));
        assert_eq!(image.get_pixel(169, 235), &Rgb(HAPPY));
        assert_eq!(image.get_pixel(170, 235), &BLACK);
    }

    #[test]
    fn face_outside_palette_is_skipped() {
        let mut image = RgbImage::new(100, 100);
        Overlay::new(Palette(vec![[1, 1, 1]])).faces(&mut image, &snapshot("[]", 0.0));
        assert!(image.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn empty_image_is_left_alone() {
        let mut image = RgbImage::new(0, 0);
        Overlay::new(Palette::default()).faces(&mut image, &snapshot("[]", 1.0));
        assert_eq!(image.dimensions(), (0, 0));
    }

    #[test]
    fn skeleton_hands_respect_confidence() {
        let skeleton = Skeleton {
            id: 1,
            joints: vec![
                Joint {
                    kind: JointType::LeftHand,
                    proj: glam::Vec2::new(0.25, 0.5),
                    real: glam::Vec3::ZERO,
                    confidence: 0.9,
                },
                Joint {
                    kind: JointType::RightHand,
                    proj: glam::Vec2::new(0.75, 0.5),
                    real: glam::Vec3::ZERO,
                    confidence: 0.1,
                },
            ],
        };
        let mut image = RgbImage::new(100, 100);
        Overlay::new(Palette::default()).skeleton_hands(&mut image, &[skeleton]);
        assert_eq!(image.get_pixel(25, 50), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(75, 50), &BLACK);
    }

    #[test]
    fn skeleton_joints_keep_threshold_confidence() {
        let joint = |kind, x, confidence| Joint {
            kind,
            proj: glam::Vec2::new(x, 0.5),
            real: glam::Vec3::ZERO,
            confidence,
        };
        let skeleton = Skeleton {
            id: 1,
            joints: vec![
                joint(JointType::Head, 0.1, 0.9),
                joint(JointType::LeftHand, 0.5, 0.2),
                joint(JointType::RightFoot, 0.9, 0.19),
            ],
        };
        let mut image = RgbImage::new(200, 100);
        let overlay = Overlay::new(Palette::default());
        overlay.skeleton_joints(&mut image, &[skeleton.clone()]);
        assert_eq!(image.get_pixel(20, 50), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(100, 50), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(180, 50), &BLACK);

        // The hand-only overlay needs more than the threshold and ignores the head
        let mut image = RgbImage::new(200, 100);
        overlay.skeleton_hands(&mut image, &[skeleton]);
        assert!(image.pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn font_is_optional() {
        assert!(!Overlay::new(Palette::default()).has_font());
    }

    #[test]
    fn hand_pointer_click_fills() {
        let hands = UserHands {
            user_id: 1,
            left: Some(Hand { x: 0.25, y: 0.5, click: true, pressure: 0 }),
            right: Some(Hand { x: 0.75, y: 0.5, click: false, pressure: 0 }),
        };
        let mut image = RgbImage::new(200, 100);
        Overlay::new(Palette::default()).hand_pointers(&mut image, &[hands]);
        assert_eq!(image.get_pixel(50, 50), &Rgb([0, 0, 255]));
        assert_eq!(image.get_pixel(150, 50), &BLACK);
        assert_eq!(image.get_pixel(150, 30), &Rgb([0, 0, 255]));
    }

    #[test]
    fn user_box_outside_palette_is_skipped() {
        let mut image = RgbImage::new(10, 10);
        let user = User {
            id: 0,
            bbox: BoundingBox { left: 0.0, top: 0.0, right: 1.0, bottom: 1.0 },
        };
        Overlay::new(Palette::default()).users(&mut image, &[user]);
        assert!(image.pixels().all(|p| *p == BLACK));
    }
}
