//! Layout of the instances document as emitted by the tracking engine.
//!
//! The engine writes numbers either as JSON numbers or as numeric strings
//! (`"id": "1"`), both are accepted on input. Output always uses JSON numbers.

use glam::DVec2;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use crate::{Age, Angles, Emotions, Eyes, FaceResult, FrameSnapshot, Person, Rect};
use crate::{SchemaError, LANDMARK_COUNT};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match NumberOrText::<T>::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

/// Like [`lenient`], but NaN and infinities are refused since JSON cannot
/// carry them back out
fn finite<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = lenient(deserializer)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("{value} is not a finite number")))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Document {
    #[serde(rename = "Timestamp", deserialize_with = "lenient")]
    pub timestamp: i64,
    /// Absent when nobody is in view
    #[serde(rename = "Instances", default)]
    pub instances: Option<Vec<Instance>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Instance {
    #[serde(deserialize_with = "lenient")]
    pub id: i32,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<Face>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Face {
    pub rectangle: Rectangle,
    pub landmark: Vec<Point>,
    pub left_eye: Point,
    pub right_eye: Point,
    pub angles: FaceAngles,
    pub emotions: FaceEmotions,
    pub age: FaceAge,
    pub gender: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Rectangle {
    #[serde(deserialize_with = "finite")]
    pub left: f64,
    #[serde(deserialize_with = "finite")]
    pub top: f64,
    #[serde(deserialize_with = "finite")]
    pub width: f64,
    #[serde(deserialize_with = "finite")]
    pub height: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Point {
    #[serde(deserialize_with = "finite")]
    pub x: f64,
    #[serde(deserialize_with = "finite")]
    pub y: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FaceAngles {
    #[serde(deserialize_with = "finite")]
    pub yaw: f64,
    #[serde(deserialize_with = "finite")]
    pub pitch: f64,
    #[serde(deserialize_with = "finite")]
    pub roll: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FaceEmotions {
    #[serde(deserialize_with = "finite")]
    pub happy: f64,
    #[serde(deserialize_with = "finite")]
    pub neutral: f64,
    #[serde(deserialize_with = "finite")]
    pub angry: f64,
    #[serde(deserialize_with = "finite")]
    pub surprise: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct FaceAge {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "finite")]
    pub years: f64,
}

impl From<Point> for DVec2 {
    fn from(item: Point) -> DVec2 {
        DVec2::new(item.x, item.y)
    }
}

impl From<DVec2> for Point {
    fn from(item: DVec2) -> Point {
        Point { x: item.x, y: item.y }
    }
}

impl Instance {
    pub fn into_person(self) -> Result<Person, SchemaError> {
        if self.id < 1 {
            return Err(SchemaError::InvalidId(self.id));
        }

        let face = match self.face {
            Some(face) => {
                let found = face.landmark.len();
                if found != 0 && found != LANDMARK_COUNT {
                    return Err(SchemaError::LandmarkCount {
                        id: self.id,
                        expected: LANDMARK_COUNT,
                        found,
                    });
                }
                Some(face.into())
            }
            None => None,
        };

        Ok(Person {
            id: self.id,
            class: self.class,
            face,
        })
    }
}

impl From<Face> for FaceResult {
    fn from(item: Face) -> FaceResult {
        FaceResult {
            rectangle: Rect {
                x: item.rectangle.left,
                y: item.rectangle.top,
                width: item.rectangle.width,
                height: item.rectangle.height,
            },
            landmarks: item.landmark.into_iter().map(DVec2::from).collect(),
            eyes: Eyes {
                left: item.left_eye.into(),
                right: item.right_eye.into(),
            },
            angles: Angles {
                yaw: item.angles.yaw,
                pitch: item.angles.pitch,
                roll: item.angles.roll,
            },
            emotions: Emotions {
                happy: item.emotions.happy,
                neutral: item.emotions.neutral,
                angry: item.emotions.angry,
                surprise: item.emotions.surprise,
            },
            age: Age {
                kind: item.age.kind,
                years: item.age.years,
            },
            gender: item.gender,
        }
    }
}

impl From<&FaceResult> for Face {
    fn from(item: &FaceResult) -> Face {
        Face {
            rectangle: Rectangle {
                left: item.rectangle.x,
                top: item.rectangle.y,
                width: item.rectangle.width,
                height: item.rectangle.height,
            },
            landmark: item.landmarks.iter().map(|&p| p.into()).collect(),
            left_eye: item.eyes.left.into(),
            right_eye: item.eyes.right.into(),
            angles: FaceAngles {
                yaw: item.angles.yaw,
                pitch: item.angles.pitch,
                roll: item.angles.roll,
            },
            emotions: FaceEmotions {
                happy: item.emotions.happy,
                neutral: item.emotions.neutral,
                angry: item.emotions.angry,
                surprise: item.emotions.surprise,
            },
            age: FaceAge {
                kind: item.age.kind.clone(),
                years: item.age.years,
            },
            gender: item.gender.clone(),
        }
    }
}

impl From<&FrameSnapshot> for Document {
    fn from(item: &FrameSnapshot) -> Document {
        Document {
            timestamp: item.timestamp,
            instances: Some(
                item.persons
                    .iter()
                    .map(|person| Instance {
                        id: person.id,
                        class: person.class.clone(),
                        face: person.face.as_ref().map(Face::from),
                    })
                    .collect(),
            ),
        }
    }
}
