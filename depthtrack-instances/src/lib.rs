//! Maps the instances document produced by the tracking engine once per frame
//! into a typed [`FrameSnapshot`].
//!
//! ```
//! let snapshot = instances::parse(r#"{"Timestamp":100,"Instances":[{"id":1,"class":"human"}]}"#).unwrap();
//! for (person, face) in snapshot.faces() {
//!     println!("{} {}", person.id, face.gender);
//! }
//! ```

use glam::DVec2;
use serde::Deserialize;
use std::fmt;

mod error;
mod wire;

pub use error::{InstancesError, SchemaError};

/// Number of face landmarks emitted by the face module
pub const LANDMARK_COUNT: usize = 31;

/// Tracking results of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub timestamp: i64,
    /// Tracked people, in document order
    pub persons: Vec<Person>,
}

/// A person tracked in the frame
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Stable across frames for the same physical user, starts at 1
    pub id: i32,
    pub class: String,
    /// None when the face module produced nothing for this person
    pub face: Option<FaceResult>,
}

/// Face analysis of one person. Coordinates are normalized to the image size.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceResult {
    pub rectangle: Rect,
    pub landmarks: Vec<DVec2>,
    pub eyes: Eyes,
    pub angles: Angles,
    pub emotions: Emotions,
    pub age: Age,
    pub gender: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eyes {
    pub left: DVec2,
    pub right: DVec2,
}

/// Head pose in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Emotion intensities in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emotions {
    pub happy: f64,
    pub neutral: f64,
    pub angry: f64,
    pub surprise: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Age {
    /// Age category, e.g. "young" or "adult"
    pub kind: String,
    pub years: f64,
}

/// Parse an instances document.
///
/// Fails with [`InstancesError::Parse`] if the text is not JSON and with
/// [`InstancesError::Schema`] if it does not follow the instances layout.
/// Nothing is returned on failure, there is no partial result.
pub fn parse(raw_json: &str) -> Result<FrameSnapshot, InstancesError> {
    let tree: serde_json::Value = serde_json::from_str(raw_json).map_err(InstancesError::Parse)?;
    let document = wire::Document::deserialize(tree).map_err(SchemaError::Field)?;

    let persons = document
        .instances
        .unwrap_or_default()
        .into_iter()
        .map(wire::Instance::into_person)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FrameSnapshot {
        timestamp: document.timestamp,
        persons,
    })
}

impl FrameSnapshot {
    /// Serialize back into the instances layout
    pub fn to_json(&self) -> serde_json::Value {
        // Plain structs with string keys always serialize
        serde_json::to_value(wire::Document::from(self)).unwrap_or(serde_json::Value::Null)
    }

    /// People that have a face result
    pub fn faces(&self) -> impl Iterator<Item = (&Person, &FaceResult)> {
        self.persons
            .iter()
            .filter_map(|person| person.face.as_ref().map(|face| (person, face)))
    }
}

impl fmt::Display for FrameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.timestamp)?;
        for person in &self.persons {
            writeln!(f, "id    : {}", person.id)?;
            writeln!(f, "class : {}", person.class)?;
            if let Some(face) = &person.face {
                writeln!(f, "face  :")?;
                write!(f, "{face}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for FaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\trectangle :")?;
        writeln!(f, "\t\tleft   : {}", self.rectangle.x)?;
        writeln!(f, "\t\ttop    : {}", self.rectangle.y)?;
        writeln!(f, "\t\twidth  : {}", self.rectangle.width)?;
        writeln!(f, "\t\theight : {}", self.rectangle.height)?;

        writeln!(f, "\tlandmark :")?;
        for (i, landmark) in self.landmarks.iter().enumerate() {
            writeln!(f, "\t\t{} ( {}, {} )", i, landmark.x, landmark.y)?;
        }

        writeln!(f, "\teyes :")?;
        writeln!(f, "\t\tleft  : ( {}, {} )", self.eyes.left.x, self.eyes.left.y)?;
        writeln!(f, "\t\tright : ( {}, {} )", self.eyes.right.x, self.eyes.right.y)?;

        writeln!(f, "\tangles :")?;
        writeln!(f, "\t\tyaw   : {}", self.angles.yaw)?;
        writeln!(f, "\t\tpitch : {}", self.angles.pitch)?;
        writeln!(f, "\t\troll  : {}", self.angles.roll)?;

        writeln!(f, "\temotions :")?;
        writeln!(f, "\t\thappy    : {}", self.emotions.happy)?;
        writeln!(f, "\t\tneutral  : {}", self.emotions.neutral)?;
        writeln!(f, "\t\tangry    : {}", self.emotions.angry)?;
        writeln!(f, "\t\tsurprise : {}", self.emotions.surprise)?;

        writeln!(f, "\tage :")?;
        writeln!(f, "\t\ttype  : {}", self.age.kind)?;
        writeln!(f, "\t\tyears : {}", self.age.years)?;

        writeln!(f, "\tgender : {}", self.gender)
    }
}
