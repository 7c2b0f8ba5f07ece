use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::DeviceError;

pub const RGB_PROCESS_WIDTH: &str = "Realsense2Module.RGB.ProcessWidth";
pub const RGB_PROCESS_HEIGHT: &str = "Realsense2Module.RGB.ProcessHeight";
pub const DEPTH_PROCESS_WIDTH: &str = "Realsense2Module.Depth.ProcessWidth";
pub const DEPTH_PROCESS_HEIGHT: &str = "Realsense2Module.Depth.ProcessHeight";
pub const DEPTH_PROCESS_MAX_DEPTH: &str = "Realsense2Module.Depth.ProcessMaxDepth";
pub const DEPTH_TO_COLOR_REGISTRATION: &str = "Realsense2Module.Depth2ColorRegistration";
pub const PROVIDER_DEPTH_TO_COLOR_REGISTRATION: &str = "DepthProvider.Depth2ColorRegistration";
pub const FACES_TO_USE: &str = "Faces.ToUse";

/// SDK configuration as dotted keys, e.g. `Realsense2Module.Depth.ProcessMaxDepth`
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    values: BTreeMap<String, String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        let values = [
            (DEPTH_PROCESS_MAX_DEPTH, "5000"),
            (DEPTH_TO_COLOR_REGISTRATION, "false"),
            (PROVIDER_DEPTH_TO_COLOR_REGISTRATION, "false"),
            (FACES_TO_USE, "false"),
        ];
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }
}

impl DeviceConfig {
    /// Load a configuration file on top of the defaults.
    /// Nested objects become dotted keys, leaves are kept as text.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        std::fs::read_to_string(path.as_ref())?.parse()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    /// Parse a value, a missing key is an error
    pub fn parse<T>(&self, key: &str) -> Result<T, DeviceError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        parse_value(key, self.get(key))
    }

    /// Parse a value if present
    pub fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, DeviceError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.get(key) {
            Some(_) => self.parse(key).map(Some),
            None => Ok(None),
        }
    }
}

impl FromStr for DeviceConfig {
    type Err = DeviceError;

    /// Nested objects become dotted keys on top of the defaults
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tree: Value = serde_json::from_str(text)?;
        let mut config = Self::default();
        flatten(&mut config.values, String::new(), &tree);
        Ok(config)
    }
}

/// Parse the text of a configuration key, `None` meaning the key is not set
pub(crate) fn parse_value<T>(key: &str, value: Option<&str>) -> Result<T, DeviceError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = value.ok_or_else(|| DeviceError::Config {
        key: key.to_owned(),
        reason: "not set".to_owned(),
    })?;
    value.trim().parse().map_err(|e: T::Err| DeviceError::Config {
        key: key.to_owned(),
        reason: e.to_string(),
    })
}

fn flatten(values: &mut BTreeMap<String, String>, prefix: String, node: &Value) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(values, path, child);
            }
        }
        Value::String(text) => {
            values.insert(prefix, text.clone());
        }
        Value::Null => {}
        other => {
            values.insert(prefix, other.to_string());
        }
    }
}
