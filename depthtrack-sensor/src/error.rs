use std::path::PathBuf;
use thiserror::Error;

use crate::Module;

#[derive(Debug, Error)]
pub enum DeviceError {
    /// The tracker refuses to run, the device is unusable for this module
    #[error("license not acquired for the {0} module")]
    LicenseNotAcquired(Module),

    #[error("the {0} module was not enabled")]
    ModuleNotEnabled(Module),

    #[error("device is not running")]
    NotRunning,

    #[error("invalid value for {key}: {reason}")]
    Config { key: String, reason: String },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
