use thiserror::Error;

/// Failure to map an instances document
#[derive(Debug, Error)]
pub enum InstancesError {
    /// The text is not well-formed JSON
    #[error("instances document is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// Well-formed JSON that does not follow the instances schema
    #[error("instances document does not match the schema: {0}")]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Error)]
pub enum SchemaError {
    /// Missing key or value of the wrong type
    #[error("{0}")]
    Field(#[source] serde_json::Error),

    #[error("instance id must be 1 or greater, got {0}")]
    InvalidId(i32),

    #[error("instance {id} has {found} face landmarks, expected 0 or {expected}")]
    LandmarkCount { id: i32, expected: usize, found: usize },
}
