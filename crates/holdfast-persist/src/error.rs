/// Errors that can occur while decoding persisted values.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("unrecognized persisted value {value:?} for key {key:?}")]
    CorruptFlag { key: String, value: String },

    #[error("anchor value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
