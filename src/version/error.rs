use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed version {input:?}: expected \"<major>.<minor>\"")]
pub struct MalformedVersionError {
    pub input: String,
}

impl MalformedVersionError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
