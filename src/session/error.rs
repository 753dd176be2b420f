use thiserror::Error;

use crate::measurement::MeasurementError;
use crate::model::SectionId;
use crate::toolbox::ToolboxError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session parse failure: {0}")]
    Parse(String),

    #[error("no toolbox is mounted for section `{0}`")]
    NotMounted(SectionId),

    #[error("session I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("session serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("session YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("toolbox step failed: {0}")]
    Toolbox(#[from] ToolboxError),

    #[error("measurement step failed: {0}")]
    Measurement(#[from] MeasurementError),
}
