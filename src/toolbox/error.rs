use thiserror::Error;

use crate::host::HostError;
use crate::model::SectionId;

pub type Result<T> = std::result::Result<T, ToolboxError>;

#[derive(Debug, Error)]
pub enum ToolboxError {
    #[error(
        "toolbox `{section_id}` accepts only button sections at the top level, but `{item_id}` is a button; create at least one button section"
    )]
    NotASection {
        section_id: SectionId,
        item_id: String,
    },

    #[error("toolbox `{0}` is locked")]
    Locked(SectionId),

    #[error("toolbox `{section_id}` has no {control} control")]
    ControlUnavailable {
        section_id: SectionId,
        control: &'static str,
    },

    #[error("query must not be empty")]
    EmptyQuery,

    #[error("invalid toolbox settings: {0}")]
    InvalidSettings(String),

    #[error("host capability failed: {0}")]
    Host(#[from] HostError),

    #[error("settings I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("settings YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
}
