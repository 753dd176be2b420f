use thiserror::Error;

pub type Result<T> = std::result::Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("unknown button section: {0}")]
    UnknownSection(String),

    #[error("unknown segmentation: {0}")]
    UnknownSegmentation(String),

    #[error("segmentation `{segmentation_id}` has no segment {segment_index}")]
    UnknownSegment {
        segmentation_id: String,
        segment_index: u32,
    },
}
