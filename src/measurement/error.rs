use thiserror::Error;

use crate::host::HostError;

pub type Result<T> = std::result::Result<T, MeasurementError>;

#[derive(Debug, Error)]
pub enum MeasurementError {
    #[error("unknown segmentation `{0}`")]
    UnknownSegmentation(String),

    #[error("segmentation `{segmentation_id}` has no segment {segment_index}")]
    UnknownSegment {
        segmentation_id: String,
        segment_index: u32,
    },

    #[error("segment {segment_index} of `{segmentation_id}` has no bidirectional measurement yet")]
    NotReady {
        segmentation_id: String,
        segment_index: u32,
    },

    #[error("host capability failed: {0}")]
    Host(#[from] HostError),
}
