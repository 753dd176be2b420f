use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bidirectional {
    pub major_extent: f64,
    pub minor_extent: f64,
    pub unit: String,
    pub annotation_uid: String,
}

impl Bidirectional {
    /// Longer extent, whichever of the two carries it.
    pub fn length(&self) -> f64 {
        self.major_extent.max(self.minor_extent)
    }

    pub fn width(&self) -> f64 {
        self.major_extent.min(self.minor_extent)
    }
}

/// Cache slot for a segment's bidirectional measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BidirectionalState {
    #[default]
    Absent,
    Pending,
    Ready(Bidirectional),
    Failed { reason: String },
}

impl BidirectionalState {
    pub fn ready(&self) -> Option<&Bidirectional> {
        match self {
            Self::Ready(bidirectional) => Some(bidirectional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NamedStats {
    #[serde(default)]
    pub bidirectional: BidirectionalState,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CachedStats {
    #[serde(default)]
    pub named_stats: Option<NamedStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub cached_stats: CachedStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    #[serde(default)]
    pub segments: BTreeMap<u32, Segment>,
}

impl Segmentation {
    pub fn named_stats(&self, segment_index: u32) -> Option<&NamedStats> {
        self.segments
            .get(&segment_index)
            .and_then(|segment| segment.cached_stats.named_stats.as_ref())
    }
}
