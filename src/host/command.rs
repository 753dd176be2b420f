use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Result;

/// Every command the toolbox issues through the host dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args")]
pub enum Command {
    #[serde(rename = "resetNninter")]
    ResetInteractiveState,
    #[serde(rename = "setToolActive", rename_all = "camelCase")]
    SetActiveTool { tool_name: String },
    #[serde(rename = "runSegmentBidirectional", rename_all = "camelCase")]
    ComputeBidirectional {
        segmentation_id: String,
        segment_index: u32,
    },
    #[serde(rename = "jumpToMeasurement")]
    JumpToAnnotation { uid: String },
    #[serde(rename = "testMedgemma", rename_all = "camelCase")]
    RunTextQuery {
        instruction: String,
        query: String,
        start_slice: Option<i64>,
        end_slice: Option<i64>,
    },
}

impl Command {
    pub fn set_active_tool(tool_name: impl Into<String>) -> Self {
        Self::SetActiveTool {
            tool_name: tool_name.into(),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ResetInteractiveState => "resetNninter",
            Self::SetActiveTool { .. } => "setToolActive",
            Self::ComputeBidirectional { .. } => "runSegmentBidirectional",
            Self::JumpToAnnotation { .. } => "jumpToMeasurement",
            Self::RunTextQuery { .. } => "testMedgemma",
        }
    }
}

/// Host command registry. Implementations perform the actual work
/// (inference, tool activation, navigation).
pub trait CommandDispatcher: Send + Sync {
    fn run(&self, command: &Command) -> Result<Value>;
}
