use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::Command;
use crate::model::ModeSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub index: usize,
    pub step: String,
    pub outcome: Value,
    /// Set when the step failed; later steps still run.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_name: Option<String>,
    pub steps: Vec<StepReport>,
    pub dispatched: Vec<Command>,
    pub interactions: Vec<String>,
    pub active_tool: Option<String>,
    pub final_modes: ModeSnapshot,
}

impl SessionReport {
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|step| step.error.is_some())
    }
}
