use serde::Serialize;

use crate::model::SelectedModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryField {
    Instruction,
    Query,
    StartSlice,
    EndSlice,
    Result,
}

/// One effective change to the mode store, carrying the new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ModeChange {
    LiveMode(bool),
    PosNeg(bool),
    RefineNew(bool),
    PromptReplaceNew(bool),
    SelectedModel(SelectedModel),
    Locked(bool),
    ActiveSegment(u32),
    Query(QueryField),
}
