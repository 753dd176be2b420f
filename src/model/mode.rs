use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{LockState, ModelError};

/// Prompt model driving interactive segmentation, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectedModel {
    #[default]
    #[serde(rename = "nnInteractive")]
    NnInteractive,
    Sam2,
    MedSam2,
    Sam3,
}

impl SelectedModel {
    pub const ALL: [SelectedModel; 4] = [
        Self::NnInteractive,
        Self::Sam2,
        Self::MedSam2,
        Self::Sam3,
    ];

    pub const fn next(self) -> Self {
        match self {
            Self::NnInteractive => Self::Sam2,
            Self::Sam2 => Self::MedSam2,
            Self::MedSam2 => Self::Sam3,
            Self::Sam3 => Self::NnInteractive,
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::NnInteractive => "nnInteractive",
            Self::Sam2 => "sam2",
            Self::MedSam2 => "medsam2",
            Self::Sam3 => "sam3",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NnInteractive => "nnInteractive",
            Self::Sam2 => "SAM2",
            Self::MedSam2 => "MedSAM2",
            Self::Sam3 => "SAM3",
        }
    }

    /// The default interactive model is the only one holding server-side
    /// prompt state that needs resetting.
    pub const fn is_default_interactive(self) -> bool {
        matches!(self, Self::NnInteractive)
    }
}

impl fmt::Display for SelectedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SelectedModel {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.id().eq_ignore_ascii_case(value))
            .ok_or_else(|| ModelError::UnknownModel(value.to_string()))
    }
}

/// Request/response state for the free-text query workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryBundle {
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub start_slice: Option<i64>,
    #[serde(default)]
    pub end_slice: Option<i64>,
    #[serde(default)]
    pub result: Option<String>,
}

impl QueryBundle {
    pub fn is_runnable(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Owned copy of every mode flag plus the query bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSnapshot {
    pub live_mode: bool,
    pub pos_neg: bool,
    pub refine_new: bool,
    pub prompt_replace_new: bool,
    pub selected_model: SelectedModel,
    pub lock: LockState,
    pub active_segment_index: u32,
    pub query: QueryBundle,
}

impl Default for ModeSnapshot {
    fn default() -> Self {
        Self {
            live_mode: true,
            pos_neg: false,
            refine_new: false,
            prompt_replace_new: false,
            selected_model: SelectedModel::default(),
            lock: LockState::Unlocked,
            active_segment_index: 1,
            query: QueryBundle::default(),
        }
    }
}

impl ModeSnapshot {
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}
