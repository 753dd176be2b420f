use serde::{Deserialize, Serialize};

use super::SelectedModel;

/// Mode flags as they stood when the toolbox was locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreLockModes {
    pub live_mode: bool,
    pub pos_neg: bool,
    pub refine_new: bool,
    pub prompt_replace_new: bool,
    pub selected_model: SelectedModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum LockState {
    #[default]
    Unlocked,
    Locked { before: PreLockModes },
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }

    pub fn before(&self) -> Option<&PreLockModes> {
        match self {
            Self::Locked { before } => Some(before),
            Self::Unlocked => None,
        }
    }
}
