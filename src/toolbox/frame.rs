use serde::Serialize;

use crate::model::{SectionId, SelectedModel, ToolOptions};

/// Render output of one toolbox: what a panel host should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolboxFrame {
    pub section_id: SectionId,
    pub header: HeaderFrame,
    pub open: bool,
    /// `None` while collapsed by the lock.
    pub body: Option<BodyFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFrame {
    pub title: String,
    pub lock: Option<LockControl>,
    /// Present when the host ships a configuration panel; the flag tells
    /// whether it is expanded.
    pub config_gear: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockControl {
    pub locked: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyFrame {
    pub config_open: bool,
    pub sections: Vec<SectionFrame>,
    pub active_options: Option<ToolOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFrame {
    pub section_id: SectionId,
    pub mode_bar: Option<ModeBarFrame>,
    pub replace_new: Option<bool>,
    pub buttons: Vec<ButtonFrame>,
    pub query_panel: Option<QueryPanelFrame>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonFrame {
    pub id: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeBarFrame {
    pub live_mode: bool,
    pub pos_neg: bool,
    pub refine_new: bool,
    pub selected_model: SelectedModel,
    pub models: Vec<ModelChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelChoice {
    pub id: &'static str,
    pub label: &'static str,
}

impl ModelChoice {
    pub fn all() -> Vec<Self> {
        SelectedModel::ALL
            .into_iter()
            .map(|model| Self {
                id: model.id(),
                label: model.label(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPanelFrame {
    pub instruction: String,
    pub query: String,
    pub start_slice: Option<i64>,
    pub end_slice: Option<i64>,
    pub run_enabled: bool,
    /// Shown verbatim.
    pub result: Option<String>,
}
