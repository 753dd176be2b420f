use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::host::{AnnotationVisibility, InMemoryHost};
use crate::model::{Bidirectional, SectionId, Segmentation, SelectedModel, ToolNode};
use crate::toolbox::{FocusTarget, ToolboxConfig, ToolboxSettings};

use super::{Result, SessionError};

/// A scripted toolbox session: host state, mounted toolboxes and the user
/// actions to replay against them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpec {
    pub name: Option<String>,
    #[serde(default)]
    pub settings: ToolboxSettings,
    #[serde(default)]
    pub fixture: HostFixture,
    #[serde(default)]
    pub toolboxes: Vec<ToolboxConfig>,
    #[serde(default)]
    pub steps: Vec<SessionStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HostFixture {
    pub sections: BTreeMap<SectionId, Vec<ToolNode>>,
    pub config_panels: Vec<SectionId>,
    pub segmentations: BTreeMap<String, Segmentation>,
    pub hidden_annotations: Vec<String>,
    /// Host command names the dispatcher rejects.
    pub failing_commands: Vec<String>,
    pub bidirectional_answers: Vec<BidirectionalAnswer>,
    pub query_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BidirectionalAnswer {
    pub segmentation_id: String,
    pub segment_index: u32,
    pub answer: Bidirectional,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum SessionStep {
    /// One key press delivered to every mounted toolbox in mount order.
    #[serde(rename_all = "camelCase")]
    Key {
        key: String,
        #[serde(default)]
        focus: FocusTarget,
    },
    Interact {
        section: SectionId,
        item: String,
    },
    ToggleLock {
        section: SectionId,
    },
    ToggleConfig {
        section: SectionId,
    },
    SetLiveMode {
        section: SectionId,
        enabled: bool,
    },
    SetPosNeg {
        section: SectionId,
        enabled: bool,
    },
    SetRefineNew {
        section: SectionId,
        enabled: bool,
    },
    SelectModel {
        section: SectionId,
        model: SelectedModel,
    },
    SetReplaceNew {
        section: SectionId,
        enabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    SetQuery {
        section: SectionId,
        #[serde(default)]
        instruction: Option<String>,
        #[serde(default)]
        query: Option<String>,
        #[serde(default)]
        start_slice: Option<i64>,
        #[serde(default)]
        end_slice: Option<i64>,
    },
    RunQuery {
        section: SectionId,
    },
    SetActiveSegment {
        index: u32,
    },
    Render {
        section: SectionId,
    },
    /// Mounts a fresh trigger, replacing any earlier one for the segment.
    #[serde(rename_all = "camelCase")]
    MountMeasurement {
        segmentation_id: String,
        segment_index: u32,
    },
    #[serde(rename_all = "camelCase")]
    RenderMeasurement {
        segmentation_id: String,
        segment_index: u32,
    },
    #[serde(rename_all = "camelCase")]
    ToggleAnnotation {
        segmentation_id: String,
        segment_index: u32,
    },
}

impl SessionStep {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Key { .. } => "key",
            Self::Interact { .. } => "interact",
            Self::ToggleLock { .. } => "toggleLock",
            Self::ToggleConfig { .. } => "toggleConfig",
            Self::SetLiveMode { .. } => "setLiveMode",
            Self::SetPosNeg { .. } => "setPosNeg",
            Self::SetRefineNew { .. } => "setRefineNew",
            Self::SelectModel { .. } => "selectModel",
            Self::SetReplaceNew { .. } => "setReplaceNew",
            Self::SetQuery { .. } => "setQuery",
            Self::RunQuery { .. } => "runQuery",
            Self::SetActiveSegment { .. } => "setActiveSegment",
            Self::Render { .. } => "render",
            Self::MountMeasurement { .. } => "mountMeasurement",
            Self::RenderMeasurement { .. } => "renderMeasurement",
            Self::ToggleAnnotation { .. } => "toggleAnnotation",
        }
    }

    /// Section of the toolbox the step acts on, if any.
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Interact { section, .. }
            | Self::ToggleLock { section }
            | Self::ToggleConfig { section }
            | Self::SetLiveMode { section, .. }
            | Self::SetPosNeg { section, .. }
            | Self::SetRefineNew { section, .. }
            | Self::SelectModel { section, .. }
            | Self::SetReplaceNew { section, .. }
            | Self::SetQuery { section, .. }
            | Self::RunQuery { section }
            | Self::Render { section } => Some(section),
            Self::Key { .. }
            | Self::SetActiveSegment { .. }
            | Self::MountMeasurement { .. }
            | Self::RenderMeasurement { .. }
            | Self::ToggleAnnotation { .. } => None,
        }
    }
}

impl HostFixture {
    pub fn install(&self, host: &InMemoryHost) {
        for (section_id, nodes) in &self.sections {
            host.insert_section(section_id.clone(), nodes.clone());
        }
        for section_id in &self.config_panels {
            host.insert_config_panel(section_id.clone());
        }
        for (segmentation_id, segmentation) in &self.segmentations {
            host.insert_segmentation(segmentation_id.clone(), segmentation.clone());
        }
        for annotation_uid in &self.hidden_annotations {
            host.set_visible(annotation_uid, false);
        }
        for command_name in &self.failing_commands {
            host.fail_command(command_name.clone());
        }
        for answer in &self.bidirectional_answers {
            host.answer_bidirectional(
                answer.segmentation_id.clone(),
                answer.segment_index,
                answer.answer.clone(),
            );
        }
        if let Some(answer) = &self.query_answer {
            host.answer_query(answer.clone());
        }
    }
}

impl SessionSpec {
    pub fn validate(&self) -> Result<()> {
        if self.toolboxes.is_empty() {
            return Err(SessionError::Parse(
                "session must mount at least one toolbox".to_string(),
            ));
        }
        let mut mounted = BTreeSet::new();
        for config in &self.toolboxes {
            if !mounted.insert(&config.section_id) {
                return Err(SessionError::Parse(format!(
                    "toolbox `{}` is mounted more than once",
                    config.section_id
                )));
            }
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(section) = step.section()
                && !mounted.contains(section)
            {
                return Err(SessionError::Parse(format!(
                    "step {index} ({}) targets unmounted toolbox `{section}`",
                    step.kind()
                )));
            }
            if let SessionStep::Key { key, .. } = step
                && key.is_empty()
            {
                return Err(SessionError::Parse(format!(
                    "step {index} (key) has an empty key"
                )));
            }
        }
        self.settings.validate()?;
        Ok(())
    }
}
