use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::SectionId;
use crate::runtime::read_document;

use super::{HotkeyAction, Result, ToolboxError};

/// Per-mount options a host passes when placing a toolbox in a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolboxConfig {
    pub section_id: SectionId,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub default_open: bool,
}

impl ToolboxConfig {
    pub fn new(section_id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            title: title.into(),
            default_open: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Which auxiliary surfaces a toolbox carries, derived from its section id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolboxKind {
    /// Mode bar, lock control, subject to locking.
    Ai,
    /// Replace/new toggle.
    TextPrompt,
    /// Free-text query panel.
    Diagnostic,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotkeyBindings {
    pub live_mode: char,
    pub pos_neg: char,
    pub refine_new: char,
    pub model_cycle: char,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            live_mode: 'q',
            pos_neg: 'w',
            refine_new: 'e',
            model_cycle: 't',
        }
    }
}

impl HotkeyBindings {
    pub fn key_for(&self, action: HotkeyAction) -> char {
        match action {
            HotkeyAction::ToggleLiveMode => self.live_mode,
            HotkeyAction::TogglePosNeg => self.pos_neg,
            HotkeyAction::ToggleRefineNew => self.refine_new,
            HotkeyAction::CycleModel => self.model_cycle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolboxSettings {
    pub ai_section: SectionId,
    pub text_prompt_section: SectionId,
    pub diagnostic_section: SectionId,
    /// Tool forced active while the AI toolbox is locked.
    pub safe_tool: String,
    /// Buttons the diagnostic toolbox replaces with its own query panel.
    pub hidden_buttons: Vec<String>,
    pub hotkeys: HotkeyBindings,
    pub translation_scope: String,
    pub measurement_scope: String,
}

impl Default for ToolboxSettings {
    fn default() -> Self {
        Self {
            ai_section: SectionId::new("aiToolBox"),
            text_prompt_section: SectionId::new("textPromptSegmentationToolbox"),
            diagnostic_section: SectionId::new("testMedgemmaToolbox"),
            safe_tool: "Pan".to_string(),
            hidden_buttons: vec!["testMedgemma".to_string()],
            hotkeys: HotkeyBindings::default(),
            translation_scope: "Toolbox".to_string(),
            measurement_scope: "SegmentationTable".to_string(),
        }
    }
}

impl ToolboxSettings {
    pub fn kind_of(&self, section_id: &SectionId) -> ToolboxKind {
        if *section_id == self.ai_section {
            ToolboxKind::Ai
        } else if *section_id == self.text_prompt_section {
            ToolboxKind::TextPrompt
        } else if *section_id == self.diagnostic_section {
            ToolboxKind::Diagnostic
        } else {
            ToolboxKind::Plain
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.safe_tool.trim().is_empty() {
            return Err(ToolboxError::InvalidSettings(
                "safe tool name must not be empty".to_string(),
            ));
        }
        let mut keys = HotkeyAction::ALL
            .iter()
            .map(|action| self.hotkeys.key_for(*action).to_ascii_lowercase())
            .collect::<Vec<_>>();
        if let Some(key) = keys.iter().find(|key| !key.is_ascii_alphanumeric()) {
            return Err(ToolboxError::InvalidSettings(format!(
                "hotkey `{key}` must be a letter or digit"
            )));
        }
        keys.sort_unstable();
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ToolboxError::InvalidSettings(format!(
                "hotkey `{}` is bound to more than one mode",
                pair[0]
            )));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Self = read_document::<_, ToolboxError>(path.as_ref())?;
        settings.validate()?;
        Ok(settings)
    }
}
