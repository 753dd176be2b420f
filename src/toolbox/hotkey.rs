use serde::{Deserialize, Serialize};

use crate::model::ModeSnapshot;
use crate::store::ModeStore;

/// Element holding keyboard focus when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    #[default]
    None,
    Input,
    TextArea,
    ContentEditable,
    Other,
}

impl FocusTarget {
    pub const fn accepts_text(self) -> bool {
        matches!(self, Self::Input | Self::TextArea | Self::ContentEditable)
    }
}

/// A key-down event shared by every mounted toolbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub focus: FocusTarget,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, focus: FocusTarget) -> Self {
        Self {
            key: key.into(),
            focus,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    fn single_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(key), None) => Some(key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HotkeyAction {
    ToggleLiveMode,
    TogglePosNeg,
    ToggleRefineNew,
    CycleModel,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 4] = [
        Self::ToggleLiveMode,
        Self::TogglePosNeg,
        Self::ToggleRefineNew,
        Self::CycleModel,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ToggleLiveMode => "Live Mode",
            Self::TogglePosNeg => "Pos/Neg",
            Self::ToggleRefineNew => "Refine/New",
            Self::CycleModel => "Model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum KeyOutcome {
    Unmatched,
    /// Focus is in a text control; the key is left to it.
    TextFocus,
    /// Another toolbox already handled this press.
    AlreadyHandled,
    Suppressed,
    Applied {
        action: HotkeyAction,
        changed: bool,
    },
}

/// Keyboard listener for a single mode toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyRouter {
    action: HotkeyAction,
    key: char,
}

impl HotkeyRouter {
    pub fn new(action: HotkeyAction, key: char) -> Self {
        Self { action, key }
    }

    pub fn action(&self) -> HotkeyAction {
        self.action
    }

    pub fn key(&self) -> char {
        self.key
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        event
            .single_char()
            .is_some_and(|key| key.eq_ignore_ascii_case(&self.key))
    }

    /// Toggles the router's mode from the caller's view of the modes and
    /// writes the result to the store.
    pub fn route(&self, event: &mut KeyEvent, view: &ModeSnapshot, store: &ModeStore) -> KeyOutcome {
        if !self.matches(event) {
            return KeyOutcome::Unmatched;
        }
        if event.focus.accepts_text() {
            return KeyOutcome::TextFocus;
        }
        if event.is_default_prevented() {
            return KeyOutcome::AlreadyHandled;
        }

        event.prevent_default();
        let changed = match self.action {
            HotkeyAction::ToggleLiveMode => {
                let enabled = !view.live_mode;
                tracing::info!(enabled, key = %self.key, "live mode toggled via hotkey");
                store.set_live_mode(enabled)
            }
            HotkeyAction::TogglePosNeg => {
                let enabled = !view.pos_neg;
                tracing::info!(enabled, key = %self.key, "pos/neg toggled via hotkey");
                store.set_pos_neg(enabled)
            }
            HotkeyAction::ToggleRefineNew => {
                let enabled = !view.refine_new;
                tracing::info!(enabled, key = %self.key, "refine/new toggled via hotkey");
                store.set_refine_new(enabled)
            }
            HotkeyAction::CycleModel => {
                let model = view.selected_model.next();
                tracing::info!(%model, key = %self.key, "model selection toggled via hotkey");
                store.set_selected_model(model)
            }
        };
        KeyOutcome::Applied {
            action: self.action,
            changed,
        }
    }
}
