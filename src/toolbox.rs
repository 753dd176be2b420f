mod config;
mod coordinator;
mod error;
mod frame;
mod hotkey;
mod lock;
mod reactions;
mod resolver;


pub use config::{HotkeyBindings, ToolboxConfig, ToolboxKind, ToolboxSettings};
pub use coordinator::Toolbox;
pub use error::{Result, ToolboxError};
pub use frame::{
    BodyFrame, ButtonFrame, HeaderFrame, LockControl, ModeBarFrame, ModelChoice, QueryPanelFrame,
    SectionFrame, ToolboxFrame,
};
pub use hotkey::{FocusTarget, HotkeyAction, HotkeyRouter, KeyEvent, KeyOutcome};
pub use lock::{InteractionRoute, LockSupervisor};
pub use resolver::resolve_active_options;

pub(crate) use reactions::{install as install_reactions, run_best_effort};
