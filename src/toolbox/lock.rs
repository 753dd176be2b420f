use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::host::{Command, CommandDispatcher};

use super::reactions::run_best_effort;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "camelCase")]
pub enum InteractionRoute {
    Forwarded,
    /// Swallowed while locked; the safe tool was re-activated instead.
    Redirected,
}

/// Keeps the safe tool active while the AI toolbox is locked.
pub struct LockSupervisor {
    safe_tool: String,
    commands: Arc<dyn CommandDispatcher>,
}

impl fmt::Debug for LockSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockSupervisor")
            .field("safe_tool", &self.safe_tool)
            .finish_non_exhaustive()
    }
}

impl LockSupervisor {
    pub fn new(safe_tool: impl Into<String>, commands: Arc<dyn CommandDispatcher>) -> Self {
        Self {
            safe_tool: safe_tool.into(),
            commands,
        }
    }

    pub fn safe_tool(&self) -> &str {
        &self.safe_tool
    }

    pub fn force_safe_tool(&self) {
        run_best_effort(
            self.commands.as_ref(),
            &Command::set_active_tool(&self.safe_tool),
        );
    }

    /// Decides whether a tool press may reach the toolbar dispatcher.
    pub fn route(&self, locked: bool, item_id: &str) -> InteractionRoute {
        if locked && item_id != self.safe_tool {
            tracing::debug!(item_id, safe_tool = %self.safe_tool, "tool change blocked while locked");
            self.force_safe_tool();
            return InteractionRoute::Redirected;
        }
        InteractionRoute::Forwarded
    }
}
