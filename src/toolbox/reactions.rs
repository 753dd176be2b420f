use std::sync::Arc;

use crate::host::{Command, CommandDispatcher};
use crate::store::{ModeChange, ModeStore, Subscription};

use super::LockSupervisor;

/// Side effects of mode transitions. Installed once per store so that
/// several mounted toolboxes never repeat them.
pub(crate) fn install(
    store: &ModeStore,
    commands: Arc<dyn CommandDispatcher>,
    supervisor: Arc<LockSupervisor>,
) -> Vec<Subscription> {
    let reset = store.subscribe(move |change, snapshot| {
        if *change == ModeChange::RefineNew(true)
            && snapshot.selected_model.is_default_interactive()
        {
            run_best_effort(commands.as_ref(), &Command::ResetInteractiveState);
        }
    });
    let lock = store.subscribe(move |change, _| {
        if *change == ModeChange::Locked(true) {
            supervisor.force_safe_tool();
        }
    });
    vec![reset, lock]
}

/// Failures are logged and dropped; a missed side effect must not take the
/// panel down with it.
pub(crate) fn run_best_effort(commands: &dyn CommandDispatcher, command: &Command) {
    if let Err(error) = commands.run(command) {
        tracing::warn!(command = command.name(), %error, "host command failed");
    }
}
