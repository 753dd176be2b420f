use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::toolbox::HotkeyAction;

#[derive(Debug, Parser)]
#[command(
    name = "seg-toolbox",
    version,
    about = "Segmentation toolbox session driver"
)]
pub(super) struct Cli {
    /// Toolbox settings file (YAML or JSON) overriding the session's own.
    #[arg(long, global = true)]
    pub(super) settings: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Replays a scripted session against an in-memory host and prints the report.
    Replay {
        session: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Renders one toolbox on the session's host fixture.
    Render {
        session: PathBuf,
        #[arg(long)]
        section: String,
    },
    /// Prints the hotkey bindings.
    Hotkeys,
}

#[derive(Debug, Serialize)]
pub(super) struct HotkeyRow {
    pub(super) key: char,
    pub(super) action: HotkeyAction,
    pub(super) label: &'static str,
}
