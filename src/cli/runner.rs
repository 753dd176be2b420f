use std::path::Path;

use clap::Parser;
use serde::Serialize;

use crate::model::SectionId;
use crate::session::{SessionSpec, load_session, render_section, run_session, save_report};
use crate::toolbox::{HotkeyAction, ToolboxSettings};

use super::types::{Cli, Commands, HotkeyRow};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let settings = cli
        .settings
        .as_deref()
        .map(ToolboxSettings::load)
        .transpose()
        .map_err(|error| error.to_string())?;

    match cli.command {
        Commands::Replay { session, report } => {
            let spec = load(&session, settings)?;
            let run_report = run_session(&spec).map_err(|error| error.to_string())?;
            if let Some(report_path) = report {
                save_report(report_path, &run_report).map_err(|error| error.to_string())?;
            }
            print_json(&run_report)?;
        }
        Commands::Render { session, section } => {
            let spec = load(&session, settings)?;
            let frame = render_section(&spec, &SectionId::new(section))
                .map_err(|error| error.to_string())?;
            print_json(&frame)?;
        }
        Commands::Hotkeys => {
            let settings = settings.unwrap_or_default();
            let rows = HotkeyAction::ALL
                .into_iter()
                .map(|action| HotkeyRow {
                    key: settings.hotkeys.key_for(action).to_ascii_uppercase(),
                    action,
                    label: action.label(),
                })
                .collect::<Vec<_>>();
            print_json(&rows)?;
        }
    }

    Ok(())
}

fn load(path: &Path, settings: Option<ToolboxSettings>) -> Result<SessionSpec, String> {
    let mut spec = load_session(path).map_err(|error| error.to_string())?;
    if let Some(settings) = settings {
        spec.settings = settings;
    }
    Ok(spec)
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|error| error.to_string())?
    );
    Ok(())
}
