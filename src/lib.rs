pub mod cli;
pub mod host;
pub mod measurement;
pub mod model;
pub mod runtime;
pub mod session;
pub mod store;
pub mod toolbox;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
