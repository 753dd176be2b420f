mod error;
mod execute;
mod io;
mod report;
mod spec;

#[cfg(test)]
mod tests;

pub use error::{Result, SessionError};
pub use execute::{render_section, run_session};
pub use io::{load_session, save_report};
pub use report::{SessionReport, StepReport};
pub use spec::{BidirectionalAnswer, HostFixture, SessionSpec, SessionStep};
