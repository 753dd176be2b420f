use std::path::Path;

use crate::runtime::{read_document, write_document};

use super::{Result, SessionError, SessionReport, SessionSpec};

pub fn load_session(path: impl AsRef<Path>) -> Result<SessionSpec> {
    let spec: SessionSpec = read_document::<_, SessionError>(path.as_ref())?;
    spec.validate()?;
    Ok(spec)
}

pub fn save_report(path: impl AsRef<Path>, report: &SessionReport) -> Result<()> {
    write_document::<_, SessionError>(path.as_ref(), report)
}
