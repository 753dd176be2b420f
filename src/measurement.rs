mod error;
mod format;
mod trigger;

#[cfg(test)]
mod tests;

pub use error::{MeasurementError, Result};
pub use format::round_for_display;
pub use trigger::{BidirectionalTrigger, MeasurementReadout, MeasurementView};
