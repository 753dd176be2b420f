mod command;
mod error;
mod memory;
mod services;


pub use command::{Command, CommandDispatcher};
pub use error::{HostError, Result};
pub use memory::InMemoryHost;
pub use services::{
    AnnotationVisibility, HostServices, IdentityTranslator, SegmentationService, ToolbarService,
    Translator,
};
