mod error;
mod lock;
mod mode;
mod node;
mod segment;


pub use error::{ModelError, Result};
pub use lock::{LockState, PreLockModes};
pub use mode::{ModeSnapshot, QueryBundle, SelectedModel};
pub use node::{SectionId, ToolNode, ToolOptions};
pub use segment::{
    Bidirectional, BidirectionalState, CachedStats, NamedStats, Segment, Segmentation,
};
