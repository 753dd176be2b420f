mod change;
mod mode_store;
mod subscription;

#[cfg(test)]
mod tests;

pub use change::{ModeChange, QueryField};
pub use mode_store::ModeStore;
pub use subscription::{Listener, Subscription};
