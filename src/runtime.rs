mod context;
mod documents;

#[cfg(test)]
mod tests;

pub use context::AppContext;
pub(crate) use documents::{read_document, write_document};
