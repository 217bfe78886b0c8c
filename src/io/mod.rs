//! Document formats, import/export and draft storage.

mod format;
mod input;
mod output;
mod store;

pub use format::DocumentFormat;
pub use input::{parse_document_str, read_document, read_typed};
pub use output::{OutputDestination, OutputOptions, emit, emit_serialize};
pub use store::{DraftStore, FileStore, MemoryStore};
