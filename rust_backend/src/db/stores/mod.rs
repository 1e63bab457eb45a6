//! Session store implementations.

pub mod file;
pub mod memory;

pub use file::{FileSessionStore, DEFAULT_SESSION_FILE};
pub use memory::MemorySessionStore;
