//! Session persistence.
//!
//! The editing session is saved after every change and restored on start-up.
//! Stores are swappable behind the [`SessionStore`] trait:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  TimesheetEditor (services/editor.rs)        │
//! └──────────────────────┬───────────────────────┘
//!                        │ load / save / clear
//! ┌──────────────────────▼───────────────────────┐
//! │  SessionStore trait (session_store.rs)       │
//! │  - snapshot encoding + checksum              │
//! └──────────────────────┬───────────────────────┘
//!            ┌───────────┴────────────┐
//! ┌──────────▼─────────┐   ┌──────────▼─────────┐
//! │ MemorySessionStore │   │ FileSessionStore   │
//! │ (in-memory)        │   │ (JSON file)        │
//! └────────────────────┘   └────────────────────┘
//! ```

pub mod factory;
pub mod session_store;
pub mod snapshot;
pub mod stores;

pub use factory::{SessionStoreFactory, StoreType};
pub use session_store::SessionStore;
pub use snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
pub use stores::{FileSessionStore, MemorySessionStore};
