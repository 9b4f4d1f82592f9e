//! Storage layer for Grocer.
//!
//! Scheduler state is reached only through the [`StateStore`] capability, which the
//! planner is handed explicitly. Item configuration records live behind
//! [`ItemStore`].
//!
//! - [`JsonStateStore`]: single JSON document, replaced atomically on every write
//! - [`MemoryStateStore`]: volatile, for tests and embedding
//! - [`JsonlItemStore`]: item records as JSON lines

mod jsonl;
mod memory;
mod snapshot;
mod state_file;
mod traits;

pub use jsonl::{ITEMS_FILE_NAME, JsonlItemStore};
pub use memory::MemoryStateStore;
pub use snapshot::StateSnapshot;
pub use state_file::{JsonStateStore, STATE_FILE_NAME};
pub use traits::{ItemStore, StateStore};
