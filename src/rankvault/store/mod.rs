//! # Storage Layer
//!
//! The whole account tree lives in memory for the lifetime of the process and
//! is written back wholesale after every mutation. The [`AccountStore`] trait
//! is the seam between that in-memory tree and where it is persisted.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage
//!   - One JSON document, `accounts.json`, in the data directory
//!   - Created as `{"servers": []}` on first use
//!   - Each persist writes a temp file and renames it over the old one, so a
//!     crash mid-write leaves the previous durable state in place
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence, but counts persist calls
//!   - Can be told to fail persists, to exercise error paths
//!
//! ## Single writer
//!
//! A store has exactly one owner. Background work (the rank refresh worker)
//! never holds a store; it sends events to the owning thread, which applies
//! them one read-mutate-persist step at a time. See `fetch`.

use crate::error::Result;
use crate::model::Root;

pub mod fs;
pub mod memory;

/// Abstract interface for the persisted account tree.
pub trait AccountStore {
    /// The current in-memory tree.
    fn root(&self) -> &Root;

    /// Mutable access. Callers must follow every mutation with [`persist`](Self::persist).
    fn root_mut(&mut self) -> &mut Root;

    /// Write the full tree to durable storage.
    fn persist(&mut self) -> Result<()>;
}
