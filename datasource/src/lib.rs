//! `warden-datasource` — the read-only key/value mapping consulted by the
//! guest's data callback.
//!
//! The data source is populated exactly once, before any permission check
//! runs, and is never mutated afterward. It is passed by reference
//! (`Arc<dyn DataSource>`) into the bridge's host state — never held as
//! ambient global state. Values are stored as already-serialized JSON
//! text and handed to the guest verbatim.

pub mod error;
pub mod mem_source;
pub mod source;

pub use error::DataSourceError;
pub use mem_source::MemSource;
pub use source::DataSource;
