//! Key-value persistence for future-signals.
//!
//! Small JSON records (device identity, verification flag) live behind the
//! `PersistenceStore` trait. One store is built at startup and handed to the
//! components that need it.

pub mod error;
pub mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use store::{DynStore, JsonFileStore, MemoryStore, PersistenceStore};
