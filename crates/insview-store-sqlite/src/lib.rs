//! SQLite backend for the insview policy store.
//!
//! Wraps [`tokio_rusqlite`] so database access runs off the async runtime.
//! A connection is opened for each operation and released when it returns.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
