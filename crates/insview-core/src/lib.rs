//! Core types and trait definitions for the insview policy browser.
//!
//! This crate is free of database and terminal dependencies. The SQLite
//! backend and the CLI both depend on it.

// Native `async fn` in traits; the returned futures are bounded `Send`
// explicitly where it matters.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod field;
pub mod filter;
pub mod policy;
pub mod store;

pub use error::{Error, Result};
