//! Neowatch library
//!
//! Exposes the fetch-normalize-cache-query pipeline and the CLI definitions
//! for use by the binary and by integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod sync;
