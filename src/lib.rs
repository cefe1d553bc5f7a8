//! Editing things of the game client one OBD file at a time.
//!
//! The format work lives in the member crates. This crate ties them to a config file
//! and to the file system.
pub mod batch;
pub mod config;
pub mod export;
mod utils;
pub mod workspace;

pub use obd;
pub use sheet;
pub use things;
pub use versions;
