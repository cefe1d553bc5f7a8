//! Client version and sprite dimension catalogs.
pub mod error;
mod storage;
mod types;
mod xml;

pub use storage::*;
pub use types::*;
