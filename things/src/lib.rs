//! In-memory model of a thing, its frame groups and sprites.
pub mod error;
mod frame_group;
mod outfit;
mod properties;
mod sprite;
mod thing_data;
mod types;

pub use frame_group::*;
pub use outfit::*;
pub use properties::*;
pub use sprite::*;
pub use thing_data::*;
pub use types::*;
