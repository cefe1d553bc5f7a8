//! Sprite sheets of frame groups and outfit colors.
pub mod color;
mod colorize;
mod composer;
pub mod error;

pub use colorize::*;
pub use composer::*;
