use crate::{FrameGroupKind, ThingCategory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThingError {
    #[error("Frame group {field} must be at least 1")]
    InvalidDimension { field: &'static str },
    #[error("Frame group has {total} sprites, max is {max}")]
    TooManySprites { total: usize, max: usize },
    #[error("Frame group has {frames} frames but {durations} frame durations")]
    AnimationMismatch { frames: u8, durations: usize },
    #[error("Frame group {kind:?} needs {expected} sprite ids. Have ({have})")]
    SpriteIndexMismatch {
        kind: FrameGroupKind,
        expected: usize,
        have: usize,
    },
    #[error("Mismatched sprite count for {kind:?}. Expect ({expected}). Have ({have})")]
    SpriteCountMismatch {
        kind: FrameGroupKind,
        expected: usize,
        have: usize,
    },
    #[error("Sprite {slot} of {kind:?} is id {have}, frame group points at {expected}")]
    SpriteIdMismatch {
        kind: FrameGroupKind,
        slot: usize,
        expected: u32,
        have: u32,
    },
    #[error("Thing has no default frame group")]
    MissingDefaultGroup,
    #[error("A {category} cannot have a {kind:?} frame group")]
    UnexpectedGroup {
        kind: FrameGroupKind,
        category: ThingCategory,
    },
    #[error("Thing data has no sprites")]
    NoSprites,
    #[error("Invalid OBD version {version}")]
    InvalidObdVersion { version: u16 },
    #[error("Invalid client version {version}")]
    InvalidClientVersion { version: u16 },
    #[error("Sprite pixel buffer has {size} bytes, expect at most {max}")]
    SpriteDataSize { size: usize, max: usize },
    #[error("Palette code {code} is out of range")]
    InvalidPaletteCode { code: u8 },
}
