use things::error::ThingError;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Frame group needs {expected} sprites. Have ({have})")]
    SpriteCountMismatch { expected: usize, have: usize },
    #[error("Sprite sheet should be {expected:?}. Have {have:?}")]
    SheetSizeMismatch {
        expected: (u32, u32),
        have: (u32, u32),
    },
    #[error("Invalid thing data: {source}")]
    Thing {
        #[from]
        source: ThingError,
    },
}
