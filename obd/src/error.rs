use things::{error::ThingError, ThingCategory};

/// Where decoding was when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    VersionTag,
    Header,
    Properties,
    FrameGroups,
    Sprites,
}

/// Coarse classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    UnsupportedVersion,
    NotImplemented,
    InvalidArgument,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum ObdError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: &'static str },
    #[error("Unknown OBD version {version}")]
    UnknownObdVersion { version: u16 },
    #[error("OBD version {version} is not implemented")]
    NotImplemented { version: u16 },
    #[error("Client version {version} is not in the version catalog")]
    UnsupportedVersion { version: u16 },
    #[error("Unknown thing category {category}")]
    UnknownCategory { category: u8 },
    #[error("Unknown flag {flag:#04x} (previous flag {previous:02x?}) for {category} id {id}")]
    UnknownFlag {
        flag: u8,
        previous: Option<u8>,
        category: ThingCategory,
        id: u32,
    },
    #[error("Unexpected end of data while reading {stage:?}")]
    Truncated { stage: DecodeStage },
    #[error("Frame group has {total} sprites, max is {max}")]
    TooManySprites { total: usize, max: usize },
    #[error("Sprite {id} has {size} bytes of pixels, max is {max}")]
    SpriteTooLarge { id: u32, size: usize, max: usize },
    #[error("Invalid thing data: {source}")]
    Thing {
        #[from]
        source: ThingError,
    },
    #[error("Failed to compress: {source}")]
    Compression {
        #[source]
        source: std::io::Error,
    },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}

impl ObdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Self::IOError { .. } => ErrorKind::Io,
            Self::UnknownObdVersion { .. }
            | Self::UnknownCategory { .. }
            | Self::UnknownFlag { .. }
            | Self::Truncated { .. }
            | Self::TooManySprites { .. }
            | Self::SpriteTooLarge { .. }
            | Self::Thing { .. }
            | Self::Compression { .. } => ErrorKind::Format,
        }
    }
}
