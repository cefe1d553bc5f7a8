use crate::error::ThingError;

/// Edge of a sprite in pixels.
pub const SPRITE_DEFAULT_SIZE: usize = 32;
/// Bytes in a 32x32 RGBA sprite.
pub const SPRITE_DATA_SIZE: usize = SPRITE_DEFAULT_SIZE * SPRITE_DEFAULT_SIZE * 4;
/// Id of sprites made up in memory, not loaded from a store.
pub const PLACEHOLDER_SPRITE_ID: u32 = 0xFFFFFFFF;

pub type SpritePixels = Box<[u8; SPRITE_DATA_SIZE]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteData {
    pub id: u32,
    /// RGBA, row major.
    pub pixels: Option<SpritePixels>,
}

impl SpriteData {
    pub fn new(id: u32, pixels: SpritePixels) -> Self {
        Self {
            id,
            pixels: Some(pixels),
        }
    }

    pub fn empty(id: u32) -> Self {
        Self { id, pixels: None }
    }

    /// Takes a buffer of at most [`SPRITE_DATA_SIZE`] bytes. Shorter ones are zero padded.
    pub fn from_bytes(id: u32, bytes: &[u8]) -> Result<Self, ThingError> {
        if bytes.len() > SPRITE_DATA_SIZE {
            return Err(ThingError::SpriteDataSize {
                size: bytes.len(),
                max: SPRITE_DATA_SIZE,
            });
        }

        let mut pixels: SpritePixels = Box::new([0u8; SPRITE_DATA_SIZE]);
        pixels[..bytes.len()].copy_from_slice(bytes);

        Ok(Self::new(id, pixels))
    }

    /// No pixels, or only fully transparent ones.
    pub fn is_empty(&self) -> bool {
        match &self.pixels {
            Some(pixels) => pixels.chunks_exact(4).all(|pixel| pixel[3] == 0),
            None => true,
        }
    }
}
