//! Frame group geometry and the index arithmetic over it.
//!
//! A frame group is a 7 dimensional grid of 32x32 sprites:
//! `frame > pattern z > pattern y > pattern x > layer > height > width`,
//! flattened with width varying fastest. A texture is one `width x height` tile,
//! the same grid minus the two innermost axes.
use crate::{
    error::ThingError, FrameGroupKind, ThingCategory, SPRITE_DATA_SIZE, SPRITE_DEFAULT_SIZE,
};

/// Upper bound on sprites in one group.
///
/// Shares its value with the pixel buffer size in bytes, not with anything about sprite counts.
pub const MAX_SPRITES_PER_GROUP: usize = SPRITE_DATA_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AnimationMode {
    #[default]
    Asynchronous = 0,
    Synchronous = 1,
}

impl AnimationMode {
    /// Anything that is not synchronous plays asynchronously.
    pub fn from_u8(value: u8) -> Self {
        if value == Self::Synchronous as u8 {
            Self::Synchronous
        } else {
            Self::Asynchronous
        }
    }
}

/// Milliseconds a frame stays on screen, randomised between the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDuration {
    pub minimum: u32,
    pub maximum: u32,
}

impl FrameDuration {
    pub fn new(minimum: u32, maximum: u32) -> Self {
        Self { minimum, maximum }
    }

    pub fn default_for(category: ThingCategory) -> Self {
        let duration = match category {
            ThingCategory::Item => 500,
            ThingCategory::Outfit => 300,
            ThingCategory::Effect | ThingCategory::Missile => 100,
        };

        Self::new(duration, duration)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    pub mode: AnimationMode,
    pub loop_count: i32,
    pub start_frame: i8,
    /// One per frame.
    pub durations: Vec<FrameDuration>,
}

/// (layer, pattern x, pattern y, pattern z, frame) of one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureCoord {
    pub layer: u8,
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub frame: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameGroup {
    /// In tiles.
    pub width: u8,
    /// In tiles.
    pub height: u8,
    /// Only meaningful when the group is bigger than one tile. Otherwise 32.
    pub exact_size: u8,
    pub layers: u8,
    pub pattern_x: u8,
    pub pattern_y: u8,
    pub pattern_z: u8,
    pub frames: u8,
    /// Present exactly when `frames > 1`.
    pub animation: Option<Animation>,
    pub sprite_index: Vec<u32>,
}

impl Default for FrameGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGroup {
    pub fn new() -> Self {
        Self {
            width: 1,
            height: 1,
            exact_size: SPRITE_DEFAULT_SIZE as u8,
            layers: 1,
            pattern_x: 1,
            pattern_y: 1,
            pattern_z: 1,
            frames: 1,
            animation: None,
            sprite_index: vec![0],
        }
    }

    pub fn is_animation(&self) -> bool {
        self.frames > 1
    }

    pub fn get_total_sprites(&self) -> usize {
        self.width as usize * self.height as usize * self.get_total_textures()
    }

    pub fn get_total_textures(&self) -> usize {
        self.layers as usize
            * self.pattern_x as usize
            * self.pattern_y as usize
            * self.pattern_z as usize
            * self.frames as usize
    }

    #[allow(clippy::too_many_arguments)]
    pub fn get_sprite_index(
        &self,
        width: u8,
        height: u8,
        layer: u8,
        x: u8,
        y: u8,
        z: u8,
        frame: u8,
    ) -> usize {
        (self.get_texture_index(layer, x, y, z, frame) * self.height as usize + height as usize)
            * self.width as usize
            + width as usize
    }

    pub fn get_texture_index(&self, layer: u8, x: u8, y: u8, z: u8, frame: u8) -> usize {
        let frame = frame as usize % self.frames.max(1) as usize;

        (((frame * self.pattern_z as usize + z as usize) * self.pattern_y as usize + y as usize)
            * self.pattern_x as usize
            + x as usize)
            * self.layers as usize
            + layer as usize
    }

    /// Texture columns in the sprite sheet.
    pub fn get_total_x(&self) -> usize {
        self.pattern_z as usize * self.pattern_x as usize * self.layers as usize
    }

    /// Texture rows in the sprite sheet.
    pub fn get_total_y(&self) -> usize {
        self.frames as usize * self.pattern_y as usize
    }

    /// Pixel (width, height) of the sprite sheet.
    pub fn get_sprite_sheet_size(&self) -> (u32, u32) {
        (
            (self.get_total_x() * self.width as usize * SPRITE_DEFAULT_SIZE) as u32,
            (self.get_total_y() * self.height as usize * SPRITE_DEFAULT_SIZE) as u32,
        )
    }

    /// Every texture coordinate, frame outermost and layer innermost.
    pub fn texture_coords(&self) -> impl Iterator<Item = TextureCoord> {
        let (frames, pattern_z, pattern_y, pattern_x, layers) = (
            self.frames,
            self.pattern_z,
            self.pattern_y,
            self.pattern_x,
            self.layers,
        );

        (0..frames).flat_map(move |frame| {
            (0..pattern_z).flat_map(move |z| {
                (0..pattern_y).flat_map(move |y| {
                    (0..pattern_x).flat_map(move |x| {
                        (0..layers).map(move |layer| TextureCoord {
                            layer,
                            x,
                            y,
                            z,
                            frame,
                        })
                    })
                })
            })
        })
    }

    /// Changes the frame count, keeping the animation and sprite index in shape.
    ///
    /// New frames get the default duration of `category` and sprite 0.
    pub fn set_frames(&mut self, frames: u8, category: ThingCategory) {
        self.frames = frames.max(1);

        if self.frames > 1 {
            let animation = self.animation.get_or_insert_with(|| Animation {
                mode: AnimationMode::Asynchronous,
                loop_count: 0,
                start_frame: 0,
                durations: vec![],
            });

            animation
                .durations
                .resize(self.frames as usize, FrameDuration::default_for(category));
        } else {
            self.animation = None;
        }

        self.sprite_index.resize(self.get_total_sprites(), 0);
    }

    pub fn validate(&self, kind: FrameGroupKind) -> Result<(), ThingError> {
        let dimensions = [
            ("width", self.width),
            ("height", self.height),
            ("layers", self.layers),
            ("pattern x", self.pattern_x),
            ("pattern y", self.pattern_y),
            ("pattern z", self.pattern_z),
            ("frames", self.frames),
        ];

        if let Some((field, _)) = dimensions.iter().find(|(_, value)| *value == 0) {
            return Err(ThingError::InvalidDimension { field: *field });
        }

        let total = self.get_total_sprites();

        if total > MAX_SPRITES_PER_GROUP {
            return Err(ThingError::TooManySprites {
                total,
                max: MAX_SPRITES_PER_GROUP,
            });
        }

        let durations = self
            .animation
            .as_ref()
            .map(|animation| animation.durations.len())
            .unwrap_or(0);

        let animation_ok = match &self.animation {
            Some(_) => self.frames > 1 && durations == self.frames as usize,
            None => self.frames == 1,
        };

        if !animation_ok {
            return Err(ThingError::AnimationMismatch {
                frames: self.frames,
                durations,
            });
        }

        if self.sprite_index.len() != total {
            return Err(ThingError::SpriteIndexMismatch {
                kind,
                expected: total,
                have: self.sprite_index.len(),
            });
        }

        Ok(())
    }
}
