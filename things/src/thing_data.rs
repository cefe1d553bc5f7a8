use crate::{error::ThingError, FrameGroupKind, SpriteData, Thing, ThingCategory};

pub const MIN_OBD_VERSION: u16 = 100;
pub const MIN_CLIENT_VERSION: u16 = 710;

/// A thing together with the sprites its frame groups point at.
///
/// `sprites[kind][i]` belongs to `frame_group(kind).sprite_index[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingData {
    obd_version: u16,
    client_version: u16,
    thing: Thing,
    sprites: [Vec<SpriteData>; 2],
}

impl ThingData {
    pub fn new(
        obd_version: u16,
        client_version: u16,
        thing: Thing,
        sprites: [Vec<SpriteData>; 2],
    ) -> Result<Self, ThingError> {
        if obd_version < MIN_OBD_VERSION {
            return Err(ThingError::InvalidObdVersion {
                version: obd_version,
            });
        }

        if client_version < MIN_CLIENT_VERSION {
            return Err(ThingError::InvalidClientVersion {
                version: client_version,
            });
        }

        if thing.frame_group(FrameGroupKind::Default).is_none() {
            return Err(ThingError::MissingDefaultGroup);
        }

        for kind in FrameGroupKind::ALL {
            let have = sprites[kind.index()].len();

            let Some(group) = thing.frame_group(kind) else {
                if have != 0 {
                    return Err(ThingError::SpriteCountMismatch {
                        kind,
                        expected: 0,
                        have,
                    });
                }

                continue;
            };

            if kind == FrameGroupKind::Walking && thing.category != ThingCategory::Outfit {
                return Err(ThingError::UnexpectedGroup {
                    kind,
                    category: thing.category,
                });
            }

            group.validate(kind)?;

            if group.sprite_index.len() != have {
                return Err(ThingError::SpriteCountMismatch {
                    kind,
                    expected: group.sprite_index.len(),
                    have,
                });
            }

            let mismatch = group
                .sprite_index
                .iter()
                .zip(&sprites[kind.index()])
                .position(|(id, sprite)| *id != sprite.id);

            if let Some(slot) = mismatch {
                return Err(ThingError::SpriteIdMismatch {
                    kind,
                    slot,
                    expected: group.sprite_index[slot],
                    have: sprites[kind.index()][slot].id,
                });
            }
        }

        if sprites.iter().all(|list| list.is_empty()) {
            return Err(ThingError::NoSprites);
        }

        Ok(Self {
            obd_version,
            client_version,
            thing,
            sprites,
        })
    }

    pub fn obd_version(&self) -> u16 {
        self.obd_version
    }

    pub fn client_version(&self) -> u16 {
        self.client_version
    }

    pub fn thing(&self) -> &Thing {
        &self.thing
    }

    pub fn category(&self) -> ThingCategory {
        self.thing.category
    }

    pub fn sprites(&self, kind: FrameGroupKind) -> &[SpriteData] {
        &self.sprites[kind.index()]
    }

    /// Same data, encoded as another OBD version next time.
    pub fn with_obd_version(mut self, obd_version: u16) -> Result<Self, ThingError> {
        if obd_version < MIN_OBD_VERSION {
            return Err(ThingError::InvalidObdVersion {
                version: obd_version,
            });
        }

        self.obd_version = obd_version;

        Ok(self)
    }

    pub fn into_parts(self) -> (u16, u16, Thing, [Vec<SpriteData>; 2]) {
        (
            self.obd_version,
            self.client_version,
            self.thing,
            self.sprites,
        )
    }
}
