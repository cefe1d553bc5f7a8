//! OBD, the single thing interchange format.
//!
//! An OBD file is one LZMA compressed buffer holding a header, the property stream,
//! frame groups and the sprites those groups point at.
use std::{ffi::OsStr, path::Path};

use log::debug;
use things::ThingData;
use versions::VersionStorage;

use crate::{
    error::ObdError,
    parser::parse_obd,
    utils::{compress, decompress_or_plain},
    writer::write_obd,
};

pub mod error;
mod nom_helpers;
mod parser;
pub mod utils;
mod writer;

pub const OBD_VERSION_1: u16 = 100;
pub const OBD_VERSION_2: u16 = 200;
pub const OBD_VERSION_3: u16 = 300;

/// Legacy files start with the client version instead of an OBD version.
pub const MIN_LEGACY_CLIENT_VERSION: u16 = 710;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObdFormat {
    V2,
    V3,
}

impl ObdFormat {
    fn for_encoding(obd_version: u16) -> Result<Self, ObdError> {
        match obd_version {
            OBD_VERSION_3 => Ok(Self::V3),
            OBD_VERSION_2 => Ok(Self::V2),
            OBD_VERSION_1 => Err(ObdError::NotImplemented {
                version: obd_version,
            }),
            version => Err(ObdError::UnknownObdVersion { version }),
        }
    }
}

/// Encodes and decodes things against a client version catalog.
pub struct ObdCodec<'a> {
    versions: &'a VersionStorage,
}

impl<'a> ObdCodec<'a> {
    pub fn new(versions: &'a VersionStorage) -> Self {
        Self { versions }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<ThingData, ObdError> {
        if bytes.is_empty() {
            return Err(ObdError::InvalidArgument {
                message: "empty OBD buffer",
            });
        }

        let plain = decompress_or_plain(bytes);

        self.decode_plain(&plain)
    }

    /// Decodes a buffer that is known not to be compressed.
    pub fn decode_plain(&self, bytes: &[u8]) -> Result<ThingData, ObdError> {
        if bytes.is_empty() {
            return Err(ObdError::InvalidArgument {
                message: "empty OBD buffer",
            });
        }

        parse_obd(bytes, self.versions)
    }

    pub fn encode(&self, data: &ThingData) -> Result<Vec<u8>, ObdError> {
        let plain = self.encode_plain(data)?;
        let compressed = compress(&plain)?;

        debug!(
            "Encoded {} as OBD {}, {} bytes compressed to {}",
            data.category(),
            data.obd_version(),
            plain.len(),
            compressed.len()
        );

        Ok(compressed)
    }

    /// The payload `encode` compresses.
    pub fn encode_plain(&self, data: &ThingData) -> Result<Vec<u8>, ObdError> {
        let format = ObdFormat::for_encoding(data.obd_version())?;

        write_obd(data, format)
    }

    pub fn open_from_file(
        &self,
        path: impl AsRef<OsStr> + AsRef<Path>,
    ) -> Result<ThingData, ObdError> {
        let bytes = std::fs::read(path).map_err(|op| ObdError::IOError { source: op })?;

        self.decode(&bytes)
    }

    pub fn write_to_file(
        &self,
        data: &ThingData,
        path: impl AsRef<OsStr> + AsRef<Path>,
    ) -> Result<(), ObdError> {
        let bytes = self.encode(data)?;

        std::fs::write(path, bytes).map_err(|op| ObdError::IOError { source: op })
    }
}

#[cfg(test)]
mod test {
    use byte_writer::ByteWriter;
    use things::{
        Animation, AnimationMode, FrameDuration, FrameGroup, FrameGroupKind, Light, MarketData,
        Offset, PropertyFlag, SpriteData, Thing, ThingCategory, ThingData, ThingFlags,
        ThingProperties, SPRITE_DATA_SIZE,
    };
    use versions::VersionStorage;

    use crate::{
        error::{DecodeStage, ErrorKind, ObdError},
        utils::compress,
        ObdCodec,
    };

    fn catalog() -> VersionStorage {
        let mut versions = VersionStorage::new();
        versions.add_version(1041, 0x57BBD603, 0x57BBD5A5, 56);
        versions
    }

    fn sprite(id: u32, seed: u8) -> SpriteData {
        let pixels: Vec<u8> = (0..SPRITE_DATA_SIZE)
            .map(|i| (i as u8).wrapping_mul(seed))
            .collect();

        SpriteData::from_bytes(id, &pixels).unwrap()
    }

    fn item(obd_version: u16, properties: ThingProperties) -> ThingData {
        let mut thing = Thing::new(ThingCategory::Item);
        thing.properties = properties;
        thing.frame_groups[0].as_mut().unwrap().sprite_index = vec![7];

        ThingData::new(obd_version, 1041, thing, [vec![sprite(7, 3)], vec![]]).unwrap()
    }

    fn outfit(obd_version: u16) -> ThingData {
        let mut thing = Thing::new(ThingCategory::Outfit);

        let mut default = FrameGroup {
            layers: 2,
            pattern_x: 4,
            ..FrameGroup::new()
        };
        default.set_frames(1, ThingCategory::Outfit);
        default.sprite_index = (1..=8).collect();

        let mut walking = FrameGroup {
            width: 2,
            height: 2,
            exact_size: 64,
            pattern_x: 4,
            ..FrameGroup::new()
        };
        walking.set_frames(3, ThingCategory::Outfit);
        walking.animation = Some(Animation {
            mode: AnimationMode::Synchronous,
            loop_count: -1,
            start_frame: 2,
            durations: vec![FrameDuration::new(100, 200); 3],
        });
        walking.sprite_index = (100..148).collect();

        let default_sprites = default
            .sprite_index
            .iter()
            .map(|id| {
                if id % 2 == 0 {
                    SpriteData::empty(*id)
                } else {
                    sprite(*id, *id as u8)
                }
            })
            .collect();
        let walking_sprites = walking
            .sprite_index
            .iter()
            .map(|id| sprite(*id, 5))
            .collect();

        thing.set_frame_group(FrameGroupKind::Default, Some(default));
        thing.set_frame_group(FrameGroupKind::Walking, Some(walking));
        thing.properties.flags = ThingFlags::ANIMATE_ALWAYS;

        ThingData::new(
            obd_version,
            1041,
            thing,
            [default_sprites, walking_sprites],
        )
        .unwrap()
    }

    fn with_flag(flag: PropertyFlag) -> ThingProperties {
        let mut properties = ThingProperties::default();

        if let Some(bit) = flag.thing_flag() {
            properties.flags.insert(bit);
            return properties;
        }

        match flag {
            PropertyFlag::Ground => properties.ground = Some(150),
            PropertyFlag::Writable => properties.writable = Some(512),
            PropertyFlag::WritableOnce => properties.writable_once = Some(1024),
            PropertyFlag::HasLight => {
                properties.light = Some(Light {
                    level: 7,
                    color: 215,
                })
            }
            PropertyFlag::HasOffset => properties.offset = Some(Offset { x: -8, y: 16 }),
            PropertyFlag::HasElevation => properties.elevation = Some(8),
            PropertyFlag::MiniMap => properties.minimap = Some(86),
            PropertyFlag::LensHelp => properties.lens_help = Some(1112),
            PropertyFlag::Cloth => properties.cloth = Some(4),
            PropertyFlag::MarketItem => {
                properties.market = Some(MarketData {
                    category: 17,
                    trade_as: 3031,
                    show_as: 3031,
                    name: "Café".to_string(),
                    restrict_profession: 0,
                    restrict_level: 20,
                })
            }
            PropertyFlag::DefaultAction => properties.default_action = Some(1),
            _ => unreachable!(),
        }

        properties
    }

    fn stackable_v2_payload(client_version: u16) -> Vec<u8> {
        let mut writer = ByteWriter::new();

        writer.append_u16(200);
        writer.append_u16(client_version);
        writer.append_u8(ThingCategory::Item as u8);
        // frame groups start after the header and two flag bytes
        writer.append_u32(11);
        writer.append_u8(0x05);
        writer.append_u8(0xFF);
        // width, height, layers, pattern x y z, frames
        writer.append_u8_slice(&[1, 1, 1, 1, 1, 1, 1]);
        writer.append_u32(100);
        writer.append_zeroes(SPRITE_DATA_SIZE);

        writer.data
    }

    #[test]
    fn round_trip_v3() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        for data in [outfit(300), item(300, with_flag(PropertyFlag::MarketItem))] {
            let bytes = codec.encode(&data).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), data);
        }
    }

    #[test]
    fn round_trip_v2() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let data = item(200, with_flag(PropertyFlag::HasLight));
        let bytes = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), data);
    }

    #[test]
    fn v2_keeps_only_default_group() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let data = outfit(300).with_obd_version(200).unwrap();
        let decoded = codec.decode(&codec.encode(&data).unwrap()).unwrap();

        assert!(decoded.thing().frame_group(FrameGroupKind::Walking).is_none());
        assert_eq!(
            decoded.thing().frame_group(FrameGroupKind::Default),
            data.thing().frame_group(FrameGroupKind::Default)
        );
        // V2 has no notion of missing pixels
        assert!(decoded.sprites(FrameGroupKind::Default)[1].pixels.is_some());
        assert!(decoded.sprites(FrameGroupKind::Default)[1].is_empty());
    }

    #[test]
    fn every_flag_round_trips() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        for flag in PropertyFlag::ALL {
            for obd_version in [200, 300] {
                let data = item(obd_version, with_flag(flag));
                let decoded = codec.decode_plain(&codec.encode_plain(&data).unwrap()).unwrap();

                assert!(decoded.thing().properties.has(flag), "{flag:?}");
                assert_eq!(decoded, data, "{flag:?}");
            }
        }
    }

    #[test]
    fn many_flags_at_once() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let properties = PropertyFlag::ALL
            .into_iter()
            .filter(|flag| {
                !matches!(
                    flag,
                    PropertyFlag::GroundBorder | PropertyFlag::OnBottom | PropertyFlag::OnTop
                )
            })
            .map(with_flag)
            .fold(ThingProperties::default(), |mut acc, next| {
                acc.flags |= next.flags;
                acc.ground = acc.ground.or(next.ground);
                acc.writable = acc.writable.or(next.writable);
                acc.writable_once = acc.writable_once.or(next.writable_once);
                acc.light = acc.light.or(next.light);
                acc.offset = acc.offset.or(next.offset);
                acc.elevation = acc.elevation.or(next.elevation);
                acc.minimap = acc.minimap.or(next.minimap);
                acc.lens_help = acc.lens_help.or(next.lens_help);
                acc.cloth = acc.cloth.or(next.cloth);
                acc.market = acc.market.or(next.market);
                acc.default_action = acc.default_action.or(next.default_action);
                acc
            });

        let data = item(300, properties);
        let bytes = codec.encode(&data).unwrap();

        assert_eq!(codec.decode(&bytes).unwrap(), data);
    }

    #[test]
    fn ground_family_writes_one() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let mut properties = with_flag(PropertyFlag::Ground);
        properties.flags = ThingFlags::ON_TOP | ThingFlags::GROUND_BORDER;

        let plain = codec.encode_plain(&item(300, properties)).unwrap();
        // ground and its speed, then the sentinel
        assert_eq!(&plain[9..13], &[0x00, 150, 0, 0xFF]);

        let decoded = codec.decode_plain(&plain).unwrap();
        assert_eq!(decoded.thing().properties.ground_family(), Some(PropertyFlag::Ground));
        assert!(decoded.thing().properties.flags.is_empty());
    }

    #[test]
    fn placeholder_points_at_frame_groups() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let plain = codec
            .encode_plain(&item(300, with_flag(PropertyFlag::HasLight)))
            .unwrap();

        // light flag, level, color, sentinel
        assert_eq!(plain[9 + 5], 0xFF);
        assert_eq!(&plain[5..9], &15u32.to_le_bytes());
        // 1x1 tile, one layer, one pattern, one frame
        assert_eq!(&plain[15..22], &[1, 1, 1, 1, 1, 1, 1]);

        let plain = codec.encode_plain(&outfit(300)).unwrap();
        let offset = u32::from_le_bytes([plain[5], plain[6], plain[7], plain[8]]) as usize;

        // group count then the type byte of the default group
        assert_eq!(plain[offset - 1], 0xFF);
        assert_eq!(&plain[offset..offset + 2], &[2, 0]);
    }

    #[test]
    fn market_name_is_latin1() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let mut properties = with_flag(PropertyFlag::MarketItem);
        if let Some(market) = properties.market.as_mut() {
            market.name = "Ñandú 木".to_string();
        }

        let decoded = codec
            .decode(&codec.encode(&item(300, properties)).unwrap())
            .unwrap();

        assert_eq!(
            decoded.thing().properties.market.as_ref().unwrap().name,
            "Ñandú ?"
        );
    }

    #[test]
    fn unknown_flag() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let mut properties = ThingProperties::default();
        properties.flags.insert(ThingFlags::STACKABLE);

        let mut plain = codec.encode_plain(&item(300, properties)).unwrap();
        assert_eq!(&plain[9..11], &[0x05, 0xFF]);
        plain[10] = 0x27;

        let err = codec.decode(&plain).unwrap_err();

        assert!(matches!(
            err,
            ObdError::UnknownFlag {
                flag: 0x27,
                previous: Some(0x05),
                category: ThingCategory::Item,
                id: 0,
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn stackable_v2_scenario() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let plain = stackable_v2_payload(1041);
        let compressed = compress(&plain).unwrap();

        let data = codec.decode(&compressed).unwrap();

        assert_eq!(data.obd_version(), 200);
        assert_eq!(data.client_version(), 1041);
        assert_eq!(data.category(), ThingCategory::Item);
        assert!(data.thing().properties.is_stackable());

        let sprites = data.sprites(FrameGroupKind::Default);
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].id, 100);
        assert!(sprites[0].pixels.as_ref().unwrap().iter().all(|b| *b == 0));

        assert_eq!(codec.encode_plain(&data).unwrap(), plain);
    }

    #[test]
    fn unknown_client_version() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let err = codec.decode(&stackable_v2_payload(1)).unwrap_err();

        assert!(matches!(err, ObdError::UnsupportedVersion { version: 1 }));
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
    }

    #[test]
    fn plain_buffer_fallback() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let data = outfit(300);
        let plain = codec.encode_plain(&data).unwrap();

        assert_eq!(codec.decode(&plain).unwrap(), data);
    }

    #[test]
    fn version_tags() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let legacy = codec.decode(&[0x11, 0x04, 0x01, 0x00]).unwrap_err();
        assert!(matches!(legacy, ObdError::NotImplemented { version: 1041 }));
        assert_eq!(legacy.kind(), ErrorKind::NotImplemented);

        assert!(matches!(
            codec.decode(&[150, 0, 0, 0]).unwrap_err(),
            ObdError::UnknownObdVersion { version: 150 }
        ));

        assert!(matches!(
            codec.decode(&[]).unwrap_err(),
            ObdError::InvalidArgument { .. }
        ));

        let v1 = item(300, ThingProperties::default())
            .with_obd_version(100)
            .unwrap();
        assert!(matches!(
            codec.encode(&v1).unwrap_err(),
            ObdError::NotImplemented { version: 100 }
        ));

        let unknown = item(300, ThingProperties::default())
            .with_obd_version(250)
            .unwrap();
        assert!(matches!(
            codec.encode(&unknown).unwrap_err(),
            ObdError::UnknownObdVersion { version: 250 }
        ));
    }

    #[test]
    fn truncated_sprites() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let plain = stackable_v2_payload(1041);

        assert!(matches!(
            codec.decode_plain(&plain[..plain.len() - 1]).unwrap_err(),
            ObdError::Truncated {
                stage: DecodeStage::Sprites
            }
        ));

        assert!(matches!(
            codec.decode_plain(&plain[..5]).unwrap_err(),
            ObdError::Truncated {
                stage: DecodeStage::Header
            }
        ));
    }

    #[test]
    fn sprite_too_large() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let mut writer = ByteWriter::new();
        writer.append_u16(300);
        writer.append_u16(1041);
        writer.append_u8(ThingCategory::Effect as u8);
        writer.append_u32(10);
        writer.append_u8(0xFF);
        writer.append_u8_slice(&[1, 1, 1, 1, 1, 1, 1]);
        writer.append_u32(9);
        writer.append_u32(SPRITE_DATA_SIZE as u32 + 1);
        writer.append_zeroes(SPRITE_DATA_SIZE + 1);

        assert!(matches!(
            codec.decode_plain(&writer.data).unwrap_err(),
            ObdError::SpriteTooLarge {
                id: 9,
                size: 4097,
                max: 4096
            }
        ));
    }

    #[test]
    fn too_many_sprites() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let mut writer = ByteWriter::new();
        writer.append_u16(300);
        writer.append_u16(1041);
        writer.append_u8(ThingCategory::Item as u8);
        writer.append_u32(10);
        writer.append_u8(0xFF);
        // 8x8 tiles, exact size, 1 layer, 8x9x1 patterns, 1 frame
        writer.append_u8_slice(&[8, 8, 255, 1, 8, 9, 1, 1]);

        assert!(matches!(
            codec.decode_plain(&writer.data).unwrap_err(),
            ObdError::TooManySprites {
                total: 4608,
                max: 4096
            }
        ));
    }

    #[test]
    fn file_round_trip() {
        let versions = catalog();
        let codec = ObdCodec::new(&versions);

        let path = std::env::temp_dir().join("obd_file_round_trip.obd");
        let data = outfit(300);

        codec.write_to_file(&data, &path).unwrap();
        let read = codec.open_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(read, data);

        assert!(matches!(
            codec.open_from_file(&path).unwrap_err(),
            ObdError::IOError { .. }
        ));
    }
}
