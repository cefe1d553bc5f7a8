use log::{debug, warn};
use nom::{
    bytes::complete::take,
    combinator::map,
    multi::count,
    number::complete::{le_i16, le_i32, le_i8, le_u16, le_u32, le_u8},
    Parser,
};
use things::{
    Animation, AnimationMode, FrameDuration, FrameGroup, FrameGroupKind, Light, MarketData,
    Offset, PropertyFlag, SpriteData, Thing, ThingCategory, ThingData, ThingProperties,
    LAST_FLAG, MAX_SPRITES_PER_GROUP, SPRITE_DATA_SIZE, SPRITE_DEFAULT_SIZE,
};
use versions::VersionStorage;

use crate::{
    error::{DecodeStage, ObdError},
    nom_helpers::{at_stage, latin1_string, IResult},
    ObdFormat, MIN_LEGACY_CLIENT_VERSION, OBD_VERSION_2, OBD_VERSION_3,
};

struct Header {
    obd_version: u16,
    client_version: u16,
    category: u8,
}

pub(crate) fn parse_obd(i: &[u8], versions: &VersionStorage) -> Result<ThingData, ObdError> {
    let (_, tag) = at_stage(le_u16(i), DecodeStage::VersionTag)?;

    let format = match tag {
        OBD_VERSION_3 => ObdFormat::V3,
        OBD_VERSION_2 => ObdFormat::V2,
        version if version >= MIN_LEGACY_CLIENT_VERSION => {
            return Err(ObdError::NotImplemented { version })
        }
        version => return Err(ObdError::UnknownObdVersion { version }),
    };

    // the tag is the first field of the header
    let (i, header) = at_stage(parse_header(i), DecodeStage::Header)?;

    if versions.get_by_value(header.client_version as u32).is_empty() {
        warn!(
            "Rejected thing for client version {}, not in the catalog",
            header.client_version
        );

        return Err(ObdError::UnsupportedVersion {
            version: header.client_version,
        });
    }

    let category = ThingCategory::from_u8(header.category).ok_or(ObdError::UnknownCategory {
        category: header.category,
    })?;

    let mut thing = Thing {
        id: 0,
        category,
        properties: ThingProperties::default(),
        frame_groups: [None, None],
    };

    let (mut i, properties) = parse_properties(i, &thing)?;
    thing.properties = properties;

    let group_count = match format {
        ObdFormat::V3 if category == ThingCategory::Outfit => {
            let (rest, group_count) = at_stage(le_u8(i), DecodeStage::FrameGroups)?;
            i = rest;
            group_count
        }
        _ => 1,
    };

    let mut sprites: [Vec<SpriteData>; 2] = [vec![], vec![]];

    // anything past walking has no meaning, still has to be consumed
    for group_index in 0..group_count as usize {
        if format == ObdFormat::V3 && category == ThingCategory::Outfit {
            // written as 1 for single group outfits, the loop index is what counts
            let (rest, _group_type) = at_stage(le_u8(i), DecodeStage::FrameGroups)?;
            i = rest;
        }

        let (rest, mut group) = at_stage(parse_frame_group(i), DecodeStage::FrameGroups)?;
        i = rest;

        let total = group.get_total_sprites();

        if total > MAX_SPRITES_PER_GROUP {
            return Err(ObdError::TooManySprites {
                total,
                max: MAX_SPRITES_PER_GROUP,
            });
        }

        let (rest, group_sprites) = match format {
            ObdFormat::V2 => parse_sprites_v2(i, total)?,
            ObdFormat::V3 => parse_sprites_v3(i, total)?,
        };
        i = rest;

        group.sprite_index = group_sprites.iter().map(|sprite| sprite.id).collect();

        if let Some(kind) = FrameGroupKind::ALL.get(group_index) {
            thing.set_frame_group(*kind, Some(group));
            sprites[kind.index()] = group_sprites;
        }
    }

    if !i.is_empty() {
        debug!("Ignoring {} trailing bytes", i.len());
    }

    let data = ThingData::new(header.obd_version, header.client_version, thing, sprites)?;

    debug!(
        "Decoded {} for client {} from OBD {}",
        data.category(),
        data.client_version(),
        data.obd_version()
    );

    Ok(data)
}

fn parse_header(i: &[u8]) -> IResult<'_, Header> {
    map(
        (le_u16, le_u16, le_u8, le_u32),
        // the u32 points at the frame groups, reading is sequential anyway
        |(obd_version, client_version, category, _offset)| Header {
            obd_version,
            client_version,
            category,
        },
    )
    .parse(i)
}

fn parse_properties<'a>(
    mut i: &'a [u8],
    thing: &Thing,
) -> Result<(&'a [u8], ThingProperties), ObdError> {
    let mut properties = ThingProperties::default();
    let mut previous = None;

    loop {
        let (rest, byte) = at_stage(le_u8(i), DecodeStage::Properties)?;
        i = rest;

        if byte == LAST_FLAG {
            break;
        }

        let Some(flag) = PropertyFlag::from_u8(byte) else {
            return Err(ObdError::UnknownFlag {
                flag: byte,
                previous,
                category: thing.category,
                id: thing.id,
            });
        };

        let (rest, _) = at_stage(
            parse_property(i, flag, &mut properties),
            DecodeStage::Properties,
        )?;
        i = rest;

        previous = Some(byte);
    }

    Ok((i, properties))
}

fn parse_property<'a>(
    i: &'a [u8],
    flag: PropertyFlag,
    properties: &mut ThingProperties,
) -> IResult<'a, ()> {
    if let Some(bit) = flag.thing_flag() {
        properties.flags.insert(bit);
        return Ok((i, ()));
    }

    let i = match flag {
        PropertyFlag::Ground => {
            let (i, speed) = le_u16(i)?;
            properties.ground = Some(speed);
            i
        }
        PropertyFlag::Writable => {
            let (i, length) = le_u16(i)?;
            properties.writable = Some(length);
            i
        }
        PropertyFlag::WritableOnce => {
            let (i, length) = le_u16(i)?;
            properties.writable_once = Some(length);
            i
        }
        PropertyFlag::HasLight => {
            let (i, (level, color)) = (le_u16, le_u16).parse(i)?;
            properties.light = Some(Light { level, color });
            i
        }
        PropertyFlag::HasOffset => {
            let (i, (x, y)) = (le_i16, le_i16).parse(i)?;
            properties.offset = Some(Offset { x, y });
            i
        }
        PropertyFlag::HasElevation => {
            let (i, elevation) = le_u16(i)?;
            properties.elevation = Some(elevation);
            i
        }
        PropertyFlag::MiniMap => {
            let (i, color) = le_u16(i)?;
            properties.minimap = Some(color);
            i
        }
        PropertyFlag::LensHelp => {
            let (i, value) = le_u16(i)?;
            properties.lens_help = Some(value);
            i
        }
        PropertyFlag::Cloth => {
            let (i, slot) = le_u16(i)?;
            properties.cloth = Some(slot);
            i
        }
        PropertyFlag::MarketItem => {
            let (i, (category, trade_as, show_as)) = (le_u16, le_u16, le_u16).parse(i)?;
            let (i, name) = latin1_string(i)?;
            let (i, (restrict_profession, restrict_level)) = (le_u16, le_u16).parse(i)?;

            properties.market = Some(MarketData {
                category,
                trade_as,
                show_as,
                name,
                restrict_profession,
                restrict_level,
            });
            i
        }
        PropertyFlag::DefaultAction => {
            let (i, action) = le_u16(i)?;
            properties.default_action = Some(action);
            i
        }
        // payload-less flags returned above
        _ => i,
    };

    Ok((i, ()))
}

/// Geometry and animation. The sprite index is filled in from the sprite block.
fn parse_frame_group(i: &[u8]) -> IResult<'_, FrameGroup> {
    let (i, (width, height)) = (le_u8, le_u8).parse(i)?;

    let (i, exact_size) = if width > 1 || height > 1 {
        le_u8(i)?
    } else {
        (i, SPRITE_DEFAULT_SIZE as u8)
    };

    let (i, (layers, pattern_x, pattern_y, pattern_z, frames)) =
        (le_u8, le_u8, le_u8, le_u8, le_u8).parse(i)?;

    let (i, animation) = if frames > 1 {
        let (i, (mode, loop_count, start_frame)) = (le_u8, le_i32, le_i8).parse(i)?;
        let (i, durations) = count(
            map((le_u32, le_u32), |(minimum, maximum)| {
                FrameDuration::new(minimum, maximum)
            }),
            frames as usize,
        )
        .parse(i)?;

        (
            i,
            Some(Animation {
                mode: AnimationMode::from_u8(mode),
                loop_count,
                start_frame,
                durations,
            }),
        )
    } else {
        (i, None)
    };

    Ok((
        i,
        FrameGroup {
            width,
            height,
            exact_size,
            layers,
            pattern_x,
            pattern_y,
            pattern_z,
            frames,
            animation,
            sprite_index: vec![],
        },
    ))
}

/// Id and a fixed 4096 byte tile per sprite.
fn parse_sprites_v2(i: &[u8], total: usize) -> Result<(&[u8], Vec<SpriteData>), ObdError> {
    let (i, raw) = at_stage(
        count((le_u32, take(SPRITE_DATA_SIZE)), total).parse(i),
        DecodeStage::Sprites,
    )?;

    let sprites = raw
        .into_iter()
        .map(|(id, pixels)| SpriteData::from_bytes(id, pixels))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((i, sprites))
}

/// Id, byte count, bytes per sprite. Zero bytes means no pixels.
fn parse_sprites_v3(mut i: &[u8], total: usize) -> Result<(&[u8], Vec<SpriteData>), ObdError> {
    let mut sprites = Vec::with_capacity(total);

    for _ in 0..total {
        let (rest, (id, size)) = at_stage((le_u32, le_u32).parse(i), DecodeStage::Sprites)?;
        let size = size as usize;

        if size > SPRITE_DATA_SIZE {
            return Err(ObdError::SpriteTooLarge {
                id,
                size,
                max: SPRITE_DATA_SIZE,
            });
        }

        let (rest, pixels) = at_stage(take(size).parse(rest), DecodeStage::Sprites)?;
        i = rest;

        let sprite = if size == 0 {
            SpriteData::empty(id)
        } else {
            SpriteData::from_bytes(id, pixels)?
        };

        sprites.push(sprite);
    }

    Ok((i, sprites))
}
