use byte_writer::ByteWriter;
use log::warn;
use things::{
    FrameGroup, FrameGroupKind, PropertyFlag, SpriteData, ThingCategory, ThingData,
    ThingProperties, LAST_FLAG, MAX_SPRITES_PER_GROUP, SPRITE_DATA_SIZE,
};

use crate::{error::ObdError, ObdFormat};

trait WriteToWriter {
    fn write_to_bytes(&self, writer: &mut ByteWriter);
}

pub(crate) fn write_obd(data: &ThingData, format: ObdFormat) -> Result<Vec<u8>, ObdError> {
    let thing = data.thing();
    let mut writer = ByteWriter::new();

    writer.append_u16(data.obd_version());
    writer.append_u16(data.client_version());
    writer.append_u8(thing.category as u8);

    // back-filled with the offset of the frame groups
    let placeholder_offset = writer.get_offset();
    writer.append_u32(0);

    thing.properties.write_to_bytes(&mut writer);

    let frame_groups_offset = writer.get_offset() as u32;
    writer.replace_with_u32(placeholder_offset, frame_groups_offset);

    match format {
        ObdFormat::V2 => {
            if thing.frame_group(FrameGroupKind::Walking).is_some() {
                warn!("OBD 200 holds one frame group, dropping the walking group");
            }

            let group = thing
                .frame_group(FrameGroupKind::Default)
                .ok_or(ObdError::InvalidArgument {
                    message: "thing has no default frame group",
                })?;

            write_frame_group(&mut writer, group)?;
            write_sprites_v2(&mut writer, data.sprites(FrameGroupKind::Default));
        }
        ObdFormat::V3 => {
            let is_outfit = thing.category == ThingCategory::Outfit;
            let group_count = if is_outfit {
                thing.frame_group_count()
            } else {
                1
            };

            if is_outfit {
                writer.append_u8(group_count as u8);
            }

            for (kind, group) in thing.frame_groups().take(group_count) {
                if is_outfit {
                    let group_type = if group_count < 2 { 1 } else { kind as u8 };
                    writer.append_u8(group_type);
                }

                write_frame_group(&mut writer, group)?;
                write_sprites_v3(&mut writer, data.sprites(kind));
            }
        }
    }

    Ok(writer.data)
}

impl WriteToWriter for ThingProperties {
    fn write_to_bytes(&self, writer: &mut ByteWriter) {
        let ground_family = self.ground_family();

        for flag in PropertyFlag::ALL {
            if !self.has(flag) {
                continue;
            }

            let is_ground_family = matches!(
                flag,
                PropertyFlag::Ground
                    | PropertyFlag::GroundBorder
                    | PropertyFlag::OnBottom
                    | PropertyFlag::OnTop
            );

            if is_ground_family && ground_family != Some(flag) {
                continue;
            }

            writer.append_u8(flag as u8);
            write_payload(self, flag, writer);
        }

        writer.append_u8(LAST_FLAG);
    }
}

fn write_payload(properties: &ThingProperties, flag: PropertyFlag, writer: &mut ByteWriter) {
    match flag {
        PropertyFlag::Ground => writer.append_u16(properties.ground.unwrap_or_default()),
        PropertyFlag::Writable => writer.append_u16(properties.writable.unwrap_or_default()),
        PropertyFlag::WritableOnce => {
            writer.append_u16(properties.writable_once.unwrap_or_default())
        }
        PropertyFlag::HasLight => {
            if let Some(light) = &properties.light {
                writer.append_u16(light.level);
                writer.append_u16(light.color);
            }
        }
        PropertyFlag::HasOffset => {
            if let Some(offset) = &properties.offset {
                writer.append_i16(offset.x);
                writer.append_i16(offset.y);
            }
        }
        PropertyFlag::HasElevation => {
            writer.append_u16(properties.elevation.unwrap_or_default())
        }
        PropertyFlag::MiniMap => writer.append_u16(properties.minimap.unwrap_or_default()),
        PropertyFlag::LensHelp => writer.append_u16(properties.lens_help.unwrap_or_default()),
        PropertyFlag::Cloth => writer.append_u16(properties.cloth.unwrap_or_default()),
        PropertyFlag::MarketItem => {
            if let Some(market) = &properties.market {
                writer.append_u16(market.category);
                writer.append_u16(market.trade_as);
                writer.append_u16(market.show_as);
                writer.append_latin1_string(&market.name);
                writer.append_u16(market.restrict_profession);
                writer.append_u16(market.restrict_level);
            }
        }
        PropertyFlag::DefaultAction => {
            writer.append_u16(properties.default_action.unwrap_or_default())
        }
        // flag byte only
        _ => (),
    }
}

fn write_frame_group(writer: &mut ByteWriter, group: &FrameGroup) -> Result<(), ObdError> {
    let total = group.get_total_sprites();

    if total > MAX_SPRITES_PER_GROUP {
        return Err(ObdError::TooManySprites {
            total,
            max: MAX_SPRITES_PER_GROUP,
        });
    }

    let FrameGroup {
        width,
        height,
        exact_size,
        layers,
        pattern_x,
        pattern_y,
        pattern_z,
        frames,
        animation,
        sprite_index: _,
    } = group;

    writer.append_u8(*width);
    writer.append_u8(*height);

    if *width > 1 || *height > 1 {
        writer.append_u8(*exact_size);
    }

    writer.append_u8(*layers);
    writer.append_u8(*pattern_x);
    writer.append_u8(*pattern_y);
    writer.append_u8(*pattern_z);
    writer.append_u8(*frames);

    if *frames > 1 {
        let animation = animation.as_ref().ok_or(ObdError::InvalidArgument {
            message: "animated frame group has no animation",
        })?;

        writer.append_u8(animation.mode as u8);
        writer.append_i32(animation.loop_count);
        writer.append_i8(animation.start_frame);

        animation.durations.iter().for_each(|duration| {
            writer.append_u32(duration.minimum);
            writer.append_u32(duration.maximum);
        });
    }

    Ok(())
}

fn write_sprites_v2(writer: &mut ByteWriter, sprites: &[SpriteData]) {
    sprites.iter().for_each(|sprite| {
        writer.append_u32(sprite.id);

        match &sprite.pixels {
            Some(pixels) => writer.append_u8_slice(pixels.as_slice()),
            None => writer.append_zeroes(SPRITE_DATA_SIZE),
        }
    });
}

fn write_sprites_v3(writer: &mut ByteWriter, sprites: &[SpriteData]) {
    sprites.iter().for_each(|sprite| {
        writer.append_u32(sprite.id);

        match &sprite.pixels {
            Some(pixels) => {
                writer.append_u32(SPRITE_DATA_SIZE as u32);
                writer.append_u8_slice(pixels.as_slice());
            }
            None => writer.append_u32(0),
        }
    });
}
