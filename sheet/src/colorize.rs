//! Outfit tinting.
//!
//! Outfits carry two layers per texture: layer 0 is the gray base, layer 1 a color
//! mask telling which part of the base is head (yellow), body (red), legs (green)
//! or feet (blue). Each part gets multiplied by its palette color.
use image::RgbaImage;
use log::debug;
use things::{FrameGroupKind, OutfitData, TextureCoord, ThingCategory, ThingData};

use crate::{
    color::{hsi_to_argb, rgb_multipliers},
    composer::{compose_sprite_sheet, merge_over, set_sprite_sheet},
    error::SheetError,
};

const TRANSPARENT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

/// Tints the unlocked rows of every layered group of an outfit.
///
/// Anything that is not an outfit comes back as is.
pub fn colorize(data: &ThingData, outfit: &OutfitData) -> Result<ThingData, SheetError> {
    if data.category() != ThingCategory::Outfit {
        return Ok(data.clone());
    }

    let (obd_version, client_version, mut thing, mut sprites) = data.clone().into_parts();
    let unlocked = |coord: TextureCoord| coord.layer == 0 && outfit.has_addon_row(coord.y);

    for kind in FrameGroupKind::ALL {
        let Some(group) = thing.frame_group_mut(kind) else {
            continue;
        };

        if group.layers < 2 {
            continue;
        }

        let group_sprites = &mut sprites[kind.index()];

        let mut gray = compose_sprite_sheet(group, group_sprites, TRANSPARENT, |coord| {
            unlocked(coord).then_some(coord)
        })?
        .image;

        let mut mask = compose_sprite_sheet(group, group_sprites, TRANSPARENT, |coord| {
            unlocked(coord).then_some(TextureCoord { layer: 1, ..coord })
        })?
        .image;

        tint(&mut gray, &mask, Channel::Blue, outfit.feet);
        separate_head(&mut mask);
        tint(&mut gray, &mask, Channel::Blue, outfit.head);
        tint(&mut gray, &mask, Channel::Red, outfit.body);
        tint(&mut gray, &mask, Channel::Green, outfit.legs);

        set_sprite_sheet(group, group_sprites, &gray, unlocked)?;

        debug!("Colorized {kind:?} group with {outfit:?}");
    }

    Ok(ThingData::new(obd_version, client_version, thing, sprites)?)
}

/// Multiplies the gray base by the palette color wherever `channel` of the mask is set.
///
/// The mask channel becomes the alpha of the tinted copy merged back over the base.
fn tint(gray: &mut RgbaImage, mask: &RgbaImage, channel: Channel, code: u8) {
    let multipliers = rgb_multipliers(hsi_to_argb(code));

    gray.pixels_mut()
        .zip(mask.pixels())
        .for_each(|(base, selector)| {
            let alpha = selector.0[channel as usize];

            if base.0[3] == 0 || alpha == 0 {
                return;
            }

            let [r, g, b, _] = base.0;
            let tinted = [
                (r as f32 * multipliers[0]) as u8,
                (g as f32 * multipliers[1]) as u8,
                (b as f32 * multipliers[2]) as u8,
                alpha,
            ];

            merge_over(&mut base.0, tinted);
        });
}

/// Turns yellow into blue and drops the feet, so head has a channel of its own.
///
/// Red and green stay as long as they are not mixed.
fn separate_head(mask: &mut RgbaImage) {
    mask.pixels_mut().for_each(|pixel| {
        let [r, g, _, a] = pixel.0;
        let (r, g) = (r as i16, g as i16);

        pixel.0 = [
            (r - g).clamp(0, 255) as u8,
            (g - r).clamp(0, 255) as u8,
            (r + g - 255).clamp(0, 255) as u8,
            a,
        ];
    });
}
