use image::{Rgba, RgbaImage};
use things::{
    FrameGroup, SpriteData, SpritePixels, TextureCoord, PLACEHOLDER_SPRITE_ID, SPRITE_DATA_SIZE,
    SPRITE_DEFAULT_SIZE,
};

use crate::{color::argb_to_rgba, error::SheetError};

const TILE: u32 = SPRITE_DEFAULT_SIZE as u32;

/// Pixel area of one texture in a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub image: RgbaImage,
    /// Indexed by texture index.
    pub rects: Vec<TileRect>,
}

/// Where texture `coord` sits in the sheet of `group`.
pub fn tile_rect(group: &FrameGroup, coord: TextureCoord) -> TileRect {
    let index = group.get_texture_index(coord.layer, coord.x, coord.y, coord.z, coord.frame);
    let total_x = group.get_total_x();
    let width = group.width as u32 * TILE;
    let height = group.height as u32 * TILE;

    TileRect {
        x: (index % total_x) as u32 * width,
        y: (index / total_x) as u32 * height,
        width,
        height,
    }
}

/// Lays every texture of `group` out on one image.
///
/// `sprites[i]` holds the pixels of `group.sprite_index[i]`. Missing pixels leave the background.
pub fn sprite_sheet(
    group: &FrameGroup,
    sprites: &[SpriteData],
    background: u32,
) -> Result<SpriteSheet, SheetError> {
    compose_sprite_sheet(group, sprites, background, Some)
}

/// Like [`sprite_sheet`] but `select` decides, per tile, which texture is drawn into it.
///
/// Tiles where `select` returns `None` keep the background.
pub fn compose_sprite_sheet(
    group: &FrameGroup,
    sprites: &[SpriteData],
    background: u32,
    select: impl Fn(TextureCoord) -> Option<TextureCoord>,
) -> Result<SpriteSheet, SheetError> {
    let expected = group.get_total_sprites();

    if sprites.len() != expected {
        return Err(SheetError::SpriteCountMismatch {
            expected,
            have: sprites.len(),
        });
    }

    let (sheet_width, sheet_height) = group.get_sprite_sheet_size();
    let mut image = RgbaImage::from_pixel(sheet_width, sheet_height, Rgba(argb_to_rgba(background)));
    let mut rects = vec![TileRect::default(); group.get_total_textures()];

    for target in group.texture_coords() {
        let rect = tile_rect(group, target);
        let index =
            group.get_texture_index(target.layer, target.x, target.y, target.z, target.frame);
        rects[index] = rect;

        let Some(source) = select(target) else {
            continue;
        };

        for h in 0..group.height {
            for w in 0..group.width {
                let slot = group.get_sprite_index(
                    w,
                    h,
                    source.layer,
                    source.x,
                    source.y,
                    source.z,
                    source.frame,
                );

                let Some(pixels) = sprites.get(slot).and_then(|sprite| sprite.pixels.as_ref())
                else {
                    continue;
                };

                let (cell_x, cell_y) = cell_origin(group, rect, w, h);
                draw_sprite(&mut image, pixels, cell_x, cell_y);
            }
        }
    }

    Ok(SpriteSheet { image, rects })
}

/// Cuts `image` back into sprites for every texture `filter` accepts.
///
/// Touched slots get new sprites with [`PLACEHOLDER_SPRITE_ID`], in `sprites` and in the
/// group's sprite index.
pub fn set_sprite_sheet(
    group: &mut FrameGroup,
    sprites: &mut [SpriteData],
    image: &RgbaImage,
    filter: impl Fn(TextureCoord) -> bool,
) -> Result<(), SheetError> {
    let expected = group.get_sprite_sheet_size();

    if image.dimensions() != expected {
        return Err(SheetError::SheetSizeMismatch {
            expected,
            have: image.dimensions(),
        });
    }

    let total = group.get_total_sprites();

    if sprites.len() != total || group.sprite_index.len() != total {
        return Err(SheetError::SpriteCountMismatch {
            expected: total,
            have: sprites.len(),
        });
    }

    let coords: Vec<TextureCoord> = group.texture_coords().filter(|c| filter(*c)).collect();

    for coord in coords {
        let rect = tile_rect(group, coord);

        for h in 0..group.height {
            for w in 0..group.width {
                let slot =
                    group.get_sprite_index(w, h, coord.layer, coord.x, coord.y, coord.z, coord.frame);
                let (cell_x, cell_y) = cell_origin(group, rect, w, h);

                sprites[slot] = SpriteData::new(
                    PLACEHOLDER_SPRITE_ID,
                    read_sprite(image, cell_x, cell_y),
                );
                group.sprite_index[slot] = PLACEHOLDER_SPRITE_ID;
            }
        }
    }

    Ok(())
}

/// Cell 0 is the bottom right of its tile.
fn cell_origin(group: &FrameGroup, rect: TileRect, w: u8, h: u8) -> (u32, u32) {
    (
        rect.x + (group.width - w - 1) as u32 * TILE,
        rect.y + (group.height - h - 1) as u32 * TILE,
    )
}

fn draw_sprite(image: &mut RgbaImage, pixels: &SpritePixels, x: u32, y: u32) {
    pixels
        .chunks_exact(4)
        .enumerate()
        .for_each(|(index, source)| {
            let px = x + index as u32 % TILE;
            let py = y + index as u32 / TILE;

            let target = image.get_pixel_mut(px, py);
            merge_over(&mut target.0, [source[0], source[1], source[2], source[3]]);
        });
}

fn read_sprite(image: &RgbaImage, x: u32, y: u32) -> SpritePixels {
    let mut pixels: SpritePixels = Box::new([0u8; SPRITE_DATA_SIZE]);

    pixels
        .chunks_exact_mut(4)
        .enumerate()
        .for_each(|(index, target)| {
            let source = image.get_pixel(x + index as u32 % TILE, y + index as u32 / TILE);
            target.copy_from_slice(&source.0);
        });

    pixels
}

/// Source over, straight alpha.
pub(crate) fn merge_over(target: &mut [u8; 4], source: [u8; 4]) {
    match (source[3], target[3]) {
        (0, _) => (),
        (255, _) | (_, 0) => *target = source,
        (source_alpha, target_alpha) => {
            let sa = source_alpha as f32 / 255.;
            let ta = target_alpha as f32 / 255.;
            let out_alpha = sa + ta * (1. - sa);

            for channel in 0..3 {
                let blended = (source[channel] as f32 * sa
                    + target[channel] as f32 * ta * (1. - sa))
                    / out_alpha;
                target[channel] = blended.round() as u8;
            }

            target[3] = (out_alpha * 255.).round() as u8;
        }
    }
}
