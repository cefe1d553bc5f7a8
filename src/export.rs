//! Sprite sheets as PNG files.
use std::path::Path;

use log::info;
use sheet::{set_sprite_sheet, sprite_sheet, SpriteSheet};
use things::{FrameGroupKind, ThingData};

use crate::{err, workspace::Workspace};

/// Saves the sheet of one frame group. The format follows the extension of `path`.
pub fn export_sprite_sheet(
    data: &ThingData,
    kind: FrameGroupKind,
    background: u32,
    path: impl AsRef<Path>,
) -> eyre::Result<SpriteSheet> {
    let Some(group) = data.thing().frame_group(kind) else {
        return err!("Thing has no {:?} frame group", kind);
    };

    let sheet = sprite_sheet(group, data.sprites(kind), background)?;
    sheet.image.save(path.as_ref())?;

    info!(
        "Exported {:?} sprite sheet {}x{} to `{}`",
        kind,
        sheet.image.width(),
        sheet.image.height(),
        path.as_ref().display()
    );

    Ok(sheet)
}

/// Replaces every sprite of one frame group with the cells of an image of the same layout.
pub fn import_sprite_sheet(
    data: &ThingData,
    kind: FrameGroupKind,
    path: impl AsRef<Path>,
) -> eyre::Result<ThingData> {
    let image = image::open(path.as_ref())?.into_rgba8();

    let (obd_version, client_version, mut thing, mut sprites) = data.clone().into_parts();

    let Some(group) = thing.frame_group_mut(kind) else {
        return err!("Thing has no {:?} frame group", kind);
    };

    set_sprite_sheet(group, &mut sprites[kind.index()], &image, |_| true)?;

    Ok(ThingData::new(obd_version, client_version, thing, sprites)?)
}

impl Workspace {
    /// [`export_sprite_sheet`] over the configured background.
    pub fn export_sprite_sheet(
        &self,
        data: &ThingData,
        kind: FrameGroupKind,
        path: impl AsRef<Path>,
    ) -> eyre::Result<SpriteSheet> {
        export_sprite_sheet(data, kind, self.config().background, path)
    }
}

#[cfg(test)]
mod test {
    use things::{
        FrameGroup, FrameGroupKind, SpriteData, Thing, ThingCategory, ThingData,
        PLACEHOLDER_SPRITE_ID, SPRITE_DATA_SIZE,
    };

    use super::{export_sprite_sheet, import_sprite_sheet};

    fn effect() -> ThingData {
        let mut group = FrameGroup {
            width: 2,
            height: 2,
            exact_size: 64,
            ..FrameGroup::new()
        };
        group.set_frames(2, ThingCategory::Effect);
        group.sprite_index = (10..18).collect();

        let sprites = group
            .sprite_index
            .iter()
            .map(|id| {
                let pixels: Vec<u8> =
                    [*id as u8, 0, 255 - *id as u8, 255].repeat(SPRITE_DATA_SIZE / 4);
                SpriteData::from_bytes(*id, &pixels).unwrap()
            })
            .collect();

        let mut thing = Thing::new(ThingCategory::Effect);
        thing.set_frame_group(FrameGroupKind::Default, Some(group));

        ThingData::new(300, 1041, thing, [sprites, vec![]]).unwrap()
    }

    #[test]
    fn png_round_trip() {
        let path = std::env::temp_dir().join("thingsmith_export_round_trip.png");
        let data = effect();

        let sheet = export_sprite_sheet(&data, FrameGroupKind::Default, 0, &path).unwrap();
        assert_eq!(sheet.image.dimensions(), (64, 128));

        let imported = import_sprite_sheet(&data, FrameGroupKind::Default, &path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let group = imported.thing().frame_group(FrameGroupKind::Default).unwrap();
        assert!(group.sprite_index.iter().all(|id| *id == PLACEHOLDER_SPRITE_ID));

        let before = data.sprites(FrameGroupKind::Default);
        let after = imported.sprites(FrameGroupKind::Default);

        for (before, after) in before.iter().zip(after) {
            assert_eq!(before.pixels, after.pixels);
        }
    }

    #[test]
    fn missing_group() {
        let path = std::env::temp_dir().join("thingsmith_export_missing.png");

        assert!(export_sprite_sheet(&effect(), FrameGroupKind::Walking, 0, &path).is_err());
        assert!(!path.exists());
    }
}
