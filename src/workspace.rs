use log::info;
use obd::ObdCodec;
use things::ThingData;
use versions::{SpriteDimensionStorage, VersionStorage};

use crate::config::{parse_config, Config};

/// Catalogs named by the config, loaded once and lent to codecs.
#[derive(Debug)]
pub struct Workspace {
    config: Config,
    versions: VersionStorage,
    sprite_dimensions: Option<SpriteDimensionStorage>,
}

impl Workspace {
    /// From `config.toml` next to the binary.
    pub fn open() -> eyre::Result<Self> {
        Self::from_config(parse_config()?)
    }

    pub fn from_config(config: Config) -> eyre::Result<Self> {
        let versions = VersionStorage::open_from_file(&config.versions)?;

        let sprite_dimensions = config
            .sprites
            .as_ref()
            .map(SpriteDimensionStorage::open_from_file)
            .transpose()?;

        info!(
            "Loaded {} client versions from `{}`",
            versions.get_all().len(),
            config.versions.display()
        );

        Ok(Self {
            config,
            versions,
            sprite_dimensions,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn versions(&self) -> &VersionStorage {
        &self.versions
    }

    pub fn versions_mut(&mut self) -> &mut VersionStorage {
        &mut self.versions
    }

    pub fn sprite_dimensions(&self) -> Option<&SpriteDimensionStorage> {
        self.sprite_dimensions.as_ref()
    }

    pub fn codec(&self) -> ObdCodec<'_> {
        ObdCodec::new(&self.versions)
    }

    /// Writes the version catalog back where it came from.
    pub fn save_versions(&self) -> eyre::Result<()> {
        self.versions.write_to_file(self.config.versions.as_path())?;

        Ok(())
    }

    /// `data` set to be written as the configured OBD version.
    pub fn convert(&self, data: ThingData) -> eyre::Result<ThingData> {
        Ok(data.with_obd_version(self.config.obd_version)?)
    }
}
