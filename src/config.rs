//! Parses config file
use std::{
    env,
    fs::OpenOptions,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Deserializer};

use crate::err;

pub static CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// versions.xml
    pub versions: PathBuf,
    /// sprites.xml
    pub sprites: Option<PathBuf>,
    /// OBD version things are written as.
    #[serde(default = "default_obd_version")]
    pub obd_version: u16,
    /// Batch progress is reported every this many files.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    /// ARGB behind exported sprite sheets.
    #[serde(default, deserialize_with = "deserialize_argb")]
    pub background: u32,
}

fn default_obd_version() -> u16 {
    obd::OBD_VERSION_3
}

fn default_progress_interval() -> usize {
    1
}

fn deserialize_argb<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let hex = String::deserialize(deserializer)?;

    u32::from_str_radix(hex.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
}

impl FromStr for Config {
    type Err = eyre::Report;

    /// Paths are taken as they are.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;

        if ![obd::OBD_VERSION_2, obd::OBD_VERSION_3].contains(&config.obd_version) {
            return err!("Cannot write OBD version {}", config.obd_version);
        }

        if config.progress_interval == 0 {
            return err!("progress_interval must be at least 1");
        }

        Ok(config)
    }
}

/// Parse `config.toml` in the same folder as the binary
pub fn parse_config() -> eyre::Result<Config> {
    let path = match env::current_exe() {
        Ok(path) => path
            .parent()
            .map(|parent| parent.join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
        Err(_) => PathBuf::from(CONFIG_FILE_NAME),
    };

    parse_config_from_file(path.as_path())
}

/// Relative paths inside are relative to the config file.
pub fn parse_config_from_file(path: &Path) -> eyre::Result<Config> {
    let mut file = OpenOptions::new().read(true).open(path.as_os_str())?;
    let mut buffer = String::new();

    file.read_to_string(&mut buffer)?;

    let mut config = Config::from_str(&buffer)?;

    let root = path.parent().unwrap_or(Path::new("."));

    config.versions = resolve(root, &config.versions);

    if !config.versions.exists() {
        return err!(
            "Cannot find version catalog `{}`",
            config.versions.display()
        );
    }

    if let Some(sprites) = config.sprites.take() {
        let sprites = resolve(root, &sprites);

        if !sprites.exists() {
            return err!("Cannot find sprite catalog `{}`", sprites.display());
        }

        config.sprites = Some(sprites);
    }

    Ok(config)
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod test {
    use std::{path::PathBuf, str::FromStr};

    use super::{parse_config_from_file, Config};

    #[test]
    fn defaults() {
        let config = Config::from_str(r#"versions = "versions.xml""#).unwrap();

        assert_eq!(config.versions, PathBuf::from("versions.xml"));
        assert_eq!(config.sprites, None);
        assert_eq!(config.obd_version, 300);
        assert_eq!(config.progress_interval, 1);
        assert_eq!(config.background, 0);
    }

    #[test]
    fn all_fields() {
        let config = Config::from_str(
            r#"
versions = "data/versions.xml"
sprites = "data/sprites.xml"
obd_version = 200
progress_interval = 10
background = "FF636363"
"#,
        )
        .unwrap();

        assert_eq!(config.sprites, Some(PathBuf::from("data/sprites.xml")));
        assert_eq!(config.obd_version, 200);
        assert_eq!(config.progress_interval, 10);
        assert_eq!(config.background, 0xFF636363);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_str("").is_err());
        assert!(Config::from_str("versions = \"a\"\nobd_version = 100").is_err());
        assert!(Config::from_str("versions = \"a\"\nprogress_interval = 0").is_err());
        assert!(Config::from_str("versions = \"a\"\nbackground = \"zz\"").is_err());
    }

    #[test]
    fn resolves_relative_paths() {
        let root = std::env::temp_dir().join("thingsmith_config_test");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("versions.xml"), "<versions/>").unwrap();
        std::fs::write(root.join("config.toml"), "versions = \"versions.xml\"").unwrap();

        let config = parse_config_from_file(&root.join("config.toml")).unwrap();
        assert_eq!(config.versions, root.join("versions.xml"));

        std::fs::write(
            root.join("config.toml"),
            "versions = \"versions.xml\"\nsprites = \"missing.xml\"",
        )
        .unwrap();
        assert!(parse_config_from_file(&root.join("config.toml")).is_err());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
