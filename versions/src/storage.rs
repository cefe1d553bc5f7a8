use std::{
    ffi::OsStr,
    fmt,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::VersionError,
    types::{version_string, SpriteDimension, Version, VersionEvent},
    xml::{
        format_signature, parse_signature, read_document, write_document, SpriteElement,
        SpritesDocument, VersionElement, VersionsDocument,
    },
};

pub type VersionObserver = Box<dyn FnMut(&VersionEvent) + Send + Sync>;

/// Catalog of client versions.
///
/// One instance per running process, handed by reference to whoever needs it.
/// Lookups borrow immutably, mutations need `&mut self` and notify the observer.
#[derive(Default)]
pub struct VersionStorage {
    versions: Vec<Version>,
    observer: Option<VersionObserver>,
}

impl fmt::Debug for VersionStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionStorage")
            .field("versions", &self.versions)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl VersionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_from_str(xml: &str) -> Result<Self, VersionError> {
        let document: VersionsDocument = read_document(xml)?;
        let mut storage = Self::new();

        for element in document.versions {
            let dat_signature = parse_signature(element.value, &element.dat)?;
            let spr_signature = parse_signature(element.value, &element.spr)?;

            // a catalog can list the same triple twice, last one wins
            storage.versions.retain(|version| {
                !version.same_signatures(element.value, dat_signature, spr_signature)
            });

            storage.versions.push(Version {
                value: element.value,
                value_str: element.string,
                dat_signature,
                spr_signature,
                otb_version: element.otb,
            });
        }

        storage.sort();

        Ok(storage)
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Self, VersionError> {
        let path: &Path = path.as_ref();
        let xml = std::fs::read_to_string(path)?;
        let storage = Self::open_from_str(&xml)?;

        info!(
            "Loaded {} versions from {}",
            storage.versions.len(),
            path.display()
        );

        Ok(storage)
    }

    pub fn write_to_string(&self) -> Result<String, VersionError> {
        let document = VersionsDocument {
            versions: self
                .versions
                .iter()
                .map(|version| VersionElement {
                    value: version.value,
                    string: version.value_str.clone(),
                    dat: format_signature(version.dat_signature),
                    spr: format_signature(version.spr_signature),
                    otb: version.otb_version,
                })
                .collect(),
        };

        write_document(&document)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path> + Into<PathBuf>) -> Result<(), VersionError> {
        let xml = self.write_to_string()?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path.as_ref())?;

        file.write_all(xml.as_bytes())?;
        file.flush()?;

        info!(
            "Saved {} versions to {}",
            self.versions.len(),
            path.as_ref().display()
        );

        Ok(())
    }

    pub fn set_observer(&mut self, observer: impl FnMut(&VersionEvent) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn get_all(&self) -> &[Version] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Every entry with this client version. Several can share a value with different signatures.
    pub fn get_by_value(&self, value: u32) -> Vec<&Version> {
        self.versions
            .iter()
            .filter(|version| version.value == value)
            .collect()
    }

    pub fn get_by_value_str(&self, value_str: &str) -> Option<&Version> {
        self.versions
            .iter()
            .find(|version| version.value_str == value_str)
    }

    pub fn get_by_signatures(&self, dat_signature: u32, spr_signature: u32) -> Option<&Version> {
        self.versions.iter().find(|version| {
            version.dat_signature == dat_signature && version.spr_signature == spr_signature
        })
    }

    /// Registers a version.
    ///
    /// Re-adding an existing (value, dat, spr) triple only updates its OTB version.
    /// The display string gets a ` vN` suffix when another entry already uses it.
    pub fn add_version(
        &mut self,
        value: u32,
        dat_signature: u32,
        spr_signature: u32,
        otb_version: u32,
    ) -> Version {
        if let Some(existing) = self
            .versions
            .iter_mut()
            .find(|version| version.same_signatures(value, dat_signature, spr_signature))
        {
            if existing.otb_version == otb_version {
                return existing.clone();
            }

            existing.otb_version = otb_version;
            let updated = existing.clone();

            info!("Updated OTB version of {updated} to {otb_version}");
            self.notify(VersionEvent::Updated(updated.clone()));

            return updated;
        }

        let base = version_string(value);
        let mut value_str = base.clone();
        let mut suffix = 2;

        while self.get_by_value_str(&value_str).is_some() {
            value_str = format!("{base} v{suffix}");
            suffix += 1;
        }

        let version = Version {
            value,
            value_str,
            dat_signature,
            spr_signature,
            otb_version,
        };

        self.versions.push(version.clone());
        self.sort();

        info!(
            "Added version {version} (dat {}, spr {})",
            format_signature(dat_signature),
            format_signature(spr_signature)
        );
        self.notify(VersionEvent::Added(version.clone()));

        version
    }

    pub fn remove_version(&mut self, version: &Version) -> Option<Version> {
        let index = self.versions.iter().position(|entry| {
            entry.same_signatures(version.value, version.dat_signature, version.spr_signature)
        })?;

        let removed = self.versions.remove(index);

        info!("Removed version {removed}");
        self.notify(VersionEvent::Removed(removed.clone()));

        Some(removed)
    }

    fn sort(&mut self) {
        // stable, so entries sharing a value keep insertion order
        self.versions.sort_by_key(|version| version.value);
    }

    fn notify(&mut self, event: VersionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }
}

/// Catalog of sprite buffer dimensions.
#[derive(Debug, Default)]
pub struct SpriteDimensionStorage {
    dimensions: Vec<SpriteDimension>,
}

impl SpriteDimensionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_from_str(xml: &str) -> Result<Self, VersionError> {
        let document: SpritesDocument = read_document(xml)?;

        let mut dimensions = document
            .sprites
            .into_iter()
            .map(|element| SpriteDimension {
                value: element.value,
                size: element.size,
                data_size: element.data_size,
            })
            .collect::<Vec<_>>();

        dimensions.sort_by_key(|dimension| dimension.size);

        Ok(Self { dimensions })
    }

    pub fn open_from_file(path: impl AsRef<OsStr> + AsRef<Path>) -> Result<Self, VersionError> {
        let path: &Path = path.as_ref();
        let xml = std::fs::read_to_string(path)?;
        let storage = Self::open_from_str(&xml)?;

        info!(
            "Loaded {} sprite dimensions from {}",
            storage.dimensions.len(),
            path.display()
        );

        Ok(storage)
    }

    pub fn write_to_string(&self) -> Result<String, VersionError> {
        let document = SpritesDocument {
            sprites: self
                .dimensions
                .iter()
                .map(|dimension| SpriteElement {
                    value: dimension.value.clone(),
                    size: dimension.size,
                    data_size: dimension.data_size,
                })
                .collect(),
        };

        write_document(&document)
    }

    pub fn get_all(&self) -> &[SpriteDimension] {
        &self.dimensions
    }

    pub fn get_by_value(&self, value: &str) -> Option<&SpriteDimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.value == value)
    }

    pub fn get_by_size(&self, size: u32) -> Option<&SpriteDimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.size == size)
    }

    /// Finds the entry whose pixel buffer is exactly `data_size` bytes.
    pub fn get_by_data_size(&self, data_size: u32) -> Option<&SpriteDimension> {
        self.dimensions
            .iter()
            .find(|dimension| dimension.data_size == data_size)
    }
}
