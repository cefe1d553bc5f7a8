use std::fmt;

/// A known client version and the signatures of its DAT/SPR pair.
///
/// Only the registry creates these. Everything but the OTB version is fixed after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub(crate) value: u32,
    pub(crate) value_str: String,
    pub(crate) dat_signature: u32,
    pub(crate) spr_signature: u32,
    pub(crate) otb_version: u32,
}

impl Version {
    /// Numeric client version, `1041` for "10.41".
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn value_str(&self) -> &str {
        &self.value_str
    }

    pub fn dat_signature(&self) -> u32 {
        self.dat_signature
    }

    pub fn spr_signature(&self) -> u32 {
        self.spr_signature
    }

    pub fn otb_version(&self) -> u32 {
        self.otb_version
    }

    pub(crate) fn same_signatures(&self, value: u32, dat: u32, spr: u32) -> bool {
        self.value == value && self.dat_signature == dat && self.spr_signature == spr
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_str)
    }
}

/// Human form of a numeric version. `1041` becomes `10.41`.
pub fn version_string(value: u32) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

/// Emitted to the registry observer after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionEvent {
    Added(Version),
    /// Same value and signatures were added again with another OTB version.
    Updated(Version),
    Removed(Version),
}

/// Classifies sprite pixel buffers by edge size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteDimension {
    pub value: String,
    pub size: u32,
    pub data_size: u32,
}
