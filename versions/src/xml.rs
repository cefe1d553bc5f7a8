//! Catalog documents as they sit on disk.
//!
//! ```xml
//! <versions>
//!   <version value="1041" string="10.41" dat="57BBD603" spr="57BBD5A5" otb="56"/>
//! </versions>
//! ```
use serde::{Deserialize, Serialize};

use crate::error::VersionError;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "versions")]
pub(crate) struct VersionsDocument {
    #[serde(rename = "version", default)]
    pub versions: Vec<VersionElement>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct VersionElement {
    #[serde(rename = "@value")]
    pub value: u32,
    #[serde(rename = "@string")]
    pub string: String,
    #[serde(rename = "@dat")]
    pub dat: String,
    #[serde(rename = "@spr")]
    pub spr: String,
    #[serde(rename = "@otb", default)]
    pub otb: u32,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename = "sprites")]
pub(crate) struct SpritesDocument {
    #[serde(rename = "sprite", default)]
    pub sprites: Vec<SpriteElement>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct SpriteElement {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@size")]
    pub size: u32,
    #[serde(rename = "@dataSize")]
    pub data_size: u32,
}

pub(crate) fn read_document<T>(xml: &str) -> Result<T, VersionError>
where
    T: for<'de> Deserialize<'de>,
{
    quick_xml::de::from_str(xml).map_err(|source| VersionError::XmlRead { source })
}

pub(crate) fn write_document<T: Serialize>(document: &T) -> Result<String, VersionError> {
    let mut buffer = String::from(XML_DECLARATION);

    let mut serializer = quick_xml::se::Serializer::new(&mut buffer);
    serializer.indent(' ', 2);

    document
        .serialize(serializer)
        .map_err(|source| VersionError::XmlWrite { source })?;

    buffer.push('\n');

    Ok(buffer)
}

/// Uppercase, no prefix.
pub(crate) fn format_signature(signature: u32) -> String {
    format!("{signature:X}")
}

pub(crate) fn parse_signature(version: u32, value: &str) -> Result<u32, VersionError> {
    let digits = value
        .trim()
        .trim_start_matches("0x")
        .trim_start_matches("0X");

    u32::from_str_radix(digits, 16).map_err(|_| VersionError::InvalidSignature {
        version,
        value: value.to_owned(),
    })
}
