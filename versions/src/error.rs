#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("Error parsing catalog: {source}")]
    XmlRead {
        #[source]
        source: quick_xml::DeError,
    },
    #[error("Error writing catalog: {source}")]
    XmlWrite {
        #[source]
        source: quick_xml::SeError,
    },
    #[error("Invalid signature `{value}` for version {version}")]
    InvalidSignature { version: u32, value: String },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}
