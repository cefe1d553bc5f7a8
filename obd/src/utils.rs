use std::borrow::Cow;

use log::debug;

use crate::error::ObdError;

/// LZMA alone framing: properties byte, dictionary size, unknown length and an end marker.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, ObdError> {
    let mut out = Vec::with_capacity(data.len() / 2);

    lzma_rs::lzma_compress(&mut &data[..], &mut out)
        .map_err(|op| ObdError::Compression { source: op })?;

    Ok(out)
}

/// Buffers that are not LZMA are taken as already plain.
pub fn decompress_or_plain(data: &[u8]) -> Cow<'_, [u8]> {
    let mut out = vec![];

    match lzma_rs::lzma_decompress(&mut &data[..], &mut out) {
        Ok(()) => Cow::Owned(out),
        Err(err) => {
            debug!("Buffer is not LZMA ({err}), reading it as plain");
            Cow::Borrowed(data)
        }
    }
}
