//! Many OBD files, one after another.
//!
//! A failing file does not stop the batch, it gets an `Err` in its slot.
use std::{
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use log::{info, warn};
use obd::{error::ObdError, ObdCodec};
use things::ThingData;

use crate::workspace::Workspace;

/// Reported between files.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress<'a> {
    pub done: usize,
    pub total: usize,
    /// Last file handled.
    pub path: &'a Path,
}

pub type BatchResult<T> = Vec<(PathBuf, Result<T, ObdError>)>;

/// Decodes `paths` in order. `progress` is called every `interval` files and after the last.
///
/// Returning [`ControlFlow::Break`] from `progress` ends the batch there.
pub fn decode_files<P: AsRef<Path>>(
    codec: &ObdCodec,
    paths: &[P],
    interval: usize,
    progress: impl FnMut(BatchProgress) -> ControlFlow<()>,
) -> BatchResult<ThingData> {
    run_batch(paths, interval, progress, |path| codec.open_from_file(path))
}

/// Encodes every (path, thing) pair in order, see [`decode_files`].
pub fn encode_files<P: AsRef<Path>>(
    codec: &ObdCodec,
    items: &[(P, ThingData)],
    interval: usize,
    progress: impl FnMut(BatchProgress) -> ControlFlow<()>,
) -> BatchResult<()> {
    let paths: Vec<&Path> = items.iter().map(|(path, _)| path.as_ref()).collect();

    let mut data = items.iter().map(|(_, data)| data);

    run_batch(&paths, interval, progress, |path| match data.next() {
        Some(data) => codec.write_to_file(data, path),
        None => Err(ObdError::InvalidArgument {
            message: "no thing to write",
        }),
    })
}

fn run_batch<P: AsRef<Path>, T>(
    paths: &[P],
    interval: usize,
    mut progress: impl FnMut(BatchProgress) -> ControlFlow<()>,
    mut job: impl FnMut(&Path) -> Result<T, ObdError>,
) -> BatchResult<T> {
    let total = paths.len();
    let interval = interval.max(1);
    let mut results = Vec::with_capacity(total);

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let result = job(path);

        if let Err(err) = &result {
            warn!("`{}`: {}", path.display(), err);
        }

        results.push((path.to_path_buf(), result));

        let done = index + 1;

        if done % interval != 0 && done != total {
            continue;
        }

        info!("{done}/{total} files");

        if progress(BatchProgress { done, total, path }).is_break() {
            info!("Batch stopped after {done} files");
            break;
        }
    }

    results
}

impl Workspace {
    /// [`decode_files`] with this workspace's codec and progress interval.
    pub fn decode_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        progress: impl FnMut(BatchProgress) -> ControlFlow<()>,
    ) -> BatchResult<ThingData> {
        decode_files(
            &self.codec(),
            paths,
            self.config().progress_interval,
            progress,
        )
    }

    /// [`encode_files`] with this workspace's codec and progress interval.
    pub fn encode_files<P: AsRef<Path>>(
        &self,
        items: &[(P, ThingData)],
        progress: impl FnMut(BatchProgress) -> ControlFlow<()>,
    ) -> BatchResult<()> {
        encode_files(
            &self.codec(),
            items,
            self.config().progress_interval,
            progress,
        )
    }
}
