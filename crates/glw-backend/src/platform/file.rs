use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{BackendError, Result};

/// Reads the whole file at `path` into an owned buffer.
///
/// The buffer is sized from the file length up front. A file that cannot be
/// opened or read yields [`BackendError::FileOpen`].
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let open_err = |source| BackendError::FileOpen {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(open_err)?;
    let len = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

    let mut buf = Vec::with_capacity(len);
    file.read_to_end(&mut buf).map_err(open_err)?;

    log::debug!("loaded {} ({} bytes)", path.display(), buf.len());
    Ok(buf)
}
