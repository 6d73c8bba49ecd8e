// dqgate-core/src/infrastructure/fs.rs

use std::io::Write;
use std::path::Path;

use crate::infrastructure::error::StorageError;

/// Write content to a file atomically using a temporary file.
///
/// The temporary file is created next to the target so that the final rename
/// stays on one filesystem. Readers see either the old file or the complete
/// new one, never a partial write. Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> Result<(), StorageError> {
    let path = path.as_ref();
    let location = path.display().to_string();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(parent).map_err(|e| StorageError::from_io(&location, e))?;

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| StorageError::from_io(&location, e))?;

    temp_file
        .write_all(content.as_ref())
        .map_err(|e| StorageError::from_io(&location, e))?;

    temp_file
        .persist(path)
        .map_err(|e| StorageError::from_io(&location, e.error))?;

    Ok(())
}
