//! Catalog file I/O
//!
//! Two ways to write the catalog:
//! - [`overwrite`]: truncate and write in place. A crash mid-write can leave
//!   a truncated file.
//! - [`atomic_write`]: write a sibling temp file, sync, then rename over the
//!   target.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::error::{Access, StorageError, StorageResult};

/// Ensure the catalog file and its parent directories exist
///
/// Returns `true` if the file was created by this call.
pub fn ensure_file(path: &Path) -> StorageResult<bool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(StorageError::from_io(e, path.to_path_buf(), Access::Write)),
    }
}

/// Open the catalog for line-by-line reading
///
/// Lines come back as raw bytes without the `\n`. Decoding is left to the
/// caller so one undecodable line does not end the read.
pub fn open_lines(path: &Path) -> StorageResult<impl Iterator<Item = StorageResult<Vec<u8>>>> {
    let file =
        File::open(path).map_err(|e| StorageError::from_io(e, path.to_path_buf(), Access::Read))?;
    let owned = path.to_path_buf();

    Ok(BufReader::new(file)
        .split(b'\n')
        .map(move |line| line.map_err(|e| StorageError::from_io(e, owned.clone(), Access::Read))))
}

/// Truncate the file and write `data` in place
pub fn overwrite(path: &Path, data: &[u8]) -> StorageResult<()> {
    let to_err = |e| StorageError::from_io(e, path.to_path_buf(), Access::Write);

    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(data).map_err(to_err)?;
    file.flush().map_err(to_err)?;

    Ok(())
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    let to_err = |e| StorageError::from_io(e, temp_path.clone(), Access::Write);

    let mut file = File::create(&temp_path).map_err(to_err)?;
    file.write_all(data).map_err(to_err)?;
    file.sync_all().map_err(to_err)?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
