//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents as UTF-8 text.
///
/// Maps the two failure modes callers need to tell apart: a missing file
/// becomes `validation.path_not_found`, undecodable bytes become
/// `internal.encoding_error`. Everything else is `internal.io_error`.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            Error::validation_path_not_found(path.display().to_string(), operation)
        }
        std::io::ErrorKind::InvalidData => Error::internal_encoding(
            path.display().to_string(),
            format!("File is not valid UTF-8 text: {}", path.display()),
        ),
        _ => Error::internal_io(e.to_string(), Some(operation.to_string())),
    })
}

/// Write content to a file atomically: full write to a sibling temp file,
/// then rename over the target.
///
/// Readers always observe either the old content or the new content, never
/// a partial write. The temp file is removed if the rename fails.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some(operation.to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::internal_io(
            e.to_string(),
            Some(format!("{} (rename)", operation)),
        ));
    }

    Ok(())
}
