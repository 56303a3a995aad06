//! Include-file rename — move a header and retarget every `#include` of it.

use crate::error::{Error, Result};
use crate::log_status;
use crate::rewrite::{self, RewriteResult, RewriteRule};
use crate::utils::validation;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The full result of an include rename.
#[derive(Debug, Clone, Serialize)]
pub struct IncludeRenameResult {
    /// Old path relative to root.
    pub renamed_from: String,
    /// New path relative to root.
    pub renamed_to: String,
    /// The reference-rewrite half of the operation.
    pub rewrite: RewriteResult,
    /// Whether the rename and the edits were written to disk.
    pub applied: bool,
}

/// Rename `root/old` to `root/new` and rewrite every include directive that
/// references `old`. With `write == false` nothing touches the disk; the
/// result is a preview.
///
/// Fatal argument errors (missing source, existing target, bad paths) are
/// raised before any mutation.
pub fn rename_include(
    root: &Path,
    old: &str,
    new: &str,
    extensions: &[String],
    write: bool,
) -> Result<IncludeRenameResult> {
    validation::validate_relative_path("old_path", old)?;
    validation::validate_relative_path("new_path", new)?;

    if old == new {
        return Err(Error::validation_invalid_argument(
            "new_path",
            "New path is identical to the old path",
            Some(new.to_string()),
            None,
        ));
    }

    let source = root.join(old);
    if !source.is_file() {
        return Err(Error::validation_path_not_found(
            source.display().to_string(),
            "rename include",
        ));
    }

    let target = root.join(new);
    if target.exists() {
        return Err(Error::validation_invalid_argument(
            "new_path",
            format!("Rename target '{}' already exists", new),
            Some(new.to_string()),
            Some("Pick an unused path or remove the existing file first".to_string()),
        ));
    }

    let rule = RewriteRule::IncludePath {
        old_path: old.to_string(),
        new_path: new.to_string(),
    };
    let mut result = rewrite::plan_rewrite(root, extensions, &rule)?;

    if write {
        // Content edits first, then the file move; every planned edit
        // targets a path that still exists.
        rewrite::apply_rewrite(&mut result, root)?;
        log_status!(
            "include",
            "Updated {} include reference(s) across {} file(s)",
            result.edits.iter().map(|e| e.replacements).sum::<usize>(),
            result.files_modified()
        );

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("create {}", parent.display())))
            })?;
        }

        fs::rename(&source, &target).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("rename {} -> {}", old, new)),
            )
        })?;
        log_status!("include", "Renamed {} -> {}", old, new);
    }

    Ok(IncludeRenameResult {
        renamed_from: old.to_string(),
        renamed_to: new.to_string(),
        rewrite: result,
        applied: write,
    })
}
