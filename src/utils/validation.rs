//! Input validation helpers for paths and extension lists.

use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Validate a path given relative to the shader root.
///
/// Rejects empty paths, absolute paths, and any `..` component. Every
/// operation stays inside the root it was given.
pub fn validate_relative_path(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} cannot be empty", capitalize(field)),
            None,
            None,
        ));
    }

    let path = Path::new(value);
    if path.is_absolute() {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} must be relative to the shader root", capitalize(field)),
            Some(value.to_string()),
            Some("Pass a path like lib/util.glsl, not an absolute path".to_string()),
        ));
    }

    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(Error::validation_invalid_argument(
            field,
            format!("{} must not contain '..' components", capitalize(field)),
            Some(value.to_string()),
            None,
        ));
    }

    Ok(())
}

/// Validate an extension allow-list: non-empty, every entry dot-prefixed
/// with a non-empty suffix.
pub fn validate_extensions(extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(Error::validation_invalid_argument(
            "extensions",
            "Extension allow-list cannot be empty",
            None,
            None,
        ));
    }

    for ext in extensions {
        if !ext.starts_with('.') || ext.len() < 2 {
            return Err(Error::validation_invalid_argument(
                "extensions",
                format!("Extension '{}' must be dot-prefixed, e.g. .glsl", ext),
                Some(ext.clone()),
                None,
            ));
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
