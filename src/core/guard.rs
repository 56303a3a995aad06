//! Include-guard normalizer — wrap a header in a `#if !defined` guard.
//!
//! The guard token is derived from the file's path relative to the shader
//! root, so moving a header and re-running the normalizer refreshes the
//! token. An existing guard is only stripped when all three guard lines
//! agree structurally; anything else is reported as malformed rather than
//! blindly sliced away.

use crate::error::{Error, Result};
use crate::log_status;
use crate::utils::{io, validation};
use serde::Serialize;
use std::path::Path;

const GUARD_OPEN_PREFIX: &str = "#if !defined ";

/// Result of one guard normalization.
#[derive(Debug, Clone, Serialize)]
pub struct GuardResult {
    /// File path relative to root.
    pub file: String,
    /// The guard token that was applied.
    pub token: String,
    /// True when a previous guard block was detected and stripped.
    pub replaced_existing: bool,
    /// Whether the result was written to disk.
    pub applied: bool,
    /// The normalized file content.
    #[serde(skip)]
    pub new_content: String,
}

/// Derive the guard token for a root-relative path: drop the final
/// extension, join path components with `_`, uppercase, and map anything
/// that is not ASCII alphanumeric to `_` so the token is always a valid
/// preprocessor identifier.
pub fn guard_token(relative_path: &str) -> String {
    let stem = Path::new(relative_path).with_extension("");
    let mut token = String::new();

    for component in stem.components() {
        if !token.is_empty() {
            token.push('_');
        }
        for ch in component.as_os_str().to_string_lossy().chars() {
            if ch.is_ascii_alphanumeric() {
                token.push(ch.to_ascii_uppercase());
            } else {
                token.push('_');
            }
        }
    }

    token
}

/// Normalize the include guard of `root/relative_path`.
///
/// A file whose first line opens a guard must carry the exact three-line
/// shape this tool writes (`#if !defined T` / `#define T` / trailing
/// `#endif // T` with the same token); any deviation is a
/// `guard.malformed_block` error. Guard-free files are wrapped as-is.
pub fn apply_guard(root: &Path, relative_path: &str, write: bool) -> Result<GuardResult> {
    validation::validate_relative_path("path", relative_path)?;

    let path = root.join(relative_path);
    let content = io::read_file(&path, "read include file")?;
    let token = guard_token(relative_path);

    let had_trailing_newline = content.ends_with('\n');
    let mut lines: Vec<&str> = content.split('\n').collect();
    if had_trailing_newline {
        lines.pop();
    }

    let (body, replaced_existing) = match existing_guard_token(&lines) {
        Some(existing) => {
            let body = strip_guard(relative_path, &lines, &existing)?;
            (body, true)
        }
        None => (lines.clone(), false),
    };

    let mut out: Vec<String> = Vec::with_capacity(body.len() + 3);
    out.push(format!("{}{}", GUARD_OPEN_PREFIX, token));
    out.push(format!("#define {}", token));
    out.extend(body.iter().map(|l| l.to_string()));
    out.push(format!("#endif // {}", token));

    let mut new_content = out.join("\n");
    if had_trailing_newline {
        new_content.push('\n');
    }

    if write {
        io::write_file_atomic(&path, &new_content, &format!("write {}", relative_path))?;
        log_status!("guard", "Applied guard {} to {}", token, relative_path);
    }

    Ok(GuardResult {
        file: relative_path.to_string(),
        token,
        replaced_existing,
        applied: write,
        new_content,
    })
}

/// Token of the guard opened on line 1, if any. Only decides whether a
/// guard is *claimed*; `strip_guard` decides whether it is well-formed.
fn existing_guard_token(lines: &[&str]) -> Option<String> {
    let first = lines.first()?;
    let token = first.strip_prefix(GUARD_OPEN_PREFIX)?;
    Some(token.trim().to_string())
}

/// Validate the three-line guard shape and return the body between the
/// `#define` line and the closing `#endif`.
fn strip_guard<'a>(file: &str, lines: &[&'a str], token: &str) -> Result<Vec<&'a str>> {
    if token.is_empty() {
        return Err(Error::guard_malformed(
            file,
            "Guard opening line has no token after '#if !defined'",
        ));
    }

    if lines.len() < 3 {
        return Err(Error::guard_malformed(
            file,
            "File opens a guard but is shorter than a guard block",
        ));
    }

    let expected_define = format!("#define {}", token);
    if lines[1].trim_end() != expected_define {
        return Err(Error::guard_malformed(
            file,
            format!(
                "Expected '{}' on line 2, found '{}'",
                expected_define, lines[1]
            ),
        ));
    }

    let last_idx = match lines.iter().rposition(|l| !l.trim().is_empty()) {
        Some(idx) => idx,
        None => {
            return Err(Error::guard_malformed(
                file,
                "File opens a guard but has no closing line",
            ))
        }
    };

    let expected_endif = format!("#endif // {}", token);
    if lines[last_idx].trim_end() != expected_endif {
        return Err(Error::guard_malformed(
            file,
            format!(
                "Expected final line '{}', found '{}'",
                expected_endif, lines[last_idx]
            ),
        ));
    }

    if last_idx < 2 {
        return Err(Error::guard_malformed(
            file,
            "Guard block closes before it opens",
        ));
    }

    Ok(lines[2..last_idx].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn token_from_nested_path() {
        assert_eq!(guard_token("lib/util.glsl"), "LIB_UTIL");
        assert_eq!(guard_token("include/light/shadow.glsl"), "INCLUDE_LIGHT_SHADOW");
    }

    #[test]
    fn token_sanitizes_punctuation() {
        assert_eq!(guard_token("post.blur.glsl"), "POST_BLUR");
        assert_eq!(guard_token("lib/noise-3d.glsl"), "LIB_NOISE_3D");
    }

    #[test]
    fn wraps_guard_free_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("lib/util.glsl"), "float helper();\n").unwrap();

        let result = apply_guard(dir.path(), "lib/util.glsl", true).unwrap();

        assert!(!result.replaced_existing);
        assert_eq!(result.token, "LIB_UTIL");
        assert_eq!(
            fs::read_to_string(dir.path().join("lib/util.glsl")).unwrap(),
            "#if !defined LIB_UTIL\n#define LIB_UTIL\nfloat helper();\n#endif // LIB_UTIL\n"
        );
    }

    #[test]
    fn second_application_is_idempotent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util.glsl"), "float helper();\n").unwrap();

        apply_guard(dir.path(), "util.glsl", true).unwrap();
        let once = fs::read_to_string(dir.path().join("util.glsl")).unwrap();

        let result = apply_guard(dir.path(), "util.glsl", true).unwrap();
        let twice = fs::read_to_string(dir.path().join("util.glsl")).unwrap();

        assert!(result.replaced_existing);
        assert_eq!(once, twice);
    }

    #[test]
    fn refreshes_token_after_move() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(
            dir.path().join("lib/util.glsl"),
            "#if !defined UTIL\n#define UTIL\nfloat helper();\n#endif // UTIL\n",
        )
        .unwrap();

        apply_guard(dir.path(), "lib/util.glsl", true).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("lib/util.glsl")).unwrap(),
            "#if !defined LIB_UTIL\n#define LIB_UTIL\nfloat helper();\n#endif // LIB_UTIL\n"
        );
    }

    #[test]
    fn mismatched_define_line_is_malformed() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("util.glsl"),
            "#if !defined UTIL\n#define OTHER\nfloat helper();\n#endif // UTIL\n",
        )
        .unwrap();

        let err = apply_guard(dir.path(), "util.glsl", true).unwrap_err();
        assert_eq!(err.code.as_str(), "guard.malformed_block");
    }

    #[test]
    fn missing_endif_is_malformed() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("util.glsl"),
            "#if !defined UTIL\n#define UTIL\nfloat helper();\n",
        )
        .unwrap();

        let err = apply_guard(dir.path(), "util.glsl", true).unwrap_err();
        assert_eq!(err.code.as_str(), "guard.malformed_block");
    }

    #[test]
    fn hand_edited_guard_is_not_silently_stripped() {
        let dir = tempdir().unwrap();
        // someone inserted a comment between the open and the define
        fs::write(
            dir.path().join("util.glsl"),
            "#if !defined UTIL\n// hand edit\n#define UTIL\nfloat helper();\n#endif // UTIL\n",
        )
        .unwrap();

        let err = apply_guard(dir.path(), "util.glsl", true).unwrap_err();
        assert_eq!(err.code.as_str(), "guard.malformed_block");
        // file untouched on failure
        assert!(fs::read_to_string(dir.path().join("util.glsl"))
            .unwrap()
            .contains("// hand edit"));
    }

    #[test]
    fn missing_file_is_a_path_error() {
        let dir = tempdir().unwrap();
        let err = apply_guard(dir.path(), "absent.glsl", true).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.path_not_found");
    }

    #[test]
    fn preserves_missing_trailing_newline() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util.glsl"), "float helper();").unwrap();

        apply_guard(dir.path(), "util.glsl", true).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("util.glsl")).unwrap(),
            "#if !defined UTIL\n#define UTIL\nfloat helper();\n#endif // UTIL"
        );
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("util.glsl"), "float helper();\n").unwrap();

        let result = apply_guard(dir.path(), "util.glsl", false).unwrap();

        assert!(!result.applied);
        assert!(result.new_content.starts_with("#if !defined UTIL\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("util.glsl")).unwrap(),
            "float helper();\n"
        );
    }
}
