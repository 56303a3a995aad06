//! Rewrite engine — apply a transformation rule across a shader tree.
//!
//! Given a `RewriteRule`, this engine:
//! 1. Enumerates every file under the root whose extension is allow-listed
//! 2. Splits each file into lines and applies the rule's match predicate
//! 3. Plans `FileEdit`s for files where at least one line changed
//! 4. Applies the edits to disk atomically (or returns a dry-run preview)
//!
//! Files the rule never touches are not rewritten at all, so their
//! modification timestamps survive a run. Unreadable or non-UTF-8 files are
//! skipped and reported instead of aborting the whole batch.

use crate::error::{Error, Result};
use crate::utils::{io, validation};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Directive token that opens an include line, after leading whitespace.
pub const INCLUDE_TOKEN: &str = "#include";

// ============================================================================
// Types
// ============================================================================

/// Transformation applied line-by-line to each file in the set.
#[derive(Debug, Clone)]
pub enum RewriteRule {
    /// Replace every occurrence of `find` on any line containing it.
    /// An empty `find` matches nothing.
    Literal { find: String, replace: String },
    /// Replace `old_path` with `new_path`, but only on lines whose trimmed
    /// content starts with the include directive token. Mentions of the
    /// path in comments or unrelated strings are left untouched.
    IncludePath { old_path: String, new_path: String },
}

impl RewriteRule {
    fn target(&self) -> &str {
        match self {
            RewriteRule::Literal { find, .. } => find,
            RewriteRule::IncludePath { old_path, .. } => old_path,
        }
    }

    fn replacement(&self) -> &str {
        match self {
            RewriteRule::Literal { replace, .. } => replace,
            RewriteRule::IncludePath { new_path, .. } => new_path,
        }
    }

    fn matches(&self, line: &str) -> bool {
        match self {
            RewriteRule::Literal { find, .. } => !find.is_empty() && line.contains(find),
            RewriteRule::IncludePath { old_path, .. } => {
                !old_path.is_empty()
                    && line.trim_start().starts_with(INCLUDE_TOKEN)
                    && line.contains(old_path)
            }
        }
    }
}

/// A planned edit to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// File path relative to root.
    pub file: String,
    /// Number of lines that changed.
    pub lines_changed: usize,
    /// Number of substring replacements across those lines.
    pub replacements: usize,
    /// New content after all replacements.
    #[serde(skip)]
    pub new_content: String,
}

/// A file the engine could not process.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File path relative to root.
    pub file: String,
    /// Error code string (e.g. `internal.encoding_error`).
    pub kind: String,
    /// Human-readable reason.
    pub message: String,
}

/// The full result of a rewrite run.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteResult {
    /// Number of candidate files examined (after the extension filter).
    pub files_scanned: usize,
    /// Planned (or applied) edits, one per dirty file.
    pub edits: Vec<FileEdit>,
    /// Files skipped because they could not be read or decoded.
    pub failures: Vec<FileFailure>,
    /// Whether changes were written to disk.
    pub applied: bool,
}

impl RewriteResult {
    pub fn files_modified(&self) -> usize {
        self.edits.len()
    }
}

// ============================================================================
// File walking
// ============================================================================

/// Enumerate every regular file under `root` whose extension is in the
/// allow-list. Extension match is case-sensitive and exact.
pub fn walk_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::validation_path_not_found(
            root.display().to_string(),
            "scan shader root",
        ));
    }
    validation::validate_extensions(extensions)?;

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&root.display().to_string())
    );
    let entries = glob::glob(&pattern).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("glob {}", pattern)))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some("read directory entry".to_string()))
        })?;
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if extensions
            .iter()
            .any(|allowed| allowed.strip_prefix('.') == Some(ext))
        {
            files.push(path);
        }
    }

    Ok(files)
}

// ============================================================================
// Line rewriting
// ============================================================================

/// Apply the rule to one file's content. Returns `None` when no line
/// matched (the file stays untouched on disk).
///
/// Splitting on `\n` and re-joining with `\n` reproduces the original
/// bytes exactly for unchanged content, so the trailing-newline convention
/// and any `\r` characters inside lines survive the round trip.
fn rewrite_content(content: &str, rule: &RewriteRule) -> Option<(String, usize, usize)> {
    let mut lines: Vec<String> = Vec::new();
    let mut lines_changed = 0;
    let mut replacements = 0;

    for line in content.split('\n') {
        if rule.matches(line) {
            replacements += line.matches(rule.target()).count();
            lines.push(line.replace(rule.target(), rule.replacement()));
            lines_changed += 1;
        } else {
            lines.push(line.to_string());
        }
    }

    if lines_changed == 0 {
        return None;
    }

    Some((lines.join("\n"), lines_changed, replacements))
}

// ============================================================================
// Plan and apply
// ============================================================================

/// Scan the tree and plan edits without touching the file system.
pub fn plan_rewrite(
    root: &Path,
    extensions: &[String],
    rule: &RewriteRule,
) -> Result<RewriteResult> {
    let files = walk_files(root, extensions)?;

    let mut edits = Vec::new();
    let mut failures = Vec::new();

    for path in &files {
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let content = match io::read_file(path, "read shader file") {
            Ok(content) => content,
            Err(err) => {
                failures.push(FileFailure {
                    file: relative,
                    kind: err.code.as_str().to_string(),
                    message: err.message,
                });
                continue;
            }
        };

        if let Some((new_content, lines_changed, replacements)) = rewrite_content(&content, rule) {
            edits.push(FileEdit {
                file: relative,
                lines_changed,
                replacements,
                new_content,
            });
        }
    }

    Ok(RewriteResult {
        files_scanned: files.len(),
        edits,
        failures,
        applied: false,
    })
}

/// Apply planned edits to disk. Each file is replaced atomically; a write
/// failure aborts the run (already-written files stay written).
pub fn apply_rewrite(result: &mut RewriteResult, root: &Path) -> Result<()> {
    for edit in &result.edits {
        let path = root.join(&edit.file);
        io::write_file_atomic(&path, &edit.new_content, &format!("write {}", edit.file))?;
    }

    result.applied = true;
    Ok(())
}

/// Plan and immediately apply. `files_modified()` on the result is the
/// number of files rewritten.
pub fn rewrite(root: &Path, extensions: &[String], rule: &RewriteRule) -> Result<RewriteResult> {
    let mut result = plan_rewrite(root, extensions, rule)?;
    apply_rewrite(&mut result, root)?;
    Ok(result)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn shader_exts() -> Vec<String> {
        crate::defaults::builtin_defaults().extensions
    }

    fn literal(find: &str, replace: &str) -> RewriteRule {
        RewriteRule::Literal {
            find: find.to_string(),
            replace: replace.to_string(),
        }
    }

    fn include_rule(old: &str, new: &str) -> RewriteRule {
        RewriteRule::IncludePath {
            old_path: old.to_string(),
            new_path: new.to_string(),
        }
    }

    fn tree_with(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = plan_rewrite(
            Path::new("/nonexistent/shaders"),
            &shader_exts(),
            &literal("a", "b"),
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "validation.path_not_found");
    }

    #[test]
    fn extension_filter_is_exact_and_case_sensitive() {
        let dir = tree_with(&[
            ("a.glsl", "float x;\n"),
            ("b.GLSL", "float x;\n"),
            ("c.txt", "float x;\n"),
            ("d.glslx", "float x;\n"),
        ]);

        let files = walk_files(dir.path(), &shader_exts()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.glsl"]);
    }

    #[test]
    fn replaces_every_occurrence_on_matching_lines() {
        let dir = tree_with(&[("a.glsl", "foo foo foo\nbar\nfoo\n")]);

        let result = rewrite(dir.path(), &shader_exts(), &literal("foo", "baz")).unwrap();

        assert_eq!(result.files_modified(), 1);
        assert_eq!(result.edits[0].lines_changed, 2);
        assert_eq!(result.edits[0].replacements, 4);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.glsl")).unwrap(),
            "baz baz baz\nbar\nbaz\n"
        );
    }

    #[test]
    fn untouched_file_is_not_rewritten() {
        let dir = tree_with(&[("a.glsl", "nothing to see\n")]);
        let path = dir.path().join("a.glsl");
        let mtime_before = fs::metadata(&path).unwrap().modified().unwrap();

        let result = rewrite(dir.path(), &shader_exts(), &literal("absent", "x")).unwrap();

        assert_eq!(result.files_modified(), 0);
        assert_eq!(result.files_scanned, 1);
        let mtime_after = fs::metadata(&path).unwrap().modified().unwrap();
        assert_eq!(mtime_before, mtime_after);
        assert_eq!(fs::read_to_string(&path).unwrap(), "nothing to see\n");
    }

    #[test]
    fn trailing_newline_convention_is_preserved() {
        let dir = tree_with(&[
            ("with.glsl", "foo\nbar\n"),
            ("without.glsl", "foo\nbar"),
        ]);

        rewrite(dir.path(), &shader_exts(), &literal("foo", "qux")).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("with.glsl")).unwrap(),
            "qux\nbar\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("without.glsl")).unwrap(),
            "qux\nbar"
        );
    }

    #[test]
    fn crlf_lines_round_trip() {
        let dir = tree_with(&[("a.fsh", "foo\r\nbar\r\n")]);

        rewrite(dir.path(), &shader_exts(), &literal("bar", "baz")).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("a.fsh")).unwrap(),
            "foo\r\nbaz\r\n"
        );
    }

    #[test]
    fn empty_find_is_a_no_op() {
        let dir = tree_with(&[("a.glsl", "anything\n")]);

        let result = rewrite(dir.path(), &shader_exts(), &literal("", "x")).unwrap();

        assert_eq!(result.files_modified(), 0);
        assert_eq!(fs::read_to_string(dir.path().join("a.glsl")).unwrap(), "anything\n");
    }

    #[test]
    fn literal_replace_is_idempotent_when_replace_lacks_find() {
        let dir = tree_with(&[("a.glsl", "foo and foo\n")]);

        rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();
        let once = fs::read_to_string(dir.path().join("a.glsl")).unwrap();

        rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();
        let twice = fs::read_to_string(dir.path().join("a.glsl")).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once, "bar and bar\n");
    }

    #[test]
    fn include_rule_only_touches_include_directives() {
        let dir = tree_with(&[(
            "a.glsl",
            concat!(
                "// see lib/util.glsl for details\n",
                "#include \"lib/util.glsl\"\n",
                "    #include \"lib/util.glsl\"\n",
                "const char* s = \"lib/util.glsl\";\n",
            ),
        )]);

        let result = rewrite(
            dir.path(),
            &shader_exts(),
            &include_rule("lib/util.glsl", "lib/helper.glsl"),
        )
        .unwrap();

        assert_eq!(result.edits[0].lines_changed, 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.glsl")).unwrap(),
            concat!(
                "// see lib/util.glsl for details\n",
                "#include \"lib/helper.glsl\"\n",
                "    #include \"lib/helper.glsl\"\n",
                "const char* s = \"lib/util.glsl\";\n",
            )
        );
    }

    #[test]
    fn subdirectories_are_scanned() {
        let dir = tree_with(&[
            ("lib/util.glsl", "foo\n"),
            ("program/composite.fsh", "foo\n"),
        ]);

        let result = rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_modified(), 2);
    }

    #[test]
    fn non_utf8_file_is_skipped_and_recorded() {
        let dir = tree_with(&[("good.glsl", "foo\n")]);
        fs::write(dir.path().join("bad.glsl"), [0xff, 0xfe, 0x41]).unwrap();

        let result = rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_modified(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].file, "bad.glsl");
        assert_eq!(result.failures[0].kind, "internal.encoding_error");
        // the undecodable file is untouched
        assert_eq!(fs::read(dir.path().join("bad.glsl")).unwrap(), [0xff, 0xfe, 0x41]);
    }

    #[test]
    fn plan_does_not_write() {
        let dir = tree_with(&[("a.glsl", "foo\n")]);

        let result = plan_rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();

        assert!(!result.applied);
        assert_eq!(result.files_modified(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.glsl")).unwrap(), "foo\n");
    }

    #[test]
    fn apply_marks_result_applied() {
        let dir = tree_with(&[("a.glsl", "foo\n")]);

        let mut result = plan_rewrite(dir.path(), &shader_exts(), &literal("foo", "bar")).unwrap();
        apply_rewrite(&mut result, dir.path()).unwrap();

        assert!(result.applied);
        assert_eq!(fs::read_to_string(dir.path().join("a.glsl")).unwrap(), "bar\n");
    }
}
