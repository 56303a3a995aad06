use clap::Args;
use serde::Serialize;

use shaderkit::defaults;
use shaderkit::rewrite::{self, FileFailure, RewriteRule};

use super::{resolve_arg, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ReplaceArgs {
    /// Substring to find (prompted for when omitted at a TTY)
    pub find: Option<String>,

    /// Replacement text (prompted for when omitted at a TTY)
    pub replace: Option<String>,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    pub write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum ReplaceOutput {
    #[serde(rename = "replace")]
    Replace {
        find: String,
        replace: String,
        root: String,
        dry_run: bool,
        files_scanned: usize,
        files_modified: usize,
        edits: Vec<EditSummary>,
        failures: Vec<FileFailure>,
        applied: bool,
    },
}

#[derive(Serialize)]
pub struct EditSummary {
    pub file: String,
    pub lines_changed: usize,
    pub replacements: usize,
}

pub fn run(args: ReplaceArgs, global: &GlobalArgs) -> CmdResult<ReplaceOutput> {
    let find = resolve_arg(args.find, "find", "find: ")?;
    let replace = resolve_arg(args.replace, "replace", "replace with: ")?;

    if find.is_empty() {
        return Err(shaderkit::Error::validation_invalid_argument(
            "find",
            "Find string cannot be empty",
            None,
            None,
        ));
    }

    let extensions = defaults::load_defaults(&global.root).extensions;
    let rule = RewriteRule::Literal {
        find: find.clone(),
        replace: replace.clone(),
    };

    let mut result = rewrite::plan_rewrite(&global.root, &extensions, &rule)?;
    if args.write {
        rewrite::apply_rewrite(&mut result, &global.root)?;
        shaderkit::log_status!(
            "replace",
            "Rewrote {} of {} file(s)",
            result.files_modified(),
            result.files_scanned
        );
    }

    let exit_code = if result.failures.is_empty() { 0 } else { 1 };

    Ok((
        ReplaceOutput::Replace {
            find,
            replace,
            root: global.root.display().to_string(),
            dry_run: !args.write,
            files_scanned: result.files_scanned,
            files_modified: result.files_modified(),
            edits: result
                .edits
                .iter()
                .map(|e| EditSummary {
                    file: e.file.clone(),
                    lines_changed: e.lines_changed,
                    replacements: e.replacements,
                })
                .collect(),
            failures: result.failures.clone(),
            applied: result.applied,
        },
        exit_code,
    ))
}
