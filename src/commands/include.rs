use clap::{Args, Subcommand};
use serde::Serialize;

use shaderkit::defaults;
use shaderkit::guard;
use shaderkit::includes;
use shaderkit::rewrite::FileFailure;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct IncludeArgs {
    #[command(subcommand)]
    command: IncludeCommand,
}

#[derive(Subcommand)]
enum IncludeCommand {
    /// Rename an include file and retarget every #include referencing it
    Rename {
        /// Current path, relative to the shader root
        old_path: String,
        /// New path, relative to the shader root
        new_path: String,
        /// Apply changes to disk (default is dry-run)
        #[arg(long)]
        write: bool,
    },
    /// Insert or refresh the include guard of a header
    Guard {
        /// Header path, relative to the shader root
        path: String,
        /// Apply changes to disk (default is dry-run)
        #[arg(long)]
        write: bool,
    },
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum IncludeOutput {
    #[serde(rename = "include.rename")]
    Rename {
        old_path: String,
        new_path: String,
        root: String,
        dry_run: bool,
        files_scanned: usize,
        files_modified: usize,
        references_updated: usize,
        edits: Vec<RenameEditSummary>,
        failures: Vec<FileFailure>,
        applied: bool,
    },
    #[serde(rename = "include.guard")]
    Guard {
        file: String,
        token: String,
        replaced_existing: bool,
        dry_run: bool,
        applied: bool,
    },
}

#[derive(Serialize)]
pub struct RenameEditSummary {
    pub file: String,
    pub replacements: usize,
}

pub fn run(args: IncludeArgs, global: &GlobalArgs) -> CmdResult<IncludeOutput> {
    match args.command {
        IncludeCommand::Rename {
            old_path,
            new_path,
            write,
        } => run_rename(&old_path, &new_path, write, global),
        IncludeCommand::Guard { path, write } => run_guard(&path, write, global),
    }
}

fn run_rename(
    old_path: &str,
    new_path: &str,
    write: bool,
    global: &GlobalArgs,
) -> CmdResult<IncludeOutput> {
    let extensions = defaults::load_defaults(&global.root).extensions;

    let result = includes::rename_include(&global.root, old_path, new_path, &extensions, write)?;

    let exit_code = if result.rewrite.failures.is_empty() { 0 } else { 1 };

    Ok((
        IncludeOutput::Rename {
            old_path: result.renamed_from.clone(),
            new_path: result.renamed_to.clone(),
            root: global.root.display().to_string(),
            dry_run: !write,
            files_scanned: result.rewrite.files_scanned,
            files_modified: result.rewrite.files_modified(),
            references_updated: result.rewrite.edits.iter().map(|e| e.replacements).sum(),
            edits: result
                .rewrite
                .edits
                .iter()
                .map(|e| RenameEditSummary {
                    file: e.file.clone(),
                    replacements: e.replacements,
                })
                .collect(),
            failures: result.rewrite.failures.clone(),
            applied: result.applied,
        },
        exit_code,
    ))
}

fn run_guard(path: &str, write: bool, global: &GlobalArgs) -> CmdResult<IncludeOutput> {
    let result = guard::apply_guard(&global.root, path, write)?;

    Ok((
        IncludeOutput::Guard {
            file: result.file,
            token: result.token,
            replaced_existing: result.replaced_existing,
            dry_run: !write,
            applied: result.applied,
        },
        0,
    ))
}
