use std::path::PathBuf;

pub type CmdResult<T> = shaderkit::Result<(T, i32)>;

/// Arguments shared by every command.
pub(crate) struct GlobalArgs {
    /// Shader root directory; every path argument is resolved against it.
    pub root: PathBuf,
}

pub mod include;
pub mod replace;
pub mod sliders;

/// Resolve an optional positional argument, prompting on a TTY.
///
/// `shaderkit replace` with no arguments prompts at a terminal; without a
/// TTY a missing argument is a hard error, never a hang.
pub(crate) fn resolve_arg(
    value: Option<String>,
    field: &str,
    prompt_label: &str,
) -> shaderkit::Result<String> {
    match value {
        Some(v) => Ok(v),
        None if crate::tty::is_stdin_tty() => crate::tty::prompt(prompt_label),
        None => Err(shaderkit::Error::validation_missing_argument(
            field,
            format!("Missing required argument '{}' (no TTY to prompt on)", field),
        )),
    }
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (shaderkit::Result<serde_json::Value>, i32) {
    crate::tty::status("shaderkit is working...");

    match command {
        crate::Commands::Replace(args) => dispatch!(args, global, replace),
        crate::Commands::Include(args) => dispatch!(args, global, include),
        crate::Commands::Sliders(_) => crate::output::map_cmd_result_to_json::<serde_json::Value>(
            Err(shaderkit::Error::validation_invalid_argument(
                "output_mode",
                "Command does not support JSON output",
                None,
                None,
            )),
        ),
    }
}

pub(crate) fn run_raw(
    command: crate::Commands,
    global: &GlobalArgs,
) -> shaderkit::Result<(String, i32)> {
    match command {
        crate::Commands::Sliders(args) => sliders::run_raw(args, global),
        _ => Err(shaderkit::Error::validation_invalid_argument(
            "output_mode",
            "Command does not support raw output",
            None,
            None,
        )),
    }
}
