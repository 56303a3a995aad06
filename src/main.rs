use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;
mod tty;

use commands::{include, replace, sliders, GlobalArgs};
use shaderkit::defaults;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "shaderkit")]
#[command(version = VERSION)]
#[command(about = "CLI for shader source tree maintenance")]
struct Cli {
    /// Shader root directory every operation works under
    #[arg(long, global = true, default_value = defaults::SHADERS_DIR)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk literal find/replace across shader files
    Replace(replace::ReplaceArgs),
    /// Include-file operations: rename with reference rewrite, guards
    Include(include::IncludeArgs),
    /// Print a formatted slider value table
    Sliders(sliders::SlidersArgs),
}

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Sliders(_) => ResponseMode::Raw,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs { root: cli.root };

    match response_mode(&cli.command) {
        ResponseMode::Raw => match commands::run_raw(cli.command, &global) {
            Ok((content, exit_code)) => {
                println!("{}", content);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
            Err(err) => {
                let (json_result, exit_code) =
                    output::map_cmd_result_to_json::<serde_json::Value>(Err(err));
                output::print_json_result(json_result);
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        },
        ResponseMode::Json => {
            let (json_result, exit_code) = commands::run_json(cli.command, &global);
            output::print_json_result(json_result);
            std::process::ExitCode::from(exit_code_to_u8(exit_code))
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
