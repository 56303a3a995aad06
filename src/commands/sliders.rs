use clap::Args;

use shaderkit::sliders::{format_values, SliderSpec};

use super::{resolve_arg, GlobalArgs};

#[derive(Args)]
pub struct SlidersArgs {
    /// First value (prompted for when omitted at a TTY)
    #[arg(allow_negative_numbers = true)]
    pub start: Option<f64>,

    /// Last value; truncated away when the step overshoots it
    #[arg(allow_negative_numbers = true)]
    pub end: Option<f64>,

    /// Distance between adjacent values
    #[arg(allow_negative_numbers = true)]
    pub step: Option<f64>,

    /// Digits after the decimal point
    pub decimal_places: Option<usize>,
}

pub fn run_raw(args: SlidersArgs, _global: &GlobalArgs) -> shaderkit::Result<(String, i32)> {
    let spec = SliderSpec {
        start: resolve_number(args.start, "start", "start: ")?,
        end: resolve_number(args.end, "end", "end: ")?,
        step: resolve_number(args.step, "step", "step: ")?,
        decimal_places: resolve_count(args.decimal_places, "decimal_places", "decimal places: ")?,
    };

    let formatted = format_values(&spec)?;
    Ok((formatted, 0))
}

fn resolve_number(value: Option<f64>, field: &str, prompt_label: &str) -> shaderkit::Result<f64> {
    match value {
        Some(v) => Ok(v),
        None => {
            let raw = resolve_arg(None, field, prompt_label)?;
            raw.parse::<f64>().map_err(|_| {
                shaderkit::Error::validation_invalid_argument(
                    field,
                    format!("'{}' is not a number", raw),
                    Some(raw),
                    None,
                )
            })
        }
    }
}

fn resolve_count(
    value: Option<usize>,
    field: &str,
    prompt_label: &str,
) -> shaderkit::Result<usize> {
    match value {
        Some(v) => Ok(v),
        None => {
            let raw = resolve_arg(None, field, prompt_label)?;
            raw.parse::<usize>().map_err(|_| {
                shaderkit::Error::validation_invalid_argument(
                    field,
                    format!("'{}' is not a non-negative integer", raw),
                    Some(raw),
                    None,
                )
            })
        }
    }
}
