//! Command-line argument parsing for the preview CLI.
//!
//! Hand-rolled parsing into a structured action, with help and version
//! handled before any work happens.

use std::path::PathBuf;

use crate::config::parse_clock_minute;

/// What the invocation asked for.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Evaluate a schedule and print a curve or a single instant.
    Run(RunArgs),
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to bad arguments and exit with failure
    ShowHelpDueToError(String),
}

#[derive(Debug, PartialEq)]
pub struct RunArgs {
    /// Schedule document to load; mutually exclusive with `preset`.
    pub schedule_path: Option<PathBuf>,
    /// Built-in preset name instead of a document file.
    pub preset: Option<String>,
    /// Channel count when building a preset.
    pub channels: usize,
    /// Evaluate one instant instead of sampling the day.
    pub at: Option<u16>,
    /// Override the config's sampling step.
    pub step: Option<u16>,
    /// Override the config's lunar phase fraction.
    pub phase: Option<f32>,
    /// Override the config's master brightness.
    pub scale: Option<f32>,
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
    pub quiet: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            schedule_path: None,
            preset: None,
            channels: 4,
            at: None,
            step: None,
            phase: None,
            scale: None,
            config_path: None,
            quiet: false,
        }
    }
}

/// Parse command-line arguments into an action.
pub fn parse<I, S>(args: I) -> CliAction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut run = RunArgs::default();
    let mut args = args.into_iter().skip(1); // executable name

    macro_rules! next_value {
        ($flag:expr) => {
            match args.next() {
                Some(value) => value.as_ref().to_string(),
                None => {
                    return CliAction::ShowHelpDueToError(format!("{} requires a value", $flag));
                }
            }
        };
    }

    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return CliAction::ShowHelp,
            "-V" | "--version" => return CliAction::ShowVersion,
            "-q" | "--quiet" => run.quiet = true,
            "-p" | "--preset" => run.preset = Some(next_value!(arg)),
            "-n" | "--channels" => match next_value!(arg).parse() {
                Ok(channels) => run.channels = channels,
                Err(_) => {
                    return CliAction::ShowHelpDueToError(format!(
                        "{arg} expects a channel count"
                    ));
                }
            },
            "-a" | "--at" => match parse_clock_minute(&next_value!(arg)) {
                Ok(minute) => run.at = Some(minute),
                Err(error) => return CliAction::ShowHelpDueToError(format!("{error:#}")),
            },
            "-s" | "--step" => match next_value!(arg).parse() {
                Ok(step) if step > 0 => run.step = Some(step),
                _ => {
                    return CliAction::ShowHelpDueToError(format!(
                        "{arg} expects a positive minute count"
                    ));
                }
            },
            "--phase" => match next_value!(arg).parse() {
                Ok(phase) => run.phase = Some(phase),
                Err(_) => {
                    return CliAction::ShowHelpDueToError(format!("{arg} expects a fraction"));
                }
            },
            "--scale" => match next_value!(arg).parse() {
                Ok(scale) => run.scale = Some(scale),
                Err(_) => {
                    return CliAction::ShowHelpDueToError(format!("{arg} expects a fraction"));
                }
            },
            "-c" | "--config" => run.config_path = Some(PathBuf::from(next_value!(arg))),
            other if other.starts_with('-') => {
                return CliAction::ShowHelpDueToError(format!("unknown option '{other}'"));
            }
            path => {
                if run.schedule_path.is_some() {
                    return CliAction::ShowHelpDueToError(
                        "only one schedule file can be given".to_string(),
                    );
                }
                run.schedule_path = Some(PathBuf::from(path));
            }
        }
    }

    if run.schedule_path.is_some() && run.preset.is_some() {
        return CliAction::ShowHelpDueToError(
            "a schedule file and --preset are mutually exclusive".to_string(),
        );
    }
    if run.schedule_path.is_none() && run.preset.is_none() {
        return CliAction::ShowHelpDueToError(
            "give a schedule file or a --preset name".to_string(),
        );
    }

    CliAction::Run(run)
}

/// Displays the help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("photoperiod [OPTIONS] <schedule.json>");
    log_indented!("photoperiod [OPTIONS] --preset <name>");
    log_block_start!("Options:");
    log_indented!("-p, --preset <name>    Use a built-in preset instead of a file");
    log_indented!("                       (sunrise_sunset, dynamic_sunrise_sunset,");
    log_indented!("                       full_spectrum, simple)");
    log_indented!("-n, --channels <N>     Channel count for presets (default 4)");
    log_indented!("-a, --at <HH:MM>       Evaluate one instant instead of the whole day");
    log_indented!("-s, --step <minutes>   Day-curve sampling step (default 15)");
    log_indented!("    --phase <0-1>      Lunar phase fraction for moon scaling");
    log_indented!("    --scale <0-1>      Master brightness scale");
    log_indented!("-c, --config <path>    Use a specific config file");
    log_indented!("-q, --quiet            Suppress decorative output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
}

/// Displays the version header.
pub fn display_version() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}
