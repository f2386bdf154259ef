//! Preview CLI entry point.
//!
//! Loads a schedule document (or builds a preset), assembles the
//! astronomical table from the config file, and prints either a sampled
//! full-day curve or the output at a single instant. The flow is:
//!
//! 1. Argument parsing and early exit for help/version
//! 2. Config loading and astronomical table assembly
//! 3. Schedule loading (file or preset) and validation
//! 4. Engine construction, with warnings for dropped points
//! 5. Curve or instant output

use anyhow::{Context, Result};
use chrono::{Local, Timelike};

use photoperiod::args::{self, CliAction, RunArgs};
use photoperiod::clock::format_minute;
use photoperiod::common::logger::Log;
use photoperiod::config::Config;
use photoperiod::engine::Engine;
use photoperiod::schedule::{Schedule, presets, validation::validate_schedule};
use photoperiod::timeline::ChannelLevels;
use photoperiod::{log_block_start, log_decorated, log_end, log_error_exit, log_indented};
use photoperiod::{log_pipe, log_version, log_warning};

fn main() -> std::process::ExitCode {
    match args::parse(std::env::args()) {
        CliAction::ShowHelp => {
            args::display_help();
            log_end!();
            std::process::ExitCode::SUCCESS
        }
        CliAction::ShowVersion => {
            args::display_version();
            std::process::ExitCode::SUCCESS
        }
        CliAction::ShowHelpDueToError(message) => {
            args::display_help();
            log_pipe!();
            log_warning!("{message}");
            log_end!();
            std::process::ExitCode::FAILURE
        }
        CliAction::Run(run) => match preview(run) {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(error) => {
                log_error_exit!("{error:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

fn preview(run: RunArgs) -> Result<()> {
    if run.quiet {
        Log::set_enabled(false);
    }
    log_version!();

    let config = Config::load(run.config_path.as_deref())?;
    let table = config.astro_table()?;

    let schedule = load_schedule(&run)?;
    validate_schedule(&schedule)?;

    log_block_start!(
        "Loaded schedule: {} channels, {} points",
        schedule.num_channels,
        schedule.points.len()
    );

    let engine = Engine::new(schedule, table);

    let timeline = engine.timeline();
    if !timeline.dropped().is_empty() {
        log_pipe!();
        for (index, error) in timeline.dropped() {
            log_warning!("dropping point {}: {error}", index + 1);
        }
    }

    let phase = run.phase.unwrap_or_else(|| config.moon_phase());
    let scale = run.scale.unwrap_or_else(|| config.scale());

    match run.at {
        Some(minute) => print_instant(&engine, minute, phase, scale),
        None => {
            let now = Local::now().time();
            let now_minute = (now.hour() * 60 + now.minute()) as u16;
            print_day_curve(
                &engine,
                run.step.unwrap_or_else(|| config.step()),
                phase,
                scale,
            );
            log_block_start!("Right now ({})", format_minute(now_minute));
            print_levels(&engine.evaluate(now_minute, phase, scale));
        }
    }

    log_end!();
    Ok(())
}

fn load_schedule(run: &RunArgs) -> Result<Schedule> {
    if let Some(name) = &run.preset {
        return presets::build(name, run.channels);
    }
    // parse() guarantees one of the two is present
    let path = run
        .schedule_path
        .as_ref()
        .context("no schedule file given")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schedule file {}", path.display()))?;
    Schedule::from_json(&json)
}

fn print_instant(engine: &Engine, minute: u16, phase: f32, scale: f32) {
    log_block_start!("Output at {}", format_minute(minute));
    print_levels(&engine.evaluate(minute, phase, scale));
}

fn print_levels(levels: &ChannelLevels) {
    for (channel, (pwm, current)) in levels.pwm.iter().zip(&levels.current).enumerate() {
        log_indented!("channel {}: {pwm:6.2}% {current:.3} A", channel + 1);
    }
}

fn print_day_curve(engine: &Engine, step: u16, phase: f32, scale: f32) {
    log_block_start!("Day curve (every {step} minutes)");
    for (minute, levels) in engine.sample_day(step, phase, scale) {
        let pwm: Vec<String> = levels.pwm.iter().map(|v| format!("{v:6.2}")).collect();
        log_decorated!("{}  {}", format_minute(minute), pwm.join(" "));
    }
}
