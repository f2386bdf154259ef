//! TOML configuration for the preview CLI.
//!
//! The engine itself takes its astronomical table as plain data; this module
//! is how the CLI host assembles one. Event times are given as wall-clock
//! strings, any omitted event falls back to the built-in mid-latitude
//! default, and `"none"` removes an event entirely (polar day/night). A
//! signed `time_shift` projects the whole table, mirroring the device's
//! time-projection setting.
//!
//! ```toml
//! #[Astronomical times]
//! sunrise = "06:30:00"       # HH:MM or HH:MM:SS, or "none" to drop the event
//! sunset = "19:45:00"
//! time_shift = -90           # shift every event by this many minutes
//!
//! #[Output]
//! moon_phase = 0.75          # lunar phase fraction (0 = new, 1 = full)
//! scale = 1.0                # master brightness (0-1)
//! step = 15                  # day-curve sampling step in minutes
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::astro::{AstroEvent, AstroTable};
use crate::common::constants::*;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub solar_noon: Option<String>,
    pub civil_dawn: Option<String>,
    pub civil_dusk: Option<String>,
    pub nautical_dawn: Option<String>,
    pub nautical_dusk: Option<String>,
    /// Signed minute shift applied to every event after parsing.
    pub time_shift: Option<i32>,
    pub moon_phase: Option<f32>,
    pub scale: Option<f32>,
    pub step: Option<u16>,
}

impl Config {
    /// Default config file location: `<config dir>/photoperiod/photoperiod.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("could not determine config directory")?;
        Ok(base.join("photoperiod").join("photoperiod.toml"))
    }

    /// Load from an explicit path, or from the default location. A missing
    /// default file is not an error; built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Build the astronomical table this config describes: defaults,
    /// overridden by configured times, then the projection shift.
    pub fn astro_table(&self) -> Result<AstroTable> {
        let mut table = AstroTable::default();

        let entries = [
            (AstroEvent::Sunrise, &self.sunrise),
            (AstroEvent::Sunset, &self.sunset),
            (AstroEvent::SolarNoon, &self.solar_noon),
            (AstroEvent::CivilDawn, &self.civil_dawn),
            (AstroEvent::CivilDusk, &self.civil_dusk),
            (AstroEvent::NauticalDawn, &self.nautical_dawn),
            (AstroEvent::NauticalDusk, &self.nautical_dusk),
        ];
        for (event, value) in entries {
            let Some(value) = value else { continue };
            let minute = if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_clock_minute(value).with_context(|| format!("invalid {event} time"))?)
            };
            set_event(&mut table, event, minute);
        }

        Ok(match self.time_shift {
            Some(shift) if shift != 0 => table.shifted(shift),
            _ => table,
        })
    }

    pub fn moon_phase(&self) -> f32 {
        self.moon_phase.unwrap_or(1.0)
    }

    pub fn scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    pub fn step(&self) -> u16 {
        self.step.unwrap_or(DEFAULT_SAMPLE_STEP)
    }
}

fn set_event(table: &mut AstroTable, event: AstroEvent, minute: Option<u16>) {
    match event {
        AstroEvent::Sunrise => table.sunrise = minute,
        AstroEvent::Sunset => table.sunset = minute,
        AstroEvent::SolarNoon => table.solar_noon = minute,
        AstroEvent::CivilDawn => table.civil_dawn = minute,
        AstroEvent::CivilDusk => table.civil_dusk = minute,
        AstroEvent::NauticalDawn => table.nautical_dawn = minute,
        AstroEvent::NauticalDusk => table.nautical_dusk = minute,
    }
}

/// Parse "HH:MM" or "HH:MM:SS" into a minute-of-day.
pub fn parse_clock_minute(value: &str) -> Result<u16> {
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .with_context(|| format!("'{value}' is not a valid HH:MM or HH:MM:SS time"))?;
    Ok((time.hour() * 60 + time.minute()) as u16)
}

/// Range checks over the optional fields.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(phase) = config.moon_phase
        && !(0.0..=1.0).contains(&phase)
    {
        anyhow::bail!("moon_phase ({phase}) must be between 0 and 1");
    }

    if let Some(scale) = config.scale
        && !(0.0..=1.0).contains(&scale)
    {
        anyhow::bail!("scale ({scale}) must be between 0 and 1");
    }

    if let Some(step) = config.step
        && !(1..=MINUTES_PER_DAY).contains(&step)
    {
        anyhow::bail!(
            "step ({step}) must be between 1 and {} minutes",
            MINUTES_PER_DAY
        );
    }

    if let Some(shift) = config.time_shift
        && shift.unsigned_abs() >= u32::from(MINUTES_PER_DAY)
    {
        anyhow::bail!("time_shift ({shift}) must be within one day");
    }

    Ok(())
}
