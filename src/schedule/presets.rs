//! Built-in schedule presets.
//!
//! Starting points an operator can load and then edit. Channel-shaped value
//! arrays are padded with their last entry when the document has more
//! channels than the preset's template.

use anyhow::Result;

use crate::astro::AstroEvent;
use crate::schedule::{Schedule, SchedulePoint};

/// Names of the built-in presets, in menu order.
pub const PRESET_NAMES: [&str; 4] = [
    "sunrise_sunset",
    "dynamic_sunrise_sunset",
    "full_spectrum",
    "simple",
];

/// Build the named preset for a document with `num_channels` channels.
pub fn build(name: &str, num_channels: usize) -> Result<Schedule> {
    match name {
        "sunrise_sunset" => sunrise_sunset(num_channels),
        "dynamic_sunrise_sunset" => dynamic_sunrise_sunset(num_channels),
        "full_spectrum" => full_spectrum(num_channels),
        "simple" => simple(num_channels),
        other => anyhow::bail!(
            "unknown preset '{other}' (available: {})",
            PRESET_NAMES.join(", ")
        ),
    }
}

fn uniform(value: f32, num_channels: usize) -> Vec<f32> {
    vec![value; num_channels]
}

fn padded(template: &[f32], num_channels: usize) -> Vec<f32> {
    let mut values = template.to_vec();
    let last = values.last().copied().unwrap_or(0.0);
    values.resize(num_channels, last);
    values
}

/// Fixed-time dawn/peak/dusk/off curve around default sun times.
pub fn sunrise_sunset(num_channels: usize) -> Result<Schedule> {
    let mut schedule = Schedule::new(num_channels)?;
    let sunrise = 420; // 07:00
    let sunset = 1020; // 17:00
    let noon = (sunrise + sunset) / 2;

    schedule.add_point(SchedulePoint::fixed(
        sunrise,
        uniform(20.0, num_channels),
        uniform(0.3, num_channels),
    ));
    schedule.add_point(SchedulePoint::fixed(
        noon,
        uniform(85.0, num_channels),
        uniform(1.8, num_channels),
    ));
    schedule.add_point(SchedulePoint::fixed(
        sunset,
        uniform(15.0, num_channels),
        uniform(0.2, num_channels),
    ));
    schedule.add_point(SchedulePoint::fixed(
        sunset + 60,
        uniform(0.0, num_channels),
        uniform(0.0, num_channels),
    ));
    Ok(schedule)
}

/// The same day shape anchored to the actual solar events, so the curve
/// tracks the season without editing.
pub fn dynamic_sunrise_sunset(num_channels: usize) -> Result<Schedule> {
    let mut schedule = Schedule::new(num_channels)?;
    let steps: [(AstroEvent, i16, f32, f32); 7] = [
        (AstroEvent::Sunrise, -30, 5.0, 0.1),
        (AstroEvent::Sunrise, 0, 20.0, 0.3),
        (AstroEvent::Sunrise, 30, 50.0, 1.0),
        (AstroEvent::SolarNoon, 0, 85.0, 1.8),
        (AstroEvent::Sunset, -30, 50.0, 1.0),
        (AstroEvent::Sunset, 0, 20.0, 0.3),
        (AstroEvent::Sunset, 30, 5.0, 0.1),
    ];
    for (event, offset, pwm, current) in steps {
        schedule.add_point(SchedulePoint::dynamic(
            event,
            offset,
            uniform(pwm, num_channels),
            uniform(current, num_channels),
        ));
    }
    Ok(schedule)
}

/// Varied per-channel spectrum through the day.
pub fn full_spectrum(num_channels: usize) -> Result<Schedule> {
    let mut schedule = Schedule::new(num_channels)?;
    let stages: [(u16, [f32; 8], [f32; 8]); 4] = [
        (
            480, // 08:00
            [40.0, 60.0, 80.0, 100.0, 80.0, 60.0, 40.0, 20.0],
            [0.6, 1.0, 1.5, 2.0, 1.5, 1.0, 0.6, 0.3],
        ),
        (
            720, // 12:00
            [80.0, 100.0, 100.0, 100.0, 100.0, 100.0, 80.0, 60.0],
            [1.5, 2.0, 2.0, 2.0, 2.0, 2.0, 1.5, 1.0],
        ),
        (
            960, // 16:00
            [60.0, 80.0, 100.0, 100.0, 80.0, 60.0, 40.0, 30.0],
            [1.0, 1.5, 2.0, 2.0, 1.5, 1.0, 0.6, 0.4],
        ),
        (
            1200, // 20:00
            [20.0, 30.0, 40.0, 60.0, 40.0, 30.0, 20.0, 10.0],
            [0.3, 0.4, 0.6, 1.0, 0.6, 0.4, 0.3, 0.1],
        ),
    ];
    for (minute, pwm, current) in stages {
        schedule.add_point(SchedulePoint::fixed(
            minute,
            padded(&pwm, num_channels),
            padded(&current, num_channels),
        ));
    }
    Ok(schedule)
}

/// Plain on-at-8, off-at-20 schedule.
pub fn simple(num_channels: usize) -> Result<Schedule> {
    let mut schedule = Schedule::new(num_channels)?;
    schedule.add_point(SchedulePoint::fixed(
        480,
        uniform(70.0, num_channels),
        uniform(1.2, num_channels),
    ));
    schedule.add_point(SchedulePoint::fixed(
        1200,
        uniform(0.0, num_channels),
        uniform(0.0, num_channels),
    ));
    Ok(schedule)
}
