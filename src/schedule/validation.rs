//! Schedule document validation.
//!
//! Authoring-layer range checks: the evaluator itself never re-validates
//! numeric ranges (it propagates unclamped arithmetic and the output stage
//! clamps), so anything imported from the outside goes through here first.

use anyhow::Result;

use super::Schedule;
use crate::astro::TimeReference;
use crate::common::constants::*;

/// Validate an imported or authored schedule document.
pub fn validate_schedule(schedule: &Schedule) -> Result<()> {
    if !(MIN_CHANNELS..=MAX_CHANNELS).contains(&schedule.num_channels) {
        anyhow::bail!(
            "channel count must be between {} and {}, got {}",
            MIN_CHANNELS,
            MAX_CHANNELS,
            schedule.num_channels
        );
    }

    if schedule.channels.len() != schedule.num_channels {
        anyhow::bail!(
            "document declares {} channels but carries {} channel configs",
            schedule.num_channels,
            schedule.channels.len()
        );
    }

    for (index, channel) in schedule.channels.iter().enumerate() {
        if channel.max_current <= 0.0 || !channel.max_current.is_finite() {
            anyhow::bail!(
                "channel {} ('{}') has invalid max_current {}",
                index + 1,
                channel.name,
                channel.max_current
            );
        }
    }

    for (index, point) in schedule.points.iter().enumerate() {
        validate_point(schedule, index, point)?;
    }

    if let Some(moon) = &schedule.moon {
        validate_arrays_len(
            schedule.num_channels,
            moon.base_intensity.len(),
            moon.base_current.len(),
            "moon simulation",
        )?;
        for (channel, &intensity) in moon.base_intensity.iter().enumerate() {
            if !(PWM_MIN..=MOON_INTENSITY_CAP).contains(&intensity) {
                anyhow::bail!(
                    "moon base intensity for channel {} ({intensity}%) must be between 0% and {}%",
                    channel + 1,
                    MOON_INTENSITY_CAP
                );
            }
        }
        for (channel, &current) in moon.base_current.iter().enumerate() {
            let max = schedule.channels[channel].max_current;
            if !(0.0..=max).contains(&current) {
                anyhow::bail!(
                    "moon base current for channel {} ({current} A) must be between 0 and {max} A",
                    channel + 1
                );
            }
        }
    }

    if let Some(lat) = schedule.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {lat})");
    }

    if let Some(lon) = schedule.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!("longitude must be between -180 and 180 degrees (got {lon})");
    }

    Ok(())
}

fn validate_point(
    schedule: &Schedule,
    index: usize,
    point: &super::SchedulePoint,
) -> Result<()> {
    match point.time {
        TimeReference::Fixed { minute } => {
            if minute >= MINUTES_PER_DAY {
                anyhow::bail!(
                    "point {} has fixed minute {minute}, must be below {}",
                    index + 1,
                    MINUTES_PER_DAY
                );
            }
        }
        TimeReference::Dynamic { event, offset } => {
            if !(-MAX_EVENT_OFFSET..=MAX_EVENT_OFFSET).contains(&offset) {
                anyhow::bail!(
                    "point {} has offset {offset} from {event}, must be within ±{}",
                    index + 1,
                    MAX_EVENT_OFFSET
                );
            }
        }
    }

    validate_arrays_len(
        schedule.num_channels,
        point.pwm.len(),
        point.current.len(),
        &format!("point {}", index + 1),
    )?;

    for (channel, &pwm) in point.pwm.iter().enumerate() {
        if !(PWM_MIN..=PWM_MAX).contains(&pwm) {
            anyhow::bail!(
                "point {} channel {} PWM ({pwm}%) must be between {}% and {}%",
                index + 1,
                channel + 1,
                PWM_MIN,
                PWM_MAX
            );
        }
    }

    for (channel, &current) in point.current.iter().enumerate() {
        let max = schedule.channels[channel].max_current;
        if !(0.0..=max).contains(&current) {
            anyhow::bail!(
                "point {} channel {} current ({current} A) exceeds the channel limit of {max} A",
                index + 1,
                channel + 1
            );
        }
    }

    Ok(())
}

fn validate_arrays_len(
    num_channels: usize,
    pwm_len: usize,
    current_len: usize,
    what: &str,
) -> Result<()> {
    if pwm_len != num_channels || current_len != num_channels {
        anyhow::bail!(
            "{what} carries {pwm_len} PWM and {current_len} current values for a {num_channels}-channel document"
        );
    }
    Ok(())
}
