//! Final output composition: clamping, the moon floor, and the master scale.
//!
//! The evaluator never clamps, so everything that turns a raw interpolated
//! curve into a device-facing vector lives here, in a fixed order:
//!
//! 1. clamp PWM to `[0, 100]` and current to `[0, channel max]`;
//! 2. when the moon simulation is enabled, raise each channel to at least
//!    its moon component (`max`, not addition — moonlight is an ambient
//!    minimum, not a boost);
//! 3. multiply PWM by the master scale in `[0, 1]`. Current is an
//!    independently authored axis and is not touched by the brightness knob.

use crate::common::constants::{MOON_INTENSITY_CAP, PWM_MAX, PWM_MIN};
use crate::schedule::{ChannelConfig, MoonSimulation};
use crate::timeline::ChannelLevels;

/// The moon baseline for one channel, after the phase factor.
///
/// Base intensity is capped at 20% PWM and base current at the channel's
/// limit before scaling; the phase factor multiplies both when
/// `phase_scaling` is on.
pub fn moon_component(
    moon: &MoonSimulation,
    channel: usize,
    max_current: f32,
    phase_fraction: f32,
) -> (f32, f32) {
    let factor = if moon.phase_scaling {
        phase_fraction.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let intensity = moon
        .base_intensity
        .get(channel)
        .copied()
        .unwrap_or(0.0)
        .clamp(PWM_MIN, MOON_INTENSITY_CAP);
    let current = moon
        .base_current
        .get(channel)
        .copied()
        .unwrap_or(0.0)
        .clamp(0.0, max_current);
    (intensity * factor, current * factor)
}

/// Compose the device-facing output for one instant.
///
/// `levels` is the evaluator's raw schedule output; `channels` supplies the
/// per-channel current limits; `moon` is the document's optional baseline;
/// `phase_fraction` is the externally supplied lunar phase in `[0, 1]`;
/// `scale` is the master brightness in `[0, 1]`.
pub fn compose(
    levels: &ChannelLevels,
    channels: &[ChannelConfig],
    moon: Option<&MoonSimulation>,
    phase_fraction: f32,
    scale: f32,
) -> ChannelLevels {
    let scale = scale.clamp(0.0, 1.0);
    let num_channels = levels.pwm.len();
    let mut out = ChannelLevels::zero(num_channels);

    for channel in 0..num_channels {
        let max_current = channels
            .get(channel)
            .map(|config| config.max_current)
            .unwrap_or(crate::common::constants::DEFAULT_MAX_CURRENT);

        let mut pwm = levels.pwm[channel].clamp(PWM_MIN, PWM_MAX);
        let mut current = levels.current[channel].clamp(0.0, max_current);

        if let Some(moon) = moon
            && moon.enabled
        {
            let (floor_pwm, floor_current) =
                moon_component(moon, channel, max_current, phase_fraction);
            pwm = pwm.max(floor_pwm);
            current = current.max(floor_current);
        }

        out.pwm[channel] = pwm * scale;
        out.current[channel] = current;
    }

    out
}
