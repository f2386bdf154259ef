//! The schedule document: channels, control points, and the moon baseline.
//!
//! A [`Schedule`] is the operator-authored description of a lighting day. It
//! is created by JSON import or a built-in preset, mutated point by point,
//! and handed to the engine together with an astronomical table for
//! evaluation. The document itself never interpolates; that is the
//! timeline's job.
//!
//! ## Document format
//!
//! ```json
//! {
//!   "version": 1,
//!   "num_channels": 2,
//!   "channels": [
//!     { "name": "Channel 1", "color": "#FFFFFF", "max_current": 2.0 },
//!     { "name": "Channel 2", "color": "#0000FF", "max_current": 2.0 }
//!   ],
//!   "points": [
//!     { "time": { "type": "fixed", "minute": 480 }, "pwm": [70.0, 60.0], "current": [1.2, 1.0] },
//!     { "time": { "type": "dynamic", "event": "sunset", "offset": 30 }, "pwm": [0.0, 0.0], "current": [0.0, 0.0] }
//!   ],
//!   "moon": { "enabled": true, "phase_scaling": true, "base_intensity": [2.0, 5.0], "base_current": [0.05, 0.1] }
//! }
//! ```

pub mod presets;
pub mod validation;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::astro::TimeReference;
use crate::common::constants::*;

/// Per-channel display and limit settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    /// Hex display color, e.g. "#00FFFF".
    pub color: String,
    /// Hard current limit for this channel in amps.
    pub max_current: f32,
}

impl ChannelConfig {
    /// Default config for the channel at `index` (zero-based).
    pub fn numbered(index: usize) -> Self {
        let color = DEFAULT_CHANNEL_COLORS
            .get(index)
            .copied()
            .unwrap_or("#FFFFFF");
        Self {
            name: format!("Channel {}", index + 1),
            color: color.to_string(),
            max_current: DEFAULT_MAX_CURRENT,
        }
    }
}

/// An authored control point: a symbolic time plus per-channel PWM and
/// current targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePoint {
    pub time: TimeReference,
    /// PWM duty per channel, percent in `[0, 100]`.
    pub pwm: Vec<f32>,
    /// Drive current per channel, amps in `[0, channel max]`.
    pub current: Vec<f32>,
}

impl SchedulePoint {
    pub fn fixed(minute: u16, pwm: Vec<f32>, current: Vec<f32>) -> Self {
        Self {
            time: TimeReference::Fixed { minute },
            pwm,
            current,
        }
    }

    pub fn dynamic(
        event: crate::astro::AstroEvent,
        offset: i16,
        pwm: Vec<f32>,
        current: Vec<f32>,
    ) -> Self {
        Self {
            time: TimeReference::Dynamic { event, offset },
            pwm,
            current,
        }
    }
}

/// Constant nocturnal output floor, optionally scaled by the lunar phase.
///
/// The floor combines with the schedule curve by per-channel `max`, never
/// additively: moonlight is an ambient minimum, not a boost on top of the
/// authored curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSimulation {
    pub enabled: bool,
    /// When set, both base arrays are multiplied by the externally supplied
    /// lunar phase fraction in `[0, 1]`.
    pub phase_scaling: bool,
    /// Base moonlight PWM per channel; composition caps each at 20%.
    pub base_intensity: Vec<f32>,
    /// Base moonlight current per channel; composition caps each at the
    /// channel's max current.
    pub base_current: Vec<f32>,
}

impl MoonSimulation {
    /// A disabled baseline with zeroed arrays for `num_channels` channels.
    pub fn off(num_channels: usize) -> Self {
        Self {
            enabled: false,
            phase_scaling: true,
            base_intensity: vec![0.0; num_channels],
            base_current: vec![0.0; num_channels],
        }
    }
}

/// Signed shift applied to the whole solar day, letting an operator run a
/// tank on a projected timezone (e.g. a reef on Fiji time). The ephemeris
/// service consumes this; the engine only stores it and treats a change as
/// a timeline-invalidating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeProjection {
    pub enabled: bool,
    pub shift_hours: i8,
    pub shift_minutes: i8,
}

impl TimeProjection {
    /// The total signed shift in minutes, zero when disabled.
    pub fn shift(&self) -> i32 {
        if !self.enabled {
            return 0;
        }
        i32::from(self.shift_hours) * 60 + i32::from(self.shift_minutes)
    }
}

fn default_version() -> u32 {
    1
}

/// A complete schedule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Channel count, fixed for the document's lifetime.
    pub num_channels: usize,
    /// One entry per channel; length must equal `num_channels`.
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub points: Vec<SchedulePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moon: Option<MoonSimulation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<TimeProjection>,
}

impl Schedule {
    /// An empty document with default channel configs.
    ///
    /// `num_channels` outside `[1, 16]` is rejected; the channel count is
    /// fixed once the document exists.
    pub fn new(num_channels: usize) -> Result<Self> {
        anyhow::ensure!(
            (MIN_CHANNELS..=MAX_CHANNELS).contains(&num_channels),
            "channel count must be between {MIN_CHANNELS} and {MAX_CHANNELS}, got {num_channels}"
        );
        Ok(Self {
            version: default_version(),
            num_channels,
            channels: (0..num_channels).map(ChannelConfig::numbered).collect(),
            points: Vec::new(),
            moon: None,
            latitude: None,
            longitude: None,
            projection: None,
        })
    }

    /// Add a control point, replacing any existing point with the identical
    /// time reference. Duplicate *resolved* minutes are still possible (two
    /// different references can land on the same minute); the timeline's
    /// later-wins rule covers that.
    pub fn add_point(&mut self, point: SchedulePoint) {
        self.points.retain(|existing| existing.time != point.time);
        self.points.push(point);
    }

    /// Remove the point with this exact time reference, if present.
    pub fn remove_point(&mut self, time: &TimeReference) -> bool {
        let before = self.points.len();
        self.points.retain(|point| point.time != *time);
        self.points.len() != before
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    /// Replace the moon baseline, resizing its arrays to the channel count.
    pub fn set_moon(&mut self, mut moon: MoonSimulation) {
        moon.base_intensity.resize(self.num_channels, 0.0);
        moon.base_current.resize(self.num_channels, 0.0);
        self.moon = Some(moon);
    }

    /// Parse a document from its JSON interchange form and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let schedule: Schedule =
            serde_json::from_str(json).context("failed to parse schedule document")?;
        validation::validate_schedule(&schedule)?;
        Ok(schedule)
    }

    /// Serialize to the JSON interchange form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize schedule document")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::AstroEvent;

    #[test]
    fn new_rejects_bad_channel_counts() {
        assert!(Schedule::new(0).is_err());
        assert!(Schedule::new(17).is_err());
        assert!(Schedule::new(1).is_ok());
        assert!(Schedule::new(16).is_ok());
    }

    #[test]
    fn new_assigns_default_channel_configs() {
        let schedule = Schedule::new(3).unwrap();
        assert_eq!(schedule.channels.len(), 3);
        assert_eq!(schedule.channels[0].name, "Channel 1");
        assert_eq!(schedule.channels[1].color, "#0000FF");
        assert_eq!(schedule.channels[2].max_current, DEFAULT_MAX_CURRENT);
    }

    #[test]
    fn add_point_replaces_identical_reference() {
        let mut schedule = Schedule::new(1).unwrap();
        schedule.add_point(SchedulePoint::fixed(480, vec![50.0], vec![1.0]));
        schedule.add_point(SchedulePoint::fixed(480, vec![80.0], vec![1.5]));
        assert_eq!(schedule.points.len(), 1);
        assert_eq!(schedule.points[0].pwm, vec![80.0]);

        // A different offset from the same event is a different reference
        schedule.add_point(SchedulePoint::dynamic(
            AstroEvent::Sunrise,
            -30,
            vec![5.0],
            vec![0.1],
        ));
        schedule.add_point(SchedulePoint::dynamic(
            AstroEvent::Sunrise,
            30,
            vec![50.0],
            vec![1.0],
        ));
        assert_eq!(schedule.points.len(), 3);
    }

    #[test]
    fn remove_point_by_reference() {
        let mut schedule = Schedule::new(1).unwrap();
        schedule.add_point(SchedulePoint::fixed(480, vec![50.0], vec![1.0]));
        assert!(schedule.remove_point(&TimeReference::Fixed { minute: 480 }));
        assert!(!schedule.remove_point(&TimeReference::Fixed { minute: 480 }));
        assert!(schedule.points.is_empty());
    }

    #[test]
    fn set_moon_resizes_arrays() {
        let mut schedule = Schedule::new(4).unwrap();
        schedule.set_moon(MoonSimulation {
            enabled: true,
            phase_scaling: false,
            base_intensity: vec![2.0],
            base_current: vec![0.05, 0.05, 0.05, 0.05, 0.05],
        });
        let moon = schedule.moon.as_ref().unwrap();
        assert_eq!(moon.base_intensity, vec![2.0, 0.0, 0.0, 0.0]);
        assert_eq!(moon.base_current.len(), 4);
    }

    #[test]
    fn projection_shift_minutes() {
        let projection = TimeProjection {
            enabled: true,
            shift_hours: -8,
            shift_minutes: -30,
        };
        assert_eq!(projection.shift(), -510);

        let disabled = TimeProjection {
            enabled: false,
            ..projection
        };
        assert_eq!(disabled.shift(), 0);
    }

    #[test]
    fn json_round_trip() {
        let mut schedule = Schedule::new(2).unwrap();
        schedule.add_point(SchedulePoint::fixed(480, vec![70.0, 60.0], vec![1.2, 1.0]));
        schedule.add_point(SchedulePoint::dynamic(
            AstroEvent::Sunset,
            30,
            vec![0.0, 0.0],
            vec![0.0, 0.0],
        ));
        schedule.set_moon(MoonSimulation {
            enabled: true,
            phase_scaling: true,
            base_intensity: vec![2.0, 5.0],
            base_current: vec![0.05, 0.1],
        });

        let json = schedule.to_json().unwrap();
        let parsed = Schedule::from_json(&json).unwrap();
        assert_eq!(parsed, schedule);
    }

    #[test]
    fn version_defaults_when_absent() {
        let json = r##"{"num_channels":1,"channels":[{"name":"Channel 1","color":"#FFFFFF","max_current":2.0}],"points":[]}"##;
        let schedule = Schedule::from_json(json).unwrap();
        assert_eq!(schedule.version, 1);
    }
}
