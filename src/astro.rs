//! Astronomical anchors and dynamic time resolution.
//!
//! A schedule point's time is either a fixed clock minute or a signed offset
//! from an astronomical event ("30 minutes before sunrise"). The ephemeris
//! computation itself lives outside this crate: an [`AstroTable`] of already
//! computed (and possibly time-projected) event minutes is supplied per
//! evaluation, and this module only maps a [`TimeReference`] onto the minute
//! axis through it.
//!
//! Events can legitimately be absent — at extreme latitudes there may be no
//! sunrise or no nautical twilight on a given date. Resolution then fails
//! with [`PointError::UnresolvedEvent`], and the timeline builder drops that
//! point rather than aborting the schedule.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::wrap_minutes;
use crate::common::constants::*;

/// The astronomical events a schedule point can anchor to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AstroEvent {
    Sunrise,
    Sunset,
    SolarNoon,
    CivilDawn,
    CivilDusk,
    NauticalDawn,
    NauticalDusk,
}

impl AstroEvent {
    /// All events, in a stable display order.
    pub const ALL: [AstroEvent; 7] = [
        AstroEvent::Sunrise,
        AstroEvent::Sunset,
        AstroEvent::SolarNoon,
        AstroEvent::CivilDawn,
        AstroEvent::CivilDusk,
        AstroEvent::NauticalDawn,
        AstroEvent::NauticalDusk,
    ];

    /// The wire name used in schedule documents and config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            AstroEvent::Sunrise => "sunrise",
            AstroEvent::Sunset => "sunset",
            AstroEvent::SolarNoon => "solar_noon",
            AstroEvent::CivilDawn => "civil_dawn",
            AstroEvent::CivilDusk => "civil_dusk",
            AstroEvent::NauticalDawn => "nautical_dawn",
            AstroEvent::NauticalDusk => "nautical_dusk",
        }
    }
}

impl std::fmt::Display for AstroEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AstroEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AstroEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("unknown astronomical event '{s}'"))
    }
}

/// Why a schedule point was excluded from the active timeline.
///
/// Neither variant aborts an evaluation; the timeline builder drops the
/// offending point and the rest of the schedule keeps interpolating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    /// The point anchors to an event the supplied table does not contain
    /// (e.g. no sunrise at polar latitudes on that date).
    #[error("no {0} in the supplied astronomical table")]
    UnresolvedEvent(AstroEvent),

    /// The point's value arrays do not match the document's channel count.
    #[error("point carries {got} channel values but the schedule has {expected} channels")]
    ChannelCountMismatch { expected: usize, got: usize },
}

/// A schedule point's symbolic time: a fixed clock minute, or an astronomical
/// event plus a signed minute offset.
///
/// Modeled as a tagged variant so every consumer has to handle both arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeReference {
    /// An absolute minute-of-day in `[0, 1439]`.
    Fixed { minute: u16 },
    /// An astronomical anchor with a signed offset in minutes.
    Dynamic { event: AstroEvent, offset: i16 },
}

impl TimeReference {
    /// Resolve to an absolute minute-of-day against the supplied table.
    ///
    /// Fixed references pass through untouched. Dynamic references add their
    /// offset to the event's minute and wrap onto the day axis. Offsets are
    /// not range-checked here; authoring validation owns that.
    pub fn resolve(&self, table: &AstroTable) -> Result<u16, PointError> {
        match *self {
            TimeReference::Fixed { minute } => Ok(minute),
            TimeReference::Dynamic { event, offset } => {
                let anchor = table
                    .minute_of(event)
                    .ok_or(PointError::UnresolvedEvent(event))?;
                Ok(wrap_minutes(i32::from(anchor) + i32::from(offset)))
            }
        }
    }
}

impl std::fmt::Display for TimeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TimeReference::Fixed { minute } => f.write_str(&crate::clock::format_minute(minute)),
            TimeReference::Dynamic { event, offset } => write!(f, "{event}{offset:+}m"),
        }
    }
}

/// Minute-of-day for each astronomical event on the evaluation date, as
/// supplied by the external ephemeris service.
///
/// Any configured time projection (a signed hour/minute shift of the whole
/// solar day) is expected to already be applied by the supplier; [`shifted`]
/// exists as a convenience for hosts that receive raw times.
///
/// [`shifted`]: AstroTable::shifted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstroTable {
    pub sunrise: Option<u16>,
    pub sunset: Option<u16>,
    pub solar_noon: Option<u16>,
    pub civil_dawn: Option<u16>,
    pub civil_dusk: Option<u16>,
    pub nautical_dawn: Option<u16>,
    pub nautical_dusk: Option<u16>,
}

impl AstroTable {
    /// A table with no events at all; every dynamic point fails to resolve.
    pub fn empty() -> Self {
        Self {
            sunrise: None,
            sunset: None,
            solar_noon: None,
            civil_dawn: None,
            civil_dusk: None,
            nautical_dawn: None,
            nautical_dusk: None,
        }
    }

    /// Look up one event's minute-of-day.
    pub fn minute_of(&self, event: AstroEvent) -> Option<u16> {
        match event {
            AstroEvent::Sunrise => self.sunrise,
            AstroEvent::Sunset => self.sunset,
            AstroEvent::SolarNoon => self.solar_noon,
            AstroEvent::CivilDawn => self.civil_dawn,
            AstroEvent::CivilDusk => self.civil_dusk,
            AstroEvent::NauticalDawn => self.nautical_dawn,
            AstroEvent::NauticalDusk => self.nautical_dusk,
        }
    }

    /// A copy of this table with every present event shifted by the given
    /// signed minute count, wrapping on the day axis.
    pub fn shifted(&self, minutes: i32) -> Self {
        let shift = |event: Option<u16>| {
            event.map(|minute| wrap_minutes(i32::from(minute) + minutes))
        };
        Self {
            sunrise: shift(self.sunrise),
            sunset: shift(self.sunset),
            solar_noon: shift(self.solar_noon),
            civil_dawn: shift(self.civil_dawn),
            civil_dusk: shift(self.civil_dusk),
            nautical_dawn: shift(self.nautical_dawn),
            nautical_dusk: shift(self.nautical_dusk),
        }
    }
}

impl Default for AstroTable {
    /// Fallback mid-latitude times for hosts that have no ephemeris source.
    fn default() -> Self {
        Self {
            sunrise: Some(DEFAULT_SUNRISE),
            sunset: Some(DEFAULT_SUNSET),
            solar_noon: Some(DEFAULT_SOLAR_NOON),
            civil_dawn: Some(DEFAULT_CIVIL_DAWN),
            civil_dusk: Some(DEFAULT_CIVIL_DUSK),
            nautical_dawn: Some(DEFAULT_NAUTICAL_DAWN),
            nautical_dusk: Some(DEFAULT_NAUTICAL_DUSK),
        }
    }
}
