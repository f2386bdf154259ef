//! The resolved timeline: normalization and piecewise-linear evaluation.
//!
//! [`Timeline::build`] turns a schedule document plus an astronomical table
//! into an immutable snapshot of absolute-minute control points, and
//! [`Timeline::evaluate`] interpolates that snapshot at any instant of the
//! day. The snapshot is rebuilt whole whenever its inputs change and never
//! mutated in place, so a host that reenters during an asynchronous refresh
//! always observes either the old or the new timeline in full.
//!
//! Points that cannot join the timeline — a dynamic reference whose event is
//! missing from the table, or value arrays that do not match the channel
//! count — are dropped individually and recorded; the rest of the schedule
//! keeps producing a gap-free cyclic curve.

use crate::astro::{AstroTable, PointError};
use crate::clock::{forward_distance, interpolation_ratio};
use crate::schedule::Schedule;

/// Per-channel output of the evaluator and the output stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLevels {
    /// PWM duty per channel, percent.
    pub pwm: Vec<f32>,
    /// Drive current per channel, amps.
    pub current: Vec<f32>,
}

impl ChannelLevels {
    pub fn zero(num_channels: usize) -> Self {
        Self {
            pwm: vec![0.0; num_channels],
            current: vec![0.0; num_channels],
        }
    }
}

/// A control point pinned to an absolute minute of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPoint {
    pub minute: u16,
    pub pwm: Vec<f32>,
    pub current: Vec<f32>,
}

/// Immutable, sorted snapshot of a schedule resolved against one
/// astronomical table.
#[derive(Debug, Clone)]
pub struct Timeline {
    num_channels: usize,
    points: Vec<ResolvedPoint>,
    dropped: Vec<(usize, PointError)>,
}

impl Timeline {
    /// Resolve and normalize a schedule against the supplied table.
    ///
    /// The sort is stable and keyed on the resolved minute only, so when two
    /// points land on the same minute the one listed later in the document
    /// stays later in the snapshot — and wins at that exact instant, because
    /// lookup takes the last point at or before the target.
    pub fn build(schedule: &Schedule, table: &AstroTable) -> Self {
        let mut points = Vec::with_capacity(schedule.points.len());
        let mut dropped = Vec::new();

        for (index, point) in schedule.points.iter().enumerate() {
            if point.pwm.len() != schedule.num_channels
                || point.current.len() != schedule.num_channels
            {
                dropped.push((
                    index,
                    PointError::ChannelCountMismatch {
                        expected: schedule.num_channels,
                        got: point.pwm.len().max(point.current.len()),
                    },
                ));
                continue;
            }

            match point.time.resolve(table) {
                Ok(minute) => points.push(ResolvedPoint {
                    minute,
                    pwm: point.pwm.clone(),
                    current: point.current.clone(),
                }),
                Err(error) => dropped.push((index, error)),
            }
        }

        points.sort_by_key(|point| point.minute);

        Self {
            num_channels: schedule.num_channels,
            points,
            dropped,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    pub fn points(&self) -> &[ResolvedPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points excluded during the build, with their original document index.
    /// Exposed so hosts can warn the operator; an exclusion never fails the
    /// evaluation itself.
    pub fn dropped(&self) -> &[(usize, PointError)] {
        &self.dropped
    }

    /// Interpolate the timeline at `minute`, total over `[0, 1439]`.
    ///
    /// An empty timeline yields all-zero levels; a single point defines a
    /// constant curve for the whole day; otherwise the bracketing pair is
    /// located with wrap-around across midnight and both value arrays are
    /// interpolated linearly and independently. No clamping happens here.
    pub fn evaluate(&self, minute: u16) -> ChannelLevels {
        let (prev, next) = match self.points.as_slice() {
            [] => return ChannelLevels::zero(self.num_channels),
            [only] => {
                return ChannelLevels {
                    pwm: only.pwm.clone(),
                    current: only.current.clone(),
                };
            }
            points => {
                // Last point at or before the target; wraps to yesterday's
                // final point when the target precedes the whole timeline.
                let prev = points
                    .iter()
                    .rfind(|point| point.minute <= minute)
                    .unwrap_or(&points[points.len() - 1]);
                // First point strictly after the target; wraps into the
                // next day's first point past the end of the timeline.
                let next = points
                    .iter()
                    .find(|point| point.minute > minute)
                    .unwrap_or(&points[0]);
                (prev, next)
            }
        };

        // A zero-length span (all points at one minute, or an exact hit on
        // prev) degenerates to prev's values via a 0.0 ratio.
        let ratio = interpolation_ratio(prev.minute, next.minute, minute);

        let lerp = |a: &[f32], b: &[f32]| -> Vec<f32> {
            a.iter()
                .zip(b)
                .map(|(&from, &to)| from + (to - from) * ratio)
                .collect()
        };

        ChannelLevels {
            pwm: lerp(&prev.pwm, &next.pwm),
            current: lerp(&prev.current, &next.current),
        }
    }

    /// The forward distance from `minute` to the next control point, handy
    /// for hosts that want to sleep until the curve changes direction.
    pub fn minutes_until_next_point(&self, minute: u16) -> Option<u16> {
        self.points
            .iter()
            .map(|point| forward_distance(minute, point.minute))
            .filter(|&distance| distance > 0)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::{AstroEvent, AstroTable};
    use crate::schedule::SchedulePoint;

    fn schedule_with(points: Vec<SchedulePoint>) -> Schedule {
        let mut schedule = Schedule::new(1).unwrap();
        for point in points {
            schedule.points.push(point);
        }
        schedule
    }

    fn fixed(minute: u16, pwm: f32) -> SchedulePoint {
        SchedulePoint::fixed(minute, vec![pwm], vec![pwm / 50.0])
    }

    #[test]
    fn empty_timeline_is_all_zero() {
        let timeline = Timeline::build(&schedule_with(vec![]), &AstroTable::default());
        for minute in [0, 719, 1439] {
            assert_eq!(timeline.evaluate(minute), ChannelLevels::zero(1));
        }
        assert!(timeline.is_empty());
    }

    #[test]
    fn single_point_is_constant_all_day() {
        let timeline = Timeline::build(
            &schedule_with(vec![fixed(600, 42.0)]),
            &AstroTable::default(),
        );
        for minute in [0, 599, 600, 601, 1439] {
            let levels = timeline.evaluate(minute);
            assert_eq!(levels.pwm, vec![42.0]);
            assert_eq!(levels.current, vec![0.84]);
        }
    }

    #[test]
    fn evaluate_at_point_minute_returns_point_values() {
        let timeline = Timeline::build(
            &schedule_with(vec![fixed(360, 10.0), fixed(720, 90.0), fixed(1080, 30.0)]),
            &AstroTable::default(),
        );
        assert_eq!(timeline.evaluate(360).pwm, vec![10.0]);
        assert_eq!(timeline.evaluate(720).pwm, vec![90.0]);
        assert_eq!(timeline.evaluate(1080).pwm, vec![30.0]);
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let timeline = Timeline::build(
            &schedule_with(vec![fixed(360, 0.0), fixed(720, 100.0)]),
            &AstroTable::default(),
        );
        assert_eq!(timeline.evaluate(540).pwm, vec![50.0]);
        assert_eq!(timeline.evaluate(450).pwm, vec![25.0]);
    }

    #[test]
    fn wraps_across_midnight() {
        // 23:50 at A=20, 00:10 at B=80: midnight sits at ratio 10/20
        let timeline = Timeline::build(
            &schedule_with(vec![fixed(10, 80.0), fixed(1430, 20.0)]),
            &AstroTable::default(),
        );
        assert_eq!(timeline.evaluate(0).pwm, vec![50.0]);
        // Inside the wrapped span from the evening side
        assert_eq!(timeline.evaluate(1435).pwm, vec![35.0]);
        // And the long daytime span between 00:10 and 23:50 still interpolates:
        // 12:00 sits at ratio 710/1420 from 80 down to 20
        assert_eq!(timeline.evaluate(720).pwm, vec![50.0]);
    }

    #[test]
    fn later_duplicate_wins_at_exact_minute() {
        let mut schedule = Schedule::new(1).unwrap();
        schedule.points.push(fixed(360, 10.0));
        schedule.points.push(fixed(360, 70.0));
        schedule.points.push(fixed(720, 100.0));
        let timeline = Timeline::build(&schedule, &AstroTable::default());
        assert_eq!(timeline.evaluate(360).pwm, vec![70.0]);
    }

    #[test]
    fn duplicate_point_scenario_midpoint() {
        // 00:00=0, 06:00=0, 06:00 duplicate, 12:00=100, 18:00=0;
        // 09:00 must be the 06:00 -> 12:00 midpoint.
        let mut schedule = Schedule::new(1).unwrap();
        for point in [
            fixed(0, 0.0),
            fixed(360, 0.0),
            fixed(360, 0.0),
            fixed(720, 100.0),
            fixed(1080, 0.0),
        ] {
            schedule.points.push(point);
        }
        let timeline = Timeline::build(&schedule, &AstroTable::default());
        assert_eq!(timeline.evaluate(540).pwm, vec![50.0]);
    }

    #[test]
    fn all_points_at_one_minute_degenerate_to_later_point() {
        let mut schedule = Schedule::new(1).unwrap();
        schedule.points.push(fixed(360, 10.0));
        schedule.points.push(fixed(360, 90.0));
        let timeline = Timeline::build(&schedule, &AstroTable::default());
        assert_eq!(timeline.evaluate(100).pwm, vec![90.0]);
        assert_eq!(timeline.evaluate(360).pwm, vec![90.0]);
    }

    #[test]
    fn unresolved_points_are_dropped_not_fatal() {
        let table = AstroTable {
            nautical_dawn: None,
            ..AstroTable::default()
        };
        let mut schedule = schedule_with(vec![fixed(360, 0.0), fixed(720, 100.0)]);
        schedule.points.push(SchedulePoint::dynamic(
            AstroEvent::NauticalDawn,
            0,
            vec![50.0],
            vec![1.0],
        ));

        let timeline = Timeline::build(&schedule, &table);
        assert_eq!(timeline.points().len(), 2);
        assert_eq!(
            timeline.dropped(),
            &[(2, PointError::UnresolvedEvent(AstroEvent::NauticalDawn))]
        );
        // Remaining points still produce a gap-free cyclic curve
        assert_eq!(timeline.evaluate(540).pwm, vec![50.0]);
        let wrapped = timeline.evaluate(0);
        assert!(wrapped.pwm[0] > 0.0 && wrapped.pwm[0] < 100.0);
    }

    #[test]
    fn mismatched_channel_arrays_are_dropped() {
        let mut schedule = schedule_with(vec![fixed(360, 20.0)]);
        schedule
            .points
            .push(SchedulePoint::fixed(720, vec![50.0, 50.0], vec![1.0, 1.0]));

        let timeline = Timeline::build(&schedule, &AstroTable::default());
        assert_eq!(timeline.points().len(), 1);
        assert_eq!(
            timeline.dropped(),
            &[(
                1,
                PointError::ChannelCountMismatch {
                    expected: 1,
                    got: 2
                }
            )]
        );
    }

    #[test]
    fn dynamic_points_resolve_and_sort() {
        let table = AstroTable {
            sunrise: Some(360), // 06:00
            sunset: Some(1080), // 18:00
            ..AstroTable::default()
        };
        let mut schedule = Schedule::new(1).unwrap();
        schedule.points.push(SchedulePoint::dynamic(
            AstroEvent::Sunset,
            0,
            vec![10.0],
            vec![0.2],
        ));
        schedule.points.push(SchedulePoint::dynamic(
            AstroEvent::Sunrise,
            -30,
            vec![5.0],
            vec![0.1],
        ));

        let timeline = Timeline::build(&schedule, &table);
        assert_eq!(timeline.points()[0].minute, 330); // 05:30
        assert_eq!(timeline.points()[1].minute, 1080);
    }

    #[test]
    fn current_interpolates_independently_of_pwm() {
        let mut schedule = Schedule::new(1).unwrap();
        schedule
            .points
            .push(SchedulePoint::fixed(0, vec![0.0], vec![2.0]));
        schedule
            .points
            .push(SchedulePoint::fixed(720, vec![100.0], vec![0.0]));
        let timeline = Timeline::build(&schedule, &AstroTable::default());
        let levels = timeline.evaluate(360);
        assert_eq!(levels.pwm, vec![50.0]);
        assert_eq!(levels.current, vec![1.0]);
    }

    #[test]
    fn minutes_until_next_point() {
        let timeline = Timeline::build(
            &schedule_with(vec![fixed(360, 0.0), fixed(720, 100.0)]),
            &AstroTable::default(),
        );
        assert_eq!(timeline.minutes_until_next_point(350), Some(10));
        assert_eq!(timeline.minutes_until_next_point(360), Some(360));
        assert_eq!(timeline.minutes_until_next_point(1000), Some(800));

        let empty = Timeline::build(&schedule_with(vec![]), &AstroTable::default());
        assert_eq!(empty.minutes_until_next_point(0), None);
    }
}
