//! Property tests for the evaluation pipeline.

use proptest::prelude::*;
use std::collections::BTreeMap;

use photoperiod::astro::AstroTable;
use photoperiod::output;
use photoperiod::schedule::{MoonSimulation, Schedule, SchedulePoint};
use photoperiod::timeline::{ChannelLevels, Timeline};

/// Generate a schedule of fixed points at distinct minutes.
fn distinct_points_strategy() -> impl Strategy<Value = BTreeMap<u16, (f32, f32)>> {
    prop::collection::btree_map(
        0u16..1440,
        (0.0f32..=100.0, 0.0f32..=2.0),
        1..24,
    )
}

fn schedule_from(points: &BTreeMap<u16, (f32, f32)>) -> Schedule {
    let mut schedule = Schedule::new(1).unwrap();
    for (&minute, &(pwm, current)) in points {
        schedule.add_point(SchedulePoint::fixed(minute, vec![pwm], vec![current]));
    }
    schedule
}

proptest! {
    /// Evaluating exactly at a control point's minute returns that point's
    /// values: interpolation never drifts at a boundary.
    #[test]
    fn boundary_exactness(points in distinct_points_strategy()) {
        let timeline = Timeline::build(&schedule_from(&points), &AstroTable::default());
        for (&minute, &(pwm, current)) in &points {
            let levels = timeline.evaluate(minute);
            prop_assert_eq!(levels.pwm[0], pwm);
            prop_assert_eq!(levels.current[0], current);
        }
    }

    /// A single point defines a constant schedule for the whole day.
    #[test]
    fn single_point_constancy(
        minute in 0u16..1440,
        pwm in 0.0f32..=100.0,
        target in 0u16..1440,
    ) {
        let mut schedule = Schedule::new(1).unwrap();
        schedule.add_point(SchedulePoint::fixed(minute, vec![pwm], vec![1.0]));
        let timeline = Timeline::build(&schedule, &AstroTable::default());
        prop_assert_eq!(timeline.evaluate(target).pwm[0], pwm);
    }

    /// The empty timeline is all-zero for every instant.
    #[test]
    fn empty_timeline_is_zero(target in 0u16..1440) {
        let timeline = Timeline::build(&Schedule::new(2).unwrap(), &AstroTable::default());
        prop_assert_eq!(timeline.evaluate(target), ChannelLevels::zero(2));
    }

    /// Evaluation is pure: repeating it with identical inputs cannot drift.
    #[test]
    fn idempotence(points in distinct_points_strategy(), target in 0u16..1440) {
        let timeline = Timeline::build(&schedule_from(&points), &AstroTable::default());
        let first = timeline.evaluate(target);
        for _ in 0..3 {
            prop_assert_eq!(timeline.evaluate(target), first.clone());
        }
    }

    /// An interpolated value never leaves the interval spanned by the
    /// authored values (within float tolerance).
    #[test]
    fn interpolation_stays_within_authored_range(
        points in distinct_points_strategy(),
        target in 0u16..1440,
    ) {
        let timeline = Timeline::build(&schedule_from(&points), &AstroTable::default());
        let levels = timeline.evaluate(target);
        let min = points.values().map(|&(pwm, _)| pwm).fold(f32::INFINITY, f32::min);
        let max = points.values().map(|&(pwm, _)| pwm).fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(levels.pwm[0] >= min - 1e-3);
        prop_assert!(levels.pwm[0] <= max + 1e-3);
    }

    /// With the moon baseline enabled and full brightness, the composed
    /// output never drops below the moon component, whatever the schedule
    /// says at that instant.
    #[test]
    fn moon_floor_holds(
        raw_pwm in -20.0f32..=120.0,
        raw_current in -1.0f32..=3.0,
        base_intensity in 0.0f32..=20.0,
        base_current in 0.0f32..=2.0,
        phase in 0.0f32..=1.0,
        phase_scaling in any::<bool>(),
    ) {
        let schedule = Schedule::new(1).unwrap();
        let moon = MoonSimulation {
            enabled: true,
            phase_scaling,
            base_intensity: vec![base_intensity],
            base_current: vec![base_current],
        };
        let levels = ChannelLevels { pwm: vec![raw_pwm], current: vec![raw_current] };
        let out = output::compose(&levels, &schedule.channels, Some(&moon), phase, 1.0);

        let (floor_pwm, floor_current) =
            output::moon_component(&moon, 0, schedule.channels[0].max_current, phase);
        prop_assert!(out.pwm[0] >= floor_pwm);
        prop_assert!(out.current[0] >= floor_current);
    }

    /// The composed output is always within device bounds, even for raw
    /// values far outside their authored ranges.
    #[test]
    fn composed_output_is_bounded(
        raw_pwm in -500.0f32..=500.0,
        raw_current in -10.0f32..=10.0,
        phase in 0.0f32..=1.0,
        scale in -0.5f32..=1.5,
    ) {
        let schedule = Schedule::new(1).unwrap();
        let levels = ChannelLevels { pwm: vec![raw_pwm], current: vec![raw_current] };
        let out = output::compose(&levels, &schedule.channels, None, phase, scale);
        prop_assert!((0.0..=100.0).contains(&out.pwm[0]));
        prop_assert!((0.0..=schedule.channels[0].max_current).contains(&out.current[0]));
    }
}
