//! The evaluation engine: document + astronomical table + cached timeline.
//!
//! [`Engine`] owns the schedule document and the current astronomical table
//! and keeps the resolved [`Timeline`] as an `Arc` snapshot. Every mutation
//! rebuilds the snapshot and swaps it whole; readers holding the previous
//! `Arc` keep a fully consistent timeline and never observe a partial
//! update. Evaluation itself is pure — the same inputs always produce the
//! same output, so it can be called once per status tick or 96 times to
//! render a 15-minute day chart with no ordering constraints.

use std::sync::Arc;

use crate::astro::AstroTable;
use crate::output;
use crate::schedule::Schedule;
use crate::timeline::{ChannelLevels, Timeline};

/// Owns one schedule and its resolved timeline snapshot.
#[derive(Debug, Clone)]
pub struct Engine {
    schedule: Schedule,
    table: AstroTable,
    timeline: Arc<Timeline>,
}

impl Engine {
    pub fn new(schedule: Schedule, table: AstroTable) -> Self {
        let timeline = Arc::new(Timeline::build(&schedule, &table));
        Self {
            schedule,
            table,
            timeline,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn table(&self) -> &AstroTable {
        &self.table
    }

    /// The current timeline snapshot. The returned `Arc` stays valid and
    /// unchanged across later mutations.
    pub fn timeline(&self) -> Arc<Timeline> {
        Arc::clone(&self.timeline)
    }

    /// Replace the whole document and rebuild the snapshot.
    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        self.rebuild();
    }

    /// Mutate the document in place (point edits, moon settings, projection
    /// changes) and rebuild the snapshot afterwards.
    pub fn edit_schedule<R>(&mut self, edit: impl FnOnce(&mut Schedule) -> R) -> R {
        let result = edit(&mut self.schedule);
        self.rebuild();
        result
    }

    /// Install a fresh astronomical table (new date, location, or time
    /// projection) and rebuild the snapshot.
    pub fn set_table(&mut self, table: AstroTable) {
        self.table = table;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.timeline = Arc::new(Timeline::build(&self.schedule, &self.table));
    }

    /// Evaluate the device-facing output at one instant.
    ///
    /// `phase_fraction` is the externally supplied lunar phase in `[0, 1]`
    /// (only consulted when the moon baseline scales by phase); `scale` is
    /// the master brightness in `[0, 1]`.
    pub fn evaluate(&self, minute: u16, phase_fraction: f32, scale: f32) -> ChannelLevels {
        let levels = self.timeline.evaluate(minute);
        output::compose(
            &levels,
            &self.schedule.channels,
            self.schedule.moon.as_ref(),
            phase_fraction,
            scale,
        )
    }

    /// Sample the whole day at a fixed step, for chart rendering.
    ///
    /// A step of 0 is treated as 1 to keep the operation total.
    pub fn sample_day(
        &self,
        step_minutes: u16,
        phase_fraction: f32,
        scale: f32,
    ) -> Vec<(u16, ChannelLevels)> {
        let step = step_minutes.max(1);
        (0..crate::common::constants::MINUTES_PER_DAY)
            .step_by(usize::from(step))
            .map(|minute| (minute, self.evaluate(minute, phase_fraction, scale)))
            .collect()
    }
}

/// One-shot evaluation without a cached engine.
///
/// Builds a throwaway timeline; hosts that evaluate repeatedly should hold
/// an [`Engine`] instead so the resolved snapshot is reused.
pub fn evaluate_once(
    schedule: &Schedule,
    table: &AstroTable,
    minute: u16,
    phase_fraction: f32,
    scale: f32,
) -> ChannelLevels {
    let levels = Timeline::build(schedule, table).evaluate(minute);
    output::compose(
        &levels,
        &schedule.channels,
        schedule.moon.as_ref(),
        phase_fraction,
        scale,
    )
}
