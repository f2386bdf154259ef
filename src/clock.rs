//! The cyclic 24-hour minute axis.
//!
//! Every instant in a schedule is a minute-of-day in `[0, 1439]`, and the axis
//! wraps from 23:59 back to 00:00. All span arithmetic goes through
//! [`forward_distance`], so a span that crosses midnight (say 23:50 to 00:10)
//! is the same 20 forward minutes as any other 20-minute span. There is no
//! separate wrap/no-wrap code path anywhere in the evaluator.

use crate::common::constants::MINUTES_PER_DAY;

/// Minutes from `a` to `b` travelling forward around the clock, wrapping past
/// midnight when `b < a`. Always in `[0, 1439]`.
pub fn forward_distance(a: u16, b: u16) -> u16 {
    (b + MINUTES_PER_DAY - a) % MINUTES_PER_DAY
}

/// Fraction in `[0, 1]` of how far `target` lies from `prev` toward `next`,
/// measured along the forward direction.
///
/// A zero-length span (prev and next at the same minute) yields 0.0 so that
/// callers fall back to `prev`'s values.
pub fn interpolation_ratio(prev: u16, next: u16, target: u16) -> f32 {
    let span = forward_distance(prev, next);
    if span == 0 {
        return 0.0;
    }
    f32::from(forward_distance(prev, target)) / f32::from(span)
}

/// Wrap a signed minute count onto the day axis.
///
/// Used when applying signed offsets to astronomical anchors: an offset can
/// push a point before midnight or past the end of the day.
pub fn wrap_minutes(minutes: i32) -> u16 {
    minutes.rem_euclid(i32::from(MINUTES_PER_DAY)) as u16
}

/// Format a minute-of-day as `HH:MM` for logs and curve output.
pub fn format_minute(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}
