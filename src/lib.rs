//! # Photoperiod Library
//!
//! Schedule evaluation engine for programmable multi-channel LED lighting.
//!
//! A schedule is a sparse set of control points — some at fixed clock times,
//! some anchored to astronomical events like sunrise or civil dusk — each
//! carrying per-channel PWM duty and drive current. This crate turns such a
//! schedule into a continuous, cyclic output curve for any instant of a
//! 24-hour day.
//!
//! ## Architecture
//!
//! The evaluation pipeline is a pure chain, leaves first:
//!
//! - **`clock`**: the cyclic minute axis and wrap-around arithmetic
//! - **`astro`**: astronomical anchors and dynamic time resolution against
//!   an externally supplied event table
//! - **`schedule`**: the document model, validation, and built-in presets
//! - **`timeline`**: normalization into a sorted immutable snapshot and
//!   piecewise-linear evaluation with midnight wrap-around
//! - **`output`**: clamping, the moon-simulation floor, and the master scale
//! - **`engine`**: the cache-owning entry point that rebuilds and swaps the
//!   timeline snapshot whenever the document or the table changes
//!
//! Ephemeris computation, persistence, transport, and the PWM driver are
//! external collaborators; the crate consumes and produces plain data.

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod astro;
pub mod clock;
pub mod config;
pub mod engine;
pub mod output;
pub mod schedule;
pub mod timeline;

pub use astro::{AstroEvent, AstroTable, PointError, TimeReference};
pub use engine::Engine;
pub use schedule::{ChannelConfig, MoonSimulation, Schedule, SchedulePoint};
pub use timeline::{ChannelLevels, Timeline};
