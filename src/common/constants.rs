//! Shared constants for the schedule engine and the preview CLI.

/// Length of the cyclic minute axis: 24h x 60m.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Supported channel counts for a schedule document.
pub const MIN_CHANNELS: usize = 1;
pub const MAX_CHANNELS: usize = 16;

/// PWM duty bounds in percent.
pub const PWM_MIN: f32 = 0.0;
pub const PWM_MAX: f32 = 100.0;

/// Default per-channel current limit in amps when a document does not set one.
pub const DEFAULT_MAX_CURRENT: f32 = 2.0;

/// Ceiling for the moon simulation's per-channel base intensity (percent PWM).
/// Moonlight is a nocturnal floor, never a daytime-level output.
pub const MOON_INTENSITY_CAP: f32 = 20.0;

/// Valid range for a dynamic point's offset from its astronomical anchor.
pub const MAX_EVENT_OFFSET: i16 = 1439;

/// Default sampling step for rendering a full-day curve (minutes).
pub const DEFAULT_SAMPLE_STEP: u16 = 15;

/// Default display colors assigned to freshly created channels.
pub const DEFAULT_CHANNEL_COLORS: [&str; 8] = [
    "#FFFFFF", // white
    "#0000FF", // blue
    "#00FFFF", // cyan
    "#00FF00", // green
    "#FF0000", // red
    "#FF00FF", // magenta
    "#FFFF00", // yellow
    "#FF8000", // orange
];

/// Fallback astronomical event minutes used when no table has been supplied
/// by the ephemeris service (mid-latitude spring day).
pub const DEFAULT_SUNRISE: u16 = 420; // 07:00
pub const DEFAULT_SUNSET: u16 = 1080; // 18:00
pub const DEFAULT_SOLAR_NOON: u16 = 750; // 12:30
pub const DEFAULT_CIVIL_DAWN: u16 = 390; // 06:30
pub const DEFAULT_CIVIL_DUSK: u16 = 1110; // 18:30
pub const DEFAULT_NAUTICAL_DAWN: u16 = 360; // 06:00
pub const DEFAULT_NAUTICAL_DUSK: u16 = 1140; // 19:00
