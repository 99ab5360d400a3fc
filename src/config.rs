//! Build configuration of the backlight
//!
//! Pin polarity is chosen with the `on-state-low` feature. The breathing curve
//! and depth are read by `build.rs` from `BACKLIGHT_BREATHING_CURVE` (0-4) and
//! `BACKLIGHT_BREATHING_DEPTH` (0.0-1.0).

#[cfg(feature = "breathing")]
use crate::breathing::{table, Waveform};

cfg_if::cfg_if! {
    if #[cfg(feature = "on-state-low")] {
        /// Polarity used when a [`Backlight`](crate::peripherals::backlight::Backlight)
        /// is declared without one.
        pub type DefaultPolarity = crate::peripherals::backlight::ActiveLow;
    } else {
        /// Polarity used when a [`Backlight`](crate::peripherals::backlight::Backlight)
        /// is declared without one.
        pub type DefaultPolarity = crate::peripherals::backlight::ActiveHigh;
    }
}

/// Number of brightness levels above off.
pub const BACKLIGHT_LEVELS: u8 = 3;

/// Default length of one breath in seconds.
pub const BREATHING_PERIOD: u8 = 6;

/// Waveform baked into the breathing table.
#[cfg(feature = "breathing")]
pub const BREATHING_WAVEFORM: Waveform = match Waveform::from_selector(table::CURVE) {
    Some(waveform) => waveform,
    None => panic!("breathing table was generated for an unknown curve"),
};

/// Fraction of full brightness the breathing wave swings through.
#[cfg(feature = "breathing")]
pub const BREATHING_DEPTH: f64 = table::DEPTH;
