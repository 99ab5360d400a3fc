//! Keyboard backlight driver
//!
//! Switches the GPIO lines behind a keyboard backlight, corrects linear
//! brightness values for perception and provides the breathing waveform used by
//! the idle animation. PWM timers, level storage and key handling live in the
//! firmware that links this crate.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

pub mod config;
pub mod lightness;
pub mod peripherals;

#[cfg(feature = "breathing")]
pub mod breathing;
