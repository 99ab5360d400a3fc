//! Peripherals driven by the backlight

pub mod backlight;
