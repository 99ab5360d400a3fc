//! Breathing effect
//!
//! One period of the configured waveform is baked into a 128 entry table at
//! build time (see `build.rs`). [`breathing_curve`] looks a sample up,
//! [`Breathing`] walks the table at the backlight tick rate and turns samples
//! into PWM duty cycles.

pub(crate) mod table;
mod waveform;

pub use waveform::{generate, quantize, Waveform, STEPS};

use crate::{
    config::{BACKLIGHT_LEVELS, BREATHING_PERIOD},
    lightness::{cie_lightness, scale_level},
};

/// Rate at which [`Breathing::tick`] is expected to be called, in Hz.
pub const TICK_HZ: u16 = 256;

/// Sample of the configured breathing waveform, 0 (dimmest) to 255.
///
/// The index wraps at [`STEPS`], so a free running counter can be passed in
/// directly.
#[inline]
pub fn breathing_curve(index: u8) -> u8 {
    table::read(usize::from(index) % STEPS)
}

/// Where a running breathing animation stops by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Halt {
    /// Breathe until stopped.
    Never,
    /// Stop at the brightest point of the wave.
    AtPeak,
    /// Stop at the end of the period.
    AtEnd,
}

/// Breathing animation state.
///
/// Owns the tick counter that the table index is derived from. Call
/// [`Breathing::tick`] at [`TICK_HZ`] and feed the returned duty cycle to the
/// PWM output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Breathing {
    /// Length of one breath in seconds.
    period: u8,
    counter: u16,
    halt: Halt,
    running: bool,
    level: u8,
}

impl Default for Breathing {
    fn default() -> Self {
        Self::new(BREATHING_PERIOD, BACKLIGHT_LEVELS)
    }
}

impl Breathing {
    /// Create a stopped animation with the given period (seconds) and
    /// brightness level. The level is capped at [`BACKLIGHT_LEVELS`].
    pub const fn new(period: u8, level: u8) -> Self {
        Self {
            period: if period == 0 { 1 } else { period },
            counter: 0,
            halt: Halt::Never,
            running: false,
            level: if level > BACKLIGHT_LEVELS { BACKLIGHT_LEVELS } else { level },
        }
    }

    /// Change the period. A period of 0 is treated as 1 second.
    pub fn set_period(&mut self, period: u8) {
        if period == 0 {
            warn!("Breathing period of 0s requested, using 1s");
        }
        self.period = period.max(1);
        self.counter %= self.period_ticks();
    }

    /// Length of one breath in seconds.
    pub fn period(&self) -> u8 {
        self.period
    }

    /// Change the brightness level the wave is scaled to.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(BACKLIGHT_LEVELS);
    }

    /// Brightness level the wave is scaled to.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Breathe continuously, continuing from the current position.
    pub fn start(&mut self) {
        trace!("Breathing started, period {}s", self.period);
        self.halt = Halt::Never;
        self.running = true;
    }

    /// Breathe once from the start of the wave and stop at its end.
    pub fn pulse(&mut self) {
        self.counter = 0;
        self.halt = Halt::AtEnd;
        self.running = true;
    }

    /// Keep breathing until the next peak, then hold.
    pub fn stop_at_peak(&mut self) {
        self.halt = Halt::AtPeak;
    }

    /// Stop immediately.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether [`Breathing::tick`] still produces samples.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current table index.
    pub fn index(&self) -> u8 {
        let interval = u16::from(self.period) * TICK_HZ / STEPS as u16;
        (self.counter / interval % STEPS as u16) as u8
    }

    /// Advance one tick and return the PWM duty cycle (0 to 65535), or
    /// `None` once the animation has stopped.
    pub fn tick(&mut self) -> Option<u16> {
        if !self.running {
            return None;
        }

        // Wrap after one period so the index never jumps at counter overflow
        self.counter = (self.counter + 1) % self.period_ticks();
        let index = self.index();

        let halted = match self.halt {
            Halt::Never => false,
            Halt::AtPeak => usize::from(index) == STEPS / 2,
            Halt::AtEnd => usize::from(index) == STEPS - 1,
        };
        if halted {
            trace!("Breathing halted at index {}", index);
            self.running = false;
        }

        let sample = u16::from(breathing_curve(index)) * 256;
        Some(cie_lightness(scale_level(sample, self.level, BACKLIGHT_LEVELS)))
    }

    fn period_ticks(&self) -> u16 {
        u16::from(self.period) * TICK_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BREATHING_DEPTH, BREATHING_WAVEFORM};

    // Published tables, printed by the reference curve script
    #[rustfmt::skip]
    const SINE_FOURTH: [u8; STEPS] = [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 2, 3, 3, 4,
        6, 7, 9, 11, 13, 16, 18, 21, 25, 29, 33, 37, 42, 48, 53, 59,
        65, 72, 79, 86, 93, 101, 108, 116, 124, 133, 141, 149, 157, 165, 173, 181,
        189, 196, 203, 210, 216, 222, 228, 233, 238, 242, 246, 249, 251, 253, 254, 255,
        255, 254, 253, 251, 249, 246, 242, 238, 233, 228, 222, 216, 210, 203, 196, 189,
        181, 173, 165, 157, 149, 141, 133, 124, 116, 108, 101, 93, 86, 79, 72, 65,
        59, 53, 48, 42, 37, 33, 29, 25, 21, 18, 16, 13, 11, 9, 7, 6,
        4, 3, 3, 2, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    #[rustfmt::skip]
    const SINE: [u8; STEPS] = [
        0, 0, 1, 1, 3, 4, 6, 8, 10, 12, 15, 18, 22, 26, 29, 33,
        38, 43, 47, 52, 57, 63, 68, 74, 80, 86, 92, 98, 104, 110, 117, 123,
        129, 135, 142, 148, 154, 160, 166, 172, 178, 184, 189, 195, 200, 205, 210, 215,
        219, 224, 228, 231, 235, 238, 241, 244, 246, 248, 250, 252, 253, 254, 255, 255,
        255, 255, 254, 253, 252, 250, 248, 246, 244, 241, 238, 235, 231, 228, 224, 219,
        215, 210, 205, 200, 195, 189, 184, 178, 172, 166, 160, 154, 148, 142, 135, 129,
        123, 117, 110, 104, 98, 92, 86, 80, 74, 68, 63, 57, 52, 47, 43, 38,
        33, 29, 26, 22, 18, 15, 12, 10, 8, 6, 4, 3, 1, 1, 0, 0,
    ];

    #[rustfmt::skip]
    const SINE_FOURTH_HALF_DEPTH: [u8; STEPS] = [
        128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 129, 129, 130,
        130, 131, 132, 133, 134, 135, 137, 138, 140, 142, 144, 146, 149, 151, 154, 157,
        160, 163, 167, 170, 174, 178, 182, 186, 190, 194, 198, 202, 206, 210, 214, 218,
        222, 226, 229, 232, 236, 239, 242, 244, 246, 248, 250, 252, 253, 254, 255, 255,
        255, 255, 254, 253, 252, 250, 248, 246, 244, 242, 239, 236, 232, 229, 226, 222,
        218, 214, 210, 206, 202, 198, 194, 190, 186, 182, 178, 174, 170, 167, 163, 160,
        157, 154, 151, 149, 146, 144, 142, 140, 138, 137, 135, 134, 133, 132, 131, 130,
        130, 129, 129, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128, 128,
    ];

    #[rustfmt::skip]
    const TRIANGLE: [u8; STEPS] = [
        0, 4, 8, 12, 16, 20, 24, 28, 32, 36, 40, 44, 48, 52, 56, 60,
        64, 68, 72, 76, 80, 84, 88, 92, 96, 100, 104, 108, 112, 116, 120, 123,
        128, 132, 135, 139, 143, 147, 151, 155, 159, 163, 167, 171, 175, 179, 183, 187,
        191, 195, 199, 203, 207, 211, 215, 219, 223, 227, 231, 235, 239, 243, 247, 251,
        255, 251, 247, 243, 239, 235, 231, 227, 223, 219, 215, 211, 207, 203, 199, 195,
        191, 187, 183, 179, 175, 171, 167, 163, 159, 155, 151, 147, 143, 139, 135, 132,
        128, 123, 120, 116, 112, 108, 104, 100, 96, 92, 88, 84, 80, 76, 72, 68,
        64, 60, 56, 52, 48, 44, 40, 36, 32, 28, 24, 20, 16, 12, 8, 4,
    ];

    #[rustfmt::skip]
    const TRAPEZOID: [u8; STEPS] = [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 120,
        128, 135, 143, 151, 159, 167, 175, 183, 191, 199, 207, 215, 223, 231, 239, 247,
        255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
        255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
        255, 247, 239, 231, 223, 215, 207, 199, 191, 183, 175, 167, 159, 151, 143, 135,
        128, 120, 112, 104, 96, 88, 80, 72, 64, 56, 48, 40, 32, 24, 16, 8,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ];

    #[test]
    fn compiled_table_matches_configured_waveform() {
        let expected = generate(BREATHING_WAVEFORM, BREATHING_DEPTH);
        for index in 0..STEPS as u8 {
            assert_eq!(breathing_curve(index), expected[usize::from(index)]);
        }
    }

    #[test]
    fn index_wraps_around_the_period() {
        for index in 0..STEPS as u8 {
            assert_eq!(breathing_curve(index), breathing_curve(index + STEPS as u8));
        }
    }

    #[test]
    fn default_curve_peaks_in_the_middle() {
        if BREATHING_WAVEFORM == Waveform::SineFourth && BREATHING_DEPTH == 1.0 {
            assert_eq!(breathing_curve(0), 0);
            assert_eq!(breathing_curve(63), 255);
            assert_eq!(breathing_curve(127), 0);
        }
    }

    #[test]
    fn sine_fourth_at_full_depth() {
        let table = generate(Waveform::SineFourth, 1.0);
        assert_eq!(table[0], 0);
        assert_eq!(table[63], 255);
        assert_eq!(table[64], 255);
        assert_eq!(table[127], 0);
        // Slow start
        assert!(table[8] < table[16] && table[16] < 32);
    }

    #[test]
    fn sine_spans_full_range() {
        let table = generate(Waveform::Sine, 1.0);
        assert_eq!(table[0], 0);
        assert_eq!(table[63], 255);
        assert_eq!(table[127], 0);
    }

    #[test]
    fn sawtooth_ramps_linearly() {
        let table = generate(Waveform::Sawtooth, 1.0);
        assert_eq!(table[0], 0);
        assert_eq!(table[127], 255);
        assert!(table.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn triangle_is_symmetric() {
        let table = generate(Waveform::Triangle, 1.0);
        assert_eq!(table[0], 0);
        assert_eq!(table[32], 128);
        assert_eq!(table[64], 255);
        for x in 1..STEPS {
            assert_eq!(table[x], table[STEPS - x]);
        }
    }

    #[test]
    fn trapezoid_has_plateaus() {
        let table = generate(Waveform::Trapezoid, 1.0);
        assert!(table[..=16].iter().all(|&value| value == 0));
        assert!(table[48..=80].iter().all(|&value| value == 255));
        assert!(table[112..].iter().all(|&value| value == 0));
    }

    #[test]
    fn depth_lifts_the_floor() {
        let table = generate(Waveform::SineFourth, 0.5);
        assert_eq!(table[0], 128);
        assert_eq!(table[63], 255);
        assert!(table.iter().all(|&value| value >= 128));

        let flat = generate(Waveform::Triangle, 0.0);
        assert!(flat.iter().all(|&value| value == 255));
    }

    #[test]
    fn unknown_selector_is_rejected() {
        assert_eq!(Waveform::from_selector(4), Some(Waveform::Trapezoid));
        assert_eq!(Waveform::from_selector(5), None);
    }

    #[test]
    fn stopped_animation_yields_nothing() {
        let mut breathing = Breathing::new(1, BACKLIGHT_LEVELS);
        assert!(!breathing.is_running());
        assert_eq!(breathing.tick(), None);
    }

    #[test]
    fn tick_follows_the_table() {
        let mut breathing = Breathing::new(1, BACKLIGHT_LEVELS);
        breathing.start();
        // One period of 1s at 256 Hz advances the index every 2 ticks
        for tick in 1..=64u16 {
            let duty = breathing.tick();
            let index = (tick / 2) as u8;
            assert_eq!(breathing.index(), index);
            let sample = u16::from(breathing_curve(index)) * 256;
            let expected = cie_lightness(scale_level(sample, BACKLIGHT_LEVELS, BACKLIGHT_LEVELS));
            assert_eq!(duty, Some(expected));
        }
    }

    #[test]
    fn continuous_breathing_wraps() {
        let mut breathing = Breathing::new(1, BACKLIGHT_LEVELS);
        breathing.start();
        for _ in 0..TICK_HZ {
            assert!(breathing.tick().is_some());
        }
        assert_eq!(breathing.index(), 0);
        assert!(breathing.is_running());
    }

    #[test]
    fn pulse_stops_after_one_breath() {
        let mut breathing = Breathing::new(1, BACKLIGHT_LEVELS);
        breathing.pulse();
        let mut ticks = 0;
        while breathing.tick().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 254);
        assert_eq!(usize::from(breathing.index()), STEPS - 1);
    }

    #[test]
    fn stop_at_peak_holds_the_middle() {
        let mut breathing = Breathing::new(1, BACKLIGHT_LEVELS);
        breathing.start();
        breathing.stop_at_peak();
        let mut ticks = 0;
        while breathing.tick().is_some() {
            ticks += 1;
        }
        assert_eq!(ticks, 128);
        assert_eq!(usize::from(breathing.index()), STEPS / 2);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut breathing = Breathing::new(0, BACKLIGHT_LEVELS);
        assert_eq!(breathing.period(), 1);
        breathing.set_period(0);
        assert_eq!(breathing.period(), 1);
    }

    #[test]
    fn level_zero_is_dark() {
        let mut breathing = Breathing::new(2, 0);
        breathing.start();
        for _ in 0..2 * TICK_HZ {
            assert_eq!(breathing.tick(), Some(0));
        }
    }

    #[test]
    fn sine_fourth_matches_published_table() {
        assert_eq!(generate(Waveform::SineFourth, 1.0), SINE_FOURTH);
    }

    #[test]
    fn sine_matches_published_table() {
        assert_eq!(generate(Waveform::Sine, 1.0), SINE);
    }

    #[test]
    fn shallow_sine_fourth_matches_published_table() {
        assert_eq!(generate(Waveform::SineFourth, 0.5), SINE_FOURTH_HALF_DEPTH);
    }

    #[test]
    fn linear_shapes_round_ties_to_even() {
        // 0.0625 and 0.3125 print as 0.062 and 0.312
        assert_eq!(generate(Waveform::Triangle, 1.0), TRIANGLE);
        assert_eq!(generate(Waveform::Trapezoid, 1.0), TRAPEZOID);
    }

    #[test]
    fn compiled_default_table_is_the_published_one() {
        if BREATHING_WAVEFORM == Waveform::SineFourth && BREATHING_DEPTH == 1.0 {
            for index in 0..STEPS as u8 {
                assert_eq!(breathing_curve(index), SINE_FOURTH[usize::from(index)]);
            }
        }
    }

    #[test]
    fn level_is_capped_on_creation() {
        let breathing = Breathing::new(1, BACKLIGHT_LEVELS + 4);
        assert_eq!(breathing.level(), BACKLIGHT_LEVELS);

        let mut breathing = Breathing::new(1, 1);
        assert_eq!(breathing.level(), 1);
        breathing.set_level(u8::MAX);
        assert_eq!(breathing.level(), BACKLIGHT_LEVELS);
    }
}
