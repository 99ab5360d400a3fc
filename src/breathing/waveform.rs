//! Breathing waveform shapes
//!
//! This file is also compiled into the build script, which bakes the selected
//! waveform into the breathing table. It must only depend on `core` and `libm`.

use core::f64::consts::PI;

/// Samples in one breathing period.
pub const STEPS: usize = 128;

/// Shape of one breathing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Half sine wave to the fourth power: slow start and end, fast middle.
    SineFourth = 0,
    /// Plain sinusoidal wave.
    Sine = 1,
    /// Linear ramp up, instant reset.
    Sawtooth = 2,
    /// Linear ramp up, linear ramp down.
    Triangle = 3,
    /// Ramp up, plateau at max, ramp down, plateau at min.
    Trapezoid = 4,
}

impl Waveform {
    /// Map a numeric curve selector (0-4) to a waveform.
    pub const fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(Waveform::SineFourth),
            1 => Some(Waveform::Sine),
            2 => Some(Waveform::Sawtooth),
            3 => Some(Waveform::Triangle),
            4 => Some(Waveform::Trapezoid),
            _ => None,
        }
    }

    /// Normalized sample (0.0 to 1.0) at step `x` of the period.
    pub fn sample(self, x: usize) -> f64 {
        let x = x as f64;
        match self {
            Waveform::SineFourth => libm::pow(libm::sin(PI * x / 127.0), 4.0),
            Waveform::Sine => libm::cos(PI * (1.0 + 2.0 * x / 127.0)) / 2.0 + 0.5,
            Waveform::Sawtooth => x / 127.0,
            Waveform::Triangle => libm::fmin(x, 128.0 - x) / 64.0,
            Waveform::Trapezoid => {
                libm::fmin(1.0, libm::fmax(0.0, libm::fmin(x, 128.0 - x) / 32.0 - 0.5))
            }
        }
    }
}

/// Quantize a normalized sample to a table byte.
///
/// The sample is first rounded to three decimals, ties to even, which is the
/// precision the published breathing tables were printed with. A `depth` below
/// 1.0 lifts the whole wave toward full brightness, so the minimum of the wave
/// sits at `255 * (1 - depth)` instead of zero.
pub fn quantize(sample: f64, depth: f64) -> u8 {
    let sample = libm::rint(sample * 1000.0) / 1000.0;
    let value = 255.0 * ((1.0 - depth) + depth * sample);
    libm::floor(libm::fmin(255.0, libm::fmax(0.0, value)) + 0.5) as u8
}

/// Generate one full period of `waveform` at the given depth.
pub fn generate(waveform: Waveform, depth: f64) -> [u8; STEPS] {
    let mut table = [0; STEPS];
    for (x, value) in table.iter_mut().enumerate() {
        *value = quantize(waveform.sample(x), depth);
    }
    table
}
