//! Perceptual brightness correction
//!
//! The eye responds to light roughly with the cube root of its intensity, so a
//! linear ramp of PWM duty cycles looks like it jumps at the low end. Passing
//! the linear value through [`cie_lightness`] before it reaches the PWM makes
//! equal steps look equal.
//!
//! See <http://jared.geek.nz/2013/feb/linear-led-pwm>.

/// Below this input (8% of full scale) the curve is linear.
const LINEAR_LIMIT: u16 = 5243;
/// 16% of full scale.
const OFFSET: u32 = 10486;

/// Map a linear brightness to a PWM duty cycle using a cubic approximation of
/// the CIE 1931 lightness curve.
///
/// Both sides of the split at 5243 are kept exactly as the integer formulas
/// give them: the linear side ends at 582 and the cubic side starts at 549.
pub const fn cie_lightness(v: u16) -> u16 {
    if v <= LINEAR_LIMIT {
        // Same as dividing by 900%
        return v / 9;
    }

    // Shift left before dividing so the integer ratio keeps 8 bits of
    // precision, then undo the shift after cubing.
    let y = ((v as u32 + OFFSET) << 8) / (OFFSET + u16::MAX as u32);
    let y = (y * y * y) >> 8;
    if y > u16::MAX as u32 {
        u16::MAX
    } else {
        y as u16
    }
}

/// Scale a full range value down to `level` out of `levels`.
///
/// Levels above `levels` are treated as `levels`; zero levels yield zero.
pub const fn scale_level(v: u16, level: u8, levels: u8) -> u16 {
    if levels == 0 {
        return 0;
    }
    let level = if level > levels { levels } else { level };
    v / levels as u16 * level as u16
}
