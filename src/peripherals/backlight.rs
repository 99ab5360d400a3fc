//! Backlight control
//!
//! The backlight LEDs sit behind one or more GPIO lines, each switching a LED
//! driver. The lines are grouped in a [`PinSet`], either a [`SinglePin`] or a
//! [`PinList`], and always switched together. Whether a high or a low signal
//! lights the LEDs is fixed by the [`Polarity`] type parameter.
//!
//! Brightness is produced outside this module by toggling the whole set with a
//! PWM timer, see [`crate::lightness`] and [`crate::breathing`].

use core::marker::PhantomData;

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

use crate::config::DefaultPolarity;

/// A GPIO line that can drive a backlight.
pub trait BacklightPin: OutputPin {
    /// Switch the line to push-pull output.
    ///
    /// Pin types that are outputs by construction keep the default, which does
    /// nothing.
    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Electrical level that lights the backlight.
pub trait Polarity {
    /// Level for "on".
    const ON: PinState;
    /// Level for "off".
    const OFF: PinState = match Self::ON {
        PinState::High => PinState::Low,
        PinState::Low => PinState::High,
    };
}

/// The LED driver turns on with a high signal.
#[derive(Debug, Clone, Copy)]
pub struct ActiveHigh;

impl Polarity for ActiveHigh {
    const ON: PinState = PinState::High;
}

/// The LED driver turns on with a low signal.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLow;

impl Polarity for ActiveLow {
    const ON: PinState = PinState::Low;
}

/// A fixed group of backlight pins switched together.
pub trait PinSet {
    /// Pin type of the set.
    type Pin: BacklightPin;

    /// Number of pins driven.
    fn pin_count(&self) -> usize;

    /// The driven pins, in configuration order.
    fn pins_mut(&mut self) -> &mut [Self::Pin];
}

/// Error of the pins in set `S`.
pub type PinError<S> = <<S as PinSet>::Pin as ErrorType>::Error;

/// A backlight behind exactly one pin.
#[derive(Debug)]
pub struct SinglePin<P> {
    pin: P,
}

impl<P> SinglePin<P> {
    /// Drive the backlight through `pin` alone.
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: BacklightPin> PinSet for SinglePin<P> {
    type Pin = P;

    fn pin_count(&self) -> usize {
        1
    }

    fn pins_mut(&mut self) -> &mut [P] {
        core::slice::from_mut(&mut self.pin)
    }
}

/// A backlight behind a fixed list of pins.
///
/// By default every pin of the array is driven. [`PinList::with_count`]
/// restricts the backlight to a prefix of the array.
#[derive(Debug)]
pub struct PinList<P, const N: usize> {
    pins: [P; N],
    count: usize,
}

impl<P, const N: usize> PinList<P, N> {
    const NOT_EMPTY: () = assert!(N > 0, "backlight pin list is empty, configure at least one pin");

    /// Drive all `N` pins.
    ///
    /// An empty list is rejected at compile time:
    ///
    /// ```compile_fail
    /// use keyboard_backlight::peripherals::backlight::PinList;
    ///
    /// let pins: PinList<u8, 0> = PinList::new([]);
    /// ```
    pub fn new(pins: [P; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NOT_EMPTY;
        Self { pins, count: N }
    }

    /// Drive only the first `COUNT` pins of the array.
    ///
    /// `COUNT` must be between 1 and `N`, which is checked at compile time:
    ///
    /// ```compile_fail
    /// use keyboard_backlight::peripherals::backlight::PinList;
    ///
    /// let pins: PinList<u8, 2> = PinList::with_count::<3>([1, 2]);
    /// ```
    pub fn with_count<const COUNT: usize>(pins: [P; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = CountOverride::<N, COUNT>::VALID;
        Self { pins, count: COUNT }
    }

    /// Give the pins back, including any beyond the count override.
    pub fn release(self) -> [P; N] {
        self.pins
    }
}

impl<P: BacklightPin, const N: usize> PinSet for PinList<P, N> {
    type Pin = P;

    fn pin_count(&self) -> usize {
        self.count
    }

    fn pins_mut(&mut self) -> &mut [P] {
        &mut self.pins[..self.count]
    }
}

struct CountOverride<const N: usize, const COUNT: usize>;

impl<const N: usize, const COUNT: usize> CountOverride<N, COUNT> {
    const VALID: () = assert!(
        COUNT > 0 && COUNT <= N,
        "backlight pin count must be between 1 and the length of the pin list"
    );
}

/// Backlight driver errors, generic over the pin error `E`.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Writing a backlight pin failed.
    #[error("failed to drive backlight pin: {0:?}")]
    Pin(E),
}

/// Control the backlight.
///
/// Only obtainable through [`Backlight::init`], so the pins are always
/// configured and off before anything else touches them.
pub struct Backlight<S, P = DefaultPolarity> {
    pins: S,
    /// Last state commanded, true if lit.
    on: bool,
    _polarity: PhantomData<P>,
}

impl<S: PinSet, P: Polarity> Backlight<S, P> {
    /// Configure every pin of the set as output and switch it off.
    pub fn init(mut pins: S) -> Result<Self, Error<PinError<S>>> {
        for pin in pins.pins_mut() {
            pin.set_as_output().map_err(Error::Pin)?;
            pin.set_state(P::OFF).map_err(Error::Pin)?;
        }
        debug!("Backlight initialized on {} pins", pins.pin_count());

        Ok(Self {
            pins,
            on: false,
            _polarity: PhantomData,
        })
    }

    /// Light every pin of the set.
    pub fn all_on(&mut self) -> Result<(), Error<PinError<S>>> {
        self.drive(P::ON)?;
        self.on = true;
        Ok(())
    }

    /// Darken every pin of the set.
    pub fn all_off(&mut self) -> Result<(), Error<PinError<S>>> {
        self.drive(P::OFF)?;
        self.on = false;
        Ok(())
    }

    /// Whether the last command switched the backlight on.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Number of pins driven.
    pub fn pin_count(&self) -> usize {
        self.pins.pin_count()
    }

    /// Hand the pin set back, leaving the pins in their current state.
    pub fn release(self) -> S {
        self.pins
    }

    fn drive(&mut self, state: PinState) -> Result<(), Error<PinError<S>>> {
        trace!("Backlight {}", state == P::ON);
        for pin in self.pins.pins_mut() {
            pin.set_state(state).map_err(Error::Pin)?;
        }
        Ok(())
    }
}

#[cfg(feature = "firmware")]
mod nrf {
    use embassy_nrf::gpio::{Flex, Output, OutputDrive, Pin};

    use super::BacklightPin;

    impl<'d, T: Pin> BacklightPin for Output<'d, T> {}

    impl<'d, T: Pin> BacklightPin for Flex<'d, T> {
        fn set_as_output(&mut self) -> Result<(), Self::Error> {
            Flex::set_as_output(self, OutputDrive::Standard);
            Ok(())
        }
    }
}
