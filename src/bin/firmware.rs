//! Backlight firmware for an nRF52832 board
//!
//! Drives three active-low backlight pins with software PWM. Each press of the
//! button cycles the backlight between off, full brightness and breathing.

#![no_std]
#![no_main]

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use debouncr::{debounce_2, Edge};
use embassy_executor::Spawner;
use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    gpio::{AnyPin, Flex, Input, Level, Output, OutputDrive, Pin as _, Pull},
    peripherals::{P0_13, P0_15},
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Ticker, Timer};

// Crate
use keyboard_backlight::{
    breathing::{Breathing, TICK_HZ},
    config::{BACKLIGHT_LEVELS, BREATHING_PERIOD},
    lightness::{cie_lightness, scale_level},
    peripherals::backlight::{ActiveLow, Backlight, PinList},
};

type BoardBacklight = Backlight<PinList<Flex<'static, AnyPin>, 3>, ActiveLow>;

/// One software PWM period in µs, equal to one breathing tick.
const PWM_PERIOD_US: u64 = 1_000_000 / TICK_HZ as u64;

// Communication channels
static NEXT_MODE: Signal<ThreadModeRawMutex, ()> = Signal::new();

#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
enum Mode {
    Off,
    On,
    Breathing,
}

impl Mode {
    fn next(self) -> Self {
        match self {
            Mode::Off => Mode::On,
            Mode::On => Mode::Breathing,
            Mode::Breathing => Mode::Off,
        }
    }
}

/// Board configuration: both clocks from the external crystals, DC/DC
/// regulator on, debugger allowed
fn board_config() -> Config {
    let mut config = Config::default();
    config.hfclk_source = HfclkSource::ExternalXtal;
    config.lfclk_source = LfclkSource::ExternalXtal;
    config.dcdc.reg1 = true;
    config.debug = Debug::Allowed;
    config
}

/// Samples the button every 10ms and requests the next mode on each press
#[embassy_executor::task(pool_size = 1)]
async fn watch_button(mut enable: Output<'static, P0_15>, button: Input<'static, P0_13>) {
    let mut debounce = debounce_2(false);
    let mut sample = Ticker::every(Duration::from_millis(10));
    loop {
        // The button only reads while P0.15 is high and draws 34µA meanwhile,
        // so it is powered for the duration of one sample
        enable.set_high();
        Timer::after_micros(1).await;
        let pressed = button.is_high();
        enable.set_low();

        if debounce.update(pressed) == Some(Edge::Rising) {
            NEXT_MODE.signal(());
        }

        sample.next().await;
    }
}

/// Software PWM on the backlight pins, one period per breathing tick
#[embassy_executor::task(pool_size = 1)]
async fn drive_backlight(mut backlight: BoardBacklight) {
    let mut mode = Mode::Off;
    let mut breathing = Breathing::new(BREATHING_PERIOD, BACKLIGHT_LEVELS);
    let full = cie_lightness(scale_level(u16::MAX, BACKLIGHT_LEVELS, BACKLIGHT_LEVELS));
    let mut tick = Ticker::every(Duration::from_micros(PWM_PERIOD_US));

    loop {
        if NEXT_MODE.try_take().is_some() {
            mode = mode.next();
            defmt::info!("Backlight mode: {}", mode);
            match mode {
                Mode::Breathing => breathing.start(),
                _ => breathing.stop(),
            }
        }

        let duty = match mode {
            Mode::Off => 0,
            Mode::On => full,
            Mode::Breathing => breathing.tick().unwrap_or(0),
        };

        // Lit for the duty share of the period, dark for the rest
        let on_us = u64::from(duty) * PWM_PERIOD_US / u64::from(u16::MAX);
        if on_us > 0 {
            unwrap!(backlight.all_on());
            Timer::after_micros(on_us).await;
        }
        if on_us < PWM_PERIOD_US {
            unwrap!(backlight.all_off());
        }

        tick.next().await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(board_config());
    defmt::info!("Initializing");

    // Initialize backlight: P0.14, P0.22 and P0.23, each switching one LED driver
    let pins = PinList::new([
        Flex::new(p.P0_14.degrade()),
        Flex::new(p.P0_22.degrade()),
        Flex::new(p.P0_23.degrade()),
    ]);
    let backlight = unwrap!(BoardBacklight::init(pins));

    // Initialize button
    let button = Input::new(p.P0_13, Pull::None);
    let btn_enable = Output::new(p.P0_15, Level::Low, OutputDrive::Standard);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(watch_button(btn_enable, button)));
    unwrap!(spawner.spawn(drive_backlight(backlight)));
}
