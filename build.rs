//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and bakes the breathing table.

use std::{
    env,
    fs::File,
    io::Write,
    path::PathBuf,
};

#[allow(dead_code)]
#[path = "src/breathing/waveform.rs"]
mod waveform;

use waveform::Waveform;

/// Curve shape selector, 0-4.
const CURVE_VAR: &str = "BACKLIGHT_BREATHING_CURVE";
/// Fraction of full brightness the breathing wave swings through, 0.0-1.0.
const DEPTH_VAR: &str = "BACKLIGHT_BREATHING_DEPTH";

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    let selector = match env::var(CURVE_VAR) {
        Ok(value) => value.trim().parse::<u8>().unwrap_or_else(|_| {
            panic!("{CURVE_VAR} must be a curve selector between 0 and 4, got {value:?}")
        }),
        Err(_) => 0,
    };
    let waveform = Waveform::from_selector(selector).unwrap_or_else(|| {
        panic!(
            "{CURVE_VAR} = {selector} is not a breathing curve. Use 0 (sine^4), 1 (sine), \
             2 (sawtooth), 3 (triangle) or 4 (trapezoid)"
        )
    });

    let depth = match env::var(DEPTH_VAR) {
        Ok(value) => value.trim().parse::<f64>().unwrap_or_else(|_| {
            panic!("{DEPTH_VAR} must be a number between 0.0 and 1.0, got {value:?}")
        }),
        Err(_) => 1.0,
    };
    if !(0.0..=1.0).contains(&depth) {
        panic!("{DEPTH_VAR} = {depth} is out of range, expected 0.0 to 1.0");
    }

    // Bake the selected breathing curve into the firmware
    let table = waveform::generate(waveform, depth);
    let values = table
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    File::create(out.join("breathing_table.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "// {waveform:?} wave, depth {depth:?}\n\
             pub(crate) const CURVE: u8 = {selector};\n\
             pub(crate) const DEPTH: f64 = {depth:?};\n\
             pub(crate) static BREATHING_TABLE: [u8; {steps}] = [{values}];\n",
            steps = waveform::STEPS,
        ))
        .unwrap();

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=src/breathing/waveform.rs");
    println!("cargo:rerun-if-env-changed={CURVE_VAR}");
    println!("cargo:rerun-if-env-changed={DEPTH_VAR}");
}
