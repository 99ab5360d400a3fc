//! Breathing table baked by the build script.
//!
//! The table is a `static`, so the linker keeps it in flash next to the code.

include!(concat!(env!("OUT_DIR"), "/breathing_table.rs"));

/// Read one table entry. `index` must be below [`super::STEPS`].
#[inline]
pub(super) fn read(index: usize) -> u8 {
    BREATHING_TABLE[index]
}
