//! Driver cores and per-chip variant descriptors
//!
//! This crate provides the two generic driver engines built on
//! glint-core, plus descriptors for the chips they have been used with:
//!
//! - Display core: panel bring-up, orientation and byte-order control,
//!   windowed pixel writes (ST7789, ILI9341, GC9A01 descriptors)
//! - Touch core: chip identification, configuration, report polling
//!   (FT6x36, CST816, GT911 descriptors)
//!
//! One concrete driver type per role, parameterized by data: adding a chip
//! means adding a descriptor, not a driver.

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod touch;

#[cfg(test)]
mod testutil;
