//! RP2040 HAL for the Strobe display stack
//!
//! This crate provides RP2040 implementations of the `strobe-hal` traits,
//! plus RP2040-specific functionality:
//!
//! - PIO-driven 8080 bus with DMA or FIFO feeding
//! - PIO clock divider math
//! - GPIO allocation and pin-conflict checks for config-driven setup
//! - Adapters from embassy-rp GPIO and I2C to the `strobe-hal` traits

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod i80;
pub mod pins;
pub mod pio;

pub use i80::{BusStrategy, PioBus};
