//! Panel and touch controller implementations
//!
//! This crate provides concrete implementations of the operation sets
//! defined in strobe-core:
//!
//! - Panel profiles (ILI9488, ST7789, ILI9806, R61581, ST6201, 1P5623)
//! - Touch backends (FT6236, GT911, NS2009, TSC2007)

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod panel;
pub mod touch;
