//! Board-agnostic display and touch logic
//!
//! This crate contains everything between the hardware traits of
//! `strobe-hal` and the firmware tasks:
//!
//! - Panel controller: profiles, register access, the operation set and probe
//! - Flush pipeline: bounded frame queue, worker, completion handshake
//! - Touch device: raw sample transform into screen coordinates
//! - Bit-banged GPIO bus
//! - Board configuration parsing

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod area;
pub mod bus;
pub mod config;
pub mod display;
pub mod error;
pub mod flush;
pub mod touch;

pub use area::Area;
pub use error::ProbeError;
