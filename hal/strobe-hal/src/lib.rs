//! Strobe Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display and touch stack is
//! written against. Chip-specific crates (RP2040 today) implement them, and
//! the core logic never names a concrete peripheral.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  strobe-firmware (tasks, boot probe)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  strobe-core  │◄──────│strobe-drivers │
//! └───────────────┘       └───────────────┘
//!         │
//!         ▼
//! ┌─────────────────────────────────────────┐
//! │  strobe-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  strobe-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations (touch controllers)
//! - [`bus::BusTransport`] - 8080 parallel bus writes (panels)

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use bus::{BusData, BusTransport, BusWidth, Phase, WireWords};
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
