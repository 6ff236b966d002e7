//! GPIO allocation and trait adapters
//!
//! Board files assign pins by number, so two functions can end up on the
//! same GPIO. [`GpioAllocator`] catches that before any pin is configured.

use embassy_rp::gpio::{Input, Output};
use strobe_hal::{InputPin, OutputPin};

/// Number of user GPIOs
pub const GPIO_COUNT: u8 = 30;

/// Pin allocation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already claimed by another function
    Conflict {
        pin: u8,
        /// Function that holds the pin
        owner: &'static str,
    },
}

impl AllocError {
    /// The GPIO the error is about
    pub fn pin(&self) -> u8 {
        match *self {
            Self::InvalidPin(pin) | Self::Conflict { pin, .. } => pin,
        }
    }
}

/// Tracks which function owns each GPIO
#[derive(Debug, Clone)]
pub struct GpioAllocator {
    owners: [Option<&'static str>; GPIO_COUNT as usize],
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    pub const fn new() -> Self {
        Self {
            owners: [None; GPIO_COUNT as usize],
        }
    }

    /// Claim one pin for `owner`
    pub fn claim(&mut self, pin: u8, owner: &'static str) -> Result<(), AllocError> {
        let slot = self
            .owners
            .get_mut(pin as usize)
            .ok_or(AllocError::InvalidPin(pin))?;
        if let Some(holder) = *slot {
            return Err(AllocError::Conflict { pin, owner: holder });
        }
        *slot = Some(owner);
        Ok(())
    }

    /// Claim a pin that a board may leave unwired
    pub fn claim_optional(&mut self, pin: Option<u8>, owner: &'static str) -> Result<(), AllocError> {
        match pin {
            Some(pin) => self.claim(pin, owner),
            None => Ok(()),
        }
    }

    /// Claim `count` consecutive pins starting at `base`
    ///
    /// Either the whole range is claimed or nothing is.
    pub fn claim_range(&mut self, base: u8, count: u8, owner: &'static str) -> Result<(), AllocError> {
        let end = base as u16 + count as u16;
        if end > GPIO_COUNT as u16 {
            return Err(AllocError::InvalidPin(end.saturating_sub(1) as u8));
        }
        for pin in base..base + count {
            if let Some(holder) = self.owners[pin as usize] {
                return Err(AllocError::Conflict { pin, owner: holder });
            }
        }
        for pin in base..base + count {
            self.owners[pin as usize] = Some(owner);
        }
        Ok(())
    }

    /// Function holding `pin`, if any
    pub fn owner(&self, pin: u8) -> Option<&'static str> {
        self.owners.get(pin as usize).copied().flatten()
    }

    pub fn is_claimed(&self, pin: u8) -> bool {
        self.owner(pin).is_some()
    }
}

/// Output line that may be unwired on a board
///
/// An unwired line discards writes and reads back low.
pub struct RpOutput<'d>(Option<Output<'d>>);

impl<'d> RpOutput<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self(Some(pin))
    }

    pub fn unwired() -> Self {
        Self(None)
    }

    pub fn from_option(pin: Option<Output<'d>>) -> Self {
        Self(pin)
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        if let Some(pin) = &mut self.0 {
            pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if let Some(pin) = &mut self.0 {
            pin.set_low();
        }
    }

    fn is_set_high(&self) -> bool {
        self.0.as_ref().is_some_and(|pin| pin.is_set_high())
    }
}

/// Input line that may be unwired on a board
///
/// An unwired line reads high, the idle level of the active-low touch IRQ.
pub struct RpInput<'d>(Option<Input<'d>>);

impl<'d> RpInput<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self(Some(pin))
    }

    pub fn unwired() -> Self {
        Self(None)
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.0.as_ref().map_or(true, |pin| pin.is_high())
    }
}
