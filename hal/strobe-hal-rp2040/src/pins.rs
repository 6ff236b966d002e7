//! Pins by number for config-driven setup
//!
//! The board file names GPIOs by number. [`PinBank`] holds every freely
//! assignable GPIO as an `AnyPin` so the firmware can take them at runtime.
//! The touch I2C pins are handed out typed instead, since the I2C driver
//! needs to know at compile time which peripheral a pin can serve.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{DMA_CH0, I2C1, PIN_26, PIN_27, PIO0};
use embassy_rp::{Peri, Peripherals};

use crate::gpio::GPIO_COUNT;

/// GPIO wired to I2C1 SDA on supported boards
pub const I2C_SDA_PIN: u8 = 26;
/// GPIO wired to I2C1 SCL on supported boards
pub const I2C_SCL_PIN: u8 = 27;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Pin already taken
    AlreadyTaken(u8),
    /// Pin reserved for the touch I2C bus
    Reserved(u8),
}

/// Every assignable GPIO, taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

/// Peripherals the display and touch stack needs besides loose GPIOs
pub struct BoardPeripherals {
    pub pio0: Peri<'static, PIO0>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
    pub i2c1: Peri<'static, I2C1>,
    pub i2c_sda: Peri<'static, PIN_26>,
    pub i2c_scl: Peri<'static, PIN_27>,
}

impl PinBank {
    /// Split the chip peripherals into the pin bank and the typed rest
    pub fn from_peripherals(p: Peripherals) -> (Self, BoardPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                None,
                None,
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let rest = BoardPeripherals {
            pio0: p.PIO0,
            dma_ch0: p.DMA_CH0,
            i2c1: p.I2C1,
            i2c_sda: p.PIN_26,
            i2c_scl: p.PIN_27,
        };
        (bank, rest)
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin == I2C_SDA_PIN || pin == I2C_SCL_PIN {
            return Err(PinError::Reserved(pin));
        }
        self.pins
            .get_mut(pin as usize)
            .ok_or(PinError::InvalidPin(pin))?
            .take()
            .ok_or(PinError::AlreadyTaken(pin))
    }

    /// Take a pin the board may leave unwired
    pub fn take_optional(&mut self, pin: Option<u8>) -> Result<Option<Peri<'static, AnyPin>>, PinError> {
        pin.map(|pin| self.take(pin)).transpose()
    }

    /// Take `N` consecutive pins starting at `base`
    pub fn take_range<const N: usize>(
        &mut self,
        base: u8,
        count: u8,
    ) -> Result<heapless::Vec<Peri<'static, AnyPin>, N>, PinError> {
        let mut pins = heapless::Vec::new();
        for pin in base..base.saturating_add(count) {
            let taken = self.take(pin)?;
            pins.push(taken).map_err(|_| PinError::InvalidPin(pin))?;
        }
        Ok(pins)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin: u8) -> bool {
        self.pins.get(pin as usize).is_some_and(Option::is_some)
    }
}
