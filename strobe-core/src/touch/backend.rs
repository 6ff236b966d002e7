//! Touch controller backends

use embedded_hal::delay::DelayNs;
use strobe_hal::i2c::I2cConfig;
use strobe_hal::OutputPin;

use super::{Axis, Direction, TouchError};

/// Reset pulse phase length
pub const TOUCH_RESET_PHASE_MS: u32 = 10;

/// Static description of a touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchProfile {
    pub name: &'static str,
    /// 7-bit I2C address
    pub address: u8,
    pub i2c: I2cConfig,
    /// Native sample range of the X axis
    pub x_res: u16,
    /// Native sample range of the Y axis
    pub y_res: u16,
    /// Added to raw X samples before inversion
    pub x_offs: i16,
    /// Added to raw Y samples before inversion
    pub y_offs: i16,
    /// ADC sample width, for resistive controllers
    pub precision_bits: u8,
    /// Orientation the controller is mounted in on the reference board
    pub mounting: Direction,
}

impl TouchProfile {
    pub const fn new(name: &'static str, address: u8, x_res: u16, y_res: u16) -> Self {
        Self {
            name,
            address,
            i2c: I2cConfig::FAST,
            x_res,
            y_res,
            x_offs: 0,
            y_offs: 0,
            precision_bits: 12,
            mounting: Direction::NONE,
        }
    }

    pub const fn with_offsets(mut self, x_offs: i16, y_offs: i16) -> Self {
        self.x_offs = x_offs;
        self.y_offs = y_offs;
        self
    }

    pub const fn with_precision(mut self, bits: u8) -> Self {
        self.precision_bits = bits;
        self
    }

    pub const fn with_mounting(mut self, mounting: Direction) -> Self {
        self.mounting = mounting;
        self
    }

    pub const fn resolution(&self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.x_res,
            Axis::Y => self.y_res,
        }
    }

    pub const fn offset(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x_offs,
            Axis::Y => self.y_offs,
        }
    }
}

/// Hold RST high, low, then high again
pub fn reset_pulse<P: OutputPin, D: DelayNs>(reset: &mut P, delay: &mut D) {
    reset.set_high();
    delay.delay_ms(TOUCH_RESET_PHASE_MS);
    reset.set_low();
    delay.delay_ms(TOUCH_RESET_PHASE_MS);
    reset.set_high();
    delay.delay_ms(TOUCH_RESET_PHASE_MS);
}

/// One touch controller chip
///
/// Samples are returned per physical axis in the controller's native
/// resolution; orientation and scaling are applied by the device.
pub trait TouchBackend {
    fn profile(&self) -> &TouchProfile;

    /// Controller bring-up after reset
    fn init(&mut self) -> Result<(), TouchError>;

    /// Hardware reset through the RST line
    fn reset<P: OutputPin, D: DelayNs>(
        &mut self,
        pin: &mut P,
        delay: &mut D,
    ) -> Result<(), TouchError> {
        reset_pulse(pin, delay);
        Ok(())
    }

    /// Whether a finger or pen is down right now
    fn is_pressed(&mut self) -> Result<bool, TouchError>;

    /// Raw sample of one physical axis
    fn read_raw(&mut self, axis: Axis) -> Result<u16, TouchError>;
}
