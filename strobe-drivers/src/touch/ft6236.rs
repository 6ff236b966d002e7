//! FocalTech FT6236 capacitive controller
//!
//! Registers are read-only in normal operating mode; bring-up is the reset
//! pulse plus a presence check.

use strobe_core::touch::{Axis, Direction, TouchBackend, TouchError, TouchProfile};
use strobe_hal::I2cBus;

use super::bus_error;

const ADDRESS: u8 = 0x38;

const REG_TD_STATUS: u8 = 0x02;
const REG_P1_XH: u8 = 0x03;
const REG_P1_YH: u8 = 0x05;

/// Touch count in the low nibble of TD_STATUS
const TOUCH_COUNT_MASK: u8 = 0x0F;
/// Upper bits of XH/YH carry event flags, not coordinate
const COORD_HIGH_MASK: u8 = 0x0F;

pub struct Ft6236<I2C> {
    i2c: I2C,
    profile: TouchProfile,
}

impl<I2C: I2cBus> Ft6236<I2C> {
    /// Controller reporting in a `x_res` by `y_res` coordinate space
    pub fn new(i2c: I2C, x_res: u16, y_res: u16) -> Self {
        Self {
            i2c,
            profile: TouchProfile::new("ft6236", ADDRESS, x_res, y_res)
                .with_mounting(Direction::SWITCH_XY.union(Direction::INVERT_Y)),
        }
    }

    fn read<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], TouchError> {
        let mut buf = [0; N];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut buf)
            .map_err(bus_error)?;
        Ok(buf)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2cBus> TouchBackend for Ft6236<I2C> {
    fn profile(&self) -> &TouchProfile {
        &self.profile
    }

    fn init(&mut self) -> Result<(), TouchError> {
        let [status] = self.read::<1>(REG_TD_STATUS)?;
        debug!("ft6236 status {=u8:#x}", status);
        Ok(())
    }

    fn is_pressed(&mut self) -> Result<bool, TouchError> {
        let [status] = self.read::<1>(REG_TD_STATUS)?;
        Ok(status & TOUCH_COUNT_MASK > 0)
    }

    fn read_raw(&mut self, axis: Axis) -> Result<u16, TouchError> {
        let reg = match axis {
            Axis::X => REG_P1_XH,
            Axis::Y => REG_P1_YH,
        };
        let [hi, lo] = self.read::<2>(reg)?;
        Ok(u16::from_be_bytes([hi & COORD_HIGH_MASK, lo]))
    }
}
