//! Goodix GT911 capacitive controller
//!
//! Registers are addressed with 16-bit big-endian addresses; coordinate
//! registers are little-endian. The status register must be written back to
//! zero after every read or the controller stops updating it.

use embedded_hal::delay::DelayNs;
use strobe_core::touch::{Axis, TouchBackend, TouchError, TouchProfile};
use strobe_hal::I2cBus;

use super::bus_error;

const ADDRESS: u8 = 0x14;

const REG_CTRL: u16 = 0x8040;
const REG_CONFIG_VERSION: u16 = 0x8047;
const REG_PRODUCT_ID: u16 = 0x8140;
const REG_STATUS: u16 = 0x814E;
const REG_P1_X: u16 = 0x8150;
const REG_P1_Y: u16 = 0x8152;

const CTRL_SOFT_RESET: u8 = 0x02;
const CTRL_RUN: u8 = 0x00;
const SOFT_RESET_MS: u32 = 10;

const STATUS_BUFFER_READY: u8 = 0x80;
const STATUS_POINT_COUNT: u8 = 0x0F;

const PRODUCT_ID: &[u8] = b"911";

pub struct Gt911<I2C, D> {
    i2c: I2C,
    delay: D,
    profile: TouchProfile,
}

impl<I2C: I2cBus, D: DelayNs> Gt911<I2C, D> {
    /// Controller reporting in a `x_res` by `y_res` coordinate space
    pub fn new(i2c: I2C, delay: D, x_res: u16, y_res: u16) -> Self {
        Self {
            i2c,
            delay,
            profile: TouchProfile::new("gt911", ADDRESS, x_res, y_res),
        }
    }

    fn read<const N: usize>(&mut self, reg: u16) -> Result<[u8; N], TouchError> {
        let mut buf = [0; N];
        self.i2c
            .write_read(ADDRESS, &reg.to_be_bytes(), &mut buf)
            .map_err(bus_error)?;
        Ok(buf)
    }

    fn write(&mut self, reg: u16, value: u8) -> Result<(), TouchError> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c
            .write(ADDRESS, &[hi, lo, value])
            .map_err(bus_error)
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2cBus, D: DelayNs> TouchBackend for Gt911<I2C, D> {
    fn profile(&self) -> &TouchProfile {
        &self.profile
    }

    fn init(&mut self) -> Result<(), TouchError> {
        let id = self.read::<4>(REG_PRODUCT_ID)?;
        if &id[..PRODUCT_ID.len()] != PRODUCT_ID {
            warn!("gt911: unexpected product id {=[u8]:x}", &id[..]);
            return Err(TouchError::NotFound);
        }

        self.write(REG_CTRL, CTRL_SOFT_RESET)?;
        let [version] = self.read::<1>(REG_CONFIG_VERSION)?;
        debug!("gt911 config version {=u8:#x}", version);
        self.delay.delay_ms(SOFT_RESET_MS);
        self.write(REG_CTRL, CTRL_RUN)
    }

    fn is_pressed(&mut self) -> Result<bool, TouchError> {
        let [status] = self.read::<1>(REG_STATUS)?;
        self.write(REG_STATUS, 0)?;
        Ok(status & STATUS_BUFFER_READY != 0 && status & STATUS_POINT_COUNT > 0)
    }

    fn read_raw(&mut self, axis: Axis) -> Result<u16, TouchError> {
        let reg = match axis {
            Axis::X => REG_P1_X,
            Axis::Y => REG_P1_Y,
        };
        Ok(u16::from_le_bytes(self.read::<2>(reg)?))
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{CountingDelay, MockI2c};
    use super::*;

    extern crate std;
    use std::vec;

    fn gt911() -> Gt911<MockI2c, CountingDelay> {
        let mut i2c = MockI2c::new(ADDRESS, 2);
        i2c.set(REG_PRODUCT_ID, b"911\0");
        i2c.set(REG_CONFIG_VERSION, &[0x41]);
        Gt911::new(i2c, CountingDelay::default(), 480, 320)
    }

    #[test]
    fn test_init_soft_resets() {
        let mut touch = gt911();

        touch.init().unwrap();

        let (i2c, delay) = touch.release();
        assert_eq!(
            i2c.writes,
            vec![(REG_CTRL, vec![CTRL_SOFT_RESET]), (REG_CTRL, vec![CTRL_RUN])]
        );
        assert_eq!(delay.total_ms, SOFT_RESET_MS);
    }

    #[test]
    fn test_wrong_product_id() {
        let mut touch = gt911();
        touch.i2c.set(REG_PRODUCT_ID, b"928\0");

        assert_eq!(touch.init(), Err(TouchError::NotFound));
        assert!(touch.i2c.writes.is_empty());
    }

    #[test]
    fn test_status_is_cleared_after_read() {
        let mut touch = gt911();
        touch.i2c.set(REG_STATUS, &[0x81]);

        assert!(touch.is_pressed().unwrap());
        assert_eq!(touch.i2c.regs[&REG_STATUS], 0);
        assert!(!touch.is_pressed().unwrap());
    }

    #[test]
    fn test_ready_without_points_is_release() {
        let mut touch = gt911();
        touch.i2c.set(REG_STATUS, &[0x80]);

        assert!(!touch.is_pressed().unwrap());
    }

    #[test]
    fn test_coordinates_little_endian() {
        let mut touch = gt911();
        touch.i2c.set(REG_P1_X, &[0x2C, 0x01, 0xF0, 0x00]);

        assert_eq!(touch.read_raw(Axis::X).unwrap(), 300);
        assert_eq!(touch.read_raw(Axis::Y).unwrap(), 240);
    }
}
