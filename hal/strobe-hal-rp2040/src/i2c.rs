//! Blocking I2C master adapter
//!
//! Touch controllers are polled from a task at a few tens of hertz, so the
//! blocking embassy-rp driver is enough.

use embassy_rp::i2c::{Blocking, Config, Error, I2c, Instance, SclPin, SdaPin};
use embassy_rp::Peri;
use strobe_hal::i2c::I2cConfig;
use strobe_hal::I2cBus;

pub struct RpI2c<'d, T: Instance> {
    i2c: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> RpI2c<'d, T> {
    pub fn new(
        peri: Peri<'d, T>,
        scl: Peri<'d, impl SclPin<T>>,
        sda: Peri<'d, impl SdaPin<T>>,
        config: I2cConfig,
    ) -> Self {
        let mut cfg = Config::default();
        cfg.frequency = config.frequency;
        Self {
            i2c: I2c::new_blocking(peri, scl, sda, cfg),
        }
    }
}

impl<T: Instance> I2cBus for RpI2c<'_, T> {
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.i2c.blocking_write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Error> {
        self.i2c.blocking_read(address, buf)
    }

    fn write_read(&mut self, address: u8, write_data: &[u8], read_buf: &mut [u8]) -> Result<(), Error> {
        self.i2c.blocking_write_read(address, write_data, read_buf)
    }
}
