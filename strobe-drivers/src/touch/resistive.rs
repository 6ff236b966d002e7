//! NS2009 / TSC2007 resistive touch ADCs
//!
//! Both chips share the TSC2007 command set: one command byte selects the
//! measurement and the conversion result is read back as 8 or 12 bits. Pen
//! contact pulls the PENIRQ line low.

use strobe_core::touch::{Axis, Direction, TouchBackend, TouchError, TouchProfile};
use strobe_hal::{I2cBus, InputPin};

use super::bus_error;

const ADDRESS: u8 = 0x48;

const CMD_MEASURE_X: u8 = 0xC0;
const CMD_MEASURE_Y: u8 = 0xD0;

pub struct Resistive<I2C, IRQ> {
    i2c: I2C,
    irq: IRQ,
    profile: TouchProfile,
}

impl<I2C: I2cBus, IRQ: InputPin> Resistive<I2C, IRQ> {
    /// NS2009 scaled to a `x_res` by `y_res` coordinate space
    pub fn ns2009(i2c: I2C, irq: IRQ, x_res: u16, y_res: u16) -> Self {
        let profile = TouchProfile::new("ns2009", ADDRESS, x_res, y_res)
            .with_precision(8)
            .with_mounting(Direction::INVERT_Y);
        Self { i2c, irq, profile }
    }

    /// TSC2007 on the reference 3.5" panel
    ///
    /// Usable contact range is 25..435 by 25..300 ADC counts.
    pub fn tsc2007(i2c: I2C, irq: IRQ) -> Self {
        let profile = TouchProfile::new("tsc2007", ADDRESS, 410, 275)
            .with_offsets(-25, -25)
            .with_precision(8)
            .with_mounting(
                Direction::SWITCH_XY
                    .union(Direction::INVERT_Y)
                    .union(Direction::INVERT_X),
            );
        Self { i2c, irq, profile }
    }

    /// Replace the profile, e.g. for a panel with a different contact range
    pub fn with_profile(mut self, profile: TouchProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Run one conversion and return the ADC count
    ///
    /// An 8-bit sample is the first byte of the 12-bit result.
    fn convert(&mut self, command: u8) -> Result<u16, TouchError> {
        let mut buf = [0u8; 2];
        if self.profile.precision_bits <= 8 {
            self.i2c
                .write_read(ADDRESS, &[command], &mut buf[..1])
                .map_err(bus_error)?;
            Ok(buf[0] as u16)
        } else {
            self.i2c
                .write_read(ADDRESS, &[command], &mut buf)
                .map_err(bus_error)?;
            Ok(((buf[0] as u16) << 4) | (buf[1] as u16 >> 4))
        }
    }

    pub fn release(self) -> (I2C, IRQ) {
        (self.i2c, self.irq)
    }
}

impl<I2C: I2cBus, IRQ: InputPin> TouchBackend for Resistive<I2C, IRQ> {
    fn profile(&self) -> &TouchProfile {
        &self.profile
    }

    fn init(&mut self) -> Result<(), TouchError> {
        // A throwaway conversion confirms the ADC answers at its address
        let sample = self.convert(CMD_MEASURE_X)?;
        trace!("{} idle sample {}", self.profile.name, sample);
        Ok(())
    }

    fn is_pressed(&mut self) -> Result<bool, TouchError> {
        Ok(self.irq.is_low())
    }

    /// ADC count scaled onto the native resolution of the axis
    fn read_raw(&mut self, axis: Axis) -> Result<u16, TouchError> {
        let command = match axis {
            Axis::X => CMD_MEASURE_X,
            Axis::Y => CMD_MEASURE_Y,
        };
        let count = self.convert(command)? as u32;
        let res = self.profile.resolution(axis) as u32;
        let bits = self.profile.precision_bits.min(12) as u32;
        Ok(((count * res) >> bits) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{Irq, MockI2c};
    use super::*;

    fn i2c() -> MockI2c {
        MockI2c::new(ADDRESS, 1)
    }

    #[test]
    fn test_pen_irq_active_low() {
        let mut touch = Resistive::ns2009(i2c(), Irq(true), 480, 320);
        assert!(!touch.is_pressed().unwrap());

        let mut touch = Resistive::ns2009(i2c(), Irq(false), 480, 320);
        assert!(touch.is_pressed().unwrap());
    }

    #[test]
    fn test_8bit_sample_scaled_to_resolution() {
        let mut bus = i2c();
        bus.set(CMD_MEASURE_X.into(), &[0x80]);
        bus.set(CMD_MEASURE_Y.into(), &[0x40]);
        let mut touch = Resistive::ns2009(bus, Irq(false), 480, 320);

        assert_eq!(touch.read_raw(Axis::X).unwrap(), 240);
        assert_eq!(touch.read_raw(Axis::Y).unwrap(), 80);
    }

    #[test]
    fn test_12bit_sample() {
        let mut bus = i2c();
        bus.set(CMD_MEASURE_X.into(), &[0x80, 0x00]);
        let profile = TouchProfile::new("ns2009", ADDRESS, 4096, 4096);
        let mut touch = Resistive::ns2009(bus, Irq(false), 0, 0).with_profile(profile);

        assert_eq!(touch.read_raw(Axis::X).unwrap(), 0x800);
    }

    #[test]
    fn test_tsc2007_profile() {
        let touch = Resistive::tsc2007(i2c(), Irq(true));
        let profile = touch.profile();

        assert_eq!((profile.x_res, profile.y_res), (410, 275));
        assert_eq!((profile.x_offs, profile.y_offs), (-25, -25));
        assert_eq!(
            profile.mounting,
            Direction::SWITCH_XY | Direction::INVERT_X | Direction::INVERT_Y
        );
    }

    #[test]
    fn test_init_detects_missing_chip() {
        let mut touch = Resistive::tsc2007(MockI2c::new(0x49, 1), Irq(true));
        assert_eq!(touch.init(), Err(TouchError::Bus));
    }
}
