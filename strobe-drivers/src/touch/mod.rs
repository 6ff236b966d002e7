//! Touch controller backends
//!
//! Capacitive controllers (FT6236, GT911) report their own touch state over
//! I2C. The resistive ADCs (NS2009, TSC2007) only convert on command, and
//! pen-down is signalled on a separate IRQ line.

mod ft6236;
mod gt911;
mod resistive;

pub use ft6236::Ft6236;
pub use gt911::Gt911;
pub use resistive::Resistive;

use embedded_hal::delay::DelayNs;
use strobe_core::touch::{Axis, TouchBackend, TouchError, TouchProfile};
use strobe_hal::{I2cBus, InputPin, OutputPin};

pub(crate) fn bus_error<E>(_: E) -> TouchError {
    error!("touch i2c transfer failed");
    TouchError::Bus
}

/// Touch controller named in the board file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchKind {
    Ft6236,
    Gt911,
    Ns2009,
    Tsc2007,
}

impl TouchKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ft6236" => Some(Self::Ft6236),
            "gt911" => Some(Self::Gt911),
            "ns2009" => Some(Self::Ns2009),
            "tsc2007" => Some(Self::Tsc2007),
            _ => {
                warn!("unknown touch controller");
                None
            }
        }
    }
}

/// Any supported touch controller
///
/// `IRQ` is only sampled by the resistive controllers; `D` is only used by
/// the GT911 soft reset.
pub enum Touch<I2C, IRQ, D> {
    Ft6236(Ft6236<I2C>),
    Gt911(Gt911<I2C, D>),
    Resistive(Resistive<I2C, IRQ>),
}

impl<I2C, IRQ, D> Touch<I2C, IRQ, D>
where
    I2C: I2cBus,
    IRQ: InputPin,
    D: DelayNs,
{
    /// Build the backend for `kind`
    ///
    /// Controllers that report in panel coordinates take the screen size as
    /// their native resolution.
    pub fn new(kind: TouchKind, i2c: I2C, irq: IRQ, delay: D, screen: (u16, u16)) -> Self {
        let (x_res, y_res) = screen;
        match kind {
            TouchKind::Ft6236 => Self::Ft6236(Ft6236::new(i2c, x_res, y_res)),
            TouchKind::Gt911 => Self::Gt911(Gt911::new(i2c, delay, x_res, y_res)),
            TouchKind::Ns2009 => Self::Resistive(Resistive::ns2009(i2c, irq, x_res, y_res)),
            TouchKind::Tsc2007 => Self::Resistive(Resistive::tsc2007(i2c, irq)),
        }
    }
}

impl<I2C, IRQ, D> TouchBackend for Touch<I2C, IRQ, D>
where
    I2C: I2cBus,
    IRQ: InputPin,
    D: DelayNs,
{
    fn profile(&self) -> &TouchProfile {
        match self {
            Self::Ft6236(t) => t.profile(),
            Self::Gt911(t) => t.profile(),
            Self::Resistive(t) => t.profile(),
        }
    }

    fn init(&mut self) -> Result<(), TouchError> {
        match self {
            Self::Ft6236(t) => t.init(),
            Self::Gt911(t) => t.init(),
            Self::Resistive(t) => t.init(),
        }
    }

    fn reset<P: OutputPin, DL: DelayNs>(
        &mut self,
        pin: &mut P,
        delay: &mut DL,
    ) -> Result<(), TouchError> {
        match self {
            Self::Ft6236(t) => t.reset(pin, delay),
            Self::Gt911(t) => t.reset(pin, delay),
            Self::Resistive(t) => t.reset(pin, delay),
        }
    }

    fn is_pressed(&mut self) -> Result<bool, TouchError> {
        match self {
            Self::Ft6236(t) => t.is_pressed(),
            Self::Gt911(t) => t.is_pressed(),
            Self::Resistive(t) => t.is_pressed(),
        }
    }

    fn read_raw(&mut self, axis: Axis) -> Result<u16, TouchError> {
        match self {
            Self::Ft6236(t) => t.read_raw(axis),
            Self::Gt911(t) => t.read_raw(axis),
            Self::Resistive(t) => t.read_raw(axis),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    extern crate std;
    use std::collections::BTreeMap;
    use std::vec::Vec;

    use embedded_hal::delay::DelayNs;
    use strobe_hal::{I2cBus, InputPin};

    /// Register-file I2C device with auto-incrementing addresses
    pub struct MockI2c {
        pub address: u8,
        /// Register address width in bytes (1 or 2)
        pub addr_len: usize,
        pub regs: BTreeMap<u16, u8>,
        /// Every plain write as (register, payload)
        pub writes: Vec<(u16, Vec<u8>)>,
        pub fail: bool,
    }

    impl MockI2c {
        pub fn new(address: u8, addr_len: usize) -> Self {
            Self {
                address,
                addr_len,
                regs: BTreeMap::new(),
                writes: Vec::new(),
                fail: false,
            }
        }

        pub fn set(&mut self, reg: u16, bytes: &[u8]) {
            for (i, b) in bytes.iter().enumerate() {
                self.regs.insert(reg + i as u16, *b);
            }
        }

        fn reg(&self, bytes: &[u8]) -> u16 {
            bytes[..self.addr_len]
                .iter()
                .fold(0u16, |acc, b| (acc << 8) | *b as u16)
        }

        fn check(&self, address: u8) -> Result<(), ()> {
            if self.fail || address != self.address {
                Err(())
            } else {
                Ok(())
            }
        }
    }

    impl I2cBus for MockI2c {
        type Error = ();

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
            self.check(address)?;
            let reg = self.reg(data);
            let payload = data[self.addr_len..].to_vec();
            self.set(reg, &payload);
            self.writes.push((reg, payload));
            Ok(())
        }

        fn read(&mut self, address: u8, _buf: &mut [u8]) -> Result<(), ()> {
            self.check(address)
        }

        fn write_read(&mut self, address: u8, write: &[u8], buf: &mut [u8]) -> Result<(), ()> {
            self.check(address)?;
            let reg = self.reg(write);
            for (i, b) in buf.iter_mut().enumerate() {
                *b = self.regs.get(&(reg + i as u16)).copied().unwrap_or(0);
            }
            Ok(())
        }
    }

    pub struct Irq(pub bool);

    impl InputPin for Irq {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    pub struct CountingDelay {
        pub total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }
}
