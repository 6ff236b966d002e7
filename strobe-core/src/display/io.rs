//! Register-level access to a panel
//!
//! [`PanelIo`] owns everything a panel operation touches: the bus transport,
//! the reset/RD/backlight lines, an async delay, and a scratch buffer for
//! register parameters.

use embedded_hal_async::delay::DelayNs;
use strobe_hal::{BusData, BusTransport, BusWidth, OutputPin, Phase};

use super::profile::RegisterWidth;
use super::DisplayError;

/// Size of the register parameter scratch buffer in bytes
///
/// Large enough for the longest gamma table of the supported controllers.
pub const SCRATCH_LEN: usize = 64;

/// Reset pulse phase length
pub const RESET_PHASE_MS: u32 = 10;

/// Control lines besides the bus itself
///
/// CS and RS belong to the bus transport; these are the lines that panel
/// operations drive directly.
pub struct PanelPins<P> {
    pub reset: P,
    /// Read strobe, held high when present
    pub read: Option<P>,
    pub backlight: Option<P>,
}

/// Bus, control lines and delay of one panel
pub struct PanelIo<B, P, D> {
    bus: B,
    pins: PanelPins<P>,
    delay: D,
    register_width: RegisterWidth,
    scratch: [u8; SCRATCH_LEN],
}

pub(crate) async fn bus_write<B: BusTransport>(
    bus: &mut B,
    data: BusData<'_>,
    phase: Phase,
) -> Result<(), DisplayError> {
    bus.write(data, phase).await.map_err(|_| {
        error!("panel bus write failed ({} elements)", data.len());
        DisplayError::Bus
    })
}

impl<B, P, D> PanelIo<B, P, D>
where
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(bus: B, pins: PanelPins<P>, delay: D, register_width: RegisterWidth) -> Self {
        Self {
            bus,
            pins,
            delay,
            register_width,
            scratch: [0; SCRATCH_LEN],
        }
    }

    pub fn bus_width(&self) -> BusWidth {
        self.bus.width()
    }

    pub fn register_width(&self) -> RegisterWidth {
        self.register_width
    }

    /// Raw bus write, used for pixel data
    pub async fn write_bus(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), DisplayError> {
        bus_write(&mut self.bus, data, phase).await
    }

    /// Write an 8-bit register and its byte parameters
    pub async fn write_reg8(&mut self, reg: u8, params: &[u8]) -> Result<(), DisplayError> {
        if params.len() > SCRATCH_LEN {
            return Err(DisplayError::ParamsTooLong);
        }
        bus_write(&mut self.bus, BusData::Bytes(&[reg]), Phase::Command).await?;
        if !params.is_empty() {
            bus_write(&mut self.bus, BusData::Bytes(params), Phase::Data).await?;
        }
        Ok(())
    }

    /// Write a 16-bit register and its word parameters
    pub async fn write_reg16(&mut self, reg: u16, params: &[u16]) -> Result<(), DisplayError> {
        if params.len() * 2 > SCRATCH_LEN {
            return Err(DisplayError::ParamsTooLong);
        }
        bus_write(&mut self.bus, BusData::Words(&[reg]), Phase::Command).await?;
        if !params.is_empty() {
            bus_write(&mut self.bus, BusData::Words(params), Phase::Data).await?;
        }
        Ok(())
    }

    /// Write a register using the panel's register width
    ///
    /// On 8-bit registers the opcode and each parameter are truncated to
    /// their low byte, staged in the scratch buffer.
    pub async fn write_reg(&mut self, reg: u16, params: &[u16]) -> Result<(), DisplayError> {
        match self.register_width {
            RegisterWidth::Bits16 => self.write_reg16(reg, params).await,
            RegisterWidth::Bits8 => {
                if params.len() > SCRATCH_LEN {
                    return Err(DisplayError::ParamsTooLong);
                }
                for (dst, src) in self.scratch.iter_mut().zip(params) {
                    *dst = *src as u8;
                }
                bus_write(&mut self.bus, BusData::Bytes(&[reg as u8]), Phase::Command).await?;
                if !params.is_empty() {
                    let staged = BusData::Bytes(&self.scratch[..params.len()]);
                    bus_write(&mut self.bus, staged, Phase::Data).await?;
                }
                Ok(())
            }
        }
    }

    /// Hardware reset: RST high, low, high with a fixed hold on each level
    pub async fn reset_pulse(&mut self) {
        debug!("panel reset");
        self.pins.reset.set_high();
        self.delay.delay_ms(RESET_PHASE_MS).await;
        self.pins.reset.set_low();
        self.delay.delay_ms(RESET_PHASE_MS).await;
        self.pins.reset.set_high();
        self.delay.delay_ms(RESET_PHASE_MS).await;
    }

    pub async fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    /// Drive RD to its idle level; no-op when RD is not wired
    pub fn set_read_idle(&mut self) {
        if let Some(read) = self.pins.read.as_mut() {
            read.set_high();
        }
    }

    pub fn set_backlight(&mut self, on: bool) {
        if let Some(backlight) = self.pins.backlight.as_mut() {
            backlight.set_state(on);
        }
    }

    /// Release bus, pins and delay
    pub fn release(self) -> (B, PanelPins<P>, D) {
        (self.bus, self.pins, self.delay)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording bus, pin and delay shared by the display tests

    extern crate std;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use super::*;

    /// One bus write as seen on the wire
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Write {
        pub phase: Phase,
        pub words: Vec<u16>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Bus(Write),
        Pin(&'static str, bool),
        Delay(u32),
    }

    pub type Log = Rc<RefCell<Vec<Event>>>;

    pub struct MockBus {
        pub width: BusWidth,
        pub log: Log,
        /// Fail every write once this many have succeeded
        pub fail_after: Option<usize>,
        pub writes: usize,
    }

    impl BusTransport for MockBus {
        type Error = ();

        fn width(&self) -> BusWidth {
            self.width
        }

        async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), ()> {
            if self.fail_after.is_some_and(|n| self.writes >= n) {
                return Err(());
            }
            self.writes += 1;
            self.log.borrow_mut().push(Event::Bus(Write {
                phase,
                words: data.wire_words(self.width).collect(),
            }));
            Ok(())
        }
    }

    pub struct MockPin {
        pub name: &'static str,
        pub high: bool,
        pub log: Log,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.log.borrow_mut().push(Event::Pin(self.name, true));
        }

        fn set_low(&mut self) {
            self.high = false;
            self.log.borrow_mut().push(Event::Pin(self.name, false));
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    pub struct MockDelay {
        pub log: Log,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Delay(ms));
        }
    }

    pub type MockIo = PanelIo<MockBus, MockPin, MockDelay>;

    pub fn io(width: BusWidth, register_width: RegisterWidth, log: &Log) -> MockIo {
        let pin = |name| MockPin {
            name,
            high: false,
            log: log.clone(),
        };
        let pins = PanelPins {
            reset: pin("rst"),
            read: Some(pin("rd")),
            backlight: Some(pin("bl")),
        };
        let bus = MockBus {
            width,
            log: log.clone(),
            fail_after: None,
            writes: 0,
        };
        PanelIo::new(bus, pins, MockDelay { log: log.clone() }, register_width)
    }

    pub fn writes(log: &Log) -> Vec<Write> {
        log.borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Bus(write) => Some(write.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn cmd(words: &[u16]) -> Write {
        Write {
            phase: Phase::Command,
            words: words.to_vec(),
        }
    }

    pub fn data(words: &[u16]) -> Write {
        Write {
            phase: Phase::Data,
            words: words.to_vec(),
        }
    }

    impl MockIo {
        pub fn fail_after(&mut self, writes: usize) {
            self.bus.fail_after = Some(writes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_write_reg8_command_then_data() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        block_on(io.write_reg8(0x36, &[0x48])).unwrap();
        block_on(io.write_reg8(0x29, &[])).unwrap();

        assert_eq!(writes(&log), [cmd(&[0x36]), data(&[0x48]), cmd(&[0x29])]);
    }

    #[test]
    fn test_write_reg16_on_16bit_bus() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits16, RegisterWidth::Bits16, &log);

        block_on(io.write_reg16(0x0022, &[0x1234])).unwrap();

        assert_eq!(writes(&log), [cmd(&[0x0022]), data(&[0x1234])]);
    }

    #[test]
    fn test_write_reg_truncates_to_register_width() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        block_on(io.write_reg(0x2A, &[0x01, 0x1DF])).unwrap();

        assert_eq!(writes(&log), [cmd(&[0x2A]), data(&[0x01, 0xDF])]);
    }

    #[test]
    fn test_params_too_long() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let params = [0u16; SCRATCH_LEN + 1];

        assert_eq!(
            block_on(io.write_reg(0xE0, &params)),
            Err(DisplayError::ParamsTooLong)
        );
        assert!(writes(&log).is_empty());

        let params = [0u16; SCRATCH_LEN];
        assert!(block_on(io.write_reg(0xE0, &params)).is_ok());
    }

    #[test]
    fn test_reset_pulse_sequence() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        block_on(io.reset_pulse());

        assert_eq!(
            *log.borrow(),
            [
                Event::Pin("rst", true),
                Event::Delay(10),
                Event::Pin("rst", false),
                Event::Delay(10),
                Event::Pin("rst", true),
                Event::Delay(10),
            ]
        );
    }

    #[test]
    fn test_bus_error_maps_to_display_error() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        io.fail_after(1);

        assert_eq!(
            block_on(io.write_reg8(0x36, &[0x48])),
            Err(DisplayError::Bus)
        );
    }
}
