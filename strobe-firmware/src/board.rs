//! Board bring-up from the embedded board file
//!
//! Pins are checked for conflicts first, then taken from the pin bank by
//! number. Tasks cannot be generic, so the bus variants are folded into
//! [`PanelBus`] and every device type is named here.

use core::convert::Infallible;

use defmt::*;
use embassy_rp::dma::AnyChannel;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::peripherals::{I2C1, PIN_26, PIN_27, PIO0};
use embassy_rp::pio::{Common, StateMachine};
use embassy_rp::Peri;
use embassy_time::Delay;
use strobe_core::bus::GpioBus;
use strobe_core::config::{BoardConfig, BusDriver, DisplayConfig, TouchConfig};
use strobe_core::display::{display_probe, DisplayController, DisplayOps, PanelIo, PanelPins};
use strobe_core::touch::{touch_probe, TouchDevice};
use strobe_core::ProbeError;
use strobe_drivers::panel::Panel;
use strobe_drivers::touch::{Touch, TouchKind};
use strobe_hal::i2c::I2cConfig;
use strobe_hal::{BusData, BusTransport, BusWidth, Phase};
use strobe_hal_rp2040::gpio::{AllocError, GpioAllocator, RpInput, RpOutput};
use strobe_hal_rp2040::i2c::RpI2c;
use strobe_hal_rp2040::i80::PioBusPins;
use strobe_hal_rp2040::pins::{PinBank, PinError, I2C_SCL_PIN, I2C_SDA_PIN};
use strobe_hal_rp2040::{BusStrategy, PioBus};

pub type Display = DisplayController<Panel, PanelBus, RpOutput<'static>, Delay>;

pub type TouchPanel = TouchDevice<Touch<RpI2c<'static, I2C1>, RpInput<'static>, Delay>>;

/// Panel bus chosen by the board file
pub enum PanelBus {
    Pio(PioBus<'static, PIO0, 0>),
    Gpio8(GpioBus<RpOutput<'static>, 8>),
    Gpio16(GpioBus<RpOutput<'static>, 16>),
}

impl BusTransport for PanelBus {
    type Error = Infallible;

    fn width(&self) -> BusWidth {
        match self {
            Self::Pio(bus) => bus.width(),
            Self::Gpio8(bus) => bus.width(),
            Self::Gpio16(bus) => bus.width(),
        }
    }

    async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), Infallible> {
        match self {
            Self::Pio(bus) => bus.write(data, phase).await,
            Self::Gpio8(bus) => bus.write(data, phase).await,
            Self::Gpio16(bus) => bus.write(data, phase).await,
        }
    }
}

/// Touch controller with the reset line it was probed through
pub struct TouchBoard {
    pub device: TouchPanel,
    /// Held so the controller is never left with a floating reset
    pub reset: RpOutput<'static>,
}

/// Peripherals the touch bring-up consumes
pub struct TouchPeripherals {
    pub i2c: Peri<'static, I2C1>,
    pub sda: Peri<'static, PIN_26>,
    pub scl: Peri<'static, PIN_27>,
}

/// Check that no GPIO is assigned twice
pub fn check_pins(config: &BoardConfig) -> Result<(), ProbeError> {
    let mut alloc = GpioAllocator::new();
    let display = &config.display;

    claim_display(&mut alloc, display).map_err(conflict)?;
    if let Some(touch) = &config.touch {
        claim_touch(&mut alloc, touch).map_err(conflict)?;
    }
    Ok(())
}

fn claim_display(alloc: &mut GpioAllocator, cfg: &DisplayConfig) -> Result<(), AllocError> {
    alloc.claim_range(cfg.db_base, cfg.bus_width.bits(), "display data")?;
    alloc.claim(cfg.pin_wr, "display wr")?;
    alloc.claim(cfg.pin_rs, "display rs")?;
    alloc.claim_optional(cfg.pin_cs, "display cs")?;
    alloc.claim(cfg.pin_rst, "display rst")?;
    alloc.claim_optional(cfg.pin_rd, "display rd")?;
    alloc.claim_optional(cfg.pin_bl, "display bl")
}

fn claim_touch(alloc: &mut GpioAllocator, cfg: &TouchConfig) -> Result<(), AllocError> {
    alloc.claim(cfg.pin_sda, "touch sda")?;
    alloc.claim(cfg.pin_scl, "touch scl")?;
    alloc.claim_optional(cfg.pin_rst, "touch rst")?;
    alloc.claim_optional(cfg.pin_irq, "touch irq")
}

fn conflict(err: AllocError) -> ProbeError {
    match err {
        AllocError::Conflict { pin, owner } => error!("gpio{} already used by {}", pin, owner),
        AllocError::InvalidPin(pin) => error!("gpio{} does not exist", pin),
    }
    ProbeError::PinConflict(err.pin())
}

fn pin_error(err: PinError) -> ProbeError {
    error!("pin bank: {}", err);
    match err {
        PinError::InvalidPin(pin) | PinError::AlreadyTaken(pin) | PinError::Reserved(pin) => {
            ProbeError::PinConflict(pin)
        }
    }
}

fn output(pin: Peri<'static, AnyPin>, level: Level) -> RpOutput<'static> {
    RpOutput::new(Output::new(pin, level))
}

fn optional_output(pin: Option<Peri<'static, AnyPin>>, level: Level) -> RpOutput<'static> {
    RpOutput::from_option(pin.map(|pin| Output::new(pin, level)))
}

fn build_bus(
    cfg: &DisplayConfig,
    bank: &mut PinBank,
    common: &mut Common<'static, PIO0>,
    sm: StateMachine<'static, PIO0, 0>,
    dma: Peri<'static, AnyChannel>,
) -> Result<PanelBus, PinError> {
    let data = bank.take_range::<16>(cfg.db_base, cfg.bus_width.bits())?;
    let wr = bank.take(cfg.pin_wr)?;
    let rs = bank.take(cfg.pin_rs)?;
    let cs = bank.take_optional(cfg.pin_cs)?;

    let bus = match cfg.bus {
        BusDriver::PioDma | BusDriver::PioFifo => {
            let strategy = match cfg.bus {
                BusDriver::PioDma => BusStrategy::Dma(dma),
                _ => BusStrategy::Fifo,
            };
            let write_clk_hz = cfg.write_clock_khz.saturating_mul(1000);
            info!(
                "pio bus: {}-bit, {} kHz, dma={}",
                cfg.bus_width.bits(),
                cfg.write_clock_khz,
                matches!(strategy, BusStrategy::Dma(_))
            );
            let pins = PioBusPins { data, wr, rs, cs };
            PanelBus::Pio(PioBus::new(common, sm, pins, cfg.bus_width, write_clk_hz, strategy))
        }
        BusDriver::Gpio => {
            info!("gpio bus: {}-bit", cfg.bus_width.bits());
            let wr = output(wr, Level::High);
            let rs = output(rs, Level::High);
            let cs = optional_output(cs, Level::High);
            let mut lines = data.into_iter().map(|pin| output(pin, Level::Low));
            let mut next_line = || lines.next().unwrap_or_else(RpOutput::unwired);
            match cfg.bus_width {
                BusWidth::Bits8 => PanelBus::Gpio8(GpioBus::new(
                    core::array::from_fn(|_| next_line()),
                    wr,
                    rs,
                    cs,
                    BusWidth::Bits8,
                    cfg.skip_redundant,
                )),
                BusWidth::Bits16 => PanelBus::Gpio16(GpioBus::new(
                    core::array::from_fn(|_| next_line()),
                    wr,
                    rs,
                    cs,
                    BusWidth::Bits16,
                    cfg.skip_redundant,
                )),
            }
        }
    };
    Ok(bus)
}

/// Build the bus and control lines, then probe the panel
pub async fn bring_up_display(
    cfg: &DisplayConfig,
    bank: &mut PinBank,
    common: &mut Common<'static, PIO0>,
    sm: StateMachine<'static, PIO0, 0>,
    dma: Peri<'static, AnyChannel>,
) -> Result<Display, ProbeError> {
    let panel = Panel::from_name(cfg.panel.as_str(), cfg.bus_width)
        .ok_or(ProbeError::InvalidProfile("unknown panel"))?;

    let bus = build_bus(cfg, bank, common, sm, dma).map_err(pin_error)?;
    let pins = PanelPins {
        reset: output(bank.take(cfg.pin_rst).map_err(pin_error)?, Level::High),
        read: bank
            .take_optional(cfg.pin_rd)
            .map_err(pin_error)?
            .map(|pin| output(pin, Level::High)),
        backlight: bank
            .take_optional(cfg.pin_bl)
            .map_err(pin_error)?
            .map(|pin| output(pin, Level::Low)),
    };

    let register_width = panel.profile().register_width;
    let io = PanelIo::new(bus, pins, Delay, register_width);
    display_probe(panel, io).await
}

/// Open I2C1, probe the touch controller and apply the board orientation
pub fn bring_up_touch(
    cfg: &TouchConfig,
    bank: &mut PinBank,
    peripherals: TouchPeripherals,
    screen: (u16, u16),
) -> Result<TouchBoard, ProbeError> {
    if cfg.pin_sda != I2C_SDA_PIN || cfg.pin_scl != I2C_SCL_PIN {
        warn!(
            "touch i2c is fixed to gpio{}/gpio{}, board asks for gpio{}/gpio{}",
            I2C_SDA_PIN, I2C_SCL_PIN, cfg.pin_sda, cfg.pin_scl
        );
        return Err(ProbeError::InvalidProfile("touch i2c pins"));
    }

    let kind = TouchKind::from_name(cfg.controller.as_str())
        .ok_or(ProbeError::InvalidProfile("unknown touch controller"))?;

    let i2c = RpI2c::new(peripherals.i2c, peripherals.scl, peripherals.sda, I2cConfig::FAST);
    let irq = match bank.take_optional(cfg.pin_irq).map_err(pin_error)? {
        Some(pin) => RpInput::new(Input::new(pin, Pull::Up)),
        None => RpInput::unwired(),
    };
    let mut reset = optional_output(bank.take_optional(cfg.pin_rst).map_err(pin_error)?, Level::High);

    let backend = Touch::new(kind, i2c, irq, Delay, screen);
    let mut device = touch_probe(backend, &mut reset, &mut Delay, screen)?;
    if let Some(direction) = cfg.direction {
        info!("touch direction overridden to {=u8:#x}", direction.bits());
        device.set_direction(direction);
    }

    Ok(TouchBoard { device, reset })
}
