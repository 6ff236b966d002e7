//! PIO-driven 8080 bus
//!
//! One state machine shifts data words onto DB0..DBn and strobes WR through
//! side-set. RS and CS are plain GPIOs, only touched while the state machine
//! is idle. Words reach the TX FIFO either through a DMA channel or one at a
//! time from the CPU.

use core::convert::Infallible;

use embassy_rp::dma::AnyChannel;
use embassy_rp::gpio::{AnyPin, Level, Output};
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, Pin as PioPinHandle,
    ShiftConfig, ShiftDirection, StateMachine,
};
use embassy_rp::Peri;
use strobe_hal::{BusData, BusTransport, BusWidth, Phase};

use crate::pio::{calc_clock_divider, divider_fixed, SYS_CLK_HZ};

/// Words staged per DMA transfer when the payload needs reshaping
const STAGING_LEN: usize = 256;

/// How words are fed to the state machine
pub enum BusStrategy<'d> {
    /// DMA channel feeds the TX FIFO; the task suspends until the transfer ends
    Dma(Peri<'d, AnyChannel>),
    /// CPU pushes each word into the TX FIFO
    Fifo,
}

/// Pins of the PIO bus, as numbered GPIOs
pub struct PioBusPins<'d> {
    /// DB0..DBn, consecutive GPIOs in ascending order
    pub data: heapless::Vec<Peri<'d, AnyPin>, 16>,
    pub wr: Peri<'d, AnyPin>,
    pub rs: Peri<'d, AnyPin>,
    pub cs: Option<Peri<'d, AnyPin>>,
}

/// 8080 bus on one PIO state machine
pub struct PioBus<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
    rs: Output<'d>,
    cs: Option<Output<'d>>,
    width: BusWidth,
    strategy: BusStrategy<'d>,
    staging: [u16; STAGING_LEN],
}

impl<'d, PIO: Instance, const SM: usize> PioBus<'d, PIO, SM> {
    /// Load the strobe program and start the state machine
    ///
    /// `pins.data` must hold exactly `width.bits()` pins.
    pub fn new(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        pins: PioBusPins<'d>,
        width: BusWidth,
        write_clk_hz: u32,
        strategy: BusStrategy<'d>,
    ) -> Self {
        // WR is low while the word is driven and rises on the nop, latching it
        let installed = match width {
            BusWidth::Bits8 => {
                let prg = pio::pio_asm!(
                    ".side_set 1",
                    ".wrap_target",
                    "out pins, 8 side 0",
                    "nop side 1",
                    ".wrap"
                );
                common.load_program(&prg.program)
            }
            BusWidth::Bits16 => {
                let prg = pio::pio_asm!(
                    ".side_set 1",
                    ".wrap_target",
                    "out pins, 16 side 0",
                    "nop side 1",
                    ".wrap"
                );
                common.load_program(&prg.program)
            }
        };

        let wr = common.make_pio_pin(pins.wr);
        let data: heapless::Vec<PioPinHandle<'d, PIO>, 16> = pins
            .data
            .into_iter()
            .map(|pin| common.make_pio_pin(pin))
            .collect();
        let data_refs: heapless::Vec<&PioPinHandle<'d, PIO>, 16> = data.iter().collect();

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&wr]);
        cfg.set_out_pins(&data_refs);
        cfg.shift_out = ShiftConfig {
            threshold: width.bits(),
            direction: ShiftDirection::Right,
            auto_fill: true,
        };
        cfg.fifo_join = FifoJoin::TxOnly;
        cfg.clock_divider = divider_fixed(calc_clock_divider(SYS_CLK_HZ, write_clk_hz));

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &data_refs);
        sm.set_pin_dirs(PioDirection::Out, &[&wr]);
        sm.set_enable(true);

        Self {
            sm,
            rs: Output::new(pins.rs, Level::High),
            cs: pins.cs.map(|cs| Output::new(cs, Level::High)),
            width,
            strategy,
            staging: [0; STAGING_LEN],
        }
    }

    /// Wait until the FIFO has drained and the last word has been strobed
    ///
    /// The stall flag is sticky, so it must be cleared before the write
    /// this waits for.
    async fn wait_idle(&mut self) {
        while !self.sm.tx().empty() {
            embassy_futures::yield_now().await;
        }
        while !self.sm.tx().stalled() {
            embassy_futures::yield_now().await;
        }
    }

    async fn push(&mut self, data: BusData<'_>) {
        let width = self.width;
        match &mut self.strategy {
            BusStrategy::Fifo => {
                for word in data.wire_words(width) {
                    self.sm.tx().wait_push(word as u32).await;
                }
            }
            BusStrategy::Dma(dma) => match (data, width) {
                (BusData::Bytes(bytes), BusWidth::Bits8) => {
                    self.sm.tx().dma_push(dma.reborrow(), bytes, false).await;
                }
                (BusData::Words(words), BusWidth::Bits16) => {
                    self.sm.tx().dma_push(dma.reborrow(), words, false).await;
                }
                (BusData::SwappedWords(words), BusWidth::Bits16) => {
                    self.sm.tx().dma_push(dma.reborrow(), words, true).await;
                }
                _ => {
                    // 16-bit FIFO writes replicate the halfword, so an 8-bit
                    // bus shifts out the low byte of each staged word
                    let mut wire = data.wire_words(width);
                    loop {
                        let mut len = 0;
                        for (slot, word) in self.staging.iter_mut().zip(&mut wire) {
                            *slot = word;
                            len += 1;
                        }
                        if len == 0 {
                            break;
                        }
                        self.sm
                            .tx()
                            .dma_push(dma.reborrow(), &self.staging[..len], false)
                            .await;
                    }
                }
            },
        }
    }
}

impl<PIO: Instance, const SM: usize> BusTransport for PioBus<'_, PIO, SM> {
    type Error = Infallible;

    fn width(&self) -> BusWidth {
        self.width
    }

    async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), Infallible> {
        if data.is_empty() {
            return Ok(());
        }

        self.rs.set_level(Level::from(phase.rs_level()));
        if let Some(cs) = &mut self.cs {
            cs.set_low();
        }

        let _ = self.sm.tx().stalled();
        self.push(data).await;
        self.wait_idle().await;

        if let Some(cs) = &mut self.cs {
            cs.set_high();
        }
        Ok(())
    }
}
