//! Bit-banged 8080 bus over plain GPIO
//!
//! Slow but portable: every WR strobe is two GPIO writes plus one write per
//! changed data line. Used on boards without a PIO block and as the
//! reference implementation the PIO transport is checked against.

use core::convert::Infallible;

use strobe_hal::{BusData, BusTransport, BusWidth, OutputPin, Phase};

/// 8080 bus driven by toggling GPIOs
///
/// `N` data pins are wired DB0..DB(N-1). With skip-redundant enabled, a data
/// line is only written when its level differs from the previous strobe.
pub struct GpioBus<P, const N: usize> {
    data: [P; N],
    wr: P,
    rs: P,
    cs: P,
    width: BusWidth,
    skip_redundant: bool,
    /// Word latched by the previous strobe, `None` until the first one
    prev: Option<u16>,
}

impl<P: OutputPin, const N: usize> GpioBus<P, N> {
    /// Create a bus from its data and control lines
    ///
    /// Skip-redundant is only honoured when exactly `width` data pins are
    /// given; with any other count every line is written on every strobe.
    pub fn new(data: [P; N], wr: P, rs: P, cs: P, width: BusWidth, skip_redundant: bool) -> Self {
        let pins_match = N == width.bits() as usize;
        if skip_redundant && !pins_match {
            warn!(
                "gpio bus: {} data pins for a {}-bit bus, skip-redundant disabled",
                N,
                width.bits()
            );
        }

        let mut bus = Self {
            data,
            wr,
            rs,
            cs,
            width,
            skip_redundant: skip_redundant && pins_match,
            prev: None,
        };
        bus.wr.set_high();
        bus.cs.set_high();
        bus
    }

    /// Whether unchanged data lines are being skipped
    pub fn skip_redundant(&self) -> bool {
        self.skip_redundant
    }

    /// Release the pins
    pub fn release(self) -> ([P; N], P, P, P) {
        (self.data, self.wr, self.rs, self.cs)
    }

    fn latch(&mut self, word: u16) {
        let changed = match self.prev {
            Some(prev) if self.skip_redundant => prev ^ word,
            _ => self.width.mask(),
        };

        self.wr.set_low();
        let lines = self.width.bits() as usize;
        for (bit, pin) in self.data.iter_mut().enumerate().take(lines) {
            let mask = 1u16 << bit;
            if changed & mask != 0 {
                pin.set_state(word & mask != 0);
            }
        }
        self.wr.set_high();

        self.prev = Some(word);
    }
}

impl<P: OutputPin, const N: usize> BusTransport for GpioBus<P, N> {
    type Error = Infallible;

    fn width(&self) -> BusWidth {
        self.width
    }

    async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), Infallible> {
        self.rs.set_state(phase.rs_level());
        self.cs.set_low();
        for word in data.wire_words(self.width) {
            self.latch(word);
        }
        self.cs.set_high();
        Ok(())
    }
}
