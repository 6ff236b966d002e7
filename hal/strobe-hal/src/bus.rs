//! 8080 ("i80") parallel bus abstraction
//!
//! A panel is written through a data bus of 8 or 16 lines, a write strobe
//! (WR) pulsed once per word, and a register-select line (RS, also called
//! D/C) that tells the controller whether the word is a command or data.
//!
//! # Wire word expansion
//!
//! | Payload            | 8-bit bus                      | 16-bit bus              |
//! |--------------------|--------------------------------|-------------------------|
//! | `Bytes`            | one strobe per byte            | one strobe, zero-extended |
//! | `Words`            | two strobes, low byte first    | one strobe per word     |
//! | `SwappedWords`     | two strobes, high byte first   | one strobe of `swap_bytes()` |

/// Data bus width in bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWidth {
    /// DB0-DB7
    Bits8,
    /// DB0-DB15
    Bits16,
}

impl BusWidth {
    /// Parse a width in bits; anything but 8 or 16 is unsupported
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Bits8),
            16 => Some(Self::Bits16),
            _ => None,
        }
    }

    /// Width in bits
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
        }
    }

    /// Mask covering the data lines
    pub const fn mask(self) -> u16 {
        match self {
            Self::Bits8 => 0x00FF,
            Self::Bits16 => 0xFFFF,
        }
    }
}

/// Bus phase, driven on the register-select line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// RS low: the words are a register/command opcode
    Command,
    /// RS high: the words are parameters or pixel data
    Data,
}

impl Phase {
    /// Level of the register-select line for this phase
    pub const fn rs_level(self) -> bool {
        matches!(self, Self::Data)
    }
}

/// Payload of one bus write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusData<'a> {
    /// 8-bit values (register opcodes and parameters of 8-bit controllers)
    Bytes(&'a [u8]),
    /// 16-bit values sent in memory order (RGB565 pixels, 16-bit registers)
    Words(&'a [u16]),
    /// 16-bit values with their two bytes exchanged on the wire
    SwappedWords(&'a [u16]),
}

impl<'a> BusData<'a> {
    /// Number of source elements (bytes or words)
    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            Self::Words(w) | Self::SwappedWords(w) => w.len(),
        }
    }

    /// True if there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the payload in bytes
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Bytes(b) => b.len(),
            Self::Words(w) | Self::SwappedWords(w) => w.len() * 2,
        }
    }

    /// Number of WR strobes needed on a bus of the given width
    pub fn strobe_count(&self, width: BusWidth) -> usize {
        match (self, width) {
            (Self::Bytes(b), _) => b.len(),
            (Self::Words(w) | Self::SwappedWords(w), BusWidth::Bits16) => w.len(),
            (Self::Words(w) | Self::SwappedWords(w), BusWidth::Bits8) => w.len() * 2,
        }
    }

    /// Iterate the words as they appear on the data lines
    pub fn wire_words(self, width: BusWidth) -> WireWords<'a> {
        WireWords {
            data: self,
            width,
            index: 0,
            pending: None,
        }
    }
}

/// Iterator over the values latched by each WR strobe
#[derive(Debug, Clone)]
pub struct WireWords<'a> {
    data: BusData<'a>,
    width: BusWidth,
    index: usize,
    /// Second half of a word split across two strobes on an 8-bit bus
    pending: Option<u16>,
}

impl Iterator for WireWords<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if let Some(word) = self.pending.take() {
            return Some(word);
        }

        let (value, swapped) = match self.data {
            BusData::Bytes(bytes) => {
                let byte = *bytes.get(self.index)?;
                self.index += 1;
                return Some(byte as u16);
            }
            BusData::Words(words) => (*words.get(self.index)?, false),
            BusData::SwappedWords(words) => (*words.get(self.index)?, true),
        };
        self.index += 1;

        let value = if swapped { value.swap_bytes() } else { value };
        match self.width {
            BusWidth::Bits16 => Some(value),
            BusWidth::Bits8 => {
                let [lo, hi] = value.to_le_bytes();
                self.pending = Some(hi as u16);
                Some(lo as u16)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let consumed = match (self.data, self.width) {
            (BusData::Bytes(_), _) | (_, BusWidth::Bits16) => self.index,
            (_, BusWidth::Bits8) => self.index * 2,
        };
        let remaining =
            self.data.strobe_count(self.width) - consumed + self.pending.is_some() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WireWords<'_> {}

/// Parallel bus transport
///
/// Moves one buffer onto the bus as either a command or a data phase.
/// Implementations must wait for the bus to go idle before switching the
/// register-select line and again after the last word, so that writes from
/// different call sites never interleave on the wire.
///
/// There is no acknowledgment from the panel; `Err` only reports a failure
/// of the local engine (e.g. a DMA fault), never corrupted data on the wire.
#[allow(async_fn_in_trait)]
pub trait BusTransport {
    /// Error type for bus writes
    type Error;

    /// Configured data bus width
    fn width(&self) -> BusWidth;

    /// Write `data` in the given phase, returning once the last strobe is out
    async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), Self::Error>;
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    type Error = T::Error;

    fn width(&self) -> BusWidth {
        T::width(self)
    }

    async fn write(&mut self, data: BusData<'_>, phase: Phase) -> Result<(), Self::Error> {
        T::write(self, data, phase).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    fn wire(data: BusData<'_>, width: BusWidth) -> Vec<u16> {
        data.wire_words(width).collect()
    }

    #[test]
    fn test_width_from_bits() {
        assert_eq!(BusWidth::from_bits(8), Some(BusWidth::Bits8));
        assert_eq!(BusWidth::from_bits(16), Some(BusWidth::Bits16));
        assert_eq!(BusWidth::from_bits(9), None);
        assert_eq!(BusWidth::from_bits(0), None);
    }

    #[test]
    fn test_bytes_on_both_widths() {
        let data = BusData::Bytes(&[0x2A, 0x01]);
        assert_eq!(wire(data, BusWidth::Bits8), [0x2A, 0x01]);
        assert_eq!(wire(data, BusWidth::Bits16), [0x002A, 0x0001]);
    }

    #[test]
    fn test_words_on_8bit_bus_low_byte_first() {
        let data = BusData::Words(&[0xF800, 0x1234]);
        assert_eq!(wire(data, BusWidth::Bits8), [0x00, 0xF8, 0x34, 0x12]);
    }

    #[test]
    fn test_swapped_words_on_8bit_bus_high_byte_first() {
        let data = BusData::SwappedWords(&[0xF800, 0x1234]);
        assert_eq!(wire(data, BusWidth::Bits8), [0xF8, 0x00, 0x12, 0x34]);
    }

    #[test]
    fn test_words_on_16bit_bus() {
        assert_eq!(wire(BusData::Words(&[0xF800]), BusWidth::Bits16), [0xF800]);
        assert_eq!(
            wire(BusData::SwappedWords(&[0xF800]), BusWidth::Bits16),
            [0x00F8]
        );
    }

    #[test]
    fn test_strobe_count_matches_iterator() {
        let words = [1u16, 2, 3];
        for width in [BusWidth::Bits8, BusWidth::Bits16] {
            for data in [
                BusData::Bytes(&[1, 2, 3, 4]),
                BusData::Words(&words),
                BusData::SwappedWords(&words),
            ] {
                let iter = data.wire_words(width);
                assert_eq!(iter.len(), data.strobe_count(width));
                assert_eq!(iter.count(), data.strobe_count(width));
            }
        }
    }

    #[test]
    fn test_size_hint_mid_word() {
        let mut iter = BusData::Words(&[0xAABB, 0xCCDD]).wire_words(BusWidth::Bits8);
        assert_eq!(iter.len(), 4);
        iter.next();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_phase_levels() {
        assert!(!Phase::Command.rs_level());
        assert!(Phase::Data.rs_level());
    }

    struct CountingBus {
        writes: usize,
    }

    impl BusTransport for CountingBus {
        type Error = ();

        fn width(&self) -> BusWidth {
            BusWidth::Bits8
        }

        async fn write(&mut self, _data: BusData<'_>, _phase: Phase) -> Result<(), ()> {
            self.writes += 1;
            Ok(())
        }
    }

    async fn send_command<B: BusTransport>(mut bus: B) -> Result<BusWidth, B::Error> {
        bus.write(BusData::Bytes(&[0x29]), Phase::Command).await?;
        Ok(bus.width())
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut bus = CountingBus { writes: 0 };
        let width = embassy_futures::block_on(send_command(&mut bus)).unwrap();
        assert_eq!(width, BusWidth::Bits8);
        assert_eq!(bus.writes, 1);
    }
}
