//! I2C master used by the touch controllers
//!
//! Touch samples are a handful of bytes, so every transfer is blocking.
//! Controllers with 8-bit register maps send one address byte before a
//! read, the GT911 sends two (big-endian).

/// Blocking I2C master
///
/// Addresses are 7-bit. A NACK, arbitration loss or timeout is reported
/// through `Error`; the touch layer folds all of them into one bus error.
pub trait I2cBus {
    type Error;

    /// Send `data` to `address` in one transfer
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send a register address, then read back with a repeated start
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

/// Bus clock of a touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// SCL frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::FAST
    }
}

impl I2cConfig {
    /// 100 kHz
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// 400 kHz, the rate every supported touch controller runs at
    pub const FAST: Self = Self { frequency: 400_000 };
}
