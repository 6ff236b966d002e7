//! Probe-time errors
//!
//! Everything that can go wrong while bringing a panel or touch controller
//! up. Probe failures are fatal for the device being probed and are
//! reported synchronously to the caller.

use crate::display::DisplayError;
use crate::touch::TouchError;

/// Reasons a display or touch probe can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// Bus width other than 8 or 16 bits
    UnsupportedBusWidth(u8),
    /// Transport width differs from the width the panel profile was written for
    BusWidthMismatch {
        /// Width the profile expects
        profile: u8,
        /// Width of the bus transport
        bus: u8,
    },
    /// Profile data is unusable (zero resolution, unsupported pixel depth)
    InvalidProfile(&'static str),
    /// A required operation has neither a profile table nor an override
    MissingOperation(&'static str),
    /// Bus failure while running the panel bring-up
    Display(DisplayError),
    /// Touch controller failed to respond during bring-up
    Touch(TouchError),
    /// Two functions were assigned the same GPIO
    PinConflict(u8),
}

impl From<DisplayError> for ProbeError {
    fn from(err: DisplayError) -> Self {
        match err {
            DisplayError::MissingOperation(op) => Self::MissingOperation(op),
            other => Self::Display(other),
        }
    }
}

impl From<TouchError> for ProbeError {
    fn from(err: TouchError) -> Self {
        Self::Touch(err)
    }
}
