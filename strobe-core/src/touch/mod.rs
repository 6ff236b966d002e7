//! Touch input
//!
//! A [`TouchBackend`] talks to one controller chip and returns raw samples
//! in the controller's native resolution. [`TouchDevice`] maps those samples
//! to screen coordinates: offset, then optional inversion, then scaling,
//! with an optional exchange of the two axes.

mod backend;
mod device;

pub use backend::{reset_pulse, TouchBackend, TouchProfile, TOUCH_RESET_PHASE_MS};
pub use device::{touch_probe, AxisMap, TouchDevice};

use core::ops::{BitOr, BitOrAssign};

/// Errors from touch controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// I2C transfer failed
    Bus,
    /// Controller did not identify as the expected part
    NotFound,
}

/// Physical sample axis of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Orientation flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Direction(u8);

impl Direction {
    pub const NONE: Self = Self(0);
    pub const INVERT_X: Self = Self(0x01);
    pub const INVERT_Y: Self = Self(0x02);
    pub const SWITCH_XY: Self = Self(0x04);

    const ALL: u8 = 0x07;

    /// Build from raw bits, dropping undefined ones
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Direction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Direction {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_bits() {
        let dir = Direction::SWITCH_XY | Direction::INVERT_Y;
        assert_eq!(dir.bits(), 0x06);
        assert!(dir.contains(Direction::SWITCH_XY));
        assert!(dir.contains(Direction::INVERT_Y));
        assert!(!dir.contains(Direction::INVERT_X));
        assert!(dir.contains(Direction::NONE));
    }

    #[test]
    fn test_from_bits_truncates() {
        assert_eq!(Direction::from_bits_truncate(0xFF).bits(), 0x07);
        assert_eq!(Direction::from_bits_truncate(0x08), Direction::NONE);
    }

    #[test]
    fn test_axis_other() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other(), Axis::X);
    }
}
