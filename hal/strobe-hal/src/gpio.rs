//! GPIO pin abstractions
//!
//! Control lines of the 8080 bus (WR, RS, CS, RST, RD, backlight) and the
//! touch controller reset/IRQ lines are driven through these traits.

/// Push-pull output line
///
/// Writes cannot fail; a GPIO register write has no failure mode on the
/// chips this stack targets.
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Drive the line to `high`
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Level last driven onto the line
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Sampled input line (touch pen IRQ)
pub trait InputPin {
    fn is_high(&self) -> bool;

    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Placeholder for an optional line that is not wired on a board
///
/// Writes are discarded and the pin always reads low. Used for panels with
/// RD tied high or a backlight hard-wired on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl OutputPin for NoPin {
    fn set_high(&mut self) {}

    fn set_low(&mut self) {}

    fn is_set_high(&self) -> bool {
        false
    }
}

impl InputPin for NoPin {
    fn is_high(&self) -> bool {
        false
    }
}
