//! PIO timing for the 8080 write strobe
//!
//! The bus program is two instructions per word: `out` with WR low, then
//! `nop` with WR high. The write clock is therefore half the state machine
//! clock, which runs at SYS_CLK / divider.

use fixed::types::U24F8;

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// State machine cycles per WR strobe
pub const CYCLES_PER_STROBE: u32 = 2;

/// Fastest write clock the divider can express (divider 1.0)
pub const MAX_WRITE_CLK_HZ: u32 = SYS_CLK_HZ / CYCLES_PER_STROBE;

/// Calculate the clock divider for a target write clock
///
/// divider = SYS_CLK / (write_clk * 2)
///
/// Returns (integer_part, fractional_part) of the 16.8 fixed-point divider.
/// Requests above [`MAX_WRITE_CLK_HZ`] are clamped to a divider of 1.0.
pub fn calc_clock_divider(sys_clk_hz: u32, write_clk_hz: u32) -> (u16, u8) {
    if write_clk_hz == 0 {
        return (0xFFFF, 0xFF); // Maximum divider = slowest strobe
    }

    // To get 8-bit fractional precision, multiply by 256 first
    let divisor = write_clk_hz as u64 * CYCLES_PER_STROBE as u64;
    let divider_x256 = (sys_clk_hz as u64 * 256) / divisor;

    if divider_x256 < 256 {
        return (1, 0);
    }

    let int_part = (divider_x256 / 256).min(0xFFFF) as u16;
    let frac_part = (divider_x256 % 256) as u8;

    (int_part, frac_part)
}

/// Divider in the form the state machine config takes
pub fn divider_fixed(divider: (u16, u8)) -> U24F8 {
    let (int_part, frac_part) = divider;
    U24F8::from_bits(((int_part as u32) << 8) | frac_part as u32)
}

/// Write clock actually produced by a divider
pub fn achieved_write_clock(sys_clk_hz: u32, divider: (u16, u8)) -> u32 {
    let bits = divider_fixed(divider).to_bits() as u64;
    ((sys_clk_hz as u64 * 256) / (bits * CYCLES_PER_STROBE as u64)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_divider() {
        // 125 MHz / (10 MHz * 2) = 6.25
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 10_000_000), (6, 64));

        // 125 MHz / (1 MHz * 2) = 62.5
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 1_000_000), (62, 128));
    }

    #[test]
    fn test_divider_clamped() {
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, MAX_WRITE_CLK_HZ), (1, 0));
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 100_000_000), (1, 0));
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 0), (0xFFFF, 0xFF));
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 1), (0xFFFF, 0));
    }

    #[test]
    fn test_achieved_clock() {
        let divider = calc_clock_divider(SYS_CLK_HZ, 10_000_000);
        assert_eq!(achieved_write_clock(SYS_CLK_HZ, divider), 10_000_000);

        // 7 MHz is not exact; the divider rounds down so the clock is never slower
        let divider = calc_clock_divider(SYS_CLK_HZ, 7_000_000);
        assert!(achieved_write_clock(SYS_CLK_HZ, divider) >= 7_000_000);
    }
}
