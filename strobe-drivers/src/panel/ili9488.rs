//! ILI9488 480x320, the generic default panel

use strobe_core::display::{DisplayOps, InitStep, PanelProfile};
use strobe_hal::BusWidth;

const INIT: &[InitStep] = &[
    InitStep::Reset,
    InitStep::delay(150),
    // Adjust control 3
    InitStep::cmd(0xF7, &[0xA9, 0x51, 0x2C, 0x82]),
    // Power control 1/2, VCOM
    InitStep::cmd(0xC0, &[0x11, 0x09]),
    InitStep::cmd(0xC1, &[0x41]),
    InitStep::cmd(0xC5, &[0x00, 0x28, 0x80]),
    // Frame rate, inversion, display function
    InitStep::cmd(0xB1, &[0xB0, 0x11]),
    InitStep::cmd(0xB4, &[0x02]),
    InitStep::cmd(0xB6, &[0x02, 0x22]),
    InitStep::cmd(0xB7, &[0xC6]),
    InitStep::cmd(0xBE, &[0x00, 0x04]),
    InitStep::cmd(0xE9, &[0x00]),
    // MADCTL: BGR, row/column exchange, column mirror
    InitStep::cmd(0x36, &[0x08 | (1 << 5) | (1 << 6)]),
    // RGB565
    InitStep::cmd(0x3A, &[0x55]),
    InitStep::cmd(
        0xE0,
        &[
            0x00, 0x07, 0x10, 0x09, 0x17, 0x0B, 0x41, 0x89, 0x4B, 0x0A, 0x0C, 0x0E, 0x18, 0x1B,
            0x0F,
        ],
    ),
    InitStep::cmd(
        0xE1,
        &[
            0x00, 0x17, 0x1A, 0x04, 0x0E, 0x06, 0x2F, 0x45, 0x43, 0x02, 0x0A, 0x09, 0x32, 0x36,
            0x0F,
        ],
    ),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(60),
    InitStep::cmd(0x29, &[]),
];

/// ILI9488 with every operation left at its default
pub struct Ili9488 {
    profile: PanelProfile,
}

impl Ili9488 {
    pub const XRES: u16 = 480;
    pub const YRES: u16 = 320;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("ili9488", Self::XRES, Self::YRES, bus_width)
                .with_init(INIT),
        }
    }
}

impl DisplayOps for Ili9488 {
    fn profile(&self) -> &PanelProfile {
        &self.profile
    }
}
