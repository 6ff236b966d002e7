//! ST7789 240x320

use strobe_core::display::{DisplayOps, InitStep, PanelProfile};
use strobe_hal::BusWidth;

const INIT: &[InitStep] = &[
    InitStep::Reset,
    InitStep::delay(150),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(120),
    InitStep::cmd(0x36, &[0x00]),
    // 16 bits per pixel
    InitStep::cmd(0x3A, &[0x05]),
    // Porch setting
    InitStep::cmd(0xB2, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    InitStep::cmd(0xB7, &[0x35]),
    InitStep::cmd(0xBB, &[0x37]),
    InitStep::cmd(0xC0, &[0x2C]),
    InitStep::cmd(0xC2, &[0x01]),
    InitStep::cmd(0xC3, &[0x12]),
    InitStep::cmd(0xC4, &[0x20]),
    // 60 Hz frame rate
    InitStep::cmd(0xC6, &[0x0F]),
    InitStep::cmd(0xD0, &[0xA4, 0xA1]),
    InitStep::cmd(0xD6, &[0xA1]),
    InitStep::cmd(
        0xE0,
        &[
            0xD0, 0x08, 0x0E, 0x09, 0x09, 0x05, 0x31, 0x33, 0x48, 0x17, 0x14, 0x15, 0x31, 0x34,
        ],
    ),
    InitStep::cmd(
        0xE1,
        &[
            0xD0, 0x08, 0x0E, 0x09, 0x09, 0x15, 0x31, 0x33, 0x48, 0x17, 0x14, 0x15, 0x31, 0x34,
        ],
    ),
    // Inversion on, display on
    InitStep::cmd(0x21, &[]),
    InitStep::cmd(0x29, &[]),
];

pub struct St7789 {
    profile: PanelProfile,
}

impl St7789 {
    pub const XRES: u16 = 240;
    pub const YRES: u16 = 320;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("st7789", Self::XRES, Self::YRES, bus_width)
                .with_init(INIT),
        }
    }
}

impl DisplayOps for St7789 {
    fn profile(&self) -> &PanelProfile {
        &self.profile
    }
}
