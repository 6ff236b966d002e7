//! ILI9806 480x854
//!
//! Registers follow the bus width. On an 8-bit bus the controller takes the
//! high byte of each RGB565 pixel first, so frames are streamed swapped.

use embedded_hal_async::delay::DelayNs;
use strobe_core::display::{DisplayError, DisplayOps, InitStep, PanelIo, PanelProfile};
use strobe_core::Area;
use strobe_hal::{BusTransport, BusWidth, OutputPin};

use super::{register_width_for, stream_high_byte_first_on_8bit};

const INIT: &[InitStep] = &[
    InitStep::Reset,
    // EXTC command set enable
    InitStep::cmd(0xFF, &[0xFF, 0x98, 0x06]),
    InitStep::cmd(0xB1, &[0x00, 0x13, 0x16]),
    InitStep::cmd(0xB4, &[0x00, 0x00, 0x00]),
    // GIP timing
    InitStep::cmd(
        0xBC,
        &[
            0x03, 0x0E, 0x63, 0x69, 0x01, 0x01, 0x1B, 0x10, 0x6F, 0x63, 0xFF, 0xFF, 0x01, 0x01,
            0x01, 0x01, 0xFF, 0xF2, 0xC1,
        ],
    ),
    InitStep::cmd(0xBD, &[0x01, 0x23, 0x45, 0x67, 0x01, 0x23, 0x45, 0x67]),
    InitStep::cmd(0xBE, &[0x00, 0x22, 0x27, 0x6A, 0xBC, 0xD8, 0x92, 0x22, 0x22]),
    // Power control
    InitStep::cmd(0xC0, &[0x03, 0x0B, 0x02]),
    InitStep::cmd(0xC1, &[0x17, 0x50, 0x50]),
    // VCOM
    InitStep::cmd(0xC7, &[0x25]),
    InitStep::cmd(0xDF, &[0x00, 0x00, 0x00, 0x00, 0x00, 0x20]),
    InitStep::cmd(
        0xE0,
        &[
            0x00, 0x0E, 0x14, 0x0C, 0x0E, 0x0A, 0x06, 0x03, 0x09, 0x0C, 0x13, 0x10, 0x0F, 0x14,
            0x0B, 0x00,
        ],
    ),
    InitStep::cmd(
        0xE1,
        &[
            0x00, 0x08, 0x10, 0x0E, 0x0F, 0x0C, 0x08, 0x05, 0x07, 0x0B, 0x12, 0x10, 0x0E, 0x17,
            0x0F, 0x00,
        ],
    ),
    InitStep::cmd(0xED, &[0x7F, 0x0F, 0x00]),
    InitStep::cmd(0xF1, &[0x29, 0x8A, 0x07]),
    InitStep::cmd(0xF2, &[0x40, 0xD2, 0x50, 0x28]),
    InitStep::cmd(0xF3, &[0x74]),
    // 480x854 resolution select
    InitStep::cmd(0xF7, &[0x81]),
    InitStep::cmd(0xFC, &[0x08]),
    InitStep::cmd(0x3A, &[0x55]),
    InitStep::cmd(0x36, &[(1 << 6) | (1 << 5)]),
    // Tearing effect off
    InitStep::cmd(0x34, &[]),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(120),
    InitStep::cmd(0x20, &[]),
    InitStep::cmd(0x29, &[]),
];

pub struct Ili9806 {
    profile: PanelProfile,
}

impl Ili9806 {
    pub const XRES: u16 = 480;
    pub const YRES: u16 = 854;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("ili9806", Self::XRES, Self::YRES, bus_width)
                .with_register_width(register_width_for(bus_width))
                .with_init(INIT),
        }
    }
}

impl DisplayOps for Ili9806 {
    fn profile(&self) -> &PanelProfile {
        &self.profile
    }

    async fn frame_sync<B, P, D>(
        &self,
        io: &mut PanelIo<B, P, D>,
        area: Area,
        pixels: &[u16],
    ) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        stream_high_byte_first_on_8bit(self, io, area, pixels).await
    }
}
