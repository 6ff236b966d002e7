//! R61581 480x320
//!
//! The controller's colour order is fixed, so pixel bytes are exchanged on
//! every bus width, including the boot clear colour.

use embedded_hal_async::delay::DelayNs;
use strobe_core::display::{
    fill_panel, stream_frame, DisplayError, DisplayOps, InitStep, PanelIo, PanelProfile,
};
use strobe_core::Area;
use strobe_hal::{BusData, BusTransport, BusWidth, OutputPin};

const INIT: &[InitStep] = &[
    InitStep::Reset,
    InitStep::delay(150),
    // Manufacturer command access
    InitStep::cmd(0xB0, &[0x00]),
    // Frame memory access and interface setting
    InitStep::cmd(0xB3, &[0x02, 0x00, 0x00, 0x00]),
    // Panel driving setting
    InitStep::cmd(0xC0, &[0x13, 0x3B, 0x00, 0x02, 0x00, 0x01, 0x00, 0x43]),
    // Display timing, normal mode
    InitStep::cmd(0xC1, &[0x08, 0x16, 0x08, 0x08]),
    InitStep::cmd(0xC4, &[0x11, 0x07, 0x03, 0x03]),
    InitStep::cmd(0xC6, &[0x00]),
    // Gamma
    InitStep::cmd(
        0xC8,
        &[
            0x03, 0x03, 0x13, 0x5C, 0x03, 0x07, 0x14, 0x08, 0x00, 0x21, 0x08, 0x14, 0x07, 0x53,
            0x0C, 0x13, 0x03, 0x03, 0x21, 0x00,
        ],
    ),
    InitStep::cmd(0x0C, &[0x55]),
    InitStep::cmd(0x38, &[]),
    InitStep::cmd(0x3A, &[0x55]),
    // Power setting, VCOM
    InitStep::cmd(0xD0, &[0x07, 0x07, 0x1D, 0x03]),
    InitStep::cmd(0xD1, &[0x03, 0x30, 0x10]),
    InitStep::cmd(0xD2, &[0x03, 0x14, 0x04]),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(10),
    InitStep::cmd(0x29, &[]),
];

pub struct R61581 {
    profile: PanelProfile,
}

impl R61581 {
    pub const XRES: u16 = 480;
    pub const YRES: u16 = 320;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("r61581", Self::XRES, Self::YRES, bus_width)
                .with_init(INIT),
        }
    }
}

impl DisplayOps for R61581 {
    fn profile(&self) -> &PanelProfile {
        &self.profile
    }

    async fn clear<B, P, D>(&self, io: &mut PanelIo<B, P, D>, color: u16) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        fill_panel(self, io, color.swap_bytes()).await
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
        stream_frame(self, io, area, BusData::SwappedWords(pixels)).await
    }
}
