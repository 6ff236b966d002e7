//! ST6201 320x480
//!
//! Same wiring rules as the ILI9806: register width follows the bus, and
//! pixels go high byte first on an 8-bit bus.

use embedded_hal_async::delay::DelayNs;
use strobe_core::display::{DisplayError, DisplayOps, InitStep, PanelIo, PanelProfile};
use strobe_core::Area;
use strobe_hal::{BusTransport, BusWidth, OutputPin};

use super::{register_width_for, stream_high_byte_first_on_8bit};

const INIT: &[InitStep] = &[
    InitStep::Reset,
    // Command table unlock
    InitStep::cmd(0xFF, &[0xA5]),
    // TE output and interface enable
    InitStep::cmd(0xE7, &[0x10]),
    InitStep::cmd(0x35, &[0x00]),
    InitStep::cmd(0x36, &[0xC0]),
    // RGB565
    InitStep::cmd(0x3A, &[0x01]),
    // IPS
    InitStep::cmd(0x40, &[0x01]),
    // 16-bit interface
    InitStep::cmd(0x41, &[0x03]),
    // Vertical back/front porch
    InitStep::cmd(0x44, &[0x15]),
    InitStep::cmd(0x45, &[0x15]),
    InitStep::cmd(0x7D, &[0x03]),
    InitStep::cmd(0xC1, &[0xBB]),
    InitStep::cmd(0xC2, &[0x05]),
    InitStep::cmd(0xC3, &[0x10]),
    InitStep::cmd(0xC6, &[0x3E]),
    InitStep::cmd(0xC7, &[0x25]),
    InitStep::cmd(0xC8, &[0x21]),
    InitStep::cmd(0x7A, &[0x51]),
    InitStep::cmd(0x6F, &[0x49]),
    InitStep::cmd(0x78, &[0x57]),
    InitStep::cmd(0xC9, &[0x00]),
    InitStep::cmd(0x67, &[0x11]),
    InitStep::cmd(0x51, &[0x0A]),
    InitStep::cmd(0x52, &[0x7D]),
    InitStep::cmd(0x53, &[0x0A]),
    InitStep::cmd(0x54, &[0x7D]),
    InitStep::cmd(0x46, &[0x0A]),
    InitStep::cmd(0x47, &[0x2A]),
    InitStep::cmd(0x48, &[0x0A]),
    InitStep::cmd(0x49, &[0x1A]),
    InitStep::cmd(0x44, &[0x15]),
    InitStep::cmd(0x45, &[0x15]),
    InitStep::cmd(0x73, &[0x08]),
    InitStep::cmd(0x74, &[0x10]),
    InitStep::cmd(0x56, &[0x43]),
    InitStep::cmd(0x57, &[0x42]),
    InitStep::cmd(0x58, &[0x3C]),
    InitStep::cmd(0x59, &[0x64]),
    InitStep::cmd(0x5A, &[0x41]),
    InitStep::cmd(0x5B, &[0x3C]),
    InitStep::cmd(0x5C, &[0x3C]),
    InitStep::cmd(0x5E, &[0x1F]),
    InitStep::cmd(0x60, &[0x80]),
    InitStep::cmd(0x61, &[0x3F]),
    InitStep::cmd(0x62, &[0x21]),
    InitStep::cmd(0x63, &[0x07]),
    InitStep::cmd(0x64, &[0xE0]),
    InitStep::cmd(0x65, &[0x02]),
    InitStep::cmd(0xCA, &[0x20]),
    InitStep::cmd(0xCB, &[0x52]),
    InitStep::cmd(0xCC, &[0x10]),
    InitStep::cmd(0xCD, &[0x42]),
    InitStep::cmd(0xD0, &[0x20]),
    InitStep::cmd(0xD1, &[0x10]),
    InitStep::cmd(0xD2, &[0x10]),
    InitStep::cmd(0xD3, &[0x42]),
    InitStep::cmd(0xD4, &[0x0A]),
    InitStep::cmd(0xD5, &[0x32]),
    // Gamma, positive (0x8x) and negative (0xAx) interleaved
    InitStep::cmd(0x80, &[0x00]),
    InitStep::cmd(0xA0, &[0x00]),
    InitStep::cmd(0x81, &[0x06]),
    InitStep::cmd(0xA1, &[0x08]),
    InitStep::cmd(0x82, &[0x03]),
    InitStep::cmd(0xA2, &[0x03]),
    InitStep::cmd(0x86, &[0x14]),
    InitStep::cmd(0xA6, &[0x14]),
    InitStep::cmd(0x87, &[0x2C]),
    InitStep::cmd(0xA7, &[0x26]),
    InitStep::cmd(0x83, &[0x37]),
    InitStep::cmd(0xA3, &[0x37]),
    InitStep::cmd(0x84, &[0x35]),
    InitStep::cmd(0xA4, &[0x35]),
    InitStep::cmd(0x85, &[0x3F]),
    InitStep::cmd(0xA5, &[0x3F]),
    InitStep::cmd(0x88, &[0x0A]),
    InitStep::cmd(0xA8, &[0x0A]),
    InitStep::cmd(0x89, &[0x13]),
    InitStep::cmd(0xA9, &[0x12]),
    InitStep::cmd(0x8A, &[0x18]),
    InitStep::cmd(0xAA, &[0x19]),
    InitStep::cmd(0x8B, &[0x0A]),
    InitStep::cmd(0xAB, &[0x0A]),
    InitStep::cmd(0x8C, &[0x17]),
    InitStep::cmd(0xAC, &[0x0B]),
    InitStep::cmd(0x8D, &[0x1A]),
    InitStep::cmd(0xAD, &[0x09]),
    InitStep::cmd(0x8E, &[0x1A]),
    InitStep::cmd(0xAE, &[0x08]),
    InitStep::cmd(0x8F, &[0x1F]),
    InitStep::cmd(0xAF, &[0x00]),
    InitStep::cmd(0x90, &[0x08]),
    InitStep::cmd(0xB0, &[0x00]),
    InitStep::cmd(0x91, &[0x10]),
    InitStep::cmd(0xB1, &[0x06]),
    InitStep::cmd(0x92, &[0x19]),
    InitStep::cmd(0xB2, &[0x15]),
    // Command table lock
    InitStep::cmd(0xFF, &[0x00]),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(120),
    InitStep::cmd(0x29, &[]),
    InitStep::delay(20),
];

pub struct St6201 {
    profile: PanelProfile,
}

impl St6201 {
    pub const XRES: u16 = 320;
    pub const YRES: u16 = 480;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("st6201", Self::XRES, Self::YRES, bus_width)
                .with_register_width(register_width_for(bus_width))
                .with_init(INIT),
        }
    }
}

impl DisplayOps for St6201 {
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
