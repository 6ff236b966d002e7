//! 1P5623 480x320, an R61581 derivative

use embedded_hal_async::delay::DelayNs;
use strobe_core::display::{DisplayError, DisplayOps, InitStep, PanelIo, PanelProfile};
use strobe_core::Area;
use strobe_hal::{BusTransport, BusWidth, OutputPin};

use super::{register_width_for, stream_high_byte_first_on_8bit};

const INIT: &[InitStep] = &[
    InitStep::Reset,
    InitStep::delay(120),
    InitStep::cmd(0x11, &[]),
    InitStep::delay(20),
    // VCI1, VCL, VGH, VGL, DDVDH, VREG1OUT amplitude
    InitStep::cmd(0xD0, &[0x07, 0x42, 0x1D]),
    // VCOMH, VCOM_AC amplitude
    InitStep::cmd(0xD1, &[0x00, 0x1A, 0x09]),
    // Op-amp current, charge pump frequency
    InitStep::cmd(0xD2, &[0x01, 0x22]),
    // REV, SM, GS
    InitStep::cmd(0xC0, &[0x10, 0x3B, 0x00, 0x02, 0x11]),
    // 72 Hz frame rate
    InitStep::cmd(0xC5, &[0x03]),
    InitStep::cmd(
        0xC8,
        &[0x00, 0x25, 0x21, 0x05, 0x00, 0x0A, 0x65, 0x25, 0x77, 0x50, 0x0F, 0x00],
    ),
    InitStep::cmd(0x0D, &[0x00, 0x00]),
    InitStep::cmd(0xF8, &[0x01]),
    InitStep::cmd(0xFE, &[0x00, 0x02]),
    InitStep::cmd(0x20, &[]),
    // Page/column exchange, BGR
    InitStep::cmd(0x36, &[(1 << 5) | (1 << 3)]),
    InitStep::cmd(0x3A, &[0x55]),
    InitStep::cmd(0x29, &[]),
    InitStep::cmd(0x21, &[]),
];

pub struct P1p5623 {
    profile: PanelProfile,
}

impl P1p5623 {
    pub const XRES: u16 = 480;
    pub const YRES: u16 = 320;

    pub const fn new(bus_width: BusWidth) -> Self {
        Self {
            profile: PanelProfile::new("1p5623", Self::XRES, Self::YRES, bus_width)
                .with_register_width(register_width_for(bus_width))
                .with_init(INIT),
        }
    }
}

impl DisplayOps for P1p5623 {
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
