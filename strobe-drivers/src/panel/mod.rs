//! Panel profiles
//!
//! Each panel type carries its profile and overrides only the operations
//! its controller needs. [`Panel`] selects one by name at boot.

mod ili9488;
mod ili9806;
mod p1p5623;
mod r61581;
mod st6201;
mod st7789;

pub use ili9488::Ili9488;
pub use ili9806::Ili9806;
pub use p1p5623::P1p5623;
pub use r61581::R61581;
pub use st6201::St6201;
pub use st7789::St7789;

use embedded_hal_async::delay::DelayNs;
use strobe_core::display::{stream_frame, DisplayError, DisplayOps, PanelIo, PanelProfile, RegisterWidth};
use strobe_core::Area;
use strobe_hal::{BusData, BusTransport, BusWidth, OutputPin};

/// Controllers whose register width follows the data bus
pub(crate) const fn register_width_for(bus_width: BusWidth) -> RegisterWidth {
    match bus_width {
        BusWidth::Bits8 => RegisterWidth::Bits8,
        BusWidth::Bits16 => RegisterWidth::Bits16,
    }
}

/// `frame_sync` for controllers that want the high pixel byte first on an
/// 8-bit bus and plain words on a 16-bit bus
pub(crate) async fn stream_high_byte_first_on_8bit<O, B, P, D>(
    ops: &O,
    io: &mut PanelIo<B, P, D>,
    area: Area,
    pixels: &[u16],
) -> Result<(), DisplayError>
where
    O: DisplayOps,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    let data = match ops.profile().bus_width {
        BusWidth::Bits8 => BusData::SwappedWords(pixels),
        BusWidth::Bits16 => BusData::Words(pixels),
    };
    stream_frame(ops, io, area, data).await
}

/// Any supported panel
pub enum Panel {
    Ili9488(Ili9488),
    St7789(St7789),
    Ili9806(Ili9806),
    R61581(R61581),
    St6201(St6201),
    P1p5623(P1p5623),
}

impl Panel {
    /// Look a panel up by its board-file name
    pub fn from_name(name: &str, bus_width: BusWidth) -> Option<Self> {
        let panel = match name {
            "ili9488" => Self::Ili9488(Ili9488::new(bus_width)),
            "st7789" => Self::St7789(St7789::new(bus_width)),
            "ili9806" => Self::Ili9806(Ili9806::new(bus_width)),
            "r61581" => Self::R61581(R61581::new(bus_width)),
            "st6201" => Self::St6201(St6201::new(bus_width)),
            "1p5623" => Self::P1p5623(P1p5623::new(bus_width)),
            _ => {
                warn!("unknown panel");
                return None;
            }
        };
        Some(panel)
    }
}

/// Forward an operation to the selected panel type
macro_rules! dispatch {
    ($self:ident, $panel:ident => $call:expr) => {
        match $self {
            Panel::Ili9488($panel) => $call,
            Panel::St7789($panel) => $call,
            Panel::Ili9806($panel) => $call,
            Panel::R61581($panel) => $call,
            Panel::St6201($panel) => $call,
            Panel::P1p5623($panel) => $call,
        }
    };
}

impl DisplayOps for Panel {
    fn profile(&self) -> &PanelProfile {
        dispatch!(self, p => p.profile())
    }

    async fn init_display<B, P, D>(&self, io: &mut PanelIo<B, P, D>) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.init_display(io).await)
    }

    async fn reset<B, P, D>(&self, io: &mut PanelIo<B, P, D>) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.reset(io).await)
    }

    async fn clear<B, P, D>(&self, io: &mut PanelIo<B, P, D>, color: u16) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.clear(io, color).await)
    }

    async fn blank<B, P, D>(&self, io: &mut PanelIo<B, P, D>, on: bool) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.blank(io, on).await)
    }

    async fn sleep<B, P, D>(&self, io: &mut PanelIo<B, P, D>, on: bool) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.sleep(io, on).await)
    }

    async fn set_addr_window<B, P, D>(
        &self,
        io: &mut PanelIo<B, P, D>,
        area: Area,
    ) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        dispatch!(self, p => p.set_addr_window(io, area).await)
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
        dispatch!(self, p => p.frame_sync(io, area, pixels).await)
    }
}
