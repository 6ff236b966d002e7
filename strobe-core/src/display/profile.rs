//! Panel profile data
//!
//! A profile is the static description of one panel controller: its
//! geometry, how it is wired, how its address window registers are laid
//! out, and the register sequence that brings it out of reset.

use strobe_hal::BusWidth;

use crate::area::Area;
use crate::error::ProbeError;

/// Only RGB565 is streamed
pub const SUPPORTED_BPP: u8 = 16;

/// Panel scan orientation, as programmed into the controller's MADCTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

/// Width of register opcodes and parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterWidth {
    /// One byte per opcode/parameter (MIPI DCS controllers)
    #[default]
    Bits8,
    /// One 16-bit word per opcode/parameter
    Bits16,
}

/// Opcodes of the three-step address window sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddrOpcodes {
    /// Column address set
    pub column: u16,
    /// Row (page) address set
    pub row: u16,
    /// Memory write start
    pub write_start: u16,
}

impl AddrOpcodes {
    /// CASET / PASET / RAMWR
    pub const MIPI: Self = Self {
        column: 0x2A,
        row: 0x2B,
        write_start: 0x2C,
    };
}

impl Default for AddrOpcodes {
    fn default() -> Self {
        Self::MIPI
    }
}

/// How start/end coordinates are packed into the window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddrEncoding {
    /// Four parameters: start high, start low, end high, end low
    #[default]
    Split8,
    /// Two parameters: start and end as whole 16-bit words
    Packed16,
}

/// One step of a panel bring-up sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Write a register with its parameters
    Write {
        reg: u16,
        params: &'static [u16],
    },
    /// Wait before the next step
    DelayMs(u32),
    /// Pulse the hardware reset line
    Reset,
}

impl InitStep {
    pub const fn cmd(reg: u16, params: &'static [u16]) -> Self {
        Self::Write { reg, params }
    }

    pub const fn delay(ms: u32) -> Self {
        Self::DelayMs(ms)
    }
}

/// Static description of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelProfile {
    pub name: &'static str,
    pub xres: u16,
    pub yres: u16,
    pub bpp: u8,
    pub rotation: Rotation,
    pub bus_width: BusWidth,
    pub register_width: RegisterWidth,
    pub addr_opcodes: AddrOpcodes,
    pub addr_encoding: AddrEncoding,
    /// Bring-up sequence; `None` means the profile's ops must override `init_display`
    pub init: Option<&'static [InitStep]>,
}

impl PanelProfile {
    /// Profile with MIPI defaults and no init table
    pub const fn new(name: &'static str, xres: u16, yres: u16, bus_width: BusWidth) -> Self {
        Self {
            name,
            xres,
            yres,
            bpp: SUPPORTED_BPP,
            rotation: Rotation::Deg0,
            bus_width,
            register_width: RegisterWidth::Bits8,
            addr_opcodes: AddrOpcodes::MIPI,
            addr_encoding: AddrEncoding::Split8,
            init: None,
        }
    }

    pub const fn with_init(mut self, init: &'static [InitStep]) -> Self {
        self.init = Some(init);
        self
    }

    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub const fn with_register_width(mut self, register_width: RegisterWidth) -> Self {
        self.register_width = register_width;
        self
    }

    pub const fn with_addr_encoding(mut self, addr_encoding: AddrEncoding) -> Self {
        self.addr_encoding = addr_encoding;
        self
    }

    /// Same panel wired to a bus of a different width
    pub const fn on_bus(mut self, bus_width: BusWidth) -> Self {
        self.bus_width = bus_width;
        self
    }

    pub const fn full_area(&self) -> Area {
        Area::full(self.xres, self.yres)
    }

    pub const fn pixel_count(&self) -> usize {
        self.xres as usize * self.yres as usize
    }

    /// Check the profile against what the stack can drive
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.xres == 0 || self.yres == 0 {
            return Err(ProbeError::InvalidProfile("zero resolution"));
        }
        if self.bpp != SUPPORTED_BPP {
            return Err(ProbeError::InvalidProfile("unsupported bpp"));
        }
        Ok(())
    }
}
