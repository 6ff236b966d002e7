//! Panel controller
//!
//! A panel is described by a [`PanelProfile`], driven through a [`PanelIo`],
//! and operated by a [`DisplayOps`] implementation that overrides whatever
//! its controller does differently from the defaults.

mod controller;
mod io;
mod ops;
mod profile;

pub use controller::{display_probe, DisplayController, FrameSink};
pub use io::{PanelIo, PanelPins, RESET_PHASE_MS, SCRATCH_LEN};
pub use ops::{
    fill_panel, stream_frame, DisplayOps, CMD_DISPOFF, CMD_DISPON, CMD_SLPIN, CMD_SLPOUT,
    SLEEP_OUT_MS,
};
pub use profile::{
    AddrEncoding, AddrOpcodes, InitStep, PanelProfile, RegisterWidth, Rotation, SUPPORTED_BPP,
};

/// Errors from panel operations after probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The bus transport reported a failure
    Bus,
    /// Register parameters do not fit the scratch buffer
    ParamsTooLong,
    /// Window start lies past its end
    InvalidArea,
    /// Operation has no implementation for this panel
    MissingOperation(&'static str),
}
