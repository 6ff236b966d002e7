//! Probed panel handle

use embedded_hal_async::delay::DelayNs;
use strobe_hal::{BusTransport, OutputPin};

use super::io::PanelIo;
use super::ops::DisplayOps;
use super::profile::PanelProfile;
use super::DisplayError;
use crate::area::Area;
use crate::error::ProbeError;
use crate::flush::VideoFrame;

/// Consumer of rendered frames
///
/// The flush worker only needs to push a frame somewhere; the display
/// controller is the production sink.
#[allow(async_fn_in_trait)]
pub trait FrameSink {
    type Error;

    async fn frame_sync(&mut self, frame: &VideoFrame<'_>) -> Result<(), Self::Error>;
}

impl<T: FrameSink + ?Sized> FrameSink for &mut T {
    type Error = T::Error;

    async fn frame_sync(&mut self, frame: &VideoFrame<'_>) -> Result<(), Self::Error> {
        T::frame_sync(self, frame).await
    }
}

/// A panel that has been probed and initialised
///
/// The operation set is fixed at probe time and never changes afterwards.
pub struct DisplayController<O, B, P, D> {
    ops: O,
    io: PanelIo<B, P, D>,
}

/// Validate, initialise and clear a panel
///
/// On success the panel shows black with the backlight on. Any failure is
/// fatal for this panel and is returned before a controller exists.
pub async fn display_probe<O, B, P, D>(
    ops: O,
    mut io: PanelIo<B, P, D>,
) -> Result<DisplayController<O, B, P, D>, ProbeError>
where
    O: DisplayOps,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    let profile = ops.profile();
    profile.validate()?;

    let bus = io.bus_width();
    if bus != profile.bus_width {
        error!(
            "{}: profile wants a {}-bit bus, transport is {}-bit",
            profile.name,
            profile.bus_width.bits(),
            bus.bits()
        );
        return Err(ProbeError::BusWidthMismatch {
            profile: profile.bus_width.bits(),
            bus: bus.bits(),
        });
    }

    info!(
        "probing {} ({}x{}, {}-bit bus)",
        profile.name,
        profile.xres,
        profile.yres,
        bus.bits()
    );

    io.set_read_idle();
    ops.init_display(&mut io).await?;
    ops.clear(&mut io, 0x0000).await?;
    io.set_backlight(true);

    info!("{} ready", ops.profile().name);
    Ok(DisplayController { ops, io })
}

impl<O, B, P, D> DisplayController<O, B, P, D>
where
    O: DisplayOps,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    pub fn profile(&self) -> &PanelProfile {
        self.ops.profile()
    }

    /// Panel resolution as (columns, rows)
    pub fn resolution(&self) -> (u16, u16) {
        let profile = self.ops.profile();
        (profile.xres, profile.yres)
    }

    pub async fn clear(&mut self, color: u16) -> Result<(), DisplayError> {
        self.ops.clear(&mut self.io, color).await
    }

    pub async fn blank(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ops.blank(&mut self.io, on).await
    }

    pub async fn sleep(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ops.sleep(&mut self.io, on).await
    }

    pub async fn set_addr_window(&mut self, area: Area) -> Result<(), DisplayError> {
        self.ops.set_addr_window(&mut self.io, area).await
    }

    /// Write a register at the panel's register width
    pub async fn write_reg(&mut self, reg: u16, params: &[u16]) -> Result<(), DisplayError> {
        self.io.write_reg(reg, params).await
    }

    pub fn set_backlight(&mut self, on: bool) {
        self.io.set_backlight(on);
    }

    /// Tear the controller down into its operations and I/O
    pub fn release(self) -> (O, PanelIo<B, P, D>) {
        (self.ops, self.io)
    }
}

impl<O, B, P, D> FrameSink for DisplayController<O, B, P, D>
where
    O: DisplayOps,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    type Error = DisplayError;

    async fn frame_sync(&mut self, frame: &VideoFrame<'_>) -> Result<(), DisplayError> {
        self.ops
            .frame_sync(&mut self.io, frame.area(), frame.pixels())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::io::mock::*;
    use super::super::profile::{InitStep, RegisterWidth};
    use super::*;
    use embassy_futures::block_on;
    use strobe_hal::BusWidth;

    struct Panel(PanelProfile);

    impl DisplayOps for Panel {
        fn profile(&self) -> &PanelProfile {
            &self.0
        }
    }

    static INIT: [InitStep; 2] = [InitStep::Reset, InitStep::cmd(0x29, &[])];

    fn panel(width: BusWidth) -> Panel {
        Panel(PanelProfile::new("test", 2, 2, width).with_init(&INIT))
    }

    #[test]
    fn test_probe_sequence() {
        let log = Log::default();
        let io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        let display = block_on(display_probe(panel(BusWidth::Bits8), io)).unwrap();
        assert_eq!(display.resolution(), (2, 2));

        let events = log.borrow();
        assert_eq!(events[0], Event::Pin("rd", true));
        assert_eq!(events[1], Event::Pin("rst", true));
        assert_eq!(events[7], Event::Bus(cmd(&[0x29])));
        // Display on, then a full window and 4 single-pixel writes
        assert_eq!(writes(&log).len(), 1 + 5 + 4);
        assert_eq!(events.last(), Some(&Event::Pin("bl", true)));
    }

    #[test]
    fn test_probe_bus_width_mismatch() {
        let log = Log::default();
        let io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        let result = block_on(display_probe(panel(BusWidth::Bits16), io));

        assert!(matches!(
            result,
            Err(ProbeError::BusWidthMismatch { profile: 16, bus: 8 })
        ));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_probe_missing_init() {
        let log = Log::default();
        let io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let ops = Panel(PanelProfile::new("bare", 2, 2, BusWidth::Bits8));

        let result = block_on(display_probe(ops, io));

        assert!(matches!(
            result,
            Err(ProbeError::MissingOperation("init_display"))
        ));
        assert!(writes(&log).is_empty());
    }

    #[test]
    fn test_probe_bus_failure() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        io.fail_after(0);

        let result = block_on(display_probe(panel(BusWidth::Bits8), io));

        assert!(matches!(result, Err(ProbeError::Display(DisplayError::Bus))));
    }

    #[test]
    fn test_frame_sync_through_sink() {
        let log = Log::default();
        let io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let mut display = block_on(display_probe(panel(BusWidth::Bits8), io)).unwrap();
        log.borrow_mut().clear();

        let pixels = [0xFFFF, 0x0000];
        let frame = VideoFrame::new(Area::new(0, 1, 1, 1), &pixels).unwrap();
        block_on(display.frame_sync(&frame)).unwrap();

        let writes = writes(&log);
        assert_eq!(writes[3], data(&[0, 1, 0, 1]));
        assert_eq!(writes[5], data(&[0xFF, 0xFF, 0x00, 0x00]));
    }
}
