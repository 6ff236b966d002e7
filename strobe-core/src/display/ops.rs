//! Panel operation set
//!
//! Every panel gets the same operation set. [`DisplayOps`] provides a
//! default for each operation; a panel type overrides only what its
//! controller does differently, and the resulting set is fixed once the
//! controller is probed.

use embedded_hal_async::delay::DelayNs;
use strobe_hal::{BusData, BusTransport, OutputPin, Phase};

use super::io::PanelIo;
use super::profile::{AddrEncoding, InitStep, PanelProfile};
use super::DisplayError;
use crate::area::Area;

/// MIPI DCS sleep in
pub const CMD_SLPIN: u16 = 0x10;
/// MIPI DCS sleep out
pub const CMD_SLPOUT: u16 = 0x11;
/// MIPI DCS display off
pub const CMD_DISPOFF: u16 = 0x28;
/// MIPI DCS display on
pub const CMD_DISPON: u16 = 0x29;

/// Settle time after leaving sleep before the next command
pub const SLEEP_OUT_MS: u32 = 120;

/// Operations of one panel controller
///
/// Methods are generic over the I/O types so the same panel type drives a
/// PIO bus on hardware and a recording bus in tests.
#[allow(async_fn_in_trait)]
pub trait DisplayOps {
    fn profile(&self) -> &PanelProfile;

    /// Bring the controller out of reset into a displayable state
    ///
    /// Runs the profile's init table. A profile without a table must
    /// override this.
    async fn init_display<B, P, D>(&self, io: &mut PanelIo<B, P, D>) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        let Some(steps) = self.profile().init else {
            return Err(DisplayError::MissingOperation("init_display"));
        };
        for step in steps {
            match *step {
                InitStep::Write { reg, params } => io.write_reg(reg, params).await?,
                InitStep::DelayMs(ms) => io.delay_ms(ms).await,
                InitStep::Reset => self.reset(io).await?,
            }
        }
        Ok(())
    }

    async fn reset<B, P, D>(&self, io: &mut PanelIo<B, P, D>) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        io.reset_pulse().await;
        Ok(())
    }

    /// Fill the whole panel with one colour
    ///
    /// Sets the full-screen window once, then writes every pixel as its own
    /// data phase. Only used at boot.
    async fn clear<B, P, D>(&self, io: &mut PanelIo<B, P, D>, color: u16) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        fill_panel(self, io, color).await
    }

    /// Turn the panel output off (`true`) or back on
    async fn blank<B, P, D>(&self, io: &mut PanelIo<B, P, D>, on: bool) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        io.write_reg(if on { CMD_DISPOFF } else { CMD_DISPON }, &[]).await
    }

    /// Enter (`true`) or leave sleep mode
    async fn sleep<B, P, D>(&self, io: &mut PanelIo<B, P, D>, on: bool) -> Result<(), DisplayError>
    where
        B: BusTransport,
        P: OutputPin,
        D: DelayNs,
    {
        if on {
            io.write_reg(CMD_SLPIN, &[]).await
        } else {
            io.write_reg(CMD_SLPOUT, &[]).await?;
            io.delay_ms(SLEEP_OUT_MS).await;
            Ok(())
        }
    }

    /// Column set, row set, memory write start
    ///
    /// Pixel data written right after this lands in `area`.
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
        if !area.is_valid() {
            return Err(DisplayError::InvalidArea);
        }
        let profile = self.profile();
        let opcodes = profile.addr_opcodes;
        match profile.addr_encoding {
            AddrEncoding::Split8 => {
                io.write_reg(opcodes.column, &split(area.xs, area.xe)).await?;
                io.write_reg(opcodes.row, &split(area.ys, area.ye)).await?;
            }
            AddrEncoding::Packed16 => {
                io.write_reg(opcodes.column, &[area.xs, area.xe]).await?;
                io.write_reg(opcodes.row, &[area.ys, area.ye]).await?;
            }
        }
        io.write_reg(opcodes.write_start, &[]).await
    }

    /// Stream one frame's pixels into `area`
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
        stream_frame(self, io, area, BusData::Words(pixels)).await
    }
}

/// Address window followed by one data phase carrying the pixels
///
/// The default `frame_sync` streams `Words`; controllers that expect the
/// pixel bytes exchanged call this with `SwappedWords` from their override.
pub async fn stream_frame<O, B, P, D>(
    ops: &O,
    io: &mut PanelIo<B, P, D>,
    area: Area,
    pixels: BusData<'_>,
) -> Result<(), DisplayError>
where
    O: DisplayOps + ?Sized,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    ops.set_addr_window(io, area).await?;
    io.write_bus(pixels, Phase::Data).await
}

/// Full-screen window followed by `xres * yres` single-pixel writes
///
/// The default `clear`; panel types that need the colour transformed call
/// this from their override.
pub async fn fill_panel<O, B, P, D>(
    ops: &O,
    io: &mut PanelIo<B, P, D>,
    color: u16,
) -> Result<(), DisplayError>
where
    O: DisplayOps + ?Sized,
    B: BusTransport,
    P: OutputPin,
    D: DelayNs,
{
    let profile = ops.profile();
    debug!("clearing {} to {=u16:#x}", profile.name, color);
    ops.set_addr_window(io, profile.full_area()).await?;
    for _ in 0..profile.pixel_count() {
        io.write_bus(BusData::Words(&[color]), Phase::Data).await?;
    }
    Ok(())
}

/// Start/end pair as four byte parameters, high byte first
fn split(start: u16, end: u16) -> [u16; 4] {
    [start >> 8, start & 0xFF, end >> 8, end & 0xFF]
}

#[cfg(test)]
mod tests {
    use super::super::io::mock::*;
    use super::super::profile::RegisterWidth;
    use super::*;
    use embassy_futures::block_on;
    use proptest::prelude::*;
    use strobe_hal::BusWidth;

    struct Generic(PanelProfile);

    impl DisplayOps for Generic {
        fn profile(&self) -> &PanelProfile {
            &self.0
        }
    }

    struct Swapping(PanelProfile);

    impl DisplayOps for Swapping {
        fn profile(&self) -> &PanelProfile {
            &self.0
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

    static INIT: [InitStep; 4] = [
        InitStep::Reset,
        InitStep::cmd(0x11, &[]),
        InitStep::delay(120),
        InitStep::cmd(0x36, &[0x48]),
    ];

    fn panel(xres: u16, yres: u16) -> Generic {
        Generic(PanelProfile::new("generic", xres, yres, BusWidth::Bits8))
    }

    #[test]
    fn test_addr_window_sequence() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        block_on(panel(480, 320).set_addr_window(&mut io, Area::new(0, 0, 479, 319))).unwrap();

        assert_eq!(
            writes(&log),
            [
                cmd(&[0x2A]),
                data(&[0x00, 0x00, 0x01, 0xDF]),
                cmd(&[0x2B]),
                data(&[0x00, 0x00, 0x01, 0x3F]),
                cmd(&[0x2C]),
            ]
        );
    }

    #[test]
    fn test_addr_window_packed16() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits16, RegisterWidth::Bits16, &log);
        let ops = Generic(
            PanelProfile::new("packed", 240, 320, BusWidth::Bits16)
                .with_register_width(RegisterWidth::Bits16)
                .with_addr_encoding(AddrEncoding::Packed16),
        );

        block_on(ops.set_addr_window(&mut io, Area::new(10, 20, 229, 299))).unwrap();

        assert_eq!(
            writes(&log),
            [
                cmd(&[0x2A]),
                data(&[10, 229]),
                cmd(&[0x2B]),
                data(&[20, 299]),
                cmd(&[0x2C]),
            ]
        );
    }

    #[test]
    fn test_addr_window_rejects_inverted_area() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        let result = block_on(panel(480, 320).set_addr_window(&mut io, Area::new(5, 0, 4, 0)));

        assert_eq!(result, Err(DisplayError::InvalidArea));
        assert!(writes(&log).is_empty());
    }

    #[test]
    fn test_frame_sync_streams_after_window() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let pixels = [0xF800, 0x07E0];

        block_on(panel(480, 320).frame_sync(&mut io, Area::new(0, 0, 1, 0), &pixels)).unwrap();

        let writes = writes(&log);
        assert_eq!(writes.len(), 6);
        assert_eq!(writes[4], cmd(&[0x2C]));
        // 2 pixels * 2 bytes on an 8-bit bus, memory order
        assert_eq!(writes[5], data(&[0x00, 0xF8, 0xE0, 0x07]));
    }

    #[test]
    fn test_swapped_frame_sync() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let ops = Swapping(PanelProfile::new("swap", 480, 320, BusWidth::Bits8));

        block_on(ops.frame_sync(&mut io, Area::new(0, 0, 0, 0), &[0xF800])).unwrap();

        assert_eq!(writes(&log)[5], data(&[0xF8, 0x00]));
    }

    #[test]
    fn test_clear_fills_full_window() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        block_on(panel(3, 2).clear(&mut io, 0x001F)).unwrap();

        let writes = writes(&log);
        assert_eq!(writes[1], data(&[0, 0, 0, 2]));
        assert_eq!(writes[3], data(&[0, 0, 0, 1]));
        assert_eq!(writes[4], cmd(&[0x2C]));
        // One data phase per pixel, each carrying one 2-byte colour
        assert_eq!(writes.len(), 5 + 3 * 2);
        assert!(writes[5..].iter().all(|w| *w == data(&[0x1F, 0x00])));
    }

    #[test]
    fn test_init_runs_table_in_order() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let ops = Generic(PanelProfile::new("init", 480, 320, BusWidth::Bits8).with_init(&INIT));

        block_on(ops.init_display(&mut io)).unwrap();

        let events = log.borrow();
        assert_eq!(events[0], Event::Pin("rst", true));
        assert_eq!(events[6], Event::Bus(cmd(&[0x11])));
        assert_eq!(events[7], Event::Delay(120));
        assert_eq!(events[8], Event::Bus(cmd(&[0x36])));
        assert_eq!(events[9], Event::Bus(data(&[0x48])));
    }

    #[test]
    fn test_init_without_table_is_missing() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

        assert_eq!(
            block_on(panel(480, 320).init_display(&mut io)),
            Err(DisplayError::MissingOperation("init_display"))
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_blank_and_sleep() {
        let log = Log::default();
        let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);
        let ops = panel(480, 320);

        block_on(ops.blank(&mut io, true)).unwrap();
        block_on(ops.blank(&mut io, false)).unwrap();
        block_on(ops.sleep(&mut io, true)).unwrap();
        block_on(ops.sleep(&mut io, false)).unwrap();

        assert_eq!(
            writes(&log),
            [cmd(&[0x28]), cmd(&[0x29]), cmd(&[0x10]), cmd(&[0x11])]
        );
        assert_eq!(log.borrow().last(), Some(&Event::Delay(SLEEP_OUT_MS)));
    }

    proptest! {
        #[test]
        fn prop_window_is_column_row_start(
            xs in 0u16..480, ys in 0u16..320, w in 0u16..480, h in 0u16..320
        ) {
            let area = Area::new(xs, ys, xs.saturating_add(w).min(479), ys.saturating_add(h).min(319));
            let log = Log::default();
            let mut io = io(BusWidth::Bits8, RegisterWidth::Bits8, &log);

            block_on(panel(480, 320).set_addr_window(&mut io, area)).unwrap();

            let writes = writes(&log);
            prop_assert_eq!(writes.len(), 5);
            prop_assert_eq!(&writes[0], &cmd(&[0x2A]));
            prop_assert_eq!(&writes[1], &data(&split(area.xs, area.xe)));
            prop_assert_eq!(&writes[2], &cmd(&[0x2B]));
            prop_assert_eq!(&writes[3], &data(&split(area.ys, area.ye)));
            prop_assert_eq!(&writes[4], &cmd(&[0x2C]));
        }
    }
}
