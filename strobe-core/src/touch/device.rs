//! Screen-space touch device

use core::mem;

use embedded_hal::delay::DelayNs;
use strobe_hal::OutputPin;

use super::backend::{TouchBackend, TouchProfile};
use super::{Axis, Direction, TouchError};
use crate::error::ProbeError;

/// How one logical screen axis is derived from the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    /// Physical axis sampled for this logical axis
    pub source: Axis,
    /// Native resolution, the reference point for inversion
    pub res: u16,
    pub offs: i16,
    pub invert: bool,
    /// Screen pixels per native unit
    pub scale: f32,
}

impl AxisMap {
    fn base(profile: &TouchProfile, axis: Axis, screen: u16) -> Self {
        let res = profile.resolution(axis);
        Self {
            source: axis,
            res,
            offs: profile.offset(axis),
            invert: false,
            scale: screen as f32 / res as f32,
        }
    }

    /// Offset, invert, scale, then clamp into `0..limit`
    fn apply(&self, raw: u16, limit: u16) -> u16 {
        let mut value = raw as i32 + self.offs as i32;
        if self.invert {
            value = self.res as i32 - value;
        }
        let scaled = value as f32 * self.scale;
        if scaled <= 0.0 {
            return 0;
        }
        (scaled as u32).min(limit.saturating_sub(1) as u32) as u16
    }
}

/// The pair of logical axis mappings
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mapping {
    x: AxisMap,
    y: AxisMap,
}

impl Mapping {
    /// Exchange the physical axes the two logical axes sample
    ///
    /// Resolution, offset, inversion and scale stay with the logical axis.
    fn swap(&mut self) {
        mem::swap(&mut self.x.source, &mut self.y.source);
    }
}

/// A probed touch controller producing screen coordinates
pub struct TouchDevice<T> {
    backend: T,
    screen: (u16, u16),
    direction: Direction,
    /// Unswapped, uninverted mapping computed at probe
    base: Mapping,
    mapping: Mapping,
}

/// Reset and initialise a touch controller for a screen of the given size
///
/// Scale factors are fixed here from the screen and native resolutions; the
/// profile's mounting orientation is applied last.
pub fn touch_probe<T, P, D>(
    mut backend: T,
    reset: &mut P,
    delay: &mut D,
    screen: (u16, u16),
) -> Result<TouchDevice<T>, ProbeError>
where
    T: TouchBackend,
    P: OutputPin,
    D: DelayNs,
{
    let profile = *backend.profile();
    if profile.x_res == 0 || profile.y_res == 0 {
        return Err(ProbeError::InvalidProfile("zero touch resolution"));
    }
    if screen.0 == 0 || screen.1 == 0 {
        return Err(ProbeError::InvalidProfile("zero screen resolution"));
    }

    info!(
        "probing touch {} at {=u8:#x} ({}x{} native)",
        profile.name, profile.address, profile.x_res, profile.y_res
    );

    backend.reset(reset, delay)?;
    backend.init()?;

    let base = Mapping {
        x: AxisMap::base(&profile, Axis::X, screen.0),
        y: AxisMap::base(&profile, Axis::Y, screen.1),
    };
    let mut device = TouchDevice {
        backend,
        screen,
        direction: Direction::NONE,
        base,
        mapping: base,
    };
    device.set_direction(profile.mounting);

    info!("touch {} ready", profile.name);
    Ok(device)
}

impl<T: TouchBackend> TouchDevice<T> {
    /// Set the orientation
    ///
    /// Always recomputed from the probe-time mapping, so repeating a call
    /// has no further effect. `SWITCH_XY` only exchanges the sampled axes;
    /// `INVERT_X` and `INVERT_Y` always mirror the logical screen axis.
    pub fn set_direction(&mut self, direction: Direction) {
        let mut mapping = self.base;
        if direction.contains(Direction::SWITCH_XY) {
            mapping.swap();
        }
        mapping.x.invert = direction.contains(Direction::INVERT_X);
        mapping.y.invert = direction.contains(Direction::INVERT_Y);
        debug!("touch direction {=u8:#x}", direction.bits());
        self.mapping = mapping;
        self.direction = direction;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current (x, y) mappings
    pub fn axis_maps(&self) -> (AxisMap, AxisMap) {
        (self.mapping.x, self.mapping.y)
    }

    pub fn is_pressed(&mut self) -> Result<bool, TouchError> {
        self.backend.is_pressed()
    }

    /// Screen X coordinate of the current contact
    pub fn read_x(&mut self) -> Result<u16, TouchError> {
        let map = self.mapping.x;
        let raw = self.backend.read_raw(map.source)?;
        Ok(map.apply(raw, self.screen.0))
    }

    /// Screen Y coordinate of the current contact
    pub fn read_y(&mut self) -> Result<u16, TouchError> {
        let map = self.mapping.y;
        let raw = self.backend.read_raw(map.source)?;
        Ok(map.apply(raw, self.screen.1))
    }

    /// Both coordinates, or `None` when nothing is touching
    pub fn read_point(&mut self) -> Result<Option<(u16, u16)>, TouchError> {
        if !self.is_pressed()? {
            return Ok(None);
        }
        Ok(Some((self.read_x()?, self.read_y()?)))
    }

    pub fn profile(&self) -> &TouchProfile {
        self.backend.profile()
    }

    pub fn release(self) -> T {
        self.backend
    }
}
