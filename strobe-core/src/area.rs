//! Rectangular screen regions

/// Inclusive rectangle in panel coordinates
///
/// `xe` and `ye` are the last column and row, as written to the controller's
/// column/row address registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub xs: u16,
    pub ys: u16,
    pub xe: u16,
    pub ye: u16,
}

impl Area {
    pub const fn new(xs: u16, ys: u16, xe: u16, ye: u16) -> Self {
        Self { xs, ys, xe, ye }
    }

    /// Area covering a whole `xres` x `yres` panel
    pub const fn full(xres: u16, yres: u16) -> Self {
        Self::new(0, 0, xres.saturating_sub(1), yres.saturating_sub(1))
    }

    /// Start corner does not lie past the end corner
    pub const fn is_valid(&self) -> bool {
        self.xs <= self.xe && self.ys <= self.ye
    }

    /// Number of columns, 0 for an invalid area
    pub const fn width(&self) -> u32 {
        if self.is_valid() {
            (self.xe - self.xs) as u32 + 1
        } else {
            0
        }
    }

    /// Number of rows, 0 for an invalid area
    pub const fn height(&self) -> u32 {
        if self.is_valid() {
            (self.ye - self.ys) as u32 + 1
        } else {
            0
        }
    }

    pub const fn pixel_count(&self) -> usize {
        (self.width() * self.height()) as usize
    }

    /// Whether the area fits on an `xres` x `yres` panel
    pub const fn fits(&self, xres: u16, yres: u16) -> bool {
        self.is_valid() && self.xe < xres && self.ye < yres
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_area() {
        let area = Area::full(480, 320);
        assert_eq!(area, Area::new(0, 0, 479, 319));
        assert_eq!(area.pixel_count(), 480 * 320);
    }

    #[test]
    fn test_single_pixel() {
        let area = Area::new(5, 7, 5, 7);
        assert_eq!(area.width(), 1);
        assert_eq!(area.height(), 1);
        assert_eq!(area.pixel_count(), 1);
    }

    #[test]
    fn test_inverted_area_is_empty() {
        let area = Area::new(10, 0, 9, 0);
        assert!(!area.is_valid());
        assert_eq!(area.pixel_count(), 0);
        assert!(!area.fits(480, 320));
    }

    #[test]
    fn test_fits() {
        assert!(Area::new(0, 0, 479, 319).fits(480, 320));
        assert!(!Area::new(0, 0, 480, 319).fits(480, 320));
    }
}
