//! Pure raster math for QR rendering.
//!
//! A QR symbol is a square grid of `modules` cells surrounded by a quiet zone
//! of `margin` cells on each side. The image is `width` pixels square; each
//! pixel samples the cell it falls into, so the output is exactly `width`
//! pixels even when `width` is not a multiple of the cell count.
//!
//! ```text
//! total = modules + 2 * margin
//! cell(px) = floor(px * total / width)
//! ```
//!
//! A width smaller than `total` would drop modules and produce an unreadable
//! code, so it is raised to `total`.

/// Grid-to-pixel mapping for one rendered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raster {
    pub modules: u32,
    pub margin: u32,
    /// Final image width (and height) in pixels.
    pub width: u32,
}

impl Raster {
    pub fn new(modules: u32, margin: u32, requested_width: u32) -> Self {
        let total = modules + 2 * margin;
        Self {
            modules,
            margin,
            width: requested_width.max(total),
        }
    }

    /// Cells across, including the quiet zone.
    pub fn total(&self) -> u32 {
        self.modules + 2 * self.margin
    }

    /// Symbol module index a pixel coordinate falls in, or `None` inside the
    /// quiet zone.
    pub fn module_at(&self, px: u32) -> Option<u32> {
        let cell = (u64::from(px) * u64::from(self.total()) / u64::from(self.width)) as u32;
        cell.checked_sub(self.margin).filter(|m| *m < self.modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_maps_evenly() {
        // 21 modules + 2*2 margin = 25 cells, 250 px → 10 px per cell
        let r = Raster::new(21, 2, 250);
        assert_eq!(r.width, 250);
        assert_eq!(r.module_at(0), None);
        assert_eq!(r.module_at(19), None);
        assert_eq!(r.module_at(20), Some(0));
        assert_eq!(r.module_at(29), Some(0));
        assert_eq!(r.module_at(30), Some(1));
        assert_eq!(r.module_at(229), Some(20));
        assert_eq!(r.module_at(230), None);
        assert_eq!(r.module_at(249), None);
    }

    #[test]
    fn zero_margin_starts_at_first_module() {
        let r = Raster::new(21, 0, 21);
        assert_eq!(r.module_at(0), Some(0));
        assert_eq!(r.module_at(20), Some(20));
    }

    #[test]
    fn small_width_raised_to_cell_count() {
        let r = Raster::new(25, 1, 10);
        assert_eq!(r.width, 27);
        assert_eq!(r.module_at(1), Some(0));
        assert_eq!(r.module_at(25), Some(24));
    }

    #[test]
    fn every_module_is_covered() {
        let r = Raster::new(33, 1, 1024);
        let mut seen = vec![false; 33];
        for px in 0..r.width {
            if let Some(m) = r.module_at(px) {
                seen[m as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn total_includes_margin() {
        assert_eq!(Raster::new(21, 1, 1024).total(), 23);
    }
}
