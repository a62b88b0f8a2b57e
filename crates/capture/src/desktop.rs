//! Virtual desktop bounds
//!
//! Folds the rectangles of every attached display into one rectangle in a
//! single shared coordinate space. Displays may sit at negative origins and
//! need not touch; gaps between them end up inside the bounds.

use crate::{ConfigurationError, Rect};

/// One monitor's rectangle in OS desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySurface {
    pub bounds: Rect,
    pub is_primary: bool,
}

impl DisplaySurface {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            bounds: Rect::new(x, y, width, height),
            is_primary: false,
        }
    }

    pub fn primary(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            is_primary: true,
            ..Self::new(x, y, width, height)
        }
    }
}

/// How the bounding width is folded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Width is the sum of every display's width, as the reference snipping
    /// tool sizes its overlay. Exact for side-by-side rows; overestimates for
    /// stacked or offset layouts. Raised to the true extent when the sum would
    /// not cover every display.
    #[default]
    SummedWidths,
    /// Exact min/max bounding box.
    Extent,
}

/// Rectangle covering every display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualDesktopRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl VirtualDesktopRect {
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn contains(&self, surface: &DisplaySurface) -> bool {
        self.to_rect().contains_rect(&surface.bounds)
    }
}

/// Compute bounds with the default policy
pub fn compute(surfaces: &[DisplaySurface]) -> Result<VirtualDesktopRect, ConfigurationError> {
    compute_with(surfaces, BoundsPolicy::default())
}

/// Compute bounds, seeding from the primary display (the first one when none
/// is flagged) and folding the others in.
pub fn compute_with(
    surfaces: &[DisplaySurface],
    policy: BoundsPolicy,
) -> Result<VirtualDesktopRect, ConfigurationError> {
    let seed = surfaces
        .iter()
        .find(|s| s.is_primary)
        .or_else(|| surfaces.first())
        .ok_or(ConfigurationError::NoDisplaySurfaces)?;

    let mut left = seed.bounds.x;
    let mut top = seed.bounds.y;
    let mut right = seed.bounds.right();
    let mut bottom = seed.bounds.bottom();
    let mut summed_width: u64 = 0;

    for surface in surfaces {
        left = left.min(surface.bounds.x);
        top = top.min(surface.bounds.y);
        right = right.max(surface.bounds.right());
        bottom = bottom.max(surface.bounds.bottom());
        summed_width += u64::from(surface.bounds.width);
    }

    // Edges are i64, so both extents are exact and non-negative
    let extent_width = (right - i64::from(left)) as u64;
    let extent_height = (bottom - i64::from(top)) as u64;
    let width = match policy {
        BoundsPolicy::SummedWidths => summed_width.max(extent_width),
        BoundsPolicy::Extent => extent_width,
    };

    let too_large = || ConfigurationError::DesktopTooLarge {
        width,
        height: extent_height,
    };
    let bounds = VirtualDesktopRect {
        left,
        top,
        width: u32::try_from(width).map_err(|_| too_large())?,
        height: u32::try_from(extent_height).map_err(|_| too_large())?,
    };

    log::debug!(
        "Folded {} display(s) into {:?} ({:?})",
        surfaces.len(),
        bounds,
        policy
    );

    Ok(bounds)
}
