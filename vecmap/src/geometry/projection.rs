//! Equirectangular projection between geographic degrees and canvas pixels.

use crate::model::{Vec2, Viewport};

/// Project `(lon, lat)` in degrees to pixel space of a `w` x `h` canvas.
///
/// `(-180, 90)` maps to the top-left corner, `(180, -90)` to the bottom-right.
/// Inputs outside the valid ranges land off-canvas; nothing is clipped.
#[inline]
pub fn project(lon: f64, lat: f64, w: f64, h: f64) -> Vec2 {
    Vec2 {
        x: ((lon + 180.0) / 360.0) * w,
        y: ((90.0 - lat) / 180.0) * h,
    }
}

/// Pixels-per-degree constants for one viewport size.
///
/// Rebuilt whenever the viewport changes; never caches projected points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub viewport: Viewport,
    px_per_deg_x: f64,
    px_per_deg_y: f64,
}

impl Projection {
    pub fn new(viewport: Viewport) -> Projection {
        Projection {
            viewport,
            px_per_deg_x: viewport.width / 360.0,
            px_per_deg_y: viewport.height / 180.0,
        }
    }

    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> Vec2 {
        Vec2 {
            x: (lon + 180.0) * self.px_per_deg_x,
            y: (90.0 - lat) * self.px_per_deg_y,
        }
    }

    #[inline]
    pub fn project_point(&self, p: Vec2) -> Vec2 {
        self.project(p.x, p.y)
    }

    /// Inverse mapping; `None` for a degenerate viewport.
    pub fn unproject(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        if self.px_per_deg_x <= 0.0 || self.px_per_deg_y <= 0.0 {
            return None;
        }
        let lon = px / self.px_per_deg_x - 180.0;
        let lat = 90.0 - py / self.px_per_deg_y;
        Some((lon, lat))
    }

    /// Pixel y of a given latitude, for horizontal guide lines.
    #[inline]
    pub fn y_of(&self, lat: f64) -> f64 {
        (90.0 - lat) * self.px_per_deg_y
    }

    #[inline]
    pub fn x_of(&self, lon: f64) -> f64 {
        (lon + 180.0) * self.px_per_deg_x
    }
}
