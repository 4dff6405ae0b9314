// Centralized ingestion limits to harden against untrusted map payloads and feeds

// Topology size caps
pub const MAX_ARCS: usize = 100_000;
pub const MAX_ARC_POINTS_TOTAL: usize = 4_000_000;
pub const MAX_GEOMETRIES: usize = 20_000;
// Arcs may be referenced repeatedly, so assembled output is capped separately
pub const MAX_ASSEMBLED_POINTS: usize = 8_000_000;

// Feed caps
pub const MAX_FEED_EVENTS: usize = 20_000;

// Per-frame rendering caps
pub const DEFAULT_MAX_EVENTS: usize = 100;
pub const MAX_GRID_DIVISIONS: u32 = 360;

#[inline]
pub fn is_lon_lat(lon: f64, lat: f64) -> bool { lon.is_finite() && lat.is_finite() }
