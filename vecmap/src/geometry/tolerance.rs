// Shared float helpers for picking and animation

pub const EPS_PICK: f64 = 1e-6;           // minimum pick radius (px)

/// Oscillation in [-1, 1] for pulsing effects.
#[inline]
pub fn pulse(phase: f64, speed: f64, offset: f64) -> f64 { (phase * speed + offset).sin() }
