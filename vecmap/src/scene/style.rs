use crate::geometry::limits;
use crate::model::Color;
use serde::{Deserialize, Serialize};

/// Visual parameters of the map scene. Every field has a default, so a
/// partial JSON object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    /// `None` clears to transparent so the page background shows through.
    pub background: Option<Color>,

    pub grid_color: Color,
    pub grid_columns: u32,
    pub grid_rows: u32,
    pub grid_width: f64,

    pub equator_color: Color,
    pub equator_dash: [f64; 2],

    pub land_fill: Color,
    pub land_stroke: Color,
    pub land_stroke_width: f64,

    /// Phase advance per rendered frame (radians).
    pub phase_step: f64,

    pub max_events: usize,
    pub event_base_radius: f64,
    pub event_radius_per_magnitude: f64,
    pub pulse_amplitude: f64,
    pub pulse_speed: f64,
    /// Phase offset between consecutive markers.
    pub pulse_offset: f64,
    pub major_threshold: f64,
    pub moderate_threshold: f64,
    pub major_color: Color,
    pub moderate_color: Color,
    pub minor_color: Color,
    pub glow_blur: f64,

    pub accent: Color,
    pub tracked_halo_radius: f64,
    pub tracked_ring_radius: f64,
    pub crosshair_size: f64,
    pub label_font: String,
    pub label_prefix: String,
}

impl Default for SceneStyle {
    fn default() -> Self {
        SceneStyle {
            background: None,
            grid_color: Color::rgba(0, 255, 200, 20),
            grid_columns: 12,
            grid_rows: 6,
            grid_width: 0.5,
            equator_color: Color::rgba(0, 255, 200, 60),
            equator_dash: [4.0, 4.0],
            land_fill: Color::rgba(0, 255, 200, 25),
            land_stroke: Color::rgba(0, 255, 200, 90),
            land_stroke_width: 0.5,
            phase_step: 0.05,
            max_events: limits::DEFAULT_MAX_EVENTS,
            event_base_radius: 2.0,
            event_radius_per_magnitude: 1.5,
            pulse_amplitude: 2.0,
            pulse_speed: 1.0,
            pulse_offset: 0.5,
            major_threshold: 5.0,
            moderate_threshold: 3.0,
            major_color: Color::rgba(255, 51, 102, 255),
            moderate_color: Color::rgba(255, 170, 0, 255),
            minor_color: Color::rgba(0, 255, 136, 255),
            glow_blur: 10.0,
            accent: Color::rgba(0, 200, 255, 255),
            tracked_halo_radius: 12.0,
            tracked_ring_radius: 7.0,
            crosshair_size: 14.0,
            label_font: "10px monospace".to_string(),
            label_prefix: "SAT".to_string(),
        }
    }
}

/// Severity tier of a seismic event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl Severity {
    /// Non-finite magnitudes read as minor.
    pub fn from_magnitude(magnitude: f64, style: &SceneStyle) -> Severity {
        if magnitude >= style.major_threshold {
            Severity::Major
        } else if magnitude >= style.moderate_threshold {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    pub fn color(self, style: &SceneStyle) -> Color {
        match self {
            Severity::Major => style.major_color,
            Severity::Moderate => style.moderate_color,
            Severity::Minor => style.minor_color,
        }
    }
}
