//! Frame composition for the map scene.
//!
//! [`render`] is a pure function of its inputs and produces pixel-space
//! [`DrawCommand`]s; rasterization is left to the host adapter.

use super::commands::{DrawCommand, Glow, Stroke};
use super::state::SceneState;
use super::style::{SceneStyle, Severity};
use crate::geometry::limits::{self, is_lon_lat};
use crate::geometry::projection::Projection;
use crate::geometry::tolerance::pulse;
use crate::model::{CountrySet, EventMarker, TrackedMarker, Vec2, Viewport};

/// Owns the phase accumulator driving all pulsing effects.
#[derive(Clone, Debug)]
pub struct SceneRenderer {
    style: SceneStyle,
    phase: f64,
    frames: u64,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        SceneRenderer::new(SceneStyle::default())
    }
}

impl SceneRenderer {
    pub fn new(style: SceneStyle) -> SceneRenderer {
        SceneRenderer { style, phase: 0.0, frames: 0 }
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: SceneStyle) {
        self.style = style;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance the phase and compose one frame.
    pub fn render_frame(&mut self, state: &SceneState, viewport: Viewport) -> Vec<DrawCommand> {
        let step = if self.style.phase_step.is_finite() { self.style.phase_step } else { 0.0 };
        self.phase += step;
        self.frames += 1;
        render(state, viewport, self.phase, &self.style)
    }
}

/// Compose a frame in draw order: clear, grid, equator, countries, event
/// markers, tracked marker.
pub fn render(state: &SceneState, viewport: Viewport, phase: f64, style: &SceneStyle) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear {
        width: viewport.width,
        height: viewport.height,
        color: style.background,
    }];
    if !viewport.is_drawable() {
        return out;
    }
    let proj = Projection::new(viewport);
    draw_grid(&mut out, viewport, style);
    draw_equator(&mut out, &proj, style);
    if let Some(countries) = state.countries.as_deref() {
        draw_countries(&mut out, countries, &proj, style);
    }
    draw_events(&mut out, &state.events, &proj, phase, style);
    if let Some(t) = state.tracked {
        draw_tracked(&mut out, t, &proj, phase, style);
    }
    out
}

fn draw_grid(out: &mut Vec<DrawCommand>, vp: Viewport, style: &SceneStyle) {
    let stroke = Stroke::solid(style.grid_color, style.grid_width);
    let cols = style.grid_columns.clamp(1, limits::MAX_GRID_DIVISIONS);
    let rows = style.grid_rows.clamp(1, limits::MAX_GRID_DIVISIONS);
    for i in 0..=cols {
        let x = vp.width * i as f64 / cols as f64;
        out.push(DrawCommand::Line { from: Vec2::new(x, 0.0), to: Vec2::new(x, vp.height), stroke });
    }
    for j in 0..=rows {
        let y = vp.height * j as f64 / rows as f64;
        out.push(DrawCommand::Line { from: Vec2::new(0.0, y), to: Vec2::new(vp.width, y), stroke });
    }
}

fn draw_equator(out: &mut Vec<DrawCommand>, proj: &Projection, style: &SceneStyle) {
    let y = proj.y_of(0.0);
    out.push(DrawCommand::Line {
        from: Vec2::new(0.0, y),
        to: Vec2::new(proj.viewport.width, y),
        stroke: Stroke::dashed(style.equator_color, 1.0, style.equator_dash),
    });
}

fn draw_countries(out: &mut Vec<DrawCommand>, countries: &CountrySet, proj: &Projection, style: &SceneStyle) {
    let stroke = Stroke::solid(style.land_stroke, style.land_stroke_width);
    for poly in countries.polygons() {
        for ring in &poly.rings {
            if ring.len() < 2 {
                continue;
            }
            let points: Vec<Vec2> = ring.iter().map(|p| proj.project_point(*p)).collect();
            if !points.iter().all(Vec2::is_finite) {
                continue;
            }
            out.push(DrawCommand::Path { points, closed: true, fill: Some(style.land_fill), stroke: Some(stroke) });
        }
    }
}

/// Pulsing radius of the `index`-th marker at `phase`.
pub fn event_radius(magnitude: f64, index: usize, phase: f64, style: &SceneStyle) -> f64 {
    let mag = if magnitude.is_finite() { magnitude.max(0.0) } else { 0.0 };
    let base = style.event_base_radius + mag * style.event_radius_per_magnitude;
    let r = base + pulse(phase, style.pulse_speed, index as f64 * style.pulse_offset) * style.pulse_amplitude;
    r.max(0.5)
}

fn draw_events(out: &mut Vec<DrawCommand>, events: &[EventMarker], proj: &Projection, phase: f64, style: &SceneStyle) {
    for (i, ev) in events.iter().take(style.max_events).enumerate() {
        if !is_lon_lat(ev.longitude, ev.latitude) {
            continue;
        }
        let center = proj.project(ev.longitude, ev.latitude);
        let color = Severity::from_magnitude(ev.magnitude, style).color(style);
        let radius = event_radius(ev.magnitude, i, phase, style);
        out.push(DrawCommand::Circle {
            center,
            radius,
            fill: None,
            stroke: Some(Stroke::solid(color.with_alpha(150), 1.0)),
            glow: None,
        });
        out.push(DrawCommand::Circle {
            center,
            radius: (radius * 0.45).max(1.0),
            fill: Some(color),
            stroke: None,
            glow: Some(Glow { color, blur: style.glow_blur }),
        });
    }
}

/// `"SAT 12.34°N 56.78°W"`-style coordinate label.
pub fn tracked_label(prefix: &str, t: TrackedMarker) -> String {
    let ns = if t.latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if t.longitude >= 0.0 { 'E' } else { 'W' };
    format!("{} {:.2}°{} {:.2}°{}", prefix, t.latitude.abs(), ns, t.longitude.abs(), ew)
}

fn draw_tracked(out: &mut Vec<DrawCommand>, t: TrackedMarker, proj: &Projection, phase: f64, style: &SceneStyle) {
    if !is_lon_lat(t.longitude, t.latitude) {
        return;
    }
    let accent = style.accent;
    let p = proj.project(t.longitude, t.latitude);
    out.push(DrawCommand::Line {
        from: Vec2::new(0.0, p.y),
        to: Vec2::new(proj.viewport.width, p.y),
        stroke: Stroke::dashed(accent.with_alpha(70), 1.0, [2.0, 6.0]),
    });
    let halo = (style.tracked_halo_radius + pulse(phase, 2.0, 0.0) * 3.0).max(1.0);
    out.push(DrawCommand::Circle {
        center: p,
        radius: halo,
        fill: Some(accent.with_alpha(40)),
        stroke: None,
        glow: Some(Glow { color: accent, blur: style.glow_blur * 2.0 }),
    });
    out.push(DrawCommand::Circle {
        center: p,
        radius: style.tracked_ring_radius,
        fill: None,
        stroke: Some(Stroke::solid(accent, 1.5)),
        glow: None,
    });
    let c = style.crosshair_size;
    let cross = Stroke::solid(accent, 1.0);
    out.push(DrawCommand::Line { from: Vec2::new(p.x - c, p.y), to: Vec2::new(p.x + c, p.y), stroke: cross });
    out.push(DrawCommand::Line { from: Vec2::new(p.x, p.y - c), to: Vec2::new(p.x, p.y + c), stroke: cross });
    out.push(DrawCommand::Circle { center: p, radius: 2.5, fill: Some(accent), stroke: None, glow: None });
    out.push(DrawCommand::Text {
        pos: Vec2::new(p.x + c + 4.0, p.y - 6.0),
        text: tracked_label(&style.label_prefix, t),
        color: accent,
        font: style.label_font.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_hemispheres() {
        let l = tracked_label("SAT", TrackedMarker { longitude: -56.781, latitude: 12.344 });
        assert_eq!(l, "SAT 12.34°N 56.78°W");
        let l = tracked_label("ISS", TrackedMarker { longitude: 10.0, latitude: -5.0 });
        assert_eq!(l, "ISS 5.00°S 10.00°E");
    }

    #[test]
    fn radius_desyncs_by_index() {
        let style = SceneStyle::default();
        let a = event_radius(4.0, 0, 1.0, &style);
        let b = event_radius(4.0, 1, 1.0, &style);
        assert!((a - b).abs() > 1e-6);
        assert!(event_radius(f64::NAN, 0, 0.0, &style) >= 0.5);
    }
}
