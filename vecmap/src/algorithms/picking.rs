use crate::geometry::limits::is_lon_lat;
use crate::geometry::projection::Projection;
use crate::geometry::tolerance::EPS_PICK;
use crate::scene::{SceneState, SceneStyle};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pick {
    Tracked { dist: f64 },
    Event { index: usize, dist: f64 },
}

/// Hit-test a pixel against the drawn markers. The tracked marker wins over
/// events; among events the nearest drawn one wins.
pub fn pick_impl(state: &SceneState, proj: &Projection, style: &SceneStyle, x: f64, y: f64, tol: f64) -> Option<Pick> {
    let tol = tol.max(EPS_PICK);
    let tol2 = tol * tol;
    let d2 = |lon: f64, lat: f64| {
        let p = proj.project(lon, lat);
        (p.x - x).powi(2) + (p.y - y).powi(2)
    };
    if let Some(t) = state.tracked {
        if is_lon_lat(t.longitude, t.latitude) {
            let d = d2(t.longitude, t.latitude);
            if d <= tol2 { return Some(Pick::Tracked { dist: d.sqrt() }); }
        }
    }
    let mut best: Option<(usize, f64)> = None;
    for (i, ev) in state.events.iter().take(style.max_events).enumerate() {
        if !is_lon_lat(ev.longitude, ev.latitude) { continue; }
        let d = d2(ev.longitude, ev.latitude);
        if d <= tol2 && best.map_or(true, |(_, bd)| d < bd) { best = Some((i, d)); }
    }
    best.map(|(index, d)| Pick::Event { index, dist: d.sqrt() })
}
