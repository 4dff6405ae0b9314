use crate::error;
use crate::frame::RafHost;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use vecmap::model::{EventMarker, TrackedMarker, Viewport};
use vecmap::{DrawCommand, SceneStyle};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

struct Inner {
    view: vecmap::MapView<i32>,
    host: RafHost,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    last_frame: Vec<DrawCommand>,
}

fn run_frame(inner: &RefCell<Inner>, ts: f64) {
    let Ok(mut guard) = inner.try_borrow_mut() else {
        log::warn!("frame callback re-entered; skipped");
        return;
    };
    let Inner { view, host, canvas, ctx, dpr, last_frame } = &mut *guard;
    if let Some(cmds) = view.on_frame(host, ts) {
        crate::canvas::sync_backing(canvas, view.scheduler().viewport(), *dpr);
        crate::canvas::execute(ctx, &cmds, *dpr);
        *last_frame = cmds;
    }
}

/// Browser-facing planetary map bound to one canvas.
#[wasm_bindgen]
pub struct MapView {
    inner: Rc<RefCell<Inner>>,
}

impl MapView {
    fn build(canvas: HtmlCanvasElement, style: SceneStyle) -> Result<MapView, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let dpr = window.device_pixel_ratio().max(1.0);
        let mut view = vecmap::MapView::new(style);
        let (w, h) = (canvas.client_width() as f64, canvas.client_height() as f64);
        if w > 0.0 && h > 0.0 {
            view.resize(w, h);
        } else {
            view.resize(canvas.width() as f64, canvas.height() as f64);
        }
        let host = RafHost::new(window);
        let callback = host.callback();
        let inner = Rc::new(RefCell::new(Inner { view, host, canvas, ctx, dpr, last_frame: Vec::new() }));
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&inner);
        let cb = Closure::wrap(Box::new(move |ts: f64| {
            if let Some(inner) = weak.upgrade() {
                run_frame(&inner, ts);
            }
        }) as Box<dyn FnMut(f64)>);
        *callback.borrow_mut() = Some(cb);
        Ok(MapView { inner })
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

#[wasm_bindgen]
impl MapView {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<MapView, JsValue> {
        MapView::build(canvas, SceneStyle::default())
    }

    /// Construct with a partial style object; missing keys keep their defaults.
    pub fn with_style(canvas: HtmlCanvasElement, style: JsValue) -> Result<MapView, JsValue> {
        let style: SceneStyle = if style.is_undefined() || style.is_null() {
            SceneStyle::default()
        } else {
            serde_wasm_bindgen::from_value(style).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        MapView::build(canvas, style)
    }

    pub fn set_style(&self, style: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<SceneStyle>(style) {
            Ok(s) => {
                self.with(|i| i.view.set_style(s));
                error::ok(JsValue::TRUE)
            }
            Err(e) => error::invalid_payload("style", e.to_string()),
        }
    }

    // Map payload

    /// Decode a TopoJSON string. On failure the land layer is cleared and
    /// the loop keeps drawing overlays.
    pub fn load_map(&self, text: &str) -> JsValue {
        let res = self.with(|i| i.view.load_map_str(text));
        summary_result(res)
    }

    pub fn load_map_value(&self, value: JsValue) -> JsValue {
        let v = match serde_wasm_bindgen::from_value::<serde_json::Value>(value) {
            Ok(v) => v,
            Err(e) => return error::invalid_payload("map", e.to_string()),
        };
        let res = self.with(|i| i.view.load_map_value(v));
        summary_result(res)
    }

    pub fn country_count(&self) -> u32 {
        self.with(|i| i.view.countries().map_or(0, |c| c.feature_count() as u32))
    }

    /// Flattened projected rings: `{ offsets, points }` where ring `k` spans
    /// `points[2*offsets[k] .. 2*offsets[k+1]]`.
    pub fn country_rings(&self) -> JsValue {
        self.with(|i| {
            let proj = vecmap::geometry::projection::Projection::new(i.view.viewport());
            let mut offsets = vec![0u32];
            let mut points = Vec::new();
            if let Some(c) = i.view.countries() {
                for ring in c.polygons().flat_map(|p| p.rings.iter()) {
                    for p in ring {
                        let q = proj.project_point(*p);
                        points.push(q.x);
                        points.push(q.y);
                    }
                    offsets.push((points.len() / 2) as u32);
                }
            }
            let obj = crate::interop::new_obj();
            crate::interop::set_kv(&obj, "offsets", &crate::interop::arr_u32(&offsets).into());
            crate::interop::set_kv(&obj, "points", &crate::interop::arr_f64(&points).into());
            obj.into()
        })
    }

    // Live snapshots

    /// Replace the seismic snapshot with an array of `{longitude, latitude, magnitude}`.
    pub fn set_events(&self, events: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<Vec<EventMarker>>(events) {
            Ok(ev) => {
                let n = ev.len();
                self.with(|i| i.view.set_events(ev));
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => error::invalid_payload("events", e.to_string()),
        }
    }

    /// Replace the seismic snapshot from a USGS GeoJSON feed body.
    pub fn set_events_geojson(&self, text: &str) -> JsValue {
        match vecmap::feeds::parse_usgs_geojson(text) {
            Ok(ev) => {
                let n = ev.len();
                self.with(|i| i.view.set_events(ev));
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => error::invalid_payload("geojson", e.to_string()),
        }
    }

    pub fn set_tracked(&self, longitude: f64, latitude: f64) -> JsValue {
        if !longitude.is_finite() {
            return error::non_finite("longitude");
        }
        if !latitude.is_finite() {
            return error::non_finite("latitude");
        }
        self.with(|i| i.view.set_tracked(Some(TrackedMarker { longitude, latitude })));
        error::ok(JsValue::TRUE)
    }

    /// Replace the tracked position from a position feed body; an unreadable
    /// position clears the marker.
    pub fn set_tracked_json(&self, text: &str) -> JsValue {
        match vecmap::feeds::parse_position(text) {
            Ok(pos) => {
                let found = pos.is_some();
                self.with(|i| i.view.set_tracked(pos));
                error::ok(JsValue::from_bool(found))
            }
            Err(e) => error::invalid_payload("position", e.to_string()),
        }
    }

    pub fn clear_tracked(&self) {
        self.with(|i| i.view.set_tracked(None));
    }

    // Loop and viewport

    /// Set the CSS-pixel size; applied before the next frame.
    pub fn resize(&self, width: f64, height: f64, device_pixel_ratio: Option<f64>) -> JsValue {
        if !width.is_finite() {
            return error::non_finite("width");
        }
        if !height.is_finite() {
            return error::non_finite("height");
        }
        if width < 0.0 {
            return error::out_of_range("width", 0.0, f64::INFINITY, width);
        }
        if height < 0.0 {
            return error::out_of_range("height", 0.0, f64::INFINITY, height);
        }
        let dpr = device_pixel_ratio.filter(|d| d.is_finite() && *d > 0.0);
        self.with(|i| {
            if let Some(d) = dpr {
                i.dpr = d;
            }
            i.view.resize(width, height);
        });
        error::ok(JsValue::TRUE)
    }

    pub fn start(&self) -> bool {
        self.with(|i| {
            let Inner { view, host, .. } = i;
            view.start(host)
        })
    }

    /// Cancel the pending frame. No frame callback runs after this returns.
    pub fn stop(&self) -> bool {
        self.with(|i| {
            let Inner { view, host, .. } = i;
            view.stop(host)
        })
    }

    pub fn is_running(&self) -> bool {
        self.with(|i| i.view.is_running())
    }

    pub fn frames_rendered(&self) -> f64 {
        self.with(|i| i.view.frames_rendered() as f64)
    }

    pub fn viewport(&self) -> JsValue {
        let vp: Viewport = self.with(|i| i.view.viewport());
        serde_wasm_bindgen::to_value(&vp).unwrap_or(JsValue::NULL)
    }

    // Inspection

    /// Draw commands of the most recent frame.
    pub fn last_frame(&self) -> JsValue {
        self.with(|i| serde_wasm_bindgen::to_value(&i.last_frame).unwrap_or(JsValue::NULL))
    }

    pub fn pick(&self, x: f64, y: f64, tol: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !tol.is_finite() {
            return error::non_finite("tol");
        }
        if tol < 0.0 {
            return error::out_of_range("tol", 0.0, f64::INFINITY, tol);
        }
        let p = self.with(|i| i.view.pick(x, y, tol));
        match p {
            Some(p) => error::ok(serde_wasm_bindgen::to_value(&p).unwrap_or(JsValue::NULL)),
            None => error::ok(JsValue::NULL),
        }
    }

    pub fn to_svg(&self) -> String {
        self.with(|i| i.view.to_svg_document())
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.inner.try_borrow_mut() {
            let Inner { view, host, .. } = &mut *guard;
            view.stop(host);
        }
    }
}

#[derive(Serialize)]
struct SummarySer {
    features: u32,
    arcs: u32,
    points: u32,
    skipped: u32,
}

impl From<vecmap::LoadSummary> for SummarySer {
    fn from(s: vecmap::LoadSummary) -> Self {
        SummarySer {
            features: s.features as u32,
            arcs: s.arcs as u32,
            points: s.points as u32,
            skipped: s.skipped_features as u32,
        }
    }
}

fn summary_result(res: Result<vecmap::LoadSummary, vecmap::LoadError>) -> JsValue {
    match res {
        Ok(s) => match serde_wasm_bindgen::to_value(&SummarySer::from(s)) {
            Ok(v) => error::ok(v),
            Err(e) => error::invalid_payload("summary", e.to_string()),
        },
        Err(e) => error::load_failed(&e),
    }
}
