pub mod model;
pub mod error;
pub mod feeds;
pub mod topology;
pub mod geometry {
    pub mod limits;
    pub mod projection;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod arcs;
    pub mod assemble;
    pub mod picking;
}
pub mod scene;
mod svg;

pub use algorithms::picking::Pick;
pub use error::LoadError;
pub use model::{CountrySet, EventMarker, TrackedMarker, Vec2, Viewport};
pub use scene::{DrawCommand, FrameHost, SceneStyle};
pub use topology::LoadSummary;

use geometry::projection::Projection;
use scene::{FrameScheduler, SceneRenderer, SceneState};
use std::rc::Rc;

/// Planetary map view: cached country geometry, latest feed snapshots,
/// renderer and frame scheduler.
///
/// `H` is the frame handle type of the embedding [`FrameHost`].
pub struct MapView<H> {
    state: SceneState,
    renderer: SceneRenderer,
    scheduler: FrameScheduler<H>,
    object_name: String,
    last_summary: Option<LoadSummary>,
}

impl<H: Copy + PartialEq + std::fmt::Debug> Default for MapView<H> {
    fn default() -> Self {
        MapView::new(SceneStyle::default())
    }
}

impl<H: Copy + PartialEq + std::fmt::Debug> MapView<H> {
    pub fn new(style: SceneStyle) -> MapView<H> {
        MapView {
            state: SceneState::new(),
            renderer: SceneRenderer::new(style),
            scheduler: FrameScheduler::default(),
            object_name: topology::DEFAULT_OBJECT.to_string(),
            last_summary: None,
        }
    }

    /// Read geometries from a differently named topology object.
    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = name.into();
        self
    }

    // Map geometry

    /// Decode a map payload and install it for all following frames.
    ///
    /// On failure the map layer is cleared and the error returned; the render
    /// loop keeps running with overlays only.
    pub fn load_map_str(&mut self, text: &str) -> Result<LoadSummary, LoadError> {
        let res = topology::Topology::parse(text).and_then(|t| t.country_set(&self.object_name));
        self.install(res)
    }

    pub fn load_map_value(&mut self, v: serde_json::Value) -> Result<LoadSummary, LoadError> {
        let res = topology::Topology::from_value(v).and_then(|t| t.country_set(&self.object_name));
        self.install(res)
    }

    fn install(&mut self, res: Result<topology::LoadReport, LoadError>) -> Result<LoadSummary, LoadError> {
        match res {
            Ok(report) => {
                if report.summary.skipped_features > 0 {
                    log::warn!("map loaded with {} malformed features skipped", report.summary.skipped_features);
                }
                log::info!(
                    "map loaded: {} features, {} arcs, {} points",
                    report.summary.features,
                    report.summary.arcs,
                    report.summary.points
                );
                self.state.countries = Some(Rc::new(report.countries));
                self.last_summary = Some(report.summary);
                Ok(report.summary)
            }
            Err(e) => {
                log::warn!("map load failed: {}", e);
                self.state.countries = Some(Rc::new(CountrySet::empty()));
                self.last_summary = None;
                Err(e)
            }
        }
    }

    /// Install already decoded geometry.
    pub fn set_country_set(&mut self, countries: Rc<CountrySet>) {
        self.state.countries = Some(countries);
    }

    pub fn clear_map(&mut self) {
        self.state.countries = None;
        self.last_summary = None;
    }

    pub fn countries(&self) -> Option<&CountrySet> {
        self.state.countries.as_deref()
    }

    pub fn last_load_summary(&self) -> Option<LoadSummary> {
        self.last_summary
    }

    // Live snapshots (replace, never merge)

    pub fn set_events(&mut self, events: Vec<EventMarker>) {
        self.state.events = Rc::from(events);
    }

    pub fn events(&self) -> &[EventMarker] {
        &self.state.events
    }

    pub fn set_tracked(&mut self, tracked: Option<TrackedMarker>) {
        self.state.tracked = tracked;
    }

    pub fn tracked(&self) -> Option<TrackedMarker> {
        self.state.tracked
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    // Style

    pub fn style(&self) -> &SceneStyle {
        self.renderer.style()
    }

    pub fn set_style(&mut self, style: SceneStyle) {
        self.renderer.set_style(style);
    }

    // Viewport and loop

    pub fn resize(&mut self, width: f64, height: f64) {
        self.scheduler.resize(Viewport::new(width, height));
    }

    pub fn viewport(&self) -> Viewport {
        self.scheduler.target_viewport()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.scheduler.frames_rendered()
    }

    pub fn scheduler(&self) -> &FrameScheduler<H> {
        &self.scheduler
    }

    pub fn start<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> bool {
        self.scheduler.start(host)
    }

    pub fn stop<F: FrameHost<Handle = H>>(&mut self, host: &mut F) -> bool {
        self.scheduler.stop(host)
    }

    /// Frame callback entry point. Returns the frame's commands, or `None`
    /// if the view is not running.
    pub fn on_frame<F: FrameHost<Handle = H>>(&mut self, host: &mut F, timestamp_ms: f64) -> Option<Vec<DrawCommand>> {
        let state = &self.state;
        let renderer = &mut self.renderer;
        let mut frame = None;
        self.scheduler.tick(host, timestamp_ms, |tick| {
            frame = Some(renderer.render_frame(state, tick.viewport));
        });
        frame
    }

    // Queries

    pub fn pick(&self, x: f64, y: f64, tol: f64) -> Option<Pick> {
        let proj = Projection::new(self.viewport());
        algorithms::picking::pick_impl(&self.state, &proj, self.renderer.style(), x, y, tol)
    }

    pub fn to_svg_paths(&self) -> Vec<String> {
        match self.countries() {
            Some(c) => svg::to_svg_paths_impl(c, &Projection::new(self.viewport())),
            None => Vec::new(),
        }
    }

    pub fn to_svg_document(&self) -> String {
        let empty = CountrySet::empty();
        let countries = self.countries().unwrap_or(&empty);
        svg::to_svg_document_impl(countries, &Projection::new(self.viewport()), self.renderer.style())
    }
}
