use crate::model::{CountrySet, EventMarker, TrackedMarker};
use std::rc::Rc;

/// Inputs of one frame. Every field is replaced wholesale by its writer,
/// never mutated in place, so a frame always sees a consistent snapshot.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub countries: Option<Rc<CountrySet>>,
    pub events: Rc<[EventMarker]>,
    pub tracked: Option<TrackedMarker>,
}

impl Default for SceneState {
    fn default() -> Self {
        SceneState { countries: None, events: Rc::from(Vec::new()), tracked: None }
    }
}

impl SceneState {
    pub fn new() -> SceneState {
        SceneState::default()
    }

    pub fn with_countries(mut self, countries: CountrySet) -> SceneState {
        self.countries = Some(Rc::new(countries));
        self
    }

    pub fn with_events(mut self, events: Vec<EventMarker>) -> SceneState {
        self.events = Rc::from(events);
        self
    }

    pub fn with_tracked(mut self, tracked: Option<TrackedMarker>) -> SceneState {
        self.tracked = tracked;
        self
    }
}
