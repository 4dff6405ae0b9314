use crate::model::{Color, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// `[on, off]` dash lengths; solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Stroke {
        Stroke { color, width, dash: None }
    }

    pub fn dashed(color: Color, width: f64, dash: [f64; 2]) -> Stroke {
        Stroke { color, width, dash: Some(dash) }
    }
}

/// Shadow glow applied to a fill.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Color,
    pub blur: f64,
}

/// One drawing primitive in pixel space. A frame is an ordered list of
/// these; later commands occlude earlier ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
        color: Option<Color>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Path {
        points: Vec<Vec2>,
        closed: bool,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vec2,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        glow: Option<Glow>,
    },
    Text {
        pos: Vec2,
        text: String,
        color: Color,
        font: String,
    },
}
