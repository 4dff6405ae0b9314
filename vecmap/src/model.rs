use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    /// CSS `rgba()` string accepted by canvas `fillStyle` / `strokeStyle`.
    pub fn to_css(&self) -> String {
        let alpha = self.a as f64 / 255.0;
        format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, alpha)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Vec2 {
        Vec2 { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Quantization transform shared by every arc of one table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Default for Transform {
    fn default() -> Self {
        Transform { scale: [1.0, 1.0], translate: [0.0, 0.0] }
    }
}

impl Transform {
    #[inline]
    pub fn apply(&self, x: i64, y: i64) -> Vec2 {
        Vec2 {
            x: x as f64 * self.scale[0] + self.translate[0],
            y: y as f64 * self.scale[1] + self.translate[1],
        }
    }
}

/// One delta-encoded arc: each entry is `[dx, dy]` relative to the previous point.
pub type Arc = Vec<[i64; 2]>;
pub type ArcTable = Vec<Arc>;

/// Signed arc reference. Non-negative selects arc `idx` in stored order,
/// a negative value selects arc `!idx` traversed backwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArcRef(pub i32);

impl ArcRef {
    #[inline]
    pub fn index(self) -> usize {
        if self.0 < 0 { (!self.0) as usize } else { self.0 as usize }
    }

    #[inline]
    pub fn is_reversed(self) -> bool {
        self.0 < 0
    }

    pub fn reversed(self) -> ArcRef {
        ArcRef(!self.0)
    }
}

pub type Ring = Vec<Vec2>;

/// First ring is the outer boundary, the rest are holes. Holes share the
/// outer ring's styling when drawn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: Option<String>,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
}

/// Decoded render-ready geometry for one loaded map payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountrySet {
    pub features: Vec<Feature>,
}

impl CountrySet {
    pub fn empty() -> CountrySet {
        CountrySet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Flattened polygon sequence across all features, in feature order.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.features.iter().flat_map(|f| f.polygons.iter())
    }

    pub fn ring_count(&self) -> usize {
        self.polygons().map(|p| p.rings.len()).sum()
    }

    pub fn point_count(&self) -> usize {
        self.polygons().flat_map(|p| p.rings.iter()).map(|r| r.len()).sum()
    }

    /// (minx, miny, maxx, maxy) over every finite point, if any.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bb: Option<(f64, f64, f64, f64)> = None;
        for p in self.polygons().flat_map(|p| p.rings.iter()).flat_map(|r| r.iter()) {
            if !p.is_finite() {
                continue;
            }
            bb = Some(match bb {
                None => (p.x, p.y, p.x, p.y),
                Some((a, b, c, d)) => (a.min(p.x), b.min(p.y), c.max(p.x), d.max(p.y)),
            });
        }
        bb
    }

    pub fn find(&self, id_or_name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| {
            f.id.as_deref() == Some(id_or_name) || f.name.as_deref() == Some(id_or_name)
        })
    }
}

/// Seismic event snapshot entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub magnitude: f64,
}

/// Satellite position snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedMarker {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Viewport {
        Viewport { width, height }
    }

    /// Zero-sized or non-finite viewports produce no geometry.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { width: 0.0, height: 0.0 }
    }
}
