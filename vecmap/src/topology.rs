use crate::algorithms::arcs::{decode_arcs, DecodedArcs};
use crate::algorithms::assemble::{assemble, FeatureGeometry, Geometry};
use crate::error::LoadError;
use crate::geometry::limits;
use crate::model::{ArcRef, ArcTable, CountrySet, Transform};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_OBJECT: &str = "countries";

#[derive(Deserialize)]
struct TransformDoc {
    #[serde(default = "unit_scale")]
    scale: [f64; 2],
    #[serde(default)]
    translate: [f64; 2],
}

fn unit_scale() -> [f64; 2] {
    [1.0, 1.0]
}

#[derive(Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    geometries: Option<Vec<Value>>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Value>,
}

#[derive(Deserialize)]
struct TopologyDoc {
    #[serde(default)]
    transform: Option<TransformDoc>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<i64>>>,
    #[serde(default)]
    objects: BTreeMap<String, Value>,
}

/// Parsed payload with its arc table and named objects, before decoding.
pub struct Topology {
    pub transform: Transform,
    pub arcs: ArcTable,
    objects: BTreeMap<String, Value>,
}

/// Geometries of one object; `malformed` counts entries whose arcs did not parse.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectFeatures {
    pub features: Vec<FeatureGeometry>,
    pub malformed: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub arcs: usize,
    pub points: usize,
    pub features: usize,
    pub skipped_features: usize,
}

pub struct LoadReport {
    pub countries: CountrySet,
    pub summary: LoadSummary,
}

impl Topology {
    pub fn parse(text: &str) -> Result<Topology, LoadError> {
        let doc: TopologyDoc = serde_json::from_str(text)?;
        Topology::from_doc(doc)
    }

    pub fn from_value(v: Value) -> Result<Topology, LoadError> {
        let doc: TopologyDoc = serde_json::from_value(v)?;
        Topology::from_doc(doc)
    }

    fn from_doc(doc: TopologyDoc) -> Result<Topology, LoadError> {
        if doc.arcs.len() > limits::MAX_ARCS {
            return Err(LoadError::TooManyArcs { count: doc.arcs.len(), max: limits::MAX_ARCS });
        }
        let points: usize = doc.arcs.iter().map(|a| a.len()).sum();
        if points > limits::MAX_ARC_POINTS_TOTAL {
            return Err(LoadError::TooManyPoints { count: points, max: limits::MAX_ARC_POINTS_TOTAL });
        }
        let transform = doc
            .transform
            .map(|t| Transform { scale: t.scale, translate: t.translate })
            .unwrap_or_default();
        // Positions may carry extra dimensions; only [dx, dy] is used.
        let arcs: ArcTable = doc
            .arcs
            .into_iter()
            .map(|arc| {
                arc.into_iter()
                    .map(|p| [p.first().copied().unwrap_or(0), p.get(1).copied().unwrap_or(0)])
                    .collect::<Vec<[i64; 2]>>()
            })
            .collect();
        Ok(Topology { transform, arcs, objects: doc.objects })
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(|k| k.as_str())
    }

    pub fn decode_arcs(&self) -> DecodedArcs {
        decode_arcs(&self.arcs, &self.transform)
    }

    /// Polygon and MultiPolygon geometries of a named object, flattening
    /// nested collections. Other geometry types are ignored; entries that are
    /// not geometry objects count as malformed.
    pub fn features(&self, object: &str) -> Result<ObjectFeatures, LoadError> {
        let root = self
            .objects
            .get(object)
            .ok_or_else(|| LoadError::MissingObject(object.to_string()))?;
        let mut out = ObjectFeatures::default();
        collect_geometries(root, &mut out);
        if out.features.len() > limits::MAX_GEOMETRIES {
            return Err(LoadError::TooManyGeometries { count: out.features.len(), max: limits::MAX_GEOMETRIES });
        }
        Ok(out)
    }

    pub fn country_set(&self, object: &str) -> Result<LoadReport, LoadError> {
        let features = self.features(object)?;
        let decoded = self.decode_arcs();
        let report = assemble(&decoded, &features.features);
        let summary = LoadSummary {
            arcs: decoded.len(),
            points: decoded.point_count(),
            features: report.countries.feature_count(),
            skipped_features: report.skipped + features.malformed,
        };
        Ok(LoadReport { countries: report.countries, summary })
    }
}

fn collect_geometries(v: &Value, out: &mut ObjectFeatures) {
    let g = match GeometryDoc::deserialize(v) {
        Ok(g) => g,
        Err(e) => {
            log::warn!("skipping malformed geometry: {}", e);
            out.malformed += 1;
            return;
        }
    };
    match g.kind.as_deref() {
        Some("GeometryCollection") => {
            for child in g.geometries.iter().flatten() {
                collect_geometries(child, out);
            }
        }
        Some("Polygon") | Some("MultiPolygon") => match parse_geometry(&g) {
            Some(geometry) => out.features.push(FeatureGeometry {
                id: g.id.as_ref().and_then(value_to_label),
                name: g
                    .properties
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(value_to_label),
                geometry,
            }),
            None => out.malformed += 1,
        },
        _ => {}
    }
}

fn parse_geometry(g: &GeometryDoc) -> Option<Geometry> {
    let arcs = g.arcs.clone()?;
    match g.kind.as_deref() {
        Some("Polygon") => serde_json::from_value::<Vec<Vec<ArcRef>>>(arcs).ok().map(Geometry::Polygon),
        Some("MultiPolygon") => {
            serde_json::from_value::<Vec<Vec<Vec<ArcRef>>>>(arcs).ok().map(Geometry::MultiPolygon)
        }
        _ => None,
    }
}

fn value_to_label(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a payload's `object` into a country set.
pub fn load(text: &str, object: &str) -> Result<LoadReport, LoadError> {
    Topology::parse(text)?.country_set(object)
}

/// Infallible load: failures are logged and yield an empty set.
pub fn load_country_set(text: &str) -> CountrySet {
    match load(text, DEFAULT_OBJECT) {
        Ok(r) => r.countries,
        Err(e) => {
            log::warn!("map load failed: {}", e);
            CountrySet::empty()
        }
    }
}
