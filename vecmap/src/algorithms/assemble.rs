//! Ring / polygon assembly from decoded arcs.

use super::arcs::DecodedArcs;
use crate::geometry::limits;
use crate::model::{ArcRef, CountrySet, Feature, Polygon, Ring};
use serde::{Deserialize, Serialize};

/// Arc-index structure of one feature, tagged by shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "arcs")]
pub enum Geometry {
    Polygon(Vec<Vec<ArcRef>>),
    MultiPolygon(Vec<Vec<Vec<ArcRef>>>),
}

impl Geometry {
    /// Normalize to an ordered sequence of polygons (each a list of rings).
    pub fn polygons(&self) -> Vec<&[Vec<ArcRef>]> {
        match self {
            Geometry::Polygon(rings) => vec![rings.as_slice()],
            Geometry::MultiPolygon(polys) => polys.iter().map(|p| p.as_slice()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureGeometry {
    pub id: Option<String>,
    pub name: Option<String>,
    pub geometry: Geometry,
}

/// Point count of a ring; `None` if a reference is out of range.
pub fn ring_point_count(arcs: &DecodedArcs, refs: &[ArcRef]) -> Option<usize> {
    refs.iter().try_fold(0usize, |acc, r| Some(acc.saturating_add(arcs.get(r.index())?.len())))
}

/// Point count of a whole feature, saturating.
pub fn feature_point_count(arcs: &DecodedArcs, fg: &FeatureGeometry) -> Option<usize> {
    fg.geometry
        .polygons()
        .into_iter()
        .flat_map(|p| p.iter())
        .try_fold(0usize, |acc, r| Some(acc.saturating_add(ring_point_count(arcs, r)?)))
}

/// Concatenate the referenced arcs; shared endpoints are kept as-is.
/// `None` if a reference is out of range or the ring exceeds the assembly cap.
pub fn resolve_ring(arcs: &DecodedArcs, refs: &[ArcRef]) -> Option<Ring> {
    let total = ring_point_count(arcs, refs)?;
    if total > limits::MAX_ASSEMBLED_POINTS {
        return None;
    }
    let mut ring = Vec::with_capacity(total);
    for r in refs {
        ring.extend(arcs.resolve(*r)?.copied());
    }
    Some(ring)
}

pub fn resolve_polygon(arcs: &DecodedArcs, rings: &[Vec<ArcRef>]) -> Option<Polygon> {
    let rings = rings.iter().map(|r| resolve_ring(arcs, r)).collect::<Option<Vec<_>>>()?;
    Some(Polygon { rings })
}

/// Resolve every polygon of a feature; `None` if any reference is out of range.
pub fn resolve_feature(arcs: &DecodedArcs, fg: &FeatureGeometry) -> Option<Feature> {
    let polygons = fg
        .geometry
        .polygons()
        .into_iter()
        .map(|p| resolve_polygon(arcs, p))
        .collect::<Option<Vec<_>>>()?;
    Some(Feature { id: fg.id.clone(), name: fg.name.clone(), polygons })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssembleReport {
    pub countries: CountrySet,
    pub skipped: usize,
}

/// Build the country set; malformed features are skipped and counted.
///
/// Features that would push the assembled total past
/// `MAX_ASSEMBLED_POINTS` are skipped before anything is allocated.
pub fn assemble(arcs: &DecodedArcs, features: &[FeatureGeometry]) -> AssembleReport {
    let mut report = AssembleReport::default();
    let mut budget = limits::MAX_ASSEMBLED_POINTS;
    for (i, fg) in features.iter().enumerate() {
        let label = fg.id.as_deref().or(fg.name.as_deref()).unwrap_or("unnamed");
        let Some(points) = feature_point_count(arcs, fg) else {
            log::warn!("skipping feature {} ({}): arc reference out of range", i, label);
            report.skipped += 1;
            continue;
        };
        if points > budget {
            log::warn!("skipping feature {} ({}): {} assembled points over budget {}", i, label, points, budget);
            report.skipped += 1;
            continue;
        }
        match resolve_feature(arcs, fg) {
            Some(f) => {
                budget -= points;
                report.countries.features.push(f);
            }
            None => report.skipped += 1,
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::arcs::decode_arcs;
    use crate::model::{Transform, Vec2};

    fn square_arcs() -> DecodedArcs {
        // arc 0: left half boundary, arc 1: right half boundary
        let table = vec![
            vec![[0, 0], [0, 10], [10, 0]],
            vec![[10, 10], [0, -10], [-10, 0]],
        ];
        decode_arcs(&table, &Transform::default())
    }

    #[test]
    fn ring_length_is_sum_of_arcs() {
        let arcs = square_arcs();
        let ring = resolve_ring(&arcs, &[ArcRef(0), ArcRef(1)]).unwrap();
        assert_eq!(ring.len(), 6);
        assert_eq!(ring[0], Vec2::new(0.0, 0.0));
        assert_eq!(ring[5], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn out_of_range_ring_is_none() {
        let arcs = square_arcs();
        assert!(resolve_ring(&arcs, &[ArcRef(0), ArcRef(7)]).is_none());
        assert!(resolve_ring(&arcs, &[ArcRef(!2)]).is_none());
    }

    #[test]
    fn repeated_arc_over_cap_is_skipped() {
        let arcs = square_arcs();
        let refs = vec![ArcRef(0); limits::MAX_ASSEMBLED_POINTS / 3 + 1];
        assert_eq!(ring_point_count(&arcs, &refs), Some(refs.len() * 3));
        assert!(resolve_ring(&arcs, &refs).is_none());
        let feats = vec![
            FeatureGeometry { id: Some("huge".into()), name: None, geometry: Geometry::Polygon(vec![refs]) },
            FeatureGeometry { id: Some("small".into()), name: None, geometry: Geometry::Polygon(vec![vec![ArcRef(1)]]) },
        ];
        let report = assemble(&arcs, &feats);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.countries.features[0].id.as_deref(), Some("small"));
    }

    #[test]
    fn polygon_and_multipolygon_normalize_alike() {
        let arcs = square_arcs();
        let single = FeatureGeometry {
            id: None,
            name: None,
            geometry: Geometry::Polygon(vec![vec![ArcRef(0), ArcRef(1)]]),
        };
        let multi = FeatureGeometry {
            id: None,
            name: None,
            geometry: Geometry::MultiPolygon(vec![vec![vec![ArcRef(0), ArcRef(1)]]]),
        };
        assert_eq!(resolve_feature(&arcs, &single), resolve_feature(&arcs, &multi));
    }

    #[test]
    fn bad_feature_is_skipped_others_kept() {
        let arcs = square_arcs();
        let feats = vec![
            FeatureGeometry { id: Some("A".into()), name: None, geometry: Geometry::Polygon(vec![vec![ArcRef(0)]]) },
            FeatureGeometry { id: Some("B".into()), name: None, geometry: Geometry::Polygon(vec![vec![ArcRef(9)]]) },
            FeatureGeometry { id: Some("C".into()), name: None, geometry: Geometry::Polygon(vec![vec![ArcRef(!1)]]) },
        ];
        let report = assemble(&arcs, &feats);
        assert_eq!(report.skipped, 1);
        let ids: Vec<_> = report.countries.features.iter().map(|f| f.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["A", "C"]);
    }
}
