use serde_json::json;
use vecmap::model::Vec2;
use vecmap::topology::{load, load_country_set, Topology};
use vecmap::LoadError;

fn two_countries() -> serde_json::Value {
    // Arc 1 is the shared border, traversed forward by A and backward by B.
    json!({
        "type": "Topology",
        "transform": {"scale": [0.5, 0.5], "translate": [-10.0, -10.0]},
        "arcs": [
            [[0, 0], [0, 20]],
            [[0, 20], [20, 0], [0, -20]],
            [[20, 0], [-20, 0]],
            [[20, 20], [20, 0], [0, -20], [-20, 0]]
        ],
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, 1, 2]], "id": "A", "properties": {"name": "Alpha"}},
                    {"type": "MultiPolygon", "arcs": [[[-2, 3]], [[0]]], "id": 42},
                    {"type": null},
                    {"type": "Point", "coordinates": [0, 0]}
                ]
            }
        }
    })
}

#[test]
fn loads_polygon_and_multipolygon() {
    let report = Topology::from_value(two_countries()).unwrap().country_set("countries").unwrap();
    let c = &report.countries;
    assert_eq!(c.feature_count(), 2);
    assert_eq!(report.summary.skipped_features, 0);
    assert_eq!(c.features[0].id.as_deref(), Some("A"));
    assert_eq!(c.features[0].name.as_deref(), Some("Alpha"));
    assert_eq!(c.features[1].id.as_deref(), Some("42"));
    assert_eq!(c.features[1].polygons.len(), 2);
    // ring length equals sum of arc lengths: 2 + 3 + 2
    assert_eq!(c.features[0].polygons[0].rings[0].len(), 7);
    assert_eq!(c.features[0].polygons[0].rings[0][0], Vec2::new(-10.0, -10.0));
}

#[test]
fn shared_arc_is_reversed_for_neighbour() {
    let report = Topology::from_value(two_countries()).unwrap().country_set("countries").unwrap();
    let a = &report.countries.features[0].polygons[0].rings[0];
    let b = &report.countries.features[1].polygons[0].rings[0];
    // A's points 2..5 come from arc 1 forward; B starts with arc 1 reversed.
    let mut fwd: Vec<Vec2> = a[2..5].to_vec();
    fwd.reverse();
    assert_eq!(&b[0..3], fwd.as_slice());
}

#[test]
fn missing_transform_equals_identity() {
    let mut with = two_countries();
    with["transform"] = json!({"scale": [1, 1], "translate": [0, 0]});
    let mut without = two_countries();
    without.as_object_mut().unwrap().remove("transform");
    let a = Topology::from_value(with).unwrap().country_set("countries").unwrap();
    let b = Topology::from_value(without).unwrap().country_set("countries").unwrap();
    assert_eq!(a.countries, b.countries);
}

#[test]
fn out_of_range_feature_is_skipped() {
    let doc = json!({
        "arcs": [[[0, 0], [1, 0], [0, 1]]],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "arcs": [[0]], "id": "ok"},
            {"type": "Polygon", "arcs": [[5]], "id": "bad"},
            {"type": "Polygon", "arcs": "nonsense", "id": "worse"}
        ]}}
    });
    let report = Topology::from_value(doc).unwrap().country_set("countries").unwrap();
    assert_eq!(report.countries.feature_count(), 1);
    assert_eq!(report.summary.skipped_features, 2);
}

#[test]
fn empty_arcs_and_missing_object() {
    let doc = json!({"arcs": [], "objects": {"land": {"type": "GeometryCollection", "geometries": []}}});
    let t = Topology::from_value(doc).unwrap();
    assert!(matches!(t.country_set("countries"), Err(LoadError::MissingObject(_))));
    assert!(t.country_set("land").unwrap().countries.is_empty());
}

#[test]
fn parse_failures_degrade_to_empty() {
    assert!(matches!(load("{not json", "countries"), Err(LoadError::Parse(_))));
    assert!(load_country_set("{not json").is_empty());
    assert!(load_country_set("{\"arcs\": [[[0.5, 1]]]}").is_empty());
}

#[test]
fn extra_position_dimensions_are_ignored() {
    let doc = json!({
        "arcs": [[[1, 2, 99], [1, 1, 7]]],
        "objects": {"countries": {"type": "Polygon", "arcs": [[0]]}}
    });
    let report = Topology::from_value(doc).unwrap().country_set("countries").unwrap();
    let ring = &report.countries.features[0].polygons[0].rings[0];
    assert_eq!(ring, &vec![Vec2::new(1.0, 2.0), Vec2::new(2.0, 3.0)]);
}

#[test]
fn arc_cap_is_enforced() {
    let arcs: Vec<_> = (0..100_001).map(|_| json!([[0, 0]])).collect();
    let doc = json!({"arcs": arcs, "objects": {}});
    assert!(matches!(Topology::from_value(doc), Err(LoadError::TooManyArcs { .. })));
}

#[test]
fn lookup_and_bounds() {
    let report = Topology::from_value(two_countries()).unwrap().country_set("countries").unwrap();
    let c = &report.countries;
    assert!(c.find("Alpha").is_some());
    assert!(c.find("42").is_some());
    assert!(c.find("nowhere").is_none());
    assert_eq!(c.bbox(), Some((-10.0, -10.0, 10.0, 0.0)));
    assert_eq!(c.ring_count(), 3);
    assert_eq!(c.point_count(), 7 + 7 + 2);
}

#[test]
fn repeated_arc_references_are_capped() {
    // 1_000 points referenced 10_000 times exceeds the assembled-point cap.
    let arc: Vec<[i64; 2]> = (0..1_000).map(|i| [i64::from(i > 0), 0]).collect();
    let refs = vec![0; 10_000];
    let doc = json!({
        "arcs": [arc, [[0, 0], [1, 0], [0, 1]]],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "arcs": [refs], "id": "huge"},
            {"type": "Polygon", "arcs": [[1]], "id": "ok"}
        ]}}
    });
    let report = Topology::from_value(doc).unwrap().country_set("countries").unwrap();
    assert_eq!(report.countries.feature_count(), 1);
    assert_eq!(report.countries.features[0].id.as_deref(), Some("ok"));
    assert_eq!(report.summary.skipped_features, 1);
}

#[test]
fn odd_geometry_entries_skip_only_themselves() {
    let doc = json!({
        "arcs": [[[0, 0], [1, 0], [0, 1]]],
        "objects": {"countries": {"type": "GeometryCollection", "geometries": [
            {"type": "Polygon", "arcs": [[0]], "id": "ok"},
            {"type": "Polygon", "arcs": [[0]], "id": "listy", "properties": ["not", "an", "object"]},
            null,
            {"type": 7, "arcs": [[0]]}
        ]}}
    });
    let report = Topology::from_value(doc).unwrap().country_set("countries").unwrap();
    let ids: Vec<_> = report.countries.features.iter().map(|f| f.id.as_deref()).collect();
    // non-object properties only lose the name
    assert_eq!(ids, vec![Some("ok"), Some("listy")]);
    assert_eq!(report.countries.features[1].name, None);
    assert_eq!(report.summary.skipped_features, 2);
}
