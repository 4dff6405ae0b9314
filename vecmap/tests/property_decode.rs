use proptest::prelude::*;
use vecmap::algorithms::arcs::{decode_arc, decode_arcs};
use vecmap::algorithms::assemble::{assemble, resolve_ring, FeatureGeometry, Geometry};
use vecmap::model::{ArcRef, ArcTable, Transform, Vec2};

fn arc_strategy() -> impl Strategy<Value = Vec<[i64; 2]>> {
    prop::collection::vec((-1000i64..1000, -1000i64..1000).prop_map(|(x, y)| [x, y]), 1..12)
}

fn table_strategy() -> impl Strategy<Value = ArcTable> {
    prop::collection::vec(arc_strategy(), 1..8)
}

#[test]
fn delta_example_decodes() {
    let pts = decode_arc(&[[2, 3], [-1, 4], [0, -2]], &Transform::default());
    assert_eq!(pts, vec![Vec2::new(2.0, 3.0), Vec2::new(1.0, 7.0), Vec2::new(1.0, 5.0)]);
}

proptest! {
    #[test]
    fn complement_is_exact_reverse(table in table_strategy(), pick in any::<prop::sample::Index>()) {
        let arcs = decode_arcs(&table, &Transform { scale: [0.01, 0.02], translate: [-180.0, -90.0] });
        let idx = pick.index(table.len()) as i32;
        let fwd: Vec<Vec2> = arcs.resolve(ArcRef(idx)).unwrap().copied().collect();
        let rev: Vec<Vec2> = arcs.resolve(ArcRef(!idx)).unwrap().copied().collect();
        let mut back = fwd.clone();
        back.reverse();
        prop_assert_eq!(rev, back);
    }

    #[test]
    fn ring_length_is_sum(table in table_strategy(), refs in prop::collection::vec(any::<(prop::sample::Index, bool)>(), 1..10)) {
        let arcs = decode_arcs(&table, &Transform::default());
        let refs: Vec<ArcRef> = refs
            .iter()
            .map(|(i, rev)| {
                let idx = i.index(table.len()) as i32;
                if *rev { ArcRef(!idx) } else { ArcRef(idx) }
            })
            .collect();
        let expected: usize = refs.iter().map(|r| table[r.index()].len()).sum();
        let ring = resolve_ring(&arcs, &refs).unwrap();
        prop_assert!(!ring.is_empty());
        prop_assert_eq!(ring.len(), expected);
    }

    #[test]
    fn assembly_is_deterministic(table in table_strategy(), raw in prop::collection::vec(-10i32..10, 1..20)) {
        let refs: Vec<ArcRef> = raw.into_iter().map(ArcRef).collect();
        let feats = vec![
            FeatureGeometry { id: Some("x".into()), name: None, geometry: Geometry::Polygon(vec![refs.clone()]) },
            FeatureGeometry { id: None, name: None, geometry: Geometry::MultiPolygon(vec![vec![refs.clone()], vec![refs]]) },
        ];
        let t = Transform { scale: [0.1, 0.1], translate: [3.0, 4.0] };
        let a = assemble(&decode_arcs(&table, &t), &feats);
        let b = assemble(&decode_arcs(&table, &t), &feats);
        prop_assert_eq!(a, b);
    }
}
