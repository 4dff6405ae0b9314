//! Delta decoding of quantized arcs.
//!
//! Each arc stores its first position and then successive `[dx, dy]` offsets.
//! A running accumulator, reset per arc, rebuilds the quantized positions
//! which are then mapped through the table's [`Transform`].

use crate::model::{Arc, ArcRef, ArcTable, Transform, Vec2};

/// Decode one arc into absolute coordinates.
pub fn decode_arc(arc: &[[i64; 2]], transform: &Transform) -> Vec<Vec2> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0i64, 0i64);
    for d in arc {
        x = x.wrapping_add(d[0]);
        y = y.wrapping_add(d[1]);
        out.push(transform.apply(x, y));
    }
    out
}

/// Decoded arc table, 1:1 with the source arcs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedArcs {
    arcs: Vec<Vec<Vec2>>,
}

/// Points of one arc in the direction selected by an [`ArcRef`].
pub enum ArcPoints<'a> {
    Forward(std::slice::Iter<'a, Vec2>),
    Reverse(std::iter::Rev<std::slice::Iter<'a, Vec2>>),
}

impl<'a> Iterator for ArcPoints<'a> {
    type Item = &'a Vec2;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ArcPoints::Forward(it) => it.next(),
            ArcPoints::Reverse(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ArcPoints::Forward(it) => it.size_hint(),
            ArcPoints::Reverse(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for ArcPoints<'_> {}

impl DecodedArcs {
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&[Vec2]> {
        self.arcs.get(idx).map(|a| a.as_slice())
    }

    /// Resolve a signed reference; `None` when the index is out of range.
    pub fn resolve(&self, r: ArcRef) -> Option<ArcPoints<'_>> {
        let arc = self.arcs.get(r.index())?;
        Some(if r.is_reversed() {
            ArcPoints::Reverse(arc.iter().rev())
        } else {
            ArcPoints::Forward(arc.iter())
        })
    }

    pub fn point_count(&self) -> usize {
        self.arcs.iter().map(|a| a.len()).sum()
    }
}

/// Decode every arc independently with the shared transform.
pub fn decode_arcs(table: &ArcTable, transform: &Transform) -> DecodedArcs {
    DecodedArcs { arcs: table.iter().map(|a: &Arc| decode_arc(a, transform)).collect() }
}
