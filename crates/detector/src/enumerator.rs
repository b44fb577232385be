//! Triangular cycle enumeration over the pair graph

use rayon::prelude::*;
use std::collections::HashSet;

use triarb_core::{Currency, Cycle, Pair, PairCatalog};

/// All 3-currency cycles starting and ending at `reference`.
///
/// Two reference pairs `(ref, m)` and `(ref, m')` with a direct `m`/`m'`
/// market form a triangle, which is emitted in both traversal directions.
/// Visiting `(P, P')` and `(P', P)` finds the same triangle twice; repeats are
/// dropped, keeping first-seen order.
pub fn enumerate_cycles(catalog: &PairCatalog, reference: &Currency) -> Vec<Cycle> {
    let anchored: Vec<&Pair> = catalog.containing(reference).collect();

    let found: Vec<Cycle> = (0..anchored.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let anchored = &anchored;
            (0..anchored.len())
                .filter(move |&j| j != i)
                .filter_map(move |j| triangle(catalog, reference, anchored[i], anchored[j]))
                .flatten()
        })
        .collect();

    let mut seen = HashSet::with_capacity(found.len());
    found.into_iter().filter(|c| seen.insert(c.clone())).collect()
}

/// Both directions of the triangle closed by `p` and `q`, if any
fn triangle(catalog: &PairCatalog, reference: &Currency, p: &Pair, q: &Pair) -> Option<[Cycle; 2]> {
    let m = p.other(reference)?;
    let n = q.other(reference)?;
    if m == n || !catalog.contains(m, n) {
        return None;
    }

    let forward = Cycle::new(reference.clone(), m.clone(), n.clone())?;
    let backward = forward.reversed();
    Some([forward, backward])
}
