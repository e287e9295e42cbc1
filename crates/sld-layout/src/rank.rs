//! Stable total order over bus nodes.
//!
//! Ranks are assigned 1..=N over the lexicographically sorted bus ids and are
//! the canonical tie-break everywhere a bus-node set needs a deterministic
//! order: pattern members, registry order, chain seeds.

use rustc_hash::FxHashMap;
use sld_graph::Graph;

pub type RankMap = FxHashMap<String, u32>;

pub fn index(graph: &Graph) -> RankMap {
    let mut ids = graph.bus_ids();
    ids.sort();
    ids.into_iter()
        .enumerate()
        .map(|(i, id)| (id, i as u32 + 1))
        .collect()
}
