//! Connected components over the pattern/chain hypergraph.
//!
//! Two buses are connected when they share a pattern or a chain. Each
//! component is laid out independently; the driver threads the global row
//! and feeder counters through them so numbering never overlaps.

use rustc_hash::FxHashSet;
use sld_graph::Graph;

use crate::belonging::BelongingIndex;
use crate::chain::{Chain, ChainId};
use crate::pattern::{PatternId, PatternSet};

#[derive(Debug)]
pub struct Cluster {
    /// Buses in discovery order.
    pub buses: Vec<String>,
    /// The cluster's patterns, in registry order.
    pub patterns: Vec<PatternId>,
    /// The cluster's chains, in arena order (descending size).
    pub chains: Vec<ChainId>,
}

pub fn build<'a>(
    graph: &'a Graph,
    patterns: &'a PatternSet,
    chains: &'a [Chain],
    belonging: &'a BelongingIndex,
) -> Vec<Cluster> {
    let mut claimed: FxHashSet<&'a str> = FxHashSet::default();
    let mut clusters: Vec<Cluster> = Vec::new();

    for seed in graph.buses() {
        if claimed.contains(seed) {
            continue;
        }

        let mut buses: Vec<String> = Vec::new();
        let mut stack: Vec<&'a str> = vec![seed];
        while let Some(bus) = stack.pop() {
            if !claimed.insert(bus) {
                continue;
            }
            buses.push(bus.to_string());
            let Some(bel) = belonging.get(bus) else {
                continue;
            };

            let mut reachable: Vec<&'a str> = Vec::new();
            for &pattern_id in &bel.patterns {
                reachable.extend(patterns.get(pattern_id).buses().iter().map(String::as_str));
            }
            reachable.extend(chains[bel.chain].buses().iter().map(String::as_str));
            for next in reachable.into_iter().rev() {
                if !claimed.contains(next) {
                    stack.push(next);
                }
            }
        }

        let mut cluster_patterns: Vec<PatternId> = Vec::new();
        let mut cluster_chains: Vec<ChainId> = Vec::new();
        for bus in &buses {
            let Some(bel) = belonging.get(bus) else {
                continue;
            };
            for &pattern_id in &bel.patterns {
                if !cluster_patterns.contains(&pattern_id) {
                    cluster_patterns.push(pattern_id);
                }
            }
            if !cluster_chains.contains(&bel.chain) {
                cluster_chains.push(bel.chain);
            }
        }
        cluster_patterns.sort_unstable();
        cluster_chains.sort_unstable();

        clusters.push(Cluster {
            buses,
            patterns: cluster_patterns,
            chains: cluster_chains,
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{belonging, chain, pattern, rank};
    use sld_graph::Cell;

    fn clusters_of(graph: &Graph) -> Vec<Cluster> {
        let ranks = rank::index(graph);
        let (patterns, flat) = pattern::build(graph, &ranks).unwrap();
        let chains = chain::build(graph, &ranks, &flat).unwrap();
        let bel = belonging::build(&patterns, &chains);
        build(graph, &patterns, &chains, &bel)
    }

    #[test]
    fn disconnected_buses_split_into_clusters() {
        let mut g = Graph::new();
        g.add_bus("b1").add_bus("b2");

        let clusters = clusters_of(&g);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].buses, vec!["b1"]);
        assert_eq!(clusters[1].buses, vec!["b2"]);
    }

    #[test]
    fn a_shared_pattern_connects_buses() {
        let mut g = Graph::new();
        g.add_bus("b1").add_bus("b2").add_bus("b3");
        g.add_cell("e1", Cell::extern_cell(&["b1", "b2"]));

        let clusters = clusters_of(&g);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].buses, vec!["b1", "b2"]);
        assert_eq!(clusters[1].buses, vec!["b3"]);
    }

    #[test]
    fn a_chain_connects_buses_across_patterns() {
        let mut g = Graph::new();
        g.add_bus("b1").add_bus("b2").add_bus("b3");
        g.add_cell("e1", Cell::extern_cell(&["b1"]));
        g.add_cell("e3", Cell::extern_cell(&["b3"]));
        g.add_cell("c13", Cell::intern(&["b1"], &["b3"]));

        let clusters = clusters_of(&g);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].buses, vec!["b1", "b3"]);
        assert_eq!(clusters[1].buses, vec!["b2"]);
    }
}
