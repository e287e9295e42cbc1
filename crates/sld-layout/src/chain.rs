//! Horizontal chains of bus nodes.
//!
//! Flat structuring cells (two-bus couplers) link busbar sections side by
//! side. Transitively linked sections form one chain; buses untouched by any
//! flat cell become singleton chains, so the chains always partition the bus
//! set. Chain order later becomes the row order inside a column.

use rustc_hash::{FxHashMap, FxHashSet};
use sld_graph::Graph;

use crate::error::{Error, Result};
use crate::rank::RankMap;

/// Index into the chain arena.
pub type ChainId = usize;

#[derive(Debug, Clone, Default)]
pub struct Chain {
    buses: Vec<String>,
    /// Vertical slot, 0 while unassigned.
    pub v: i32,
}

impl Chain {
    fn singleton(bus: String) -> Self {
        Self {
            buses: vec![bus],
            v: 0,
        }
    }

    pub fn buses(&self) -> &[String] {
        &self.buses
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn index_of(&self, bus: &str) -> Option<usize> {
        self.buses.iter().position(|b| b == bus)
    }

    pub fn contains(&self, bus: &str) -> bool {
        self.index_of(bus).is_some()
    }

    fn delta(&self, a: &str, b: &str) -> Option<i64> {
        let ia = self.index_of(a)? as i64;
        let ib = self.index_of(b)? as i64;
        Some(ia - ib)
    }

    /// Reverses this chain when some pair of buses shared with `other`
    /// appears in the opposite relative order. The earlier chain keeps its
    /// orientation.
    pub fn align_to(&mut self, other: &Chain) {
        let shared: Vec<&str> = other
            .buses
            .iter()
            .map(String::as_str)
            .filter(|b| self.contains(b))
            .collect();
        for i in 0..shared.len() {
            for j in i + 1..shared.len() {
                let (Some(ours), Some(theirs)) = (
                    self.delta(shared[i], shared[j]),
                    other.delta(shared[i], shared[j]),
                ) else {
                    continue;
                };
                if ours * theirs < 0 {
                    self.buses.reverse();
                    return;
                }
            }
        }
    }
}

/// Chains transitively linked buses, then covers the rest with singletons.
/// The result is sorted descending by size so larger chains are processed
/// first downstream; ties keep build order.
pub fn build(graph: &Graph, ranks: &RankMap, flat_cells: &[String]) -> Result<Vec<Chain>> {
    let mut incident: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for cell_id in flat_cells {
        let Some(cell) = graph.cell(cell_id) else {
            continue;
        };
        for bus in &cell.buses {
            incident
                .entry(bus.as_str())
                .or_default()
                .push(cell_id.as_str());
        }
    }

    // Buses with a single incident flat cell are chain endpoints; starting
    // there keeps the walk from beginning mid-cycle.
    let mut candidates: Vec<&str> = incident.keys().copied().collect();
    candidates.sort_by_key(|bus| (incident[bus].len(), ranks.get(*bus).copied().unwrap_or(0)));

    let mut pool: FxHashSet<&str> = candidates.iter().copied().collect();
    let mut chains: Vec<Chain> = Vec::new();
    for &seed in &candidates {
        if !pool.contains(seed) {
            continue;
        }
        chains.push(walk(graph, seed, &mut pool, &incident)?);
    }

    let mut isolated = graph.bus_ids();
    isolated.sort();
    for bus in isolated {
        if !incident.contains_key(bus.as_str()) {
            chains.push(Chain::singleton(bus));
        }
    }

    chains.sort_by_key(|c| std::cmp::Reverse(c.len()));
    Ok(chains)
}

/// Depth-first walk with an explicit stack. A bus leaves the pool exactly
/// when it joins the chain, so cycles terminate.
fn walk<'a>(
    graph: &'a Graph,
    seed: &'a str,
    pool: &mut FxHashSet<&'a str>,
    incident: &FxHashMap<&'a str, Vec<&'a str>>,
) -> Result<Chain> {
    let mut chain = Chain::default();
    let mut stack: Vec<&str> = vec![seed];
    while let Some(bus) = stack.pop() {
        if !pool.remove(bus) {
            continue;
        }
        chain.buses.push(bus.to_string());
        let Some(cells) = incident.get(bus) else {
            continue;
        };
        for cell_id in cells.iter().rev() {
            let Some(cell) = graph.cell(cell_id) else {
                continue;
            };
            let Some(other) = cell.buses.iter().find(|b| *b != bus) else {
                continue;
            };
            if pool.contains(other.as_str()) {
                stack.push(other.as_str());
            }
        }
    }
    if chain.is_empty() {
        return Err(Error::EmptyChainSeed);
    }
    Ok(chain)
}
