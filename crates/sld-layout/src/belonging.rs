//! Reverse lookup from a bus node to the hyperedges it participates in: the
//! patterns that contain it and the single chain that owns it. Built once
//! after pattern and chain construction, read-only afterwards.

use rustc_hash::FxHashMap;

use crate::chain::{Chain, ChainId};
use crate::pattern::{PatternId, PatternSet};

#[derive(Debug, Clone)]
pub struct Belonging {
    pub patterns: Vec<PatternId>,
    pub chain: ChainId,
}

#[derive(Debug, Default)]
pub struct BelongingIndex {
    map: FxHashMap<String, Belonging>,
}

impl BelongingIndex {
    pub fn get(&self, bus: &str) -> Option<&Belonging> {
        self.map.get(bus)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

pub fn build(patterns: &PatternSet, chains: &[Chain]) -> BelongingIndex {
    let mut map: FxHashMap<String, Belonging> = FxHashMap::default();

    // Chains partition the bus set, so this seeds an entry for every bus.
    for (chain_id, chain) in chains.iter().enumerate() {
        for bus in chain.buses() {
            map.insert(
                bus.clone(),
                Belonging {
                    patterns: Vec::new(),
                    chain: chain_id,
                },
            );
        }
    }

    for (pattern_id, pattern) in patterns.iter().enumerate() {
        for bus in pattern.buses() {
            if let Some(belonging) = map.get_mut(bus) {
                belonging.patterns.push(pattern_id);
            }
        }
    }

    BelongingIndex { map }
}
