//! Vertical bus connection patterns.
//!
//! Every extern cell connects to a set of bus nodes; cells whose bus sets are
//! subset/superset of each other share one vertical alignment column. The
//! registry canonicalizes those sets into patterns and keeps them an
//! antichain under set inclusion: registering a subset attaches the cell to
//! the including pattern, registering a superset promotes the candidate and
//! absorbs every registered subset.
//!
//! The side subsets of intern cells are registered too (with no cell
//! attached) so that intern cells already represented by a column can be
//! told apart from the ones that structure the diagram horizontally.

use sld_graph::{Cell, CellKind, Graph};

use crate::error::{Error, Result};
use crate::rank::RankMap;

/// Index into the registry, stable once construction is done.
pub type PatternId = usize;

#[derive(Debug, Clone)]
pub struct Pattern {
    /// Member bus ids, ascending by rank.
    buses: Vec<String>,
    /// Member ranks in the same order; the registry sort key.
    ranks: Vec<u32>,
    /// Attached cell ids in attachment order.
    cells: Vec<String>,
}

impl Pattern {
    fn from_buses(cell: &str, buses: &[String], ranks: &RankMap) -> Result<Self> {
        let mut members: Vec<(u32, String)> = Vec::with_capacity(buses.len());
        for bus in buses {
            let rank = ranks.get(bus).copied().ok_or_else(|| Error::UnknownBus {
                cell: cell.to_string(),
                bus: bus.clone(),
            })?;
            members.push((rank, bus.clone()));
        }
        members.sort();
        members.dedup_by(|a, b| a.0 == b.0);
        Ok(Self {
            ranks: members.iter().map(|m| m.0).collect(),
            buses: members.into_iter().map(|m| m.1).collect(),
            cells: Vec::new(),
        })
    }

    pub fn buses(&self) -> &[String] {
        &self.buses
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn contains(&self, bus: &str) -> bool {
        self.buses.iter().any(|b| b == bus)
    }

    /// Ordered subset test over the rank vectors.
    fn is_included_in(&self, other: &Pattern) -> bool {
        if self.ranks.len() > other.ranks.len() {
            return false;
        }
        let mut j = 0;
        for &r in &self.ranks {
            while j < other.ranks.len() && other.ranks[j] < r {
                j += 1;
            }
            if j >= other.ranks.len() || other.ranks[j] != r {
                return false;
            }
            j += 1;
        }
        true
    }
}

/// Pattern registry, kept sorted by rank vector so that merge resolution
/// scans candidates in one canonical order (minimum bus rank first) no
/// matter how the graph was traversed.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, id: PatternId) -> &Pattern {
        &self.patterns[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// True if the candidate is included in some registered pattern.
    pub fn includes(&self, candidate: &Pattern) -> bool {
        self.patterns.iter().any(|p| candidate.is_included_in(p))
    }

    fn register(&mut self, mut candidate: Pattern, cell: Option<&str>) {
        let mut idx = 0;
        let mut promoted = false;
        let mut target: Option<usize> = None;
        while idx < self.patterns.len() {
            if !promoted && candidate.is_included_in(&self.patterns[idx]) {
                target = Some(idx);
                break;
            }
            if self.patterns[idx].is_included_in(&candidate) {
                // Promote: the candidate takes over the absorbed pattern's
                // cells. Keep scanning; a candidate can cover several
                // registered subsets at once.
                let absorbed = self.patterns.remove(idx);
                candidate.cells.extend(absorbed.cells);
                promoted = true;
                continue;
            }
            idx += 1;
        }

        let target = match target {
            Some(i) => i,
            None => {
                let at = self
                    .patterns
                    .partition_point(|p| p.ranks < candidate.ranks);
                self.patterns.insert(at, candidate);
                at
            }
        };

        if let Some(cell) = cell {
            self.patterns[target].cells.push(cell.to_string());
        }
    }
}

/// Builds the registry from the graph's cells and returns it together with
/// the flat structuring cells (two-bus intern cells not already represented
/// by a column), which feed horizontal chain construction.
pub fn build(graph: &Graph, ranks: &RankMap) -> Result<(PatternSet, Vec<String>)> {
    let mut set = PatternSet::default();

    for (id, cell) in graph.cells() {
        if cell.kind != CellKind::Extern {
            continue;
        }
        if cell.buses.is_empty() {
            return Err(Error::EmptyBusSet {
                cell: id.to_string(),
            });
        }
        let candidate = Pattern::from_buses(id, &cell.buses, ranks)?;
        set.register(candidate, Some(id));
    }

    let intern: Vec<(&str, &Cell)> = graph
        .cells()
        .filter(|(_, cell)| cell.kind.is_intern())
        .collect();

    for &(id, cell) in &intern {
        if cell.left.is_empty() {
            return Err(Error::EmptySide {
                cell: id.to_string(),
                side: "left",
            });
        }
        set.register(Pattern::from_buses(id, &cell.left, ranks)?, None);
    }
    for &(id, cell) in &intern {
        if cell.right.is_empty() {
            return Err(Error::EmptySide {
                cell: id.to_string(),
                side: "right",
            });
        }
        set.register(Pattern::from_buses(id, &cell.right, ranks)?, None);
    }

    // An intern cell whose full bus set already sits inside a pattern is
    // vertical: the column represents it. The remainder structure the
    // diagram; the two-bus ones are eligible for chaining.
    let mut flat: Vec<String> = Vec::new();
    for &(id, cell) in &intern {
        let probe = Pattern::from_buses(id, &cell.buses, ranks)?;
        if set.includes(&probe) {
            continue;
        }
        if cell.buses.len() == 2 {
            flat.push(id.to_string());
        }
    }

    Ok((set, flat))
}
