//! Per-cluster organization: orient chains consistently, order the vertical
//! columns left to right, book a vertical slot per chain, then write the
//! structural positions and the cell/feeder ordering back into the graph.

use std::collections::BTreeSet;

use sld_graph::{Direction, Graph, Position};

use crate::belonging::BelongingIndex;
use crate::chain::{Chain, ChainId};
use crate::cluster::Cluster;
use crate::pattern::{PatternId, PatternSet};

/// Organizes one cluster. `first_row` and `first_feeder_order` come from the
/// previous cluster; the returned pair feeds the next one, which keeps the
/// global numbering disjoint and increasing.
pub fn organize(
    cluster: &Cluster,
    patterns: &PatternSet,
    chains: &mut [Chain],
    belonging: &BelongingIndex,
    graph: &mut Graph,
    first_row: i32,
    first_feeder_order: i32,
) -> (i32, i32) {
    align_chains(cluster, chains);
    let sorted = sort_patterns(cluster, patterns, chains, belonging);
    assign_vertical_slots(&sorted, patterns, chains, belonging);
    let next_row = assign_positions(cluster, chains, graph, first_row);
    let next_feeder_order = assign_cell_orders(&sorted, patterns, graph, first_feeder_order);
    (next_row, next_feeder_order)
}

/// Every later chain aligns to every earlier one, so chains connected
/// through shared buses end up with one consistent orientation.
fn align_chains(cluster: &Cluster, chains: &mut [Chain]) {
    for (i, &earlier) in cluster.chains.iter().enumerate() {
        for &later in &cluster.chains[i + 1..] {
            let (head, tail) = chains.split_at_mut(later);
            tail[0].align_to(&head[earlier]);
        }
    }
}

/// Distinct chains owning the pattern's members, in member order.
fn member_chains(
    pattern_id: PatternId,
    patterns: &PatternSet,
    belonging: &BelongingIndex,
) -> Vec<ChainId> {
    let mut out: Vec<ChainId> = Vec::new();
    for bus in patterns.get(pattern_id).buses() {
        let Some(bel) = belonging.get(bus) else {
            continue;
        };
        if !out.contains(&bel.chain) {
            out.push(bel.chain);
        }
    }
    out
}

/// Index of the first chain bus that belongs to the pattern.
fn intersection_index(chain: &Chain, pattern_id: PatternId, patterns: &PatternSet) -> Option<usize> {
    let pattern = patterns.get(pattern_id);
    chain.buses().iter().position(|b| pattern.contains(b))
}

/// Two patterns compare only through a chain they both touch: the one
/// intersecting the chain earlier sorts first. Zero means unconstrained,
/// not equal, so this is a partial order and not a comparator.
fn compare_patterns(
    a: PatternId,
    b: PatternId,
    patterns: &PatternSet,
    chains: &[Chain],
    belonging: &BelongingIndex,
) -> i64 {
    let chains_b = member_chains(b, patterns, belonging);
    for chain_id in member_chains(a, patterns, belonging) {
        if !chains_b.contains(&chain_id) {
            continue;
        }
        let chain = &chains[chain_id];
        let (Some(ia), Some(ib)) = (
            intersection_index(chain, a, patterns),
            intersection_index(chain, b, patterns),
        ) else {
            continue;
        };
        if ia != ib {
            return ia as i64 - ib as i64;
        }
    }
    0
}

/// Incremental insertion sort under the partial order above. A pattern is
/// inserted at the first placed pattern it compares nonzero against; when a
/// whole pass places nothing, the first remaining pattern is appended, which
/// both terminates and pins unconstrained patterns deterministically.
fn sort_patterns(
    cluster: &Cluster,
    patterns: &PatternSet,
    chains: &[Chain],
    belonging: &BelongingIndex,
) -> Vec<PatternId> {
    let mut remaining: Vec<PatternId> = cluster.patterns.clone();
    if remaining.is_empty() {
        return remaining;
    }
    let mut sorted: Vec<PatternId> = vec![remaining.remove(0)];
    while !remaining.is_empty() {
        let mut inserted = false;
        for (k, &candidate) in remaining.iter().enumerate() {
            if try_insert(candidate, &mut sorted, patterns, chains, belonging) {
                remaining.remove(k);
                inserted = true;
                break;
            }
        }
        if !inserted {
            sorted.push(remaining.remove(0));
        }
    }
    sorted
}

fn try_insert(
    candidate: PatternId,
    sorted: &mut Vec<PatternId>,
    patterns: &PatternSet,
    chains: &[Chain],
    belonging: &BelongingIndex,
) -> bool {
    for (position, &placed) in sorted.iter().enumerate() {
        let ordering = compare_patterns(candidate, placed, patterns, chains, belonging);
        if ordering != 0 {
            let at = if ordering < 0 { position } else { position + 1 };
            sorted.insert(at, candidate);
            return true;
        }
    }
    false
}

/// Walks the sorted patterns and books a vertical slot for every member
/// chain that still has none. Slot 0 stands for "unassigned", so the search
/// starts at 1 unless 0 was explicitly booked inside this pattern.
fn assign_vertical_slots(
    sorted: &[PatternId],
    patterns: &PatternSet,
    chains: &mut [Chain],
    belonging: &BelongingIndex,
) {
    for &pattern_id in sorted {
        let pattern = patterns.get(pattern_id);
        let mut booked: BTreeSet<i32> = BTreeSet::new();
        for bus in pattern.buses() {
            if let Some(bel) = belonging.get(bus) {
                booked.insert(chains[bel.chain].v);
            }
        }
        for bus in pattern.buses() {
            let Some(bel) = belonging.get(bus) else {
                continue;
            };
            if chains[bel.chain].v == 0 {
                let slot = first_available_slot(&booked);
                chains[bel.chain].v = slot;
                booked.insert(slot);
            }
        }
    }
}

fn first_available_slot(booked: &BTreeSet<i32>) -> i32 {
    let first = booked.first().copied();
    if first.is_none() || (booked.len() == 1 && first == Some(0)) {
        return 1;
    }
    let mut slot = if first == Some(0) { 0 } else { 1 };
    for &taken in booked {
        if taken == slot {
            slot += 1;
        } else {
            return slot;
        }
    }
    slot
}

/// Rows run from `first_row` along each chain; the column is the chain's
/// vertical slot. Returns the next cluster's first row.
fn assign_positions(
    cluster: &Cluster,
    chains: &[Chain],
    graph: &mut Graph,
    first_row: i32,
) -> i32 {
    let mut max_row = first_row;
    for &chain_id in &cluster.chains {
        let chain = &chains[chain_id];
        let mut row = first_row;
        for bus in chain.buses() {
            if let Some(node) = graph.bus_mut(bus) {
                node.position = Some(Position::new(row, chain.v));
            }
            row += 1;
        }
        max_row = max_row.max(row);
    }
    max_row
}

/// Cells take alternating directions and increasing order numbers along the
/// sorted patterns; feeder numbering continues across clusters. Returns the
/// next free feeder order.
fn assign_cell_orders(
    sorted: &[PatternId],
    patterns: &PatternSet,
    graph: &mut Graph,
    first_feeder_order: i32,
) -> i32 {
    let mut feeder_order = first_feeder_order;
    let mut cell_position: i32 = 0;
    for &pattern_id in sorted {
        for cell_id in patterns.get(pattern_id).cells() {
            let Some(cell) = graph.cell_mut(cell_id) else {
                continue;
            };
            cell.direction = Some(if cell_position % 2 == 0 {
                Direction::Top
            } else {
                Direction::Bottom
            });
            cell.order = Some(cell_position);
            cell_position += 1;
            for feeder in &mut cell.feeders {
                feeder.order = Some(feeder_order);
                feeder_order += 1;
            }
        }
    }
    feeder_order
}
