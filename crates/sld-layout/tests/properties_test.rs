//! Invariant checks over a station that exercises every pass: a chained
//! section group with a merged tie pattern, a vertical coupler, an isolated
//! fed section, and a bare bus.

use std::collections::{BTreeMap, BTreeSet};

use sld_graph::{Cell, Graph};
use sld_layout::{belonging, chain, cluster, layout, pattern, rank};

fn sample_station() -> Graph {
    let mut g = Graph::new();
    g.add_bus("a1").add_bus("a2").add_bus("a3");
    g.add_bus("iso1").add_bus("bare");

    g.add_cell("fa1", Cell::extern_cell(&["a1"]).with_feeder("la1"));
    g.add_cell("fa2", Cell::extern_cell(&["a2"]).with_feeder("la2"));
    g.add_cell("fa3", Cell::extern_cell(&["a3"]).with_feeder("la3"));
    g.add_cell("tie", Cell::extern_cell(&["a1", "a2"]));
    g.add_cell("ca12", Cell::intern(&["a1"], &["a2"]));
    g.add_cell("ca23", Cell::intern(&["a2"], &["a3"]));
    g.add_cell("fiso", Cell::extern_cell(&["iso1"]).with_feeder("liso"));
    g
}

fn snapshot(g: &Graph) -> serde_json::Value {
    let buses: BTreeMap<String, _> = g
        .bus_ids()
        .into_iter()
        .map(|id| {
            let p = g.bus(&id).unwrap().position;
            (id, p)
        })
        .collect();
    let cells: BTreeMap<String, _> = g
        .cell_ids()
        .into_iter()
        .map(|id| {
            let cell = g.cell(&id).unwrap().clone();
            (id, (cell.order, cell.direction, cell.feeders))
        })
        .collect();
    serde_json::json!({ "buses": buses, "cells": cells })
}

#[test]
fn chains_partition_the_bus_set() {
    let g = sample_station();
    let ranks = rank::index(&g);
    let (_, flat) = pattern::build(&g, &ranks).unwrap();
    let chains = chain::build(&g, &ranks, &flat).unwrap();

    let mut covered: Vec<String> = chains
        .iter()
        .flat_map(|c| c.buses().iter().cloned())
        .collect();
    covered.sort();

    let mut all = g.bus_ids();
    all.sort();
    assert_eq!(covered, all);
}

#[test]
fn the_pattern_registry_is_an_antichain() {
    let g = sample_station();
    let ranks = rank::index(&g);
    let (patterns, _) = pattern::build(&g, &ranks).unwrap();

    let sets: Vec<BTreeSet<&String>> = patterns
        .iter()
        .map(|p| p.buses().iter().collect())
        .collect();
    for (i, a) in sets.iter().enumerate() {
        for (j, b) in sets.iter().enumerate() {
            if i != j {
                assert!(!a.is_subset(b), "pattern {i} is included in pattern {j}");
            }
        }
    }
}

#[test]
fn layout_is_deterministic() {
    let mut first = sample_station();
    let mut second = sample_station();
    layout(&mut first).unwrap();
    layout(&mut second).unwrap();

    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn chains_sharing_buses_agree_on_their_order_after_layout() {
    let mut g = sample_station();
    layout(&mut g).unwrap();

    let ranks = rank::index(&g);
    let (_, flat) = pattern::build(&g, &ranks).unwrap();
    let chains = chain::build(&g, &ranks, &flat).unwrap();

    for (i, a) in chains.iter().enumerate() {
        for b in chains.iter().skip(i + 1) {
            let shared: Vec<&str> = a
                .buses()
                .iter()
                .map(String::as_str)
                .filter(|bus| b.contains(bus))
                .collect();
            if shared.len() < 2 {
                continue;
            }
            for x in 0..shared.len() {
                for y in x + 1..shared.len() {
                    let da = a.index_of(shared[x]).unwrap() as i64
                        - a.index_of(shared[y]).unwrap() as i64;
                    let db = b.index_of(shared[x]).unwrap() as i64
                        - b.index_of(shared[y]).unwrap() as i64;
                    assert!(da * db > 0, "chains disagree on {} vs {}", shared[x], shared[y]);
                }
            }
        }
    }
}

#[test]
fn cluster_row_ranges_are_disjoint_and_increasing() {
    let mut g = sample_station();
    layout(&mut g).unwrap();

    // The passes only read topology, so rebuilding them on the laid-out
    // graph reproduces the cluster partition.
    let ranks = rank::index(&g);
    let (patterns, flat) = pattern::build(&g, &ranks).unwrap();
    let chains = chain::build(&g, &ranks, &flat).unwrap();
    let bel = belonging::build(&patterns, &chains);
    let clusters = cluster::build(&g, &patterns, &chains, &bel);
    assert!(clusters.len() > 1);

    let mut previous_max = 0;
    for cluster in &clusters {
        let rows: Vec<i32> = cluster
            .buses
            .iter()
            .map(|bus| g.bus(bus).unwrap().position.unwrap().row)
            .collect();
        let min = *rows.iter().min().unwrap();
        let max = *rows.iter().max().unwrap();
        assert!(min > previous_max, "cluster reuses row {min}");
        previous_max = max;
    }
}

#[test]
fn feeder_orders_are_globally_contiguous_and_increasing() {
    let mut g = sample_station();
    layout(&mut g).unwrap();

    let mut orders: Vec<i32> = g
        .cells()
        .flat_map(|(_, cell)| cell.feeders.iter())
        .map(|f| f.order.unwrap())
        .collect();
    orders.sort_unstable();

    let expected: Vec<i32> = (1..=orders.len() as i32).collect();
    assert_eq!(orders, expected);
}

#[test]
fn every_bus_gets_exactly_one_position() {
    let mut g = sample_station();
    layout(&mut g).unwrap();

    for id in g.bus_ids() {
        assert!(
            g.bus(&id).unwrap().position.is_some(),
            "bus {id} was never placed"
        );
    }
}
