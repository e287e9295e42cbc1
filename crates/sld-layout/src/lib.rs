#![forbid(unsafe_code)]

//! Automatic structural layout for single-line substation diagrams.
//!
//! The engine reads a voltage-level topology graph and writes back, with no
//! manual placement input:
//! - a (row, column) grid position for every bus node,
//! - a draw direction and ordering index for every cell,
//! - a global sequence number for every feeder.
//!
//! The passes run leaf-first: a stable rank over bus nodes, vertical bus
//! connection patterns merged from extern cells, horizontal chains over flat
//! structuring cells, a per-bus belonging index, connected clusters over the
//! resulting hypergraph, and finally a per-cluster organizer that emits
//! positions and orderings. Output depends only on the input graph; two runs
//! over the same topology produce identical results.

pub mod belonging;
pub mod chain;
pub mod cluster;
pub mod error;
pub mod organize;
pub mod pattern;
pub mod rank;

pub use error::{Error, Result};

use sld_graph::Graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the full layout over the graph, mutating bus positions and
/// cell/feeder ordering in place.
pub fn layout(graph: &mut Graph) -> Result<()> {
    tracing::debug!(
        buses = graph.bus_count(),
        cells = graph.cell_count(),
        "start structural layout"
    );

    let ranks = rank::index(graph);
    let (patterns, flat_cells) = pattern::build(graph, &ranks)?;
    let mut chains = chain::build(graph, &ranks, &flat_cells)?;
    let belonging = belonging::build(&patterns, &chains);
    let clusters = cluster::build(graph, &patterns, &chains, &belonging);

    tracing::debug!(
        patterns = patterns.len(),
        chains = chains.len(),
        clusters = clusters.len(),
        "topology passes complete"
    );

    let mut first_row = 1;
    let mut first_feeder_order = 1;
    for cluster in &clusters {
        let (next_row, next_feeder_order) = organize::organize(
            cluster,
            &patterns,
            &mut chains,
            &belonging,
            graph,
            first_row,
            first_feeder_order,
        );
        first_row = next_row;
        first_feeder_order = next_feeder_order;
    }

    graph.set_max_bus_position();
    Ok(())
}
