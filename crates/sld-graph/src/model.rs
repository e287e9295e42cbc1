//! Entity types stored in the graph.
//!
//! These are intentionally lightweight and `Clone`-friendly; the layout
//! engine treats them as plain records and downstream tooling serializes them
//! as JSON.

use serde::{Deserialize, Serialize};

/// Structural grid coordinate of a bus node: `row` along the busbar axis,
/// `column` is the vertical slot of the owning chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    /// Injection-like element hanging off one or more bus nodes.
    Extern,
    /// Coupling element between bus sides.
    Intern,
    InternBound,
}

impl CellKind {
    pub fn is_intern(self) -> bool {
        matches!(self, CellKind::Intern | CellKind::InternBound)
    }
}

/// Draw direction of a cell relative to its busbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Top,
    Bottom,
}

/// A busbar section. The structural position starts unset and is written
/// exactly once per layout run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusNode {
    pub position: Option<Position>,
}

/// Leaf terminal inside a cell representing an external connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeder {
    pub id: String,
    pub order: Option<i32>,
}

impl Feeder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order: None,
        }
    }
}

/// A grouping of terminals forming one diagram element.
///
/// `buses` lists the member bus nodes in cell order. For intern kinds the
/// `left`/`right` subsets describe the two coupling sides. `direction` and
/// `order` start unset and are written by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub buses: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub direction: Option<Direction>,
    pub order: Option<i32>,
    pub feeders: Vec<Feeder>,
}

impl Cell {
    pub fn new(kind: CellKind, buses: &[&str]) -> Self {
        Self {
            kind,
            buses: buses.iter().map(|b| b.to_string()).collect(),
            left: Vec::new(),
            right: Vec::new(),
            direction: None,
            order: None,
            feeders: Vec::new(),
        }
    }

    pub fn extern_cell(buses: &[&str]) -> Self {
        Self::new(CellKind::Extern, buses)
    }

    pub fn intern(left: &[&str], right: &[&str]) -> Self {
        Self::intern_of_kind(CellKind::Intern, left, right)
    }

    pub fn intern_bound(left: &[&str], right: &[&str]) -> Self {
        Self::intern_of_kind(CellKind::InternBound, left, right)
    }

    fn intern_of_kind(kind: CellKind, left: &[&str], right: &[&str]) -> Self {
        let mut buses: Vec<String> = Vec::with_capacity(left.len() + right.len());
        for bus in left.iter().chain(right) {
            if !buses.iter().any(|b| b == bus) {
                buses.push(bus.to_string());
            }
        }
        Self {
            kind,
            buses,
            left: left.iter().map(|b| b.to_string()).collect(),
            right: right.iter().map(|b| b.to_string()).collect(),
            direction: None,
            order: None,
            feeders: Vec::new(),
        }
    }

    pub fn with_feeder(mut self, id: impl Into<String>) -> Self {
        self.feeders.push(Feeder::new(id));
        self
    }
}
