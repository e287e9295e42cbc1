use rustc_hash::FxBuildHasher;

use crate::model::{BusNode, Cell, Position};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct BusEntry {
    id: String,
    node: BusNode,
}

#[derive(Debug, Clone)]
struct CellEntry {
    id: String,
    cell: Cell,
}

/// Topology graph of one voltage level.
///
/// Bus nodes and cells are stored in insertion order; queries go through
/// id -> index maps. Registering an id twice overwrites the stored entity.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    buses: Vec<BusEntry>,
    bus_index: HashMap<String, usize>,

    cells: Vec<CellEntry>,
    cell_index: HashMap<String, usize>,

    max_bus_position: Option<Position>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_bus(&self, id: &str) -> bool {
        self.bus_index.contains_key(id)
    }

    pub fn add_bus(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.bus_index.get(&id) {
            self.buses[idx].node = BusNode::default();
            return self;
        }
        let idx = self.buses.len();
        self.buses.push(BusEntry {
            id: id.clone(),
            node: BusNode::default(),
        });
        self.bus_index.insert(id, idx);
        self
    }

    pub fn bus(&self, id: &str) -> Option<&BusNode> {
        self.bus_index.get(id).map(|&idx| &self.buses[idx].node)
    }

    pub fn bus_mut(&mut self, id: &str) -> Option<&mut BusNode> {
        self.bus_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.buses[idx].node)
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn buses(&self) -> impl Iterator<Item = &str> {
        self.buses.iter().map(|b| b.id.as_str())
    }

    pub fn bus_ids(&self) -> Vec<String> {
        self.buses.iter().map(|b| b.id.clone()).collect()
    }

    pub fn has_cell(&self, id: &str) -> bool {
        self.cell_index.contains_key(id)
    }

    pub fn add_cell(&mut self, id: impl Into<String>, cell: Cell) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.cell_index.get(&id) {
            self.cells[idx].cell = cell;
            return self;
        }
        let idx = self.cells.len();
        self.cells.push(CellEntry {
            id: id.clone(),
            cell,
        });
        self.cell_index.insert(id, idx);
        self
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cell_index.get(id).map(|&idx| &self.cells[idx].cell)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cell_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.cells[idx].cell)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|c| (c.id.as_str(), &c.cell))
    }

    pub fn cell_ids(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.id.clone()).collect()
    }

    /// Recomputes the maximum assigned bus position. Layout calls this once
    /// after all positions are written; renderers size the grid from it.
    pub fn set_max_bus_position(&mut self) {
        let mut max: Option<Position> = None;
        for entry in &self.buses {
            let Some(p) = entry.node.position else {
                continue;
            };
            match &mut max {
                Some(m) => {
                    m.row = m.row.max(p.row);
                    m.column = m.column.max(p.column);
                }
                None => max = Some(p),
            }
        }
        self.max_bus_position = max;
    }

    pub fn max_bus_position(&self) -> Option<Position> {
        self.max_bus_position
    }
}
