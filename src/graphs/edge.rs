use serde::{Deserialize, Serialize};

use super::{VertexId, Weight};

/// Travel direction of a stored half-edge, relative to the vertex that stores
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Only source -> target.
    Forward,
    /// Only target -> source.
    Backward,
    Bidirectional,
}

impl Direction {
    pub fn can_move_forward(&self) -> bool {
        matches!(self, Direction::Forward | Direction::Bidirectional)
    }

    pub fn can_move_backward(&self) -> bool {
        matches!(self, Direction::Backward | Direction::Bidirectional)
    }

    pub fn reversed(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Bidirectional => Direction::Bidirectional,
        }
    }

    /// Decodes the compact flag used by edge payloads: `None` is both
    /// directions, `Some(true)` forward and `Some(false)` backward.
    pub fn from_flag(flag: Option<bool>) -> Direction {
        match flag {
            None => Direction::Bidirectional,
            Some(true) => Direction::Forward,
            Some(false) => Direction::Backward,
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            Direction::Forward => Some(true),
            Direction::Backward => Some(false),
            Direction::Bidirectional => None,
        }
    }
}

/// A half-edge as stored in the adjacency list of its source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicEdge {
    neighbor: VertexId,
    weight: Weight,
    direction: Direction,
    via: Option<VertexId>,
}

impl DynamicEdge {
    pub fn new(
        neighbor: VertexId,
        weight: Weight,
        direction: Direction,
        via: Option<VertexId>,
    ) -> DynamicEdge {
        DynamicEdge {
            neighbor,
            weight,
            direction,
            via,
        }
    }

    pub fn neighbor(&self) -> VertexId {
        self.neighbor
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The contracted vertex this shortcut stands in for, `None` for original
    /// edges.
    pub fn via(&self) -> Option<VertexId> {
        self.via
    }

    pub fn is_shortcut(&self) -> bool {
        self.via.is_some()
    }
}

/// Net half-edge churn caused by one add-or-update operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeUpdate {
    pub added: u32,
    pub removed: u32,
}

impl std::ops::AddAssign for EdgeUpdate {
    fn add_assign(&mut self, other: EdgeUpdate) {
        self.added += other.added;
        self.removed += other.removed;
    }
}

/// A one-way input edge, as read from a graph file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    tail: VertexId,
    head: VertexId,
    weight: Weight,
}

impl WeightedEdge {
    pub fn new(tail: VertexId, head: VertexId, weight: Weight) -> Option<WeightedEdge> {
        if tail == head {
            return None;
        }

        Some(WeightedEdge { tail, head, weight })
    }

    pub fn tail(&self) -> VertexId {
        self.tail
    }

    pub fn head(&self) -> VertexId {
        self.head
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge {
            tail: self.head,
            head: self.tail,
            weight: self.weight,
        }
    }
}
