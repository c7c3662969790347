//! Node and edge records for the two traced graphs.
//!
//! The derivation tree is built bottom-up: children exist before their
//! parent, and edges go from parent → child. The state trace is a linear
//! chain of automaton states whose edges are labelled with the symbol that
//! caused the transition.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};

/// Anything a graph backend can key by id.
pub trait GraphNode {
    fn id(&self) -> NodeId;
    fn label(&self) -> &str;
}

/// A directed edge between two node ids.
pub trait GraphEdge {
    fn from(&self) -> NodeId;
    fn to(&self) -> NodeId;

    fn label(&self) -> Option<&str> {
        None
    }
}

// ─── Derivation tree ─────────────────────────────────────────────────────

/// A grammar symbol in the derivation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,

    /// The grammar symbol text. Not unique; see `id`.
    pub label: String,

    /// Layout hint. Provisional while the tree is being reduced
    /// (more negative = closer to the root), then `root.level + depth`
    /// after level recalculation.
    pub level: i64,
}

impl TreeNode {
    pub fn new(id: NodeId, label: impl Into<String>, level: i64) -> Self {
        Self {
            id,
            label: label.into(),
            level,
        }
    }
}

impl GraphNode for TreeNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Parent → child link in the derivation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEdge {
    pub from: NodeId,
    pub to: NodeId,
}

impl TreeEdge {
    pub fn new(parent: NodeId, child: NodeId) -> Self {
        Self {
            from: parent,
            to: child,
        }
    }
}

impl GraphEdge for TreeEdge {
    fn from(&self) -> NodeId {
        self.from
    }

    fn to(&self) -> NodeId {
        self.to
    }
}

// ─── State trace ─────────────────────────────────────────────────────────

/// One visit of a parser-automaton state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub id: NodeId,
    /// The automaton state, as text (e.g. `"3"` or `"S3"`).
    pub label: String,
}

impl StateNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

impl GraphNode for StateNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Transition between two state visits, labelled with the triggering symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
}

impl StateEdge {
    pub fn new(from: NodeId, to: NodeId, symbol: impl Into<String>) -> Self {
        Self {
            from,
            to,
            label: symbol.into(),
        }
    }
}

impl GraphEdge for StateEdge {
    fn from(&self) -> NodeId {
        self.from
    }

    fn to(&self) -> NodeId {
        self.to
    }

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }
}
