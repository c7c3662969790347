//! Graph backend contract and the in-memory reference store.
//!
//! The builders never own node records. They push ids onto their stacks and
//! go through a `GraphBackend` for everything else, so any renderer that can
//! add, fetch, update and remove nodes can sit behind them.

use crate::error::{Result, TraceError};
use crate::id::NodeId;
use crate::layout::LayoutConfig;
use crate::model::{GraphEdge, GraphNode, StateEdge, StateNode, TreeEdge, TreeNode};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

/// Node/edge collections owned by a rendering backend.
pub trait GraphBackend {
    type Node: GraphNode;
    type Edge: GraphEdge;

    /// Insert a node. Fails with `DuplicateIdentity` instead of overwriting.
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    fn get_node(&self, id: NodeId) -> Option<&Self::Node>;

    /// Replace the record stored under `node.id()`.
    fn update_node(&mut self, node: Self::Node) -> Result<()>;

    /// Remove a node together with every edge touching it.
    fn remove_node(&mut self, id: NodeId) -> Option<Self::Node>;

    /// Insert an edge. Both endpoints must already exist.
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    fn for_each_edge(&self, f: &mut dyn FnMut(&Self::Edge));

    /// Re-render with `config`. Called by the consumer once levels are final.
    fn refresh_layout(&mut self, config: &LayoutConfig);

    /// Drop all nodes and edges.
    fn clear(&mut self);
}

/// In-memory backend over a `petgraph` stable graph.
///
/// Node indices stay valid across removals, so the `id_index` only needs
/// touching for the node actually added or removed.
#[derive(Debug, Clone)]
pub struct GraphStore<N, E> {
    /// Only mutated alongside `id_index`.
    graph: StableDiGraph<N, E>,

    /// Index from NodeId → NodeIndex for fast lookup.
    id_index: HashMap<NodeId, NodeIndex>,

    /// Configuration of the last `refresh_layout`.
    layout: Option<LayoutConfig>,

    /// Number of `refresh_layout` calls since creation or `clear`.
    refreshes: u64,
}

pub type TreeStore = GraphStore<TreeNode, TreeEdge>;
pub type StateStore = GraphStore<StateNode, StateEdge>;

impl<N, E> GraphStore<N, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            id_index: HashMap::new(),
            layout: None,
            refreshes: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Read-only view of the underlying graph, for `petgraph` algorithms.
    pub fn graph(&self) -> &StableDiGraph<N, E> {
        &self.graph
    }

    /// Get the index for a NodeId.
    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Edges in index order (insertion order until something is removed).
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.graph.edge_indices().map(|idx| &self.graph[idx])
    }

    /// Last configuration passed to `refresh_layout`, if any.
    pub fn layout(&self) -> Option<&LayoutConfig> {
        self.layout.as_ref()
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

impl<N: GraphNode, E> GraphStore<N, E> {
    /// Targets of the outgoing edges of `id`, in node creation order.
    ///
    /// Sorts by `NodeIndex` so the result does not depend on how `petgraph`
    /// walks its adjacency list.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children.into_iter().map(|c| self.graph[c].id()).collect()
    }
}

impl<N, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode, E: GraphEdge> GraphBackend for GraphStore<N, E> {
    type Node = N;
    type Edge = E;

    fn add_node(&mut self, node: N) -> Result<()> {
        let id = node.id();
        if self.id_index.contains_key(&id) {
            return Err(TraceError::DuplicateIdentity(id));
        }
        log::debug!("add node {id} ({})", node.label());
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> Option<&N> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    fn update_node(&mut self, node: N) -> Result<()> {
        let id = node.id();
        let idx = self.index_of(id).ok_or(TraceError::UnknownNode(id))?;
        self.graph[idx] = node;
        Ok(())
    }

    fn remove_node(&mut self, id: NodeId) -> Option<N> {
        let idx = self.id_index.remove(&id)?;
        log::debug!("remove node {id}");
        self.graph.remove_node(idx)
    }

    fn add_edge(&mut self, edge: E) -> Result<()> {
        let from = self
            .index_of(edge.from())
            .ok_or(TraceError::UnknownNode(edge.from()))?;
        let to = self
            .index_of(edge.to())
            .ok_or(TraceError::UnknownNode(edge.to()))?;
        log::debug!("add edge {} -> {}", edge.from(), edge.to());
        self.graph.add_edge(from, to, edge);
        Ok(())
    }

    fn for_each_edge(&self, f: &mut dyn FnMut(&E)) {
        for idx in self.graph.edge_indices() {
            f(&self.graph[idx]);
        }
    }

    fn refresh_layout(&mut self, config: &LayoutConfig) {
        self.refreshes += 1;
        log::debug!(
            "refresh layout #{} ({} nodes, {} edges)",
            self.refreshes,
            self.node_count(),
            self.edge_count()
        );
        self.layout = Some(config.clone());
    }

    fn clear(&mut self) {
        self.graph.clear();
        self.id_index.clear();
        self.layout = None;
        self.refreshes = 0;
    }
}
