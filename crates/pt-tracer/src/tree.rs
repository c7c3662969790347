//! Bottom-up derivation tree builder.
//!
//! Mirrors the parser's symbol stack: every shift pushes a leaf, every
//! reduction pops its children and pushes the new parent. Levels assigned
//! here are provisional; `recalculate` fixes them once the tree is complete.

use pt_core::{
    GraphBackend, IdentityAllocator, NodeId, Result, StackKind, TraceError, TreeEdge, TreeNode,
    TreeStore,
};
use smallvec::SmallVec;

/// Builds a derivation tree into a graph backend.
pub struct DerivationTreeBuilder<B = TreeStore> {
    /// Node/edge collections (owned by the renderer side).
    pub backend: B,

    ids: IdentityAllocator,

    /// Subtree roots not yet attached to a parent. Top = last.
    pending: Vec<NodeId>,
}

impl DerivationTreeBuilder<TreeStore> {
    pub fn new() -> Self {
        Self::with_backend(TreeStore::new())
    }
}

impl Default for DerivationTreeBuilder<TreeStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> DerivationTreeBuilder<B>
where
    B: GraphBackend<Node = TreeNode, Edge = TreeEdge>,
{
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            ids: IdentityAllocator::new(),
            pending: Vec::new(),
        }
    }

    /// Pending subtree roots, bottom of the stack first.
    pub fn pending(&self) -> &[NodeId] {
        &self.pending
    }

    /// Add a leaf for a shifted terminal.
    pub fn shift_leaf(&mut self, symbol: &str) -> Result<NodeId> {
        let id = self.ids.allocate(symbol);
        self.backend.add_node(TreeNode::new(id, symbol, 0))?;
        self.pending.push(id);
        Ok(id)
    }

    /// Collapse the top `child_count` pending subtrees under a new
    /// `parent_symbol` node.
    ///
    /// Children are linked in pop order (stack top first). On underflow
    /// nothing is popped or created.
    pub fn reduce(&mut self, parent_symbol: &str, child_count: usize) -> Result<NodeId> {
        let children = self.pop_children(child_count)?;
        self.attach_parent(parent_symbol, children)
    }

    /// Reduce by a production `head → body`.
    ///
    /// Same as `reduce(head, body.len())`, but logs a warning when the
    /// popped subtrees are not labelled with the body symbols.
    pub fn reduce_production<S: AsRef<str>>(
        &mut self,
        head: &str,
        body: &[S],
    ) -> Result<NodeId> {
        let children = self.pop_children(body.len())?;
        for (child, expected) in children.iter().zip(body.iter().rev()) {
            let expected = expected.as_ref();
            match self.backend.get_node(*child) {
                Some(node) if node.label == expected => {}
                Some(node) => log::warn!(
                    "reduce {head}: expected {expected}, found {} ({child})",
                    node.label
                ),
                None => log::warn!("reduce {head}: pending node {child} missing from backend"),
            }
        }
        self.attach_parent(head, children)
    }

    pub(crate) fn take_root(&mut self) -> Option<NodeId> {
        self.pending.pop()
    }

    /// Forget the tree: clears the stack, the allocator and the backend.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.ids.reset();
        self.backend.clear();
    }

    fn pop_children(&mut self, count: usize) -> Result<SmallVec<[NodeId; 4]>> {
        let available = self.pending.len();
        if count > available {
            return Err(TraceError::StackUnderflow {
                stack: StackKind::Pending,
                requested: count,
                available,
            });
        }
        Ok(self.pending.drain(available - count..).rev().collect())
    }

    fn attach_parent(
        &mut self,
        symbol: &str,
        children: SmallVec<[NodeId; 4]>,
    ) -> Result<NodeId> {
        let mut min_level = None;
        for child in &children {
            let node = self
                .backend
                .get_node(*child)
                .ok_or(TraceError::UnknownNode(*child))?;
            min_level = Some(min_level.map_or(node.level, |m: i64| m.min(node.level)));
        }
        // ε-reductions have nothing to sit above; treat the parent like a leaf.
        let level = min_level.map_or(0, |m| m - 1);

        let id = self.ids.allocate(symbol);
        self.backend.add_node(TreeNode::new(id, symbol, level))?;
        for child in &children {
            self.backend.add_edge(TreeEdge::new(id, *child))?;
        }
        log::debug!(
            "reduce {symbol}: {id} over {} child(ren) at level {level}",
            children.len()
        );
        self.pending.push(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn shift_creates_level_zero_leaf() {
        let mut tree = DerivationTreeBuilder::new();
        let id = tree.shift_leaf("id").unwrap();
        assert_eq!(id.as_str(), "id1");
        assert_eq!(tree.backend.get_node(id).unwrap().level, 0);
        assert_eq!(tree.backend.edge_count(), 0);
        assert_eq!(names(tree.pending()), vec!["id1"]);
    }

    #[test]
    fn reduce_links_children_in_pop_order() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("a").unwrap();
        tree.shift_leaf("b").unwrap();
        let s = tree.reduce("S", 2).unwrap();

        let edges: Vec<(&str, &str)> = tree
            .backend
            .edges()
            .map(|e| (e.from.as_str(), e.to.as_str()))
            .collect();
        assert_eq!(edges, vec![("S1", "b1"), ("S1", "a1")]);
        assert_eq!(tree.backend.get_node(s).unwrap().level, -1);
        assert_eq!(names(tree.pending()), vec!["S1"]);
    }

    #[test]
    fn parent_sits_above_shallowest_child() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("x").unwrap();
        tree.reduce("F", 1).unwrap();
        tree.reduce("T", 1).unwrap(); // level -2
        tree.shift_leaf("y").unwrap(); // level 0
        let e = tree.reduce("E", 2).unwrap();
        assert_eq!(tree.backend.get_node(e).unwrap().level, -3);
    }

    #[test]
    fn underflow_leaves_everything_untouched() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("a").unwrap();
        let err = tree.reduce("S", 2).unwrap_err();
        assert_eq!(
            err,
            TraceError::StackUnderflow {
                stack: StackKind::Pending,
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(names(tree.pending()), vec!["a1"]);
        assert_eq!(tree.backend.node_count(), 1);
        // No id was burned by the failed reduction.
        assert_eq!(tree.reduce("S", 1).unwrap().as_str(), "S1");
    }

    #[test]
    fn epsilon_reduction_makes_childless_parent() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("a").unwrap();
        let eps = tree.reduce("B", 0).unwrap();
        assert_eq!(tree.backend.get_node(eps).unwrap().level, 0);
        assert_eq!(tree.backend.children(eps), Vec::<NodeId>::new());
        assert_eq!(names(tree.pending()), vec!["a1", "B1"]);
    }

    #[test]
    fn reduce_production_matches_reduce() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("id").unwrap();
        tree.shift_leaf("+").unwrap();
        tree.shift_leaf("id").unwrap();
        // Body label mismatch only warns.
        let e = tree.reduce_production("E", &["E", "+", "id"]).unwrap();
        assert_eq!(e.as_str(), "E1");
        assert_eq!(tree.backend.children(e).len(), 3);
    }

    #[test]
    fn reset_starts_over() {
        let mut tree = DerivationTreeBuilder::new();
        tree.shift_leaf("id").unwrap();
        tree.reduce("E", 1).unwrap();
        tree.reset();
        assert!(tree.pending().is_empty());
        assert_eq!(tree.backend.node_count(), 0);
        assert_eq!(tree.shift_leaf("id").unwrap().as_str(), "id1");
    }
}
