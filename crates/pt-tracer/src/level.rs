//! Top-down level recalculation for a completed derivation tree.
//!
//! Bottom-up levels only guarantee that a parent sits above its shallowest
//! child. Once the parse is accepted, the tree is walked from the root and
//! every child is placed exactly one level below its parent.

use crate::tree::DerivationTreeBuilder;
use pt_core::{GraphBackend, NodeId, Result, TraceError, TreeEdge, TreeNode};

impl<B> DerivationTreeBuilder<B>
where
    B: GraphBackend<Node = TreeNode, Edge = TreeEdge>,
{
    /// Pop the finished root and relevel the whole tree under it.
    ///
    /// Requires exactly one pending subtree. The root keeps its provisional
    /// level; a second call fails because the stack is already empty.
    pub fn recalculate(&mut self) -> Result<NodeId> {
        if self.pending().len() != 1 {
            return Err(TraceError::PrematureRecalculation {
                pending: self.pending().len(),
            });
        }
        let root = self
            .take_root()
            .ok_or(TraceError::PrematureRecalculation { pending: 0 })?;
        recalculate_levels(&mut self.backend, root)?;
        Ok(root)
    }
}

/// Set `level = parent.level + 1` for every node below `root`, pre-order.
///
/// Children are found by scanning all edges, which is fine at the sizes a
/// parse tree reaches. Uses a work-list instead of recursion.
pub fn recalculate_levels<B>(backend: &mut B, root: NodeId) -> Result<()>
where
    B: GraphBackend<Node = TreeNode, Edge = TreeEdge>,
{
    let root_level = backend
        .get_node(root)
        .ok_or(TraceError::UnknownNode(root))?
        .level;

    let mut work = vec![(root, root_level)];
    while let Some((parent, parent_level)) = work.pop() {
        let children = children_of(backend, parent);
        // Reverse so the first child is visited first.
        for child in children.into_iter().rev() {
            let mut node = backend
                .get_node(child)
                .cloned()
                .ok_or(TraceError::UnknownNode(child))?;
            node.level = parent_level + 1;
            log::trace!("level {} = {}", child, node.level);
            backend.update_node(node)?;
            work.push((child, parent_level + 1));
        }
    }
    Ok(())
}

fn children_of<B>(backend: &B, parent: NodeId) -> Vec<NodeId>
where
    B: GraphBackend<Node = TreeNode, Edge = TreeEdge>,
{
    let mut children = Vec::new();
    backend.for_each_edge(&mut |edge: &TreeEdge| {
        if edge.from == parent {
            children.push(edge.to);
        }
    });
    children
}
