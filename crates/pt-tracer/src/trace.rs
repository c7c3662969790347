//! Parser-state trace with LIFO rollback.
//!
//! The trace is a chain of state visits. `transition` appends a visit and
//! links it from the current top; `rollback` unwinds the most recent visits
//! exactly the way the parser pops its state stack on a reduction.

use pt_core::{
    GraphBackend, IdentityAllocator, NodeId, Result, StackKind, StateEdge, StateNode, StateStore,
    TraceError,
};

/// Builds the parser-state trace into a graph backend.
///
/// Starts uninitialized; `initialize` must run exactly once before any
/// other operation.
pub struct StateTraceBuilder<B = StateStore> {
    /// Node/edge collections (owned by the renderer side).
    pub backend: B,

    ids: IdentityAllocator,

    /// Live state visits. Empty = uninitialized; `[0]` is the initial state.
    stack: Vec<NodeId>,
}

impl StateTraceBuilder<StateStore> {
    pub fn new() -> Self {
        Self::with_backend(StateStore::new())
    }
}

impl Default for StateTraceBuilder<StateStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> StateTraceBuilder<B>
where
    B: GraphBackend<Node = StateNode, Edge = StateEdge>,
{
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            ids: IdentityAllocator::with_separator("_"),
            stack: Vec::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Live state visits, initial state first.
    pub fn stack(&self) -> &[NodeId] {
        &self.stack
    }

    /// The visit for the parser's current state.
    pub fn current(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    /// Create the initial state node.
    pub fn initialize(&mut self, initial_state: &str) -> Result<NodeId> {
        if self.is_initialized() {
            return Err(TraceError::DoubleInitialization);
        }
        let id = self.ids.allocate(initial_state);
        self.backend.add_node(StateNode::new(id, initial_state))?;
        self.stack.push(id);
        Ok(id)
    }

    /// Move to `state` on `symbol`.
    pub fn transition(&mut self, state: &str, symbol: &str) -> Result<NodeId> {
        let from = self.current().ok_or(TraceError::NotInitialized)?;
        let id = self.ids.allocate(state);
        self.backend.add_node(StateNode::new(id, state))?;
        self.backend.add_edge(StateEdge::new(from, id, symbol))?;
        log::debug!("transition {from} --{symbol}--> {id}");
        self.stack.push(id);
        Ok(id)
    }

    /// Pop `count` visits off the top and remove them from the backend.
    ///
    /// The initial state is never popped. Asking for more than the visits
    /// above it fails without removing anything.
    pub fn rollback(&mut self, count: usize) -> Result<()> {
        self.check_rollback(count)?;
        for _ in 0..count {
            if let Some(id) = self.stack.pop() {
                // Incident edges go with the node.
                if self.backend.remove_node(id).is_none() {
                    log::warn!("rollback: state {id} already gone from backend");
                }
            }
        }
        log::debug!("rollback {count}, now at {:?}", self.current());
        Ok(())
    }

    /// The error `rollback(count)` would return, without popping anything.
    pub fn check_rollback(&self, count: usize) -> Result<()> {
        let Some(available) = self.stack.len().checked_sub(1) else {
            return Err(TraceError::NotInitialized);
        };
        if count > available {
            return Err(TraceError::StackUnderflow {
                stack: StackKind::State,
                requested: count,
                available,
            });
        }
        Ok(())
    }

    /// Back to uninitialized with an empty backend.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.ids.reset();
        self.backend.clear();
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
    fn initialize_once() {
        let mut trace = StateTraceBuilder::new();
        assert!(!trace.is_initialized());
        assert_eq!(trace.initialize("0").unwrap().as_str(), "0_1");
        assert_eq!(
            trace.initialize("0").unwrap_err(),
            TraceError::DoubleInitialization
        );
        assert_eq!(names(trace.stack()), vec!["0_1"]);
        assert_eq!(trace.backend.node_count(), 1);
    }

    #[test]
    fn operations_require_initialize() {
        let mut trace = StateTraceBuilder::new();
        assert_eq!(
            trace.transition("1", "a").unwrap_err(),
            TraceError::NotInitialized
        );
        assert_eq!(trace.rollback(0).unwrap_err(), TraceError::NotInitialized);
        assert_eq!(trace.backend.node_count(), 0);
    }

    #[test]
    fn revisited_state_gets_fresh_id() {
        let mut trace = StateTraceBuilder::new();
        trace.initialize("0").unwrap();
        let first = trace.transition("5", "id").unwrap();
        trace.rollback(1).unwrap();
        let second = trace.transition("5", "id").unwrap();
        assert_eq!(first.as_str(), "5_1");
        assert_eq!(second.as_str(), "5_2");
        assert!(trace.backend.get_node(first).is_none());
    }

    #[test]
    fn rollback_never_pops_initial_state() {
        let mut trace = StateTraceBuilder::new();
        trace.initialize("0").unwrap();
        trace.transition("1", "a").unwrap();
        let err = trace.rollback(2).unwrap_err();
        assert_eq!(
            err,
            TraceError::StackUnderflow {
                stack: StackKind::State,
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(names(trace.stack()), vec!["0_1", "1_1"]);
        assert_eq!(trace.backend.edge_count(), 1);
    }

    #[test]
    fn check_rollback_matches_rollback() {
        let mut trace = StateTraceBuilder::new();
        assert_eq!(
            trace.check_rollback(0).unwrap_err(),
            TraceError::NotInitialized
        );
        trace.initialize("0").unwrap();
        trace.transition("1", "a").unwrap();
        trace.check_rollback(1).unwrap();
        assert_eq!(
            trace.check_rollback(2).unwrap_err(),
            trace.rollback(2).unwrap_err()
        );
        assert_eq!(trace.stack().len(), 2);
    }

    #[test]
    fn rollback_zero_is_noop() {
        let mut trace = StateTraceBuilder::new();
        trace.initialize("0").unwrap();
        trace.rollback(0).unwrap();
        assert_eq!(names(trace.stack()), vec!["0_1"]);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut trace = StateTraceBuilder::new();
        trace.initialize("0").unwrap();
        trace.transition("2", "x").unwrap();
        trace.reset();
        assert!(!trace.is_initialized());
        assert_eq!(trace.backend.node_count(), 0);
        assert_eq!(trace.initialize("0").unwrap().as_str(), "0_1");
    }
}
