//! Error types for graph construction.
//!
//! Every variant is a contract violation by the event producer (or a bug in
//! the allocator). None of them is retried; the caller decides whether to
//! reset the session.

use crate::id::NodeId;
use std::fmt;
use thiserror::Error;

/// Which builder stack an underflow happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackKind {
    /// Pending subtree roots of the derivation tree.
    Pending,
    /// Parser-state stack of the state trace.
    State,
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::Pending => f.write_str("pending tree"),
            StackKind::State => f.write_str("parser state"),
        }
    }
}

/// Errors returned by the builders and the graph store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// `reduce` or `rollback` asked for more entries than the stack holds.
    #[error("{stack} stack underflow: requested {requested}, available {available}")]
    StackUnderflow {
        stack: StackKind,
        requested: usize,
        available: usize,
    },

    /// `initialize` was called on an already active state trace.
    #[error("state trace is already initialized")]
    DoubleInitialization,

    /// A state-trace operation ran before `initialize`.
    #[error("state trace is not initialized")]
    NotInitialized,

    /// `recalculate` ran while the tree was not reduced to a single root.
    #[error("cannot recalculate levels with {pending} pending subtree(s); expected exactly 1")]
    PrematureRecalculation { pending: usize },

    /// A node with this id already exists in the backend.
    #[error("duplicate node id {0}")]
    DuplicateIdentity(NodeId),

    /// The referenced node is not in the backend.
    #[error("unknown node id {0}")]
    UnknownNode(NodeId),
}

/// Result type for graph construction.
pub type Result<T> = std::result::Result<T, TraceError>;
