pub mod error;
pub mod export;
pub mod id;
pub mod layout;
pub mod model;
pub mod store;

pub use error::{Result, StackKind, TraceError};
pub use export::{GraphSnapshot, emit_dot};
pub use id::{IdentityAllocator, NodeId};
pub use layout::LayoutConfig;
pub use model::*;
pub use store::{GraphBackend, GraphStore, StateStore, TreeStore};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
