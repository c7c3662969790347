use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide table of every tree and state id ever issued.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Handle for a node in the derivation tree or the state trace.
///
/// Builders keep these on their stacks instead of references into the
/// backend, and resolve them through `get_node` when needed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Handle for the spelling `s`. Equal spellings give equal handles.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// The spelling, e.g. `E2` or `S0_1`.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

// ─── Allocation ──────────────────────────────────────────────────────────

/// Issues human-readable ids for repeated labels: `E1`, `E2`, `id1`, ...
///
/// Each label gets its own counter starting at 1. Counters only move
/// forward, so an id released by a rollback is never handed out again.
#[derive(Debug, Clone, Default)]
pub struct IdentityAllocator {
    separator: String,
    next: HashMap<String, u64>,
    issued: HashSet<NodeId>,
}

impl IdentityAllocator {
    /// Allocator producing `label` immediately followed by the counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator producing `label`, `separator`, counter (e.g. `S0_1`).
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            ..Self::default()
        }
    }

    /// Allocate the next id for `label`.
    ///
    /// With an empty separator two labels can spell the same id (`E` #11
    /// and `E1` #1 are both `E11`); an already issued candidate is skipped
    /// and the label's counter keeps advancing.
    pub fn allocate(&mut self, label: &str) -> NodeId {
        let counter = self.next.entry(label.to_owned()).or_insert(1);
        loop {
            let n = *counter;
            *counter += 1;
            let id = NodeId::intern(&format!("{label}{}{n}", self.separator));
            if self.issued.insert(id) {
                return id;
            }
            log::debug!("id {id} already issued, skipping");
        }
    }

    /// Whether `id` was issued since construction or the last reset.
    pub fn is_issued(&self, id: NodeId) -> bool {
        self.issued.contains(&id)
    }

    /// Forget every counter; the next allocation for any label is `1` again.
    pub fn reset(&mut self) {
        self.next.clear();
        self.issued.clear();
    }
}
