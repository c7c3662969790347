//! Trace session: parser events → derivation tree + state trace.
//!
//! An LR driver reports each step of its loop as a `ParserEvent`. The
//! session forwards it to both builders so the two graphs stay in lockstep
//! with the parser's symbol and state stacks:
//!
//! - **Shift** pushes a leaf and moves to the shifted-to state.
//! - **Reduce** collapses the production body into a parent node and pops
//!   one state per body symbol.
//! - **Goto** pushes the state reached on the reduced nonterminal.
//! - **Accept** fixes the tree levels and asks the backends to re-render.

use crate::trace::StateTraceBuilder;
use crate::tree::DerivationTreeBuilder;
use pt_core::{
    GraphBackend, GraphSnapshot, LayoutConfig, Result, StateEdge, StateNode, TreeEdge, TreeNode,
};
use serde::{Deserialize, Serialize};

/// One step reported by the parser driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ParserEvent {
    /// The automaton starts in `state`.
    Start { state: String },
    /// Terminal `symbol` shifted; the automaton moved to `state`.
    Shift { symbol: String, state: String },
    /// Reduced by `head → body`. An empty body is an ε-production.
    Reduce { head: String, body: Vec<String> },
    /// GOTO on `symbol` (the reduced nonterminal) reached `state`.
    Goto { state: String, symbol: String },
    /// Input accepted.
    Accept,
}

impl ParserEvent {
    pub fn start(state: impl Into<String>) -> Self {
        Self::Start {
            state: state.into(),
        }
    }

    pub fn shift(symbol: impl Into<String>, state: impl Into<String>) -> Self {
        Self::Shift {
            symbol: symbol.into(),
            state: state.into(),
        }
    }

    pub fn reduce<S: Into<String>>(
        head: impl Into<String>,
        body: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::Reduce {
            head: head.into(),
            body: body.into_iter().map(Into::into).collect(),
        }
    }

    pub fn goto(state: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::Goto {
            state: state.into(),
            symbol: symbol.into(),
        }
    }
}

/// Owns both builders for one parse.
pub struct TraceSession {
    pub tree: DerivationTreeBuilder,
    pub states: StateTraceBuilder,

    /// Layout handed to the tree renderer on accept.
    pub tree_layout: LayoutConfig,

    /// Layout handed to the state-trace renderer on accept.
    pub state_layout: LayoutConfig,

    accepted: bool,
}

impl TraceSession {
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    pub fn with_layout(tree_layout: LayoutConfig) -> Self {
        Self {
            tree: DerivationTreeBuilder::new(),
            states: StateTraceBuilder::new(),
            tree_layout,
            state_layout: LayoutConfig::left_to_right(),
            accepted: false,
        }
    }

    /// Whether an `Accept` has been applied since the last reset.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Apply one parser event to both graphs.
    ///
    /// Errors are contract violations by the driver and are returned as-is;
    /// the session should be reset afterwards.
    pub fn apply(&mut self, event: ParserEvent) -> Result<()> {
        log::debug!("apply {event:?}");
        match event {
            ParserEvent::Start { state } => {
                self.states.initialize(&state)?;
            }
            ParserEvent::Shift { symbol, state } => {
                self.tree.shift_leaf(&symbol)?;
                self.states.transition(&state, &symbol)?;
            }
            ParserEvent::Reduce { head, body } => {
                // Both stacks must hold the body before either is touched.
                self.states.check_rollback(body.len())?;
                self.tree.reduce_production(&head, &body)?;
                self.states.rollback(body.len())?;
            }
            ParserEvent::Goto { state, symbol } => {
                self.states.transition(&state, &symbol)?;
            }
            ParserEvent::Accept => {
                self.tree.recalculate()?;
                self.tree.backend.refresh_layout(&self.tree_layout);
                self.states.backend.refresh_layout(&self.state_layout);
                self.accepted = true;
            }
        }
        Ok(())
    }

    /// Apply events in order, stopping at the first error.
    pub fn replay<I>(&mut self, events: I) -> Result<()>
    where
        I: IntoIterator<Item = ParserEvent>,
    {
        events.into_iter().try_for_each(|event| self.apply(event))
    }

    /// Start over for a new parse. Layout settings are kept.
    pub fn reset(&mut self) {
        self.tree.reset();
        self.states.reset();
        self.accepted = false;
    }

    pub fn tree_snapshot(&self) -> GraphSnapshot<'_, TreeNode, TreeEdge> {
        GraphSnapshot::new(&self.tree.backend, &self.tree_layout)
    }

    pub fn state_snapshot(&self) -> GraphSnapshot<'_, StateNode, StateEdge> {
        GraphSnapshot::new(&self.states.backend, &self.state_layout)
    }
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}
