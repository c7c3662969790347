//! Hand-off formats for external renderers.
//!
//! `GraphSnapshot` is the node/edge/options triple a vis-style network
//! renderer consumes as JSON. `emit_dot` writes the same graph as Graphviz
//! text for offline inspection.

use crate::layout::{Direction, LayoutConfig};
use crate::model::{GraphEdge, GraphNode};
use crate::store::GraphStore;
use serde::Serialize;
use std::fmt::Write;

/// Borrowed view of a store plus the layout options to render it with.
#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a, N, E> {
    pub nodes: Vec<&'a N>,
    pub edges: Vec<&'a E>,
    pub options: &'a LayoutConfig,
}

impl<'a, N, E> GraphSnapshot<'a, N, E> {
    pub fn new(store: &'a GraphStore<N, E>, options: &'a LayoutConfig) -> Self {
        Self {
            nodes: store.nodes().collect(),
            edges: store.edges().collect(),
            options,
        }
    }
}

impl<N: Serialize, E: Serialize> GraphSnapshot<'_, N, E> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Emit a store as a Graphviz `digraph`.
#[must_use]
pub fn emit_dot<N: GraphNode, E: GraphEdge>(
    store: &GraphStore<N, E>,
    name: &str,
    options: &LayoutConfig,
) -> String {
    let mut out = String::with_capacity(256);
    let _ = writeln!(out, "digraph {} {{", quote(name));
    let rankdir = match options.direction {
        Direction::UD => "TB",
        Direction::DU => "BT",
        Direction::LR => "LR",
        Direction::RL => "RL",
    };
    let _ = writeln!(out, "  rankdir={rankdir};");

    for node in store.nodes() {
        let _ = writeln!(
            out,
            "  {} [label={}];",
            quote(node.id().as_str()),
            quote(node.label())
        );
    }

    for edge in store.edges() {
        let _ = write!(
            out,
            "  {} -> {}",
            quote(edge.from().as_str()),
            quote(edge.to().as_str())
        );
        if let Some(label) = edge.label() {
            let _ = write!(out, " [label={}]", quote(label));
        }
        out.push_str(";\n");
    }

    out.push_str("}\n");
    out
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
