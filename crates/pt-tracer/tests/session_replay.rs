//! Integration tests: replaying a full LR trace through `TraceSession`.
//!
//! Grammar (SLR):
//!
//! ```text
//! E → E + T | T
//! T → id
//! ```
//!
//! States: 0 start, 1 = goto(0, E), 2 = goto(0, T), 3 = shift id,
//! 4 = shift + from 1, 5 = goto(4, T).

use pretty_assertions::assert_eq;
use pt_core::{GraphBackend, LayoutConfig, NodeId, StackKind, TraceError, emit_dot};
use pt_tracer::{ParserEvent, TraceSession};

/// Events an LR driver emits while parsing `id + id`.
fn id_plus_id() -> Vec<ParserEvent> {
    vec![
        ParserEvent::start("0"),
        ParserEvent::shift("id", "3"),
        ParserEvent::reduce("T", ["id"]),
        ParserEvent::goto("2", "T"),
        ParserEvent::reduce("E", ["T"]),
        ParserEvent::goto("1", "E"),
        ParserEvent::shift("+", "4"),
        ParserEvent::shift("id", "3"),
        ParserEvent::reduce("T", ["id"]),
        ParserEvent::goto("5", "T"),
        ParserEvent::reduce("E", ["E", "+", "T"]),
        ParserEvent::goto("1", "E"),
        ParserEvent::Accept,
    ]
}

fn level(session: &TraceSession, name: &str) -> i64 {
    session
        .tree
        .backend
        .get_node(NodeId::intern(name))
        .unwrap()
        .level
}

#[test]
fn full_parse_builds_both_graphs() {
    let mut session = TraceSession::new();
    session.replay(id_plus_id()).unwrap();
    assert!(session.is_accepted());

    // Tree: E2 → (T2 → id2, +1, E1 → T1 → id1)
    assert_eq!(session.tree.backend.node_count(), 7);
    assert_eq!(session.tree.backend.edge_count(), 6);
    let root = NodeId::intern("E2");
    let children: Vec<&str> = session
        .tree
        .backend
        .children(root)
        .iter()
        .map(|c| c.as_str())
        .collect();
    assert_eq!(children, vec!["E1", "+1", "T2"]);

    let base = level(&session, "E2");
    assert_eq!(base, -3);
    for (name, depth) in [
        ("E1", 1),
        ("+1", 1),
        ("T2", 1),
        ("T1", 2),
        ("id2", 2),
        ("id1", 3),
    ] {
        assert_eq!(level(&session, name) - base, depth, "{name}");
    }

    // State trace: every reduction unwound its states; only 0 → 1 is left.
    let stack: Vec<&str> = session.states.stack().iter().map(|s| s.as_str()).collect();
    assert_eq!(stack, vec!["0_1", "1_2"]);
    assert_eq!(session.states.backend.node_count(), 2);
    let edges: Vec<(&str, &str, &str)> = session
        .states
        .backend
        .edges()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.label.as_str()))
        .collect();
    assert_eq!(edges, vec![("0_1", "1_2", "E")]);

    assert_eq!(session.tree.backend.refresh_count(), 1);
    assert_eq!(
        session.tree.backend.layout(),
        Some(&LayoutConfig::default())
    );
}

#[test]
fn snapshot_carries_final_levels() {
    let mut session = TraceSession::new();
    session.replay(id_plus_id()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&session.tree_snapshot().to_json().unwrap()).unwrap();
    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 7);
    let id1 = nodes.iter().find(|n| n["id"] == "id1").unwrap();
    assert_eq!(id1["label"], "id");
    assert_eq!(id1["level"], 0);
    assert_eq!(json["options"]["layout"]["hierarchical"]["direction"], "UD");

    let states: serde_json::Value =
        serde_json::from_str(&session.state_snapshot().to_json_pretty().unwrap()).unwrap();
    assert_eq!(states["edges"][0]["label"], "E");
    assert_eq!(states["options"]["layout"]["hierarchical"]["direction"], "LR");

    let dot = emit_dot(&session.states.backend, "states", &session.state_layout);
    assert!(dot.contains("\"0_1\" -> \"1_2\" [label=\"E\"];"));
}

#[test]
fn recorded_trace_replays_from_json() {
    let recorded = serde_json::to_string(&id_plus_id()).unwrap();
    let events: Vec<ParserEvent> = serde_json::from_str(&recorded).unwrap();

    let mut session = TraceSession::new();
    session.replay(events).unwrap();
    assert!(session.is_accepted());
}

#[test]
fn desynchronized_reduce_is_reported() {
    let mut session = TraceSession::new();
    let err = session
        .replay([
            ParserEvent::start("0"),
            ParserEvent::shift("id", "3"),
            ParserEvent::reduce("E", ["E", "+", "T"]),
        ])
        .unwrap_err();
    assert_eq!(
        err,
        TraceError::StackUnderflow {
            stack: StackKind::Pending,
            requested: 3,
            available: 1,
        }
    );
}

#[test]
fn shift_before_start_is_reported() {
    let mut session = TraceSession::new();
    assert_eq!(
        session.apply(ParserEvent::shift("id", "3")).unwrap_err(),
        TraceError::NotInitialized
    );
}

#[test]
fn second_start_is_reported() {
    let mut session = TraceSession::new();
    session.apply(ParserEvent::start("0")).unwrap();
    assert_eq!(
        session.apply(ParserEvent::start("0")).unwrap_err(),
        TraceError::DoubleInitialization
    );
}

#[test]
fn reset_allows_a_second_parse() {
    let mut session = TraceSession::new();
    session.replay(id_plus_id()).unwrap();
    session.reset();
    assert!(!session.is_accepted());
    assert_eq!(session.tree.backend.node_count(), 0);
    assert_eq!(session.states.backend.node_count(), 0);

    session.replay(id_plus_id()).unwrap();
    // Fresh allocators: the same ids come back.
    assert!(session.tree.backend.get_node(NodeId::intern("E2")).is_some());
    assert_eq!(session.tree.backend.refresh_count(), 1);
}
