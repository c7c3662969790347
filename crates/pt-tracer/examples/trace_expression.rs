//! Replays the LR trace of `id * ( id + id )` and prints both graphs.
//!
//! ```text
//! RUST_LOG=debug cargo run -p pt-tracer --example trace_expression [json|dot]
//! ```
//!
//! Grammar (SLR, dragon book 4.1):
//!
//! ```text
//! E → E + T | T
//! T → T * F | F
//! F → ( E ) | id
//! ```

use pt_core::emit_dot;
use pt_tracer::{ParserEvent, TraceSession};
use std::env;

fn events() -> Vec<ParserEvent> {
    use ParserEvent as P;
    vec![
        P::start("0"),
        P::shift("id", "5"),
        P::reduce("F", ["id"]),
        P::goto("3", "F"),
        P::reduce("T", ["F"]),
        P::goto("2", "T"),
        P::shift("*", "7"),
        P::shift("(", "4"),
        P::shift("id", "5"),
        P::reduce("F", ["id"]),
        P::goto("3", "F"),
        P::reduce("T", ["F"]),
        P::goto("2", "T"),
        P::reduce("E", ["T"]),
        P::goto("8", "E"),
        P::shift("+", "6"),
        P::shift("id", "5"),
        P::reduce("F", ["id"]),
        P::goto("3", "F"),
        P::reduce("T", ["F"]),
        P::goto("9", "T"),
        P::reduce("E", ["E", "+", "T"]),
        P::goto("8", "E"),
        P::shift(")", "11"),
        P::reduce("F", ["(", "E", ")"]),
        P::goto("10", "F"),
        P::reduce("T", ["T", "*", "F"]),
        P::goto("2", "T"),
        P::reduce("E", ["T"]),
        P::goto("1", "E"),
        P::Accept,
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let format = env::args().nth(1).unwrap_or_else(|| "json".to_string());

    let mut session = TraceSession::new();
    session.replay(events())?;
    log::info!(
        "accepted: {} tree nodes, {} live states",
        session.tree.backend.node_count(),
        session.states.stack().len()
    );

    match format.as_str() {
        "dot" => {
            print!(
                "{}",
                emit_dot(&session.tree.backend, "derivation", &session.tree_layout)
            );
            print!(
                "{}",
                emit_dot(&session.states.backend, "states", &session.state_layout)
            );
        }
        _ => {
            println!("{}", session.tree_snapshot().to_json_pretty()?);
            println!("{}", session.state_snapshot().to_json_pretty()?);
        }
    }
    Ok(())
}
