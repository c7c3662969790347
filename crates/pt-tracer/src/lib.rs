pub mod level;
pub mod session;
pub mod trace;
pub mod tree;

pub use level::recalculate_levels;
pub use session::{ParserEvent, TraceSession};
pub use trace::StateTraceBuilder;
pub use tree::DerivationTreeBuilder;
