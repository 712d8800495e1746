//! The placement search: trace-line generation, ring reconstruction and the
//! engine orchestrating both into committed placements.

mod engine;
mod rings;
mod trace_line;

pub use engine::Nester;
pub use rings::reconstruct_rings;
pub use trace_line::TraceLine;
pub use trace_line::build_trace_lines;
pub use trace_line::clean_trace_lines;
