//! Call-graph construction and delegatecall taint analysis.
//!
//! Both passes are read-only walks over the registry; they produce plain
//! values (call-path trees, per-function finding slots) that the
//! instrumentation engine consumes afterwards.

pub mod callgraph;
pub mod taint;

pub use callgraph::{build_call_graph, to_dot, to_graph, CallPath};
pub use taint::{scan_function, Finding, FindingSlot, Target};
