//! Umber Graph - the user-authored import graph and its resolver
//!
//! A graph is a set of typed nodes (import root, model, mesh,
//! animation) joined by ordered, typed connections. `resolve` walks
//! the graph from the import root and produces an ordered, validated
//! build plan for the assembler. Graph-level errors abort the run
//! before any file is read.

mod graph;
mod node;
mod plan;
mod resolve;

pub use graph::{Connection, ImportGraph};
pub use node::{GraphNode, NodeConfig, NodeId, NodeKind, SocketKind};
pub use plan::{AnimationSource, BuildPlan, BuildPlanEntry, ClipLayer, MeshSource};
pub use resolve::resolve;
