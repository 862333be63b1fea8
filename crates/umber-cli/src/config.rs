//! TOML graph description
//!
//! The on-disk form of an import graph: a table array of named nodes
//! and a table array of connections between them. The import root is
//! implicit and is referenced by connections as `"root"`. Files are
//! deserialized here and handed to the core as plain values.
//!
//! ```toml
//! [[node]]
//! name = "hero"
//! kind = "model"
//! file = "hero.psk"
//!
//! [[node]]
//! name = "walkset"
//! kind = "animation"
//! file = "hero_walk.psa"
//!
//! [[connection]]
//! from = "hero"
//! to = "root"
//! socket = "model"
//!
//! [[connection]]
//! from = "walkset"
//! to = "hero"
//! socket = "animation"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use umber_core::{ActionFilters, ModelSettings};
use umber_graph::{ImportGraph, NodeConfig, NodeId, NodeKind, SocketKind};

/// Name connections use to reference the implicit import root
pub const ROOT_NAME: &str = "root";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphFile {
    #[serde(rename = "node")]
    pub nodes: Vec<NodeEntry>,
    #[serde(rename = "connection")]
    pub connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub name: String,
    pub kind: NodeEntryKind,
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub settings: ModelSettings,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeEntryKind {
    Model,
    Mesh,
    Animation,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionEntry {
    pub from: String,
    pub to: String,
    pub socket: SocketKind,
}

/// Build the in-memory graph a description denotes.
///
/// Fails on duplicate node names, a node named like the implicit root
/// and connections that reference unknown nodes. Structural validity
/// (socket legality, cycles, single root) is the resolver's job.
pub fn build_graph(file: &GraphFile) -> Result<ImportGraph> {
    let mut graph = ImportGraph::new();
    let mut ids: HashMap<&str, NodeId> = HashMap::new();
    ids.insert(ROOT_NAME, graph.add_root());

    for node in &file.nodes {
        if node.name == ROOT_NAME {
            bail!("node name '{ROOT_NAME}' is reserved for the import root");
        }
        if ids.contains_key(node.name.as_str()) {
            bail!("duplicate node name '{}'", node.name);
        }
        let kind = match node.kind {
            NodeEntryKind::Model => NodeKind::Model,
            NodeEntryKind::Mesh => NodeKind::Mesh,
            NodeEntryKind::Animation => NodeKind::Animation,
        };
        let config = NodeConfig {
            display_name: node.display_name.clone(),
            file_path: node.file.clone(),
            settings: node.settings.clone(),
        };
        ids.insert(&node.name, graph.add_node(kind, config));
    }

    for conn in &file.connections {
        let from = *ids
            .get(conn.from.as_str())
            .with_context(|| format!("connection references unknown node '{}'", conn.from))?;
        let to = *ids
            .get(conn.to.as_str())
            .with_context(|| format!("connection references unknown node '{}'", conn.to))?;
        graph.connect(from, to, conn.socket);
    }

    Ok(graph)
}

pub fn load_graph(path: &Path) -> Result<ImportGraph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph description {}", path.display()))?;
    let file: GraphFile = toml::from_str(&text)
        .with_context(|| format!("failed to parse graph description {}", path.display()))?;
    build_graph(&file)
}

pub fn load_filters(path: &Path) -> Result<ActionFilters> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read filter file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse filter file {}", path.display()))
}
