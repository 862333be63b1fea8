//! Graph node and socket types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use umber_core::ModelSettings;

/// Stable identity of a node within one graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// The socket type a connection plugs into.
///
/// The node-editor UI checks connection types at runtime; here the
/// kinds are a closed enum and the legal (socket, consumer, producer)
/// combinations are validated once during graph resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketKind {
    Model,
    Mesh,
    Animation,
}

/// What a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    ImportRoot,
    Model,
    Mesh,
    Animation,
}

/// Per-node configuration, as authored in the editor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub display_name: String,
    /// Path of the binary asset this node reads. Empty means unset,
    /// which is a validation error for any node reachable from the
    /// import root.
    pub file_path: PathBuf,
    pub settings: ModelSettings,
}

impl NodeConfig {
    pub fn named(display_name: &str, file_path: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            file_path: PathBuf::from(file_path),
            settings: ModelSettings::new(),
        }
    }

    /// Display name, falling back to the file stem
    pub fn label(&self) -> String {
        if !self.display_name.is_empty() {
            return self.display_name.clone();
        }
        self.file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string())
    }
}

/// One node of the import graph
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub config: NodeConfig,
}
