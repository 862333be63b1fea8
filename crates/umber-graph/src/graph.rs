//! The import graph container

use crate::node::{GraphNode, NodeConfig, NodeId, NodeKind, SocketKind};

/// A typed link from one node's output into another node's input
/// socket. Connections of the same socket type on one consumer keep
/// the order they were attached in; that order is semantic (mesh
/// stacking order, animation layering order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// Producer: the node plugged into the socket
    pub from: NodeId,
    /// Consumer: the node owning the input socket
    pub to: NodeId,
    pub socket: SocketKind,
}

/// The user-authored node graph
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    nodes: Vec<GraphNode>,
    connections: Vec<Connection>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, kind: NodeKind, config: NodeConfig) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode { id, kind, config });
        id
    }

    pub fn add_root(&mut self) -> NodeId {
        self.add_node(NodeKind::ImportRoot, NodeConfig::default())
    }

    pub fn add_model(&mut self, display_name: &str, file_path: &str) -> NodeId {
        self.add_node(NodeKind::Model, NodeConfig::named(display_name, file_path))
    }

    pub fn add_mesh(&mut self, display_name: &str, file_path: &str) -> NodeId {
        self.add_node(NodeKind::Mesh, NodeConfig::named(display_name, file_path))
    }

    pub fn add_animation(&mut self, display_name: &str, file_path: &str) -> NodeId {
        self.add_node(
            NodeKind::Animation,
            NodeConfig::named(display_name, file_path),
        )
    }

    /// Attach `from`'s output to the `socket` input of `to`. Attachment
    /// order is preserved. Socket legality is checked at resolve time.
    pub fn connect(&mut self, from: NodeId, to: NodeId, socket: SocketKind) {
        self.connections.push(Connection { from, to, socket });
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Producers attached to the given socket of `to`, in attachment order
    pub fn inputs(&self, to: NodeId, socket: SocketKind) -> impl Iterator<Item = NodeId> + '_ {
        self.connections
            .iter()
            .filter(move |c| c.to == to && c.socket == socket)
            .map(|c| c.from)
    }
}
