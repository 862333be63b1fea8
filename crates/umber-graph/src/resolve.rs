//! Graph resolution: import graph in, ordered build plan out
//!
//! A depth-first walk from the import root, visiting model and mesh
//! inputs in user attachment order. Model nodes chained into another
//! model are deliberately NOT parented: each becomes an independent
//! top-level entry, exactly as if it were connected straight to the
//! import root. Changing that would alter observable import results.

use crate::graph::ImportGraph;
use crate::node::{GraphNode, NodeId, NodeKind, SocketKind};
use crate::plan::{AnimationSource, BuildPlan, BuildPlanEntry, ClipLayer, MeshSource};
use std::collections::HashSet;
use umber_core::{Result, UmberError};

fn graph_err(msg: impl Into<String>) -> UmberError {
    UmberError::GraphValidation(msg.into())
}

/// Resolve a graph into an ordered build plan.
///
/// Fails with `GraphValidation` if the graph has no import root, more
/// than one, a cycle, an illegal connection, or a reachable node with
/// no file path set.
pub fn resolve(graph: &ImportGraph) -> Result<BuildPlan> {
    let root = find_root(graph)?;
    validate_connections(graph)?;

    let mut plan = BuildPlan::default();
    let mut visiting: HashSet<NodeId> = HashSet::new();

    let model_inputs: Vec<NodeId> = graph.inputs(root, SocketKind::Model).collect();
    for model_id in model_inputs {
        walk_model(graph, model_id, &mut plan, &mut visiting)?;
    }

    let mesh_inputs: Vec<NodeId> = graph.inputs(root, SocketKind::Mesh).collect();
    for mesh_id in mesh_inputs {
        let head = expect_node(graph, mesh_id)?;
        let mut meshes = Vec::new();
        walk_mesh_chain(graph, mesh_id, &mut meshes, &mut visiting)?;
        plan.entries.push(BuildPlanEntry {
            name: head.config.label(),
            settings: head.config.settings.clone(),
            build_skeleton: false,
            meshes,
            animations: Vec::new(),
        });
    }

    log::debug!("resolved {} build plan entries", plan.len());
    Ok(plan)
}

fn find_root(graph: &ImportGraph) -> Result<NodeId> {
    let mut roots = graph.nodes().filter(|n| n.kind == NodeKind::ImportRoot);
    let first = roots
        .next()
        .ok_or_else(|| graph_err("no import root node present"))?;
    if roots.next().is_some() {
        return Err(graph_err("more than one import root node present"));
    }
    Ok(first.id)
}

fn expect_node(graph: &ImportGraph, id: NodeId) -> Result<&GraphNode> {
    graph
        .node(id)
        .ok_or_else(|| graph_err(format!("connection references unknown node {:?}", id)))
}

fn require_file(node: &GraphNode) -> Result<()> {
    if node.config.file_path.as_os_str().is_empty() {
        return Err(graph_err(format!(
            "no file path set for {:?} node '{}'",
            node.kind,
            node.config.label()
        )));
    }
    Ok(())
}

/// All connections must use a socket kind legal for the consumer and
/// producer pair. Checked once here rather than per access.
fn validate_connections(graph: &ImportGraph) -> Result<()> {
    use NodeKind::*;
    use SocketKind as S;

    for conn in graph.connections() {
        let from = expect_node(graph, conn.from)?;
        let to = expect_node(graph, conn.to)?;
        let legal = matches!(
            (conn.socket, to.kind, from.kind),
            (S::Model, ImportRoot, Model)
                | (S::Mesh, ImportRoot, Mesh)
                | (S::Model, Model, Model)
                | (S::Mesh, Model, Mesh)
                | (S::Animation, Model, Animation)
                | (S::Mesh, Mesh, Mesh)
                | (S::Mesh, Mesh, Model)
                | (S::Animation, Animation, Animation)
        );
        if !legal {
            return Err(graph_err(format!(
                "{:?} node '{}' cannot plug into the {:?} socket of {:?} node '{}'",
                from.kind,
                from.config.label(),
                conn.socket,
                to.kind,
                to.config.label()
            )));
        }
    }
    Ok(())
}

fn enter(visiting: &mut HashSet<NodeId>, node: &GraphNode) -> Result<()> {
    if !visiting.insert(node.id) {
        return Err(graph_err(format!(
            "cycle detected at {:?} node '{}'",
            node.kind,
            node.config.label()
        )));
    }
    Ok(())
}

fn walk_model(
    graph: &ImportGraph,
    id: NodeId,
    plan: &mut BuildPlan,
    visiting: &mut HashSet<NodeId>,
) -> Result<()> {
    let node = expect_node(graph, id)?;
    enter(visiting, node)?;
    require_file(node)?;

    // the model's own file is its first mesh source and provides the skeleton
    let mut meshes = vec![MeshSource {
        name: node.config.label(),
        path: node.config.file_path.clone(),
        texture_path: node.config.settings.texture_path.clone(),
        material_file: node.config.settings.material_file.clone(),
    }];

    let mesh_inputs: Vec<NodeId> = graph.inputs(id, SocketKind::Mesh).collect();
    for mesh_id in mesh_inputs {
        walk_mesh_chain(graph, mesh_id, &mut meshes, visiting)?;
    }

    let mut animations = Vec::new();
    let anim_inputs: Vec<NodeId> = graph.inputs(id, SocketKind::Animation).collect();
    for anim_id in anim_inputs {
        walk_animation_chain(graph, anim_id, ClipLayer::Primary, &mut animations, visiting)?;
    }

    plan.entries.push(BuildPlanEntry {
        name: node.config.label(),
        settings: node.config.settings.clone(),
        build_skeleton: true,
        meshes,
        animations,
    });

    // chained models are un-parented: each is flattened into its own
    // top-level entry, appended after the model it was chained to
    let nested: Vec<NodeId> = graph.inputs(id, SocketKind::Model).collect();
    for nested_id in nested {
        walk_model(graph, nested_id, plan, visiting)?;
    }

    visiting.remove(&id);
    Ok(())
}

fn walk_mesh_chain(
    graph: &ImportGraph,
    id: NodeId,
    out: &mut Vec<MeshSource>,
    visiting: &mut HashSet<NodeId>,
) -> Result<()> {
    let node = expect_node(graph, id)?;
    enter(visiting, node)?;
    require_file(node)?;

    match node.kind {
        NodeKind::Mesh => {
            out.push(MeshSource {
                name: node.config.label(),
                path: node.config.file_path.clone(),
                texture_path: node.config.settings.texture_path.clone(),
                material_file: node.config.settings.material_file.clone(),
            });
            let chained: Vec<NodeId> = graph.inputs(id, SocketKind::Mesh).collect();
            for next in chained {
                walk_mesh_chain(graph, next, out, visiting)?;
            }
        }
        // a model plugged into a mesh socket contributes only its mesh
        // data; its animations and per-model overrides are discarded
        NodeKind::Model => {
            out.push(MeshSource {
                name: node.config.label(),
                path: node.config.file_path.clone(),
                texture_path: None,
                material_file: None,
            });
        }
        // unreachable after validate_connections
        other => {
            return Err(graph_err(format!(
                "{:?} node '{}' in a mesh chain",
                other,
                node.config.label()
            )))
        }
    }

    visiting.remove(&id);
    Ok(())
}

fn walk_animation_chain(
    graph: &ImportGraph,
    id: NodeId,
    layer: ClipLayer,
    out: &mut Vec<AnimationSource>,
    visiting: &mut HashSet<NodeId>,
) -> Result<()> {
    let node = expect_node(graph, id)?;
    enter(visiting, node)?;
    require_file(node)?;

    out.push(AnimationSource {
        name: node.config.label(),
        path: node.config.file_path.clone(),
        layer,
        use_translation: node.config.settings.use_translation,
    });

    // anything chained behind an animation node layers additively on
    // the clip it was chained to
    let chained: Vec<NodeId> = graph.inputs(id, SocketKind::Animation).collect();
    for next in chained {
        walk_animation_chain(graph, next, ClipLayer::Additive, out, visiting)?;
    }

    visiting.remove(&id);
    Ok(())
}
