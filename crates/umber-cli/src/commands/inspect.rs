//! Single-file chunk inspection

use anyhow::{bail, Context, Result};
use umber_core::Diagnostics;
use umber_format::{decode_animation, decode_mesh};

pub fn run(path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {path}"))?;
    if bytes.len() < 8 {
        bail!("{path}: too short to carry a chunk header");
    }
    match &bytes[..8] {
        b"ACTRHEAD" => inspect_mesh(path, &bytes),
        b"ANIMHEAD" => inspect_animation(path, &bytes),
        _ => bail!("{path}: unrecognized file header"),
    }
}

fn inspect_mesh(path: &str, bytes: &[u8]) -> Result<()> {
    let chunk = decode_mesh(bytes)?;
    println!("{path}: skeletal mesh");
    println!("  points:    {}", chunk.points.len());
    println!("  wedges:    {}", chunk.wedges.len());
    println!("  faces:     {}", chunk.faces.len());
    println!("  materials: {}", chunk.materials.len());
    for material in &chunk.materials {
        println!("    - {}", material.name);
    }
    println!("  bones:     {}", chunk.bones.len());
    if chunk.has_skeleton() {
        let weighted = chunk.influences.iter().filter(|l| !l.is_empty()).count();
        println!("  weighted points: {weighted}");
    }
    if !chunk.extra_uvs.is_empty() {
        println!("  extra uv sets: {}", chunk.extra_uvs.len());
    }
    Ok(())
}

fn inspect_animation(path: &str, bytes: &[u8]) -> Result<()> {
    let mut diags = Diagnostics::new();
    let clip = decode_animation(bytes, &mut diags)?;
    println!("{path}: animation set");
    println!("  bones:   {}", clip.bone_names.len());
    println!("  actions: {}", clip.actions.len());
    for action in &clip.actions {
        println!(
            "    - {} ({} frames @ {} fps)",
            action.name, action.frame_count, action.rate
        );
    }
    for diag in diags.iter() {
        println!("  warning: {diag}");
    }
    Ok(())
}
