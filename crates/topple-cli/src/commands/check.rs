//! Level audit command

use anyhow::{bail, Context, Result};
use std::path::Path;
use topple_core::{LevelConfiguration, ProjectileKind, StructureConfig};
use topple_physics::compute_framing;

pub fn run(path: &Path, strict: bool) -> Result<()> {
    let level = LevelConfiguration::load_from_file(path)
        .with_context(|| format!("Failed to load level {}", path.display()))?;

    println!("Level '{}' ({})", level.name, level.level_id);
    println!("  Blocks: {} ({} golden)", level.structure.len(), level.golden_count());

    let ammo: Vec<String> = ProjectileKind::ALL
        .into_iter()
        .filter_map(|kind| match level.ammo_for(kind) {
            0 => None,
            n => Some(format!("{kind} x{n}")),
        })
        .collect();
    if ammo.is_empty() {
        println!("  Ammunition: none");
    } else {
        println!("  Ammunition: {}", ammo.join(", "));
    }

    let framing = compute_framing(&level, StructureConfig::default().min_framing_extent);
    println!(
        "  Camera: ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}){}",
        framing.position.x,
        framing.position.y,
        framing.position.z,
        framing.target.x,
        framing.target.y,
        framing.target.z,
        if level.camera_override().is_some() {
            " [explicit]"
        } else {
            ""
        }
    );

    let issues = level.audit();
    if issues.is_empty() {
        println!("  No issues found.");
        return Ok(());
    }

    println!("  {} issue(s):", issues.len());
    for issue in &issues {
        println!("    - {issue}");
    }
    if strict {
        bail!("level {} failed the audit", path.display());
    }
    Ok(())
}
