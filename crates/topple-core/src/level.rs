//! Level configuration: the read-only input the game consumes
//!
//! Levels are produced by external tools (editor, generators, storage) as
//! camelCase JSON. The core parses and inspects them but never mutates or
//! rewrites them.

use crate::error::{Result, ToppleError};
use crate::shape::BlockShape;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

/// Projectile archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    Standard,
    Heavy,
    Explosive,
    Cluster,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 4] = [
        ProjectileKind::Standard,
        ProjectileKind::Heavy,
        ProjectileKind::Explosive,
        ProjectileKind::Cluster,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectileKind::Standard => "standard",
            ProjectileKind::Heavy => "heavy",
            ProjectileKind::Explosive => "explosive",
            ProjectileKind::Cluster => "cluster",
        }
    }
}

impl fmt::Display for ProjectileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectileKind {
    type Err = ToppleError;

    fn from_str(s: &str) -> Result<Self> {
        ProjectileKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ToppleError::InvalidLevel(format!("unknown projectile kind '{s}'")))
    }
}

/// `{ "x": .., "y": .., "z": .. }` as written by the level tools
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Position> for Vec3 {
    fn from(p: Position) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// One authored block. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    pub id: String,
    /// Block center; one world unit equals one block edge
    pub position: Position,
    #[serde(rename = "type", default)]
    pub shape: BlockShape,
    #[serde(default)]
    pub is_golden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BlockDefinition {
    pub fn center(&self) -> Vec3 {
        self.position.into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfiguration {
    pub level_id: String,
    pub name: String,
    pub structure: Vec<BlockDefinition>,
    pub initial_projectiles: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_projectile_counts: Option<HashMap<ProjectileKind, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_target: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_message: Option<String>,
}

/// Advisory findings about a level. None of them stop a level from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelIssue {
    EmptyStructure,
    NoGoldenBlock,
    MultipleGoldenBlocks(usize),
    DuplicateBlockId(String),
}

impl fmt::Display for LevelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelIssue::EmptyStructure => write!(f, "structure has no blocks"),
            LevelIssue::NoGoldenBlock => write!(f, "no golden block; the level cannot be won"),
            LevelIssue::MultipleGoldenBlocks(n) => {
                write!(f, "{n} golden blocks; each one fires its own golden fall event")
            }
            LevelIssue::DuplicateBlockId(id) => write!(f, "duplicate block id '{id}'"),
        }
    }
}

impl LevelConfiguration {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
            .map_err(|e| ToppleError::LevelParseError(format!("{}: {e}", path.display())))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn golden_blocks(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.structure.iter().filter(|b| b.is_golden)
    }

    pub fn golden_count(&self) -> usize {
        self.golden_blocks().count()
    }

    /// Starting ammunition for one projectile kind.
    ///
    /// Explicit per-kind counts win; without them only standard shots are
    /// available, `initial_projectiles` of them.
    pub fn ammo_for(&self, kind: ProjectileKind) -> u32 {
        match &self.initial_projectile_counts {
            Some(counts) => counts.get(&kind).copied().unwrap_or(0),
            None if kind == ProjectileKind::Standard => self.initial_projectiles,
            None => 0,
        }
    }

    pub fn camera_override(&self) -> Option<(Vec3, Vec3)> {
        match (self.camera_position, self.camera_target) {
            (Some(p), Some(t)) => Some((p.into(), t.into())),
            _ => None,
        }
    }

    pub fn audit(&self) -> Vec<LevelIssue> {
        let mut issues = Vec::new();
        if self.structure.is_empty() {
            issues.push(LevelIssue::EmptyStructure);
        }

        match self.golden_count() {
            0 => issues.push(LevelIssue::NoGoldenBlock),
            1 => {}
            n => issues.push(LevelIssue::MultipleGoldenBlocks(n)),
        }

        let mut seen = HashSet::new();
        for block in &self.structure {
            if !seen.insert(block.id.as_str()) {
                issues.push(LevelIssue::DuplicateBlockId(block.id.clone()));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWER: &str = r##"{
        "levelId": "tower-1",
        "name": "Tower",
        "structure": [
            { "id": "base", "position": { "x": 0, "y": 0.5, "z": 0 } },
            { "id": "mid", "position": { "x": 0, "y": 1.5, "z": 0 }, "type": "cylinder" },
            { "id": "top", "position": { "x": 0, "y": 2.5, "z": 0 }, "isGolden": true, "color": "#ffd700" }
        ],
        "initialProjectiles": 5,
        "cameraPosition": { "x": 0, "y": 4, "z": 10 },
        "cameraTarget": { "x": 0, "y": 1.5, "z": 0 }
    }"##;

    #[test]
    fn parse_level_json() {
        let level = LevelConfiguration::from_json(TOWER).unwrap();
        assert_eq!(level.level_id, "tower-1");
        assert_eq!(level.structure.len(), 3);
        assert_eq!(level.structure[0].shape, BlockShape::Cube);
        assert_eq!(level.structure[1].shape, BlockShape::Cylinder);
        assert!(level.structure[2].is_golden);
        assert_eq!(level.structure[2].color.as_deref(), Some("#ffd700"));
        assert_eq!(level.golden_count(), 1);
        assert!(level.audit().is_empty());
    }

    #[test]
    fn camera_override_needs_both_fields() {
        let mut level = LevelConfiguration::from_json(TOWER).unwrap();
        let (pos, target) = level.camera_override().unwrap();
        assert_eq!(pos, Vec3::new(0.0, 4.0, 10.0));
        assert_eq!(target, Vec3::new(0.0, 1.5, 0.0));

        level.camera_target = None;
        assert!(level.camera_override().is_none());
    }

    #[test]
    fn ammo_defaults_to_standard_only() {
        let level = LevelConfiguration::from_json(TOWER).unwrap();
        assert_eq!(level.ammo_for(ProjectileKind::Standard), 5);
        assert_eq!(level.ammo_for(ProjectileKind::Explosive), 0);
    }

    #[test]
    fn explicit_ammo_counts_win() {
        let mut level = LevelConfiguration::from_json(TOWER).unwrap();
        let mut counts = HashMap::new();
        counts.insert(ProjectileKind::Cluster, 2);
        level.initial_projectile_counts = Some(counts);
        assert_eq!(level.ammo_for(ProjectileKind::Cluster), 2);
        assert_eq!(level.ammo_for(ProjectileKind::Standard), 0);
    }

    #[test]
    fn audit_reports_golden_anomalies_without_rewriting() {
        let mut level = LevelConfiguration::from_json(TOWER).unwrap();
        level.structure[2].is_golden = false;
        assert_eq!(level.audit(), vec![LevelIssue::NoGoldenBlock]);
        assert_eq!(level.golden_count(), 0);

        level.structure[0].is_golden = true;
        level.structure[1].is_golden = true;
        level.structure[1].id = "base".into();
        assert_eq!(
            level.audit(),
            vec![
                LevelIssue::MultipleGoldenBlocks(2),
                LevelIssue::DuplicateBlockId("base".into())
            ]
        );
    }

    #[test]
    fn projectile_counts_use_lowercase_keys() {
        let json = r#"{
            "levelId": "l", "name": "n", "structure": [], "initialProjectiles": 0,
            "initialProjectileCounts": { "standard": 3, "explosive": 1 }
        }"#;
        let level = LevelConfiguration::from_json(json).unwrap();
        assert_eq!(level.ammo_for(ProjectileKind::Standard), 3);
        assert_eq!(level.ammo_for(ProjectileKind::Explosive), 1);
        assert_eq!(level.audit()[0], LevelIssue::EmptyStructure);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("heavy".parse::<ProjectileKind>().unwrap(), ProjectileKind::Heavy);
        assert!("laser".parse::<ProjectileKind>().is_err());
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = LevelConfiguration::from_json("{").unwrap_err();
        assert!(matches!(err, ToppleError::LevelParseError(_)));
    }
}
