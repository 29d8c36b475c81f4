//! One level session: the ordered per-frame pipeline
//!
//! Each unpaused frame runs, in order: physics advance, visual sync, fall
//! detection, projectile transitions and removal sweep (which may explode or
//! split), explosion effects, then particle animation. Later stages read the
//! post-step positions written by earlier ones.

use glam::Vec3;
use topple_core::{
    EntityId, IdAllocator, LevelConfiguration, ProjectileKind, TuningConfig, VisualScene,
};
use topple_particles::{ParticleInstance, ParticleSystem};
use topple_physics::{
    apply_explosion, compute_framing, PhysicsWorld, ProjectileManager, StructureManager,
};
use topple_runtime::{EventBus, Fall, GameClock, GameEvent};

use crate::camera::Camera;

const DEFAULT_SEED: u64 = 0x7099_1E5E;

/// Caller-owned predicates, passed fresh every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameGates {
    /// Skip physics and lifecycle work; particles keep animating
    pub paused: bool,
}

/// What one frame did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed physics steps taken
    pub steps: u32,
    pub fallen: usize,
    pub golden_fallen: bool,
    pub explosions: usize,
    /// Bodies pushed by this frame's explosions
    pub bodies_pushed: usize,
    pub splits: usize,
    pub spawned: usize,
    pub removed: usize,
}

pub struct Game {
    config: TuningConfig,
    level: LevelConfiguration,

    physics: PhysicsWorld,
    scene: VisualScene,
    ids: IdAllocator,

    structure: StructureManager,
    projectiles: ProjectileManager,
    particles: ParticleSystem,

    camera: Camera,
    clock: GameClock,
    events: EventBus,
}

impl Game {
    pub fn new(config: TuningConfig, level: &LevelConfiguration) -> Self {
        Self::with_seed(config, level, DEFAULT_SEED)
    }

    /// Build a session whose submunition spread and particle bursts are
    /// driven by `seed`
    pub fn with_seed(config: TuningConfig, level: &LevelConfiguration, seed: u64) -> Self {
        let mut game = Self {
            physics: PhysicsWorld::new(&config.physics),
            scene: VisualScene::new(),
            ids: IdAllocator::new(),
            structure: StructureManager::new(config.structure.clone()),
            projectiles: ProjectileManager::new(config.projectiles.clone(), seed),
            particles: ParticleSystem::new(config.explosion.clone(), seed.rotate_left(17)),
            camera: Camera::new(),
            clock: GameClock::with_max_delta(f64::from(config.physics.max_frame_delta)),
            events: EventBus::new(),
            level: level.clone(),
            config,
        };
        game.reset_level(level, true);
        game
    }

    /// Advance one frame by the wall-clock delta `dt` (seconds).
    pub fn frame(&mut self, dt: f32, gates: FrameGates) -> FrameReport {
        let mut report = FrameReport::default();
        let dt = dt.clamp(0.0, self.config.physics.max_frame_delta);

        if !gates.paused {
            self.clock.advance(f64::from(dt));
            let now_ms = self.clock.elapsed_ms();

            self.projectiles.snapshot_velocities(&self.physics);
            report.steps = self.physics.advance(dt);
            let collisions = self.physics.drain_collision_events();

            self.structure.sync_visuals(&self.physics, &mut self.scene);
            self.projectiles.sync_visuals(&self.physics, &mut self.scene);

            for fallen in self.structure.detect_falls(&self.physics) {
                report.fallen += 1;
                report.golden_fallen |= fallen.golden;
                if fallen.golden {
                    log::info!("[game] Golden block '{}' has fallen", fallen.block_id);
                }
                self.events.push(GameEvent::BlockFallen {
                    block_id: fallen.block_id,
                    golden: fallen.golden,
                });
            }

            self.projectiles
                .record_impacts(&collisions, &self.physics, &self.structure);
            let lifecycle =
                self.projectiles
                    .update(now_ms, &mut self.physics, &mut self.scene, &mut self.ids);

            let explosion = &self.config.explosion;
            for &center in &lifecycle.explosions {
                report.bodies_pushed +=
                    apply_explosion(&mut self.physics, center, explosion.radius, explosion.strength);
                self.particles.spawn_burst(center, now_ms);
                self.events.push(GameEvent::Exploded { position: center });
            }
            for &parent in &lifecycle.splits {
                self.events.push(GameEvent::ClusterSplit {
                    parent,
                    count: self.config.projectiles.submunition_count,
                });
            }

            report.explosions = lifecycle.explosions.len();
            report.splits = lifecycle.splits.len();
            report.spawned = lifecycle.spawned;
            report.removed = lifecycle.removed.len();
        }

        self.particles.update(dt);
        self.particles.pack_instances();
        report
    }

    /// Fire one projectile along the camera's view direction.
    ///
    /// It spawns in front of the camera by its own radius plus the configured
    /// clearance, at `velocity_multiplier × power`.
    pub fn launch_projectile(&mut self, power: f32, kind: ProjectileKind) -> EntityId {
        let config = &self.config.projectiles;
        let direction = self.camera.direction();
        let radius = config.spec(kind).radius;
        let position = self.camera.position + direction * (radius + config.spawn_clearance);
        let velocity = direction * config.velocity_multiplier * power;

        let id = self.projectiles.spawn(
            kind,
            position,
            velocity,
            self.clock.elapsed_ms(),
            &mut self.physics,
            &mut self.scene,
            &mut self.ids,
        );
        log::info!("[game] Launched {kind} projectile {id} at power {power:.2}");
        self.events.push(GameEvent::ProjectileLaunched { id, kind, power });
        id
    }

    /// Drop every projectile and burst, then rebuild the structure.
    ///
    /// The camera only moves when `reframe` is set.
    pub fn reset_level(&mut self, level: &LevelConfiguration, reframe: bool) {
        self.projectiles.clear(&mut self.physics, &mut self.scene);
        self.particles.clear();
        let blocks = self
            .structure
            .load(level, &mut self.physics, &mut self.scene, &mut self.ids);

        if reframe {
            let framing = compute_framing(level, self.config.structure.min_framing_extent);
            self.camera.apply_framing(framing);
        }
        self.level = level.clone();

        log::info!("[game] Level '{}' ready with {blocks} block(s)", level.level_id);
        self.events.push(GameEvent::LevelLoaded {
            level_id: level.level_id.clone(),
            blocks,
        });
    }

    /// Current position of the golden block, if the level has one
    pub fn golden_block_position(&self) -> Option<Vec3> {
        self.structure.golden_position(&self.physics)
    }

    pub fn point_camera_towards(&mut self, target: Vec3) {
        self.camera.look_at(target);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn scene(&self) -> &VisualScene {
        &self.scene
    }

    /// Instances packed at the end of the last frame
    pub fn particle_instances(&self) -> &[ParticleInstance] {
        self.particles.instances()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Pull only the pending block falls, leaving other events queued
    pub fn drain_falls(&mut self) -> Vec<Fall> {
        self.events.drain_falls()
    }

    /// Rigid bodies in the world, ground included
    pub fn body_count(&self) -> usize {
        self.physics.body_count()
    }

    pub fn structure(&self) -> &StructureManager {
        &self.structure
    }

    pub fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    pub fn level(&self) -> &LevelConfiguration {
        &self.level
    }

    pub fn config(&self) -> &TuningConfig {
        &self.config
    }

    /// Unpaused simulation time in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn tower() -> LevelConfiguration {
        LevelConfiguration::from_json(
            r#"{
                "levelId": "tower",
                "name": "Tower",
                "initialProjectiles": 3,
                "cameraPosition": { "x": 0, "y": 3.6, "z": 6 },
                "cameraTarget": { "x": 0, "y": 2, "z": 0 },
                "structure": [
                    { "id": "base", "position": { "x": 0, "y": 0.5, "z": 0 } },
                    { "id": "mid", "position": { "x": 0, "y": 1.5, "z": 0 } },
                    { "id": "top", "position": { "x": 0, "y": 2.5, "z": 0 } },
                    { "id": "gold", "position": { "x": 0, "y": 3.5, "z": 0 }, "isGolden": true }
                ]
            }"#,
        )
        .unwrap()
    }

    fn run(game: &mut Game, frames: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            game.frame(FRAME, FrameGates::default());
            events.extend(game.drain_events());
        }
        events
    }

    fn fallen_blocks(events: &[GameEvent]) -> Vec<(String, bool)> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BlockFallen { block_id, golden } => Some((block_id.clone(), *golden)),
                _ => None,
            })
            .collect()
    }

    fn golden_falls(events: &[GameEvent]) -> usize {
        events.iter().filter(|e| e.is_golden_fall()).count()
    }

    #[test]
    fn new_game_loads_and_frames() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        assert_eq!(game.body_count(), 1 + 4);
        assert_eq!(game.scene().len(), 4);
        assert_eq!(game.camera().position, Vec3::new(0.0, 3.6, 6.0));

        let events = game.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::LevelLoaded {
                level_id: "tower".into(),
                blocks: 4
            }]
        );
    }

    #[test]
    fn reset_is_idempotent() {
        let level = tower();
        let mut game = Game::new(TuningConfig::default(), &level);
        let fresh = game.body_count();

        game.launch_projectile(0.5, ProjectileKind::Heavy);
        run(&mut game, 5);
        game.reset_level(&level, false);
        assert_eq!(game.body_count(), fresh);
        game.reset_level(&level, false);
        assert_eq!(game.body_count(), fresh);
        assert_eq!(game.scene().len(), 4);
        assert!(game.projectiles().is_empty());
        assert_eq!(game.structure().fallen_count(), 0);
    }

    #[test]
    fn reset_keeps_camera_unless_reframed() {
        let level = tower();
        let mut game = Game::new(TuningConfig::default(), &level);
        game.point_camera_towards(Vec3::new(5.0, 0.0, 0.0));
        game.reset_level(&level, false);
        assert_eq!(game.camera().target, Vec3::new(5.0, 0.0, 0.0));
        game.reset_level(&level, true);
        assert_eq!(game.camera().target, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn launch_spawns_ahead_of_camera() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        let id = game.launch_projectile(1.0, ProjectileKind::Standard);
        let projectile = game.projectiles().get(id).unwrap();
        assert_eq!(projectile.kind, ProjectileKind::Standard);
        assert_eq!(game.body_count(), 1 + 4 + 1);
        assert!(matches!(
            game.drain_events().last(),
            Some(GameEvent::ProjectileLaunched { power, .. }) if *power == 1.0
        ));
    }

    #[test]
    fn standing_tower_does_not_fall() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        let events = run(&mut game, 120);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::BlockFallen { .. })));
        assert!(game.golden_block_position().is_some());
    }

    #[test]
    fn direct_hit_topples_golden_block_once() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        run(&mut game, 30);

        let golden = game.golden_block_position().unwrap();
        game.point_camera_towards(golden);
        game.launch_projectile(0.8, ProjectileKind::Standard);

        let events = run(&mut game, 240);
        assert_eq!(golden_falls(&events), 1);
        assert_eq!(fallen_blocks(&events), vec![("gold".to_string(), true)]);
        for support in ["base", "mid", "top"] {
            let block = game.structure().block_by_name(support).unwrap();
            assert!(!block.has_fallen(), "{support} fell");
        }
    }

    #[test]
    fn falls_drain_apart_from_other_events() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        run(&mut game, 30);

        let golden = game.golden_block_position().unwrap();
        game.point_camera_towards(golden);
        game.launch_projectile(0.8, ProjectileKind::Standard);
        for _ in 0..240 {
            game.frame(FRAME, FrameGates::default());
        }

        assert_eq!(
            game.drain_falls(),
            vec![Fall {
                block_id: "gold".into(),
                golden: true,
            }]
        );
        let rest = game.drain_events();
        assert!(matches!(rest.first(), Some(GameEvent::ProjectileLaunched { .. })));
        assert!(fallen_blocks(&rest).is_empty());
    }

    #[test]
    fn explosive_hit_bursts_particles() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        run(&mut game, 30);
        game.point_camera_towards(Vec3::new(0.0, 1.5, 0.0));
        game.launch_projectile(0.8, ProjectileKind::Explosive);

        let mut exploded = false;
        for _ in 0..60 {
            let report = game.frame(FRAME, FrameGates::default());
            if report.explosions > 0 {
                exploded = true;
                assert!(report.bodies_pushed > 0);
                assert_eq!(game.particles().active_count(), 1);
                assert_eq!(game.particle_instances().len(), 80);
                break;
            }
        }
        assert!(exploded);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Exploded { .. })));
    }

    #[test]
    fn paused_frames_freeze_simulation() {
        let mut game = Game::new(TuningConfig::default(), &tower());
        let id = game.launch_projectile(0.5, ProjectileKind::Cluster);
        let before = game.now_ms();

        let paused = FrameGates { paused: true };
        for _ in 0..120 {
            let report = game.frame(FRAME, paused);
            assert_eq!(report.steps, 0);
        }
        // the cluster fuse does not run while paused
        assert_eq!(game.now_ms(), before);
        assert!(game.projectiles().get(id).is_some());
    }
}
