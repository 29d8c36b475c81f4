//! Projectile lifecycle: spawning, detonation, cluster splitting and removal
//!
//! Each frame [`ProjectileManager::update`] runs three passes in a fixed order:
//! 1. type-specific transitions (explosive detonation, cluster split)
//! 2. the removal sweep
//! 3. appending the submunitions produced in pass 1
//!
//! Submunitions are appended last so the sweep never judges them on the
//! stale data of the frame they were born in.

use crate::entity::{to_glam, EntityBody};
use crate::structure::StructureManager;
use crate::world::PhysicsWorld;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rapier3d::prelude::*;
use topple_core::random::random_direction;
use topple_core::{
    EntityId, IdAllocator, MeshSpec, ProjectileConfig, ProjectileKind, ProjectileSpec, Transform,
    Vec3, VisualNode, VisualScene,
};

/// Lifecycle state of one projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    Flying,
    /// Detonated this frame; removed by the same sweep
    Exploding,
    /// Split into submunitions this frame; removed by the same sweep
    Splitting,
    /// Came to rest and was removed
    Settled,
    /// Fell out of the world or timed out
    Removed,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub submunition: bool,
    pub created_ms: f64,
    /// Lifespan (explosive fuse, cluster split delay, submunition lifetime)
    pub ttl_ms: Option<f64>,
    pub state: ProjectileState,
    pub entity: EntityBody,
    /// Set once the split or detonation happened; never cleared
    transitioned: bool,
    /// A hard impact with a structure block was seen since the last update
    hard_impact: bool,
    /// Linear velocity before the most recent physics advance
    last_velocity: Vec3,
}

impl Projectile {
    pub fn has_transitioned(&self) -> bool {
        self.transitioned
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.ttl_ms
            .is_some_and(|ttl| now_ms - self.created_ms >= ttl)
    }

    /// Plain projectiles may be swept away once they come to rest
    fn removable_at_rest(&self) -> bool {
        self.submunition || matches!(self.kind, ProjectileKind::Standard | ProjectileKind::Heavy)
    }
}

/// What the sweep sees of a projectile's body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub sleeping: bool,
}

impl BodySnapshot {
    fn of(body: &RigidBody) -> Self {
        Self {
            position: to_glam(body.translation()),
            velocity: to_glam(body.linvel()),
            sleeping: body.is_sleeping(),
        }
    }
}

/// Decide whether the sweep removes a projectile, and in which final state.
///
/// A missing body is always removed.
pub fn removal_state(
    projectile: &Projectile,
    body: Option<&BodySnapshot>,
    now_ms: f64,
    config: &ProjectileConfig,
) -> Option<ProjectileState> {
    let Some(body) = body else {
        return Some(ProjectileState::Removed);
    };

    if body.position.y < config.floor_escape_y {
        return Some(ProjectileState::Removed);
    }
    if projectile.transitioned {
        return Some(projectile.state);
    }
    if projectile.submunition && projectile.is_expired(now_ms) {
        return Some(ProjectileState::Removed);
    }
    if projectile.removable_at_rest()
        && body.sleeping
        && body.velocity.length_squared() < config.rest_speed_sq
    {
        return Some(ProjectileState::Settled);
    }
    None
}

/// Impact speed along the contact normal, or the full relative speed when
/// no contact normal is available
pub fn impact_speed(relative_velocity: Vec3, normal: Option<Vec3>) -> f32 {
    match normal.and_then(|n| n.try_normalize()) {
        Some(n) => relative_velocity.dot(n).abs(),
        None => relative_velocity.length(),
    }
}

/// Outcome of one [`ProjectileManager::update`]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LifecycleReport {
    /// Detonation points, in the order the projectiles exploded
    pub explosions: Vec<Vec3>,
    /// Cluster parents that split this update
    pub splits: Vec<EntityId>,
    /// Number of submunitions appended
    pub spawned: usize,
    pub removed: Vec<(EntityId, ProjectileState)>,
}

struct PendingSubmunition {
    position: Vec3,
    velocity: Vec3,
}

pub struct ProjectileManager {
    projectiles: Vec<Projectile>,
    config: ProjectileConfig,
    rng: Pcg32,
}

impl ProjectileManager {
    pub fn new(config: ProjectileConfig, seed: u64) -> Self {
        Self {
            projectiles: Vec::new(),
            config,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    /// Create one projectile of `kind` and set it in motion
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        &mut self,
        kind: ProjectileKind,
        position: Vec3,
        velocity: Vec3,
        now_ms: f64,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        ids: &mut IdAllocator,
    ) -> EntityId {
        let spec = *self.config.spec(kind);
        let ttl_ms = match kind {
            ProjectileKind::Explosive => Some(self.config.explosive_lifespan_ms),
            ProjectileKind::Cluster => Some(self.config.cluster_split_delay_ms),
            ProjectileKind::Standard | ProjectileKind::Heavy => None,
        };
        let projectile = Self::build(
            kind, false, &spec, position, velocity, now_ms, ttl_ms, physics, scene, ids,
        );
        let id = projectile.id;
        log::debug!("[projectile] Spawned {kind} projectile {id}");
        self.projectiles.push(projectile);
        id
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        kind: ProjectileKind,
        submunition: bool,
        spec: &ProjectileSpec,
        position: Vec3,
        velocity: Vec3,
        now_ms: f64,
        ttl_ms: Option<f64>,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        ids: &mut IdAllocator,
    ) -> Projectile {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .linvel(vector![velocity.x, velocity.y, velocity.z])
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::ball(spec.radius)
            .mass(spec.mass)
            .friction(0.5)
            .restitution(0.2)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let node = VisualNode {
            mesh: MeshSpec::Sphere {
                radius: spec.radius,
                segments: 16,
            },
            color: spec.color,
            transform: Transform::from_position(position),
        };

        Projectile {
            id: ids.next_id(),
            kind,
            submunition,
            created_ms: now_ms,
            ttl_ms,
            state: ProjectileState::Flying,
            entity: EntityBody::spawn(physics, scene, body, collider, node),
            transitioned: false,
            hard_impact: false,
            last_velocity: velocity,
        }
    }

    /// Remember each projectile's velocity before the physics advance, so
    /// impacts can be judged on pre-collision speed
    pub fn snapshot_velocities(&mut self, physics: &PhysicsWorld) {
        for p in &mut self.projectiles {
            if let Some(body) = physics.get_rigid_body(p.entity.body) {
                p.last_velocity = to_glam(body.linvel());
            }
        }
    }

    /// Arm explosives that struck a structure block hard enough
    pub fn record_impacts(
        &mut self,
        events: &[CollisionEvent],
        physics: &PhysicsWorld,
        structure: &StructureManager,
    ) {
        let min_speed = self.config.explosive_min_impact_speed;

        for event in events.iter().filter(|e| e.started()) {
            let (c1, c2) = (event.collider1(), event.collider2());
            for (own, other) in [(c1, c2), (c2, c1)] {
                let Some(projectile) = self.projectiles.iter_mut().find(|p| {
                    p.entity.collider == own
                        && p.kind == ProjectileKind::Explosive
                        && !p.submunition
                        && !p.transitioned
                }) else {
                    continue;
                };
                let Some(block) = structure.block_by_collider(other) else {
                    continue;
                };

                let block_velocity = physics
                    .get_rigid_body(block.entity.body)
                    .map(|b| to_glam(b.linvel()))
                    .unwrap_or(Vec3::ZERO);
                let normal = physics.contact_normal(own, other).map(|n| to_glam(&n));
                let speed = impact_speed(projectile.last_velocity - block_velocity, normal);

                if speed > min_speed {
                    log::debug!(
                        "[projectile] Explosive {} hit block '{}' at {speed:.2} u/s",
                        projectile.id,
                        block.name
                    );
                    projectile.hard_impact = true;
                }
            }
        }
    }

    /// Run transitions, the removal sweep, then append new submunitions
    pub fn update(
        &mut self,
        now_ms: f64,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        ids: &mut IdAllocator,
    ) -> LifecycleReport {
        let mut report = LifecycleReport::default();
        let pending = self.run_transitions(now_ms, physics, &mut report);
        self.sweep(now_ms, physics, scene, &mut report);

        let spec = self.config.submunition;
        let ttl = Some(self.config.submunition_lifespan_ms);
        for sub in &pending {
            let projectile = Self::build(
                ProjectileKind::Cluster,
                true,
                &spec,
                sub.position,
                sub.velocity,
                now_ms,
                ttl,
                physics,
                scene,
                ids,
            );
            self.projectiles.push(projectile);
        }
        report.spawned = pending.len();
        report
    }

    fn run_transitions(
        &mut self,
        now_ms: f64,
        physics: &PhysicsWorld,
        report: &mut LifecycleReport,
    ) -> Vec<PendingSubmunition> {
        let mut pending = Vec::new();
        let rng = &mut self.rng;
        let config = &self.config;

        for p in self
            .projectiles
            .iter_mut()
            .filter(|p| !p.transitioned && !p.submunition)
        {
            let Some(body) = physics.get_rigid_body(p.entity.body) else {
                continue;
            };
            let snapshot = BodySnapshot::of(body);

            match p.kind {
                ProjectileKind::Explosive => {
                    if p.hard_impact || p.is_expired(now_ms) || snapshot.sleeping {
                        p.transitioned = true;
                        p.state = ProjectileState::Exploding;
                        report.explosions.push(snapshot.position);
                        log::debug!("[projectile] Explosive {} detonated", p.id);
                    }
                }
                ProjectileKind::Cluster => {
                    if p.is_expired(now_ms) {
                        p.transitioned = true;
                        p.state = ProjectileState::Splitting;
                        report.splits.push(p.id);
                        for _ in 0..config.submunition_count {
                            let direction = random_direction(&mut *rng);
                            pending.push(PendingSubmunition {
                                position: snapshot.position
                                    + direction * config.submunition.radius * 2.0,
                                velocity: snapshot.velocity
                                    + direction * config.submunition_spread_impulse
                                        / config.submunition.mass,
                            });
                        }
                        log::debug!(
                            "[projectile] Cluster {} split into {} submunitions",
                            p.id,
                            config.submunition_count
                        );
                    }
                }
                ProjectileKind::Standard | ProjectileKind::Heavy => {}
            }
            p.hard_impact = false;
        }
        pending
    }

    fn sweep(
        &mut self,
        now_ms: f64,
        physics: &mut PhysicsWorld,
        scene: &mut VisualScene,
        report: &mut LifecycleReport,
    ) {
        let mut keep = Vec::with_capacity(self.projectiles.len());
        let mut doomed = Vec::new();

        for mut p in self.projectiles.drain(..) {
            let snapshot = physics.get_rigid_body(p.entity.body).map(BodySnapshot::of);
            match removal_state(&p, snapshot.as_ref(), now_ms, &self.config) {
                Some(state) => {
                    p.state = state;
                    doomed.push(p);
                }
                None => keep.push(p),
            }
        }
        self.projectiles = keep;

        for p in doomed {
            p.entity.release(physics, scene);
            report.removed.push((p.id, p.state));
        }
    }

    pub fn sync_visuals(&self, physics: &PhysicsWorld, scene: &mut VisualScene) {
        for p in &self.projectiles {
            p.entity.sync_visual(physics, scene);
        }
    }

    /// Remove every projectile
    pub fn clear(&mut self, physics: &mut PhysicsWorld, scene: &mut VisualScene) {
        for p in self.projectiles.drain(..) {
            p.entity.release(physics, scene);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn active_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
