//! Physics world wrapping Rapier 3D

use rapier3d::prelude::*;
use std::num::NonZeroUsize;
use topple_core::PhysicsConfig;

/// Wraps Rapier's physics pipeline and body/collider sets for one level session.
///
/// The world always contains one fixed ground body whose half-space collider
/// is the plane y = 0.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,

    ground: RigidBodyHandle,
    fixed_timestep: Real,
    max_substeps: u32,
    max_frame_delta: Real,
    /// Wall-clock time not yet consumed by fixed steps
    accumulator: Real,

    /// Collision events from the last steps
    collision_recv: crossbeam::channel::Receiver<CollisionEvent>,
    contact_force_recv: crossbeam::channel::Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let (collision_send, collision_recv) = crossbeam::channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam::channel::unbounded();
        let event_handler = ChannelEventCollector::new(collision_send, contact_force_send);

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.fixed_timestep;
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        let mut rigid_body_set = RigidBodySet::new();
        let mut collider_set = ColliderSet::new();
        let ground = rigid_body_set.insert(RigidBodyBuilder::fixed().build());
        collider_set.insert_with_parent(
            ColliderBuilder::halfspace(Vector::y_axis())
                .friction(0.6)
                .build(),
            ground,
            &mut rigid_body_set,
        );

        Self {
            rigid_body_set,
            collider_set,
            gravity: vector![0.0, config.gravity, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ground,
            fixed_timestep: config.fixed_timestep,
            max_substeps: config.max_substeps.max(1),
            max_frame_delta: config.max_frame_delta,
            accumulator: 0.0,
            collision_recv,
            contact_force_recv,
            event_handler,
        }
    }

    /// Advance by one frame's wall-clock delta using fixed internal steps.
    ///
    /// The delta is clamped to `max_frame_delta` and at most `max_substeps`
    /// steps run; leftover time beyond that is dropped. Returns the number
    /// of fixed steps taken.
    pub fn advance(&mut self, frame_delta: Real) -> u32 {
        let dt = frame_delta.clamp(0.0, self.max_frame_delta);
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_substeps {
            self.step(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.fixed_timestep {
            self.accumulator %= self.fixed_timestep;
        }
        steps
    }

    /// Step the physics simulation by dt seconds
    pub fn step(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_handler,
        );
    }

    /// Drain collision events from the last steps
    pub fn drain_collision_events(&self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            events.push(event);
        }
        // Contact force events are not consumed; keep the channel from growing
        while self.contact_force_recv.try_recv().is_ok() {}
        events
    }

    /// Insert a body with its single collider
    pub fn insert_body(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.rigid_body_set.insert(body);
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        (body_handle, collider_handle)
    }

    /// Remove a rigid body and its attached colliders. Removing an already
    /// removed body is a no-op.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Number of bodies in the world, ground included
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn ground(&self) -> RigidBodyHandle {
        self.ground
    }

    /// World-space contact normal between two colliders, if they are touching
    pub fn contact_normal(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Vector<Real>> {
        self.narrow_phase
            .contact_pair(a, b)
            .and_then(|pair| pair.manifolds.iter().find(|m| !m.points.is_empty()))
            .map(|manifold| manifold.data.normal)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}
