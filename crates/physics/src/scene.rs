use crate::PhysicsError;
use crate::layout::{PhysicsTuning, SceneLayout};
use crate::material::{MaterialHooks, MaterialTable, SurfaceMaterial};
use crate::motion::{motor_speed_for, platform_velocity, pull_force};
use crossbeam_channel::Receiver;
use glam::Vec2;
use platformer_common::Pose2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapier2d::math::Isometry;
use rapier2d::prelude::*;

/// Linear and angular damping for bodies that don't override it.
const DEFAULT_DAMPING: Real = 0.1;
const CHARACTER_DAMPING: Real = 0.5;
/// Velocity gain of the back-wheel motor.
const MOTOR_FACTOR: Real = 100.0;
/// A contact whose normal is this close to +y counts as standing on something.
const GROUND_NORMAL_THRESHOLD: Real = 0.5;

const CHARACTER_HALF_EXTENTS: (Real, Real) = (0.25, 0.5);
const PLATFORM_HALF_EXTENTS: (Real, Real) = (0.5, 0.15);
const BOX_HALF_EXTENTS: (Real, Real) = (0.4, 0.4);
const STAR_HALF_EXTENTS: (Real, Real) = (0.25, 0.25);
const CHASSIS_HALF_EXTENTS: (Real, Real) = (0.5, 0.25);
const WHEEL_RADIUS: Real = 0.05;
/// Hinge points on the chassis, back then front.
const WHEEL_ANCHORS: [(Real, Real); 2] = [(-0.5, -0.3), (0.5, -0.3)];

/// What a body is for, used to address bodies without exposing handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Character,
    Ground,
    Platform(usize),
    Box(usize),
    Star,
    Chassis,
    Wheel(usize),
}

/// Outcome of one physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The character touched the star; it has already been respawned.
    pub star_collected: bool,
}

/// The whole simulated scene: rapier state plus the handles of every body
/// the game cares about.
pub struct PhysicsScene {
    tuning: PhysicsTuning,
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    hooks: MaterialHooks,
    events: ChannelEventCollector,
    collision_recv: Receiver<CollisionEvent>,
    contact_force_recv: Receiver<ContactForceEvent>,
    rng: StdRng,

    character: RigidBodyHandle,
    character_collider: ColliderHandle,
    ground: RigidBodyHandle,
    platforms: Vec<RigidBodyHandle>,
    boxes: Vec<RigidBodyHandle>,
    star: RigidBodyHandle,
    star_collider: ColliderHandle,
    chassis: RigidBodyHandle,
    wheels: Vec<RigidBodyHandle>,
    motor: ImpulseJointHandle,
    motor_speed: f32,
    stars_collected: u32,
}

fn dynamic_body(position: Vec2) -> RigidBodyBuilder {
    RigidBodyBuilder::dynamic()
        .translation(vector![position.x, position.y])
        .linear_damping(DEFAULT_DAMPING)
        .angular_damping(DEFAULT_DAMPING)
}

fn surface(builder: ColliderBuilder, material: SurfaceMaterial) -> Collider {
    builder
        .user_data(material.to_user_data())
        .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
        .build()
}

fn cuboid((hx, hy): (Real, Real)) -> ColliderBuilder {
    ColliderBuilder::cuboid(hx, hy)
}

/// Rapier measures the hinge as wheel spin relative to the chassis, where
/// positive is counter-clockwise; a clockwise wheel rolls the car toward +x.
fn motor_target(speed: f32) -> Real {
    -speed
}

impl PhysicsScene {
    pub fn new(layout: &SceneLayout, tuning: PhysicsTuning) -> Result<Self, PhysicsError> {
        Self::with_materials(layout, tuning, MaterialTable::default())
    }

    pub fn with_materials(
        layout: &SceneLayout,
        tuning: PhysicsTuning,
        materials: MaterialTable,
    ) -> Result<Self, PhysicsError> {
        if !(tuning.timestep.is_finite() && tuning.timestep > 0.0) {
            return Err(PhysicsError::InvalidTimestep(tuning.timestep));
        }
        if layout.wheels.len() != WHEEL_ANCHORS.len() {
            return Err(PhysicsError::WheelCount {
                expected: WHEEL_ANCHORS.len(),
                got: layout.wheels.len(),
            });
        }

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut impulse_joints = ImpulseJointSet::new();

        // Character: upright box that never tips over.
        let character = bodies.insert(
            dynamic_body(layout.character)
                .linear_damping(CHARACTER_DAMPING)
                .lock_rotations(),
        );
        let character_collider = colliders.insert_with_parent(
            surface(
                cuboid(CHARACTER_HALF_EXTENTS).mass(1.0),
                SurfaceMaterial::Character,
            ),
            character,
            &mut bodies,
        );

        let ground = bodies.insert(
            RigidBodyBuilder::fixed().translation(vector![layout.ground.x, layout.ground.y]),
        );
        colliders.insert_with_parent(
            surface(
                ColliderBuilder::halfspace(Vector::y_axis()),
                SurfaceMaterial::Ground,
            ),
            ground,
            &mut bodies,
        );

        let mut platforms = Vec::with_capacity(layout.platforms.len());
        for p in &layout.platforms {
            let handle = bodies.insert(
                RigidBodyBuilder::kinematic_velocity_based().translation(vector![p.x, p.y]),
            );
            colliders.insert_with_parent(
                surface(cuboid(PLATFORM_HALF_EXTENTS), SurfaceMaterial::Ground),
                handle,
                &mut bodies,
            );
            platforms.push(handle);
        }

        let mut boxes = Vec::with_capacity(layout.boxes.len());
        for b in &layout.boxes {
            let handle = bodies.insert(dynamic_body(*b));
            colliders.insert_with_parent(
                surface(cuboid(BOX_HALF_EXTENTS).mass(1.0), SurfaceMaterial::Box),
                handle,
                &mut bodies,
            );
            boxes.push(handle);
        }

        let star = bodies.insert(dynamic_body(layout.star));
        let star_collider = colliders.insert_with_parent(
            surface(
                cuboid(STAR_HALF_EXTENTS)
                    .mass(1.0)
                    .active_events(ActiveEvents::COLLISION_EVENTS),
                SurfaceMaterial::Star,
            ),
            star,
            &mut bodies,
        );

        let chassis = bodies.insert(dynamic_body(layout.chassis));
        colliders.insert_with_parent(
            surface(cuboid(CHASSIS_HALF_EXTENTS).mass(1.0), SurfaceMaterial::Default),
            chassis,
            &mut bodies,
        );

        let mut wheels = Vec::with_capacity(layout.wheels.len());
        for w in &layout.wheels {
            let handle = bodies.insert(dynamic_body(*w));
            colliders.insert_with_parent(
                surface(
                    ColliderBuilder::ball(WHEEL_RADIUS).mass(1.0),
                    SurfaceMaterial::Default,
                ),
                handle,
                &mut bodies,
            );
            wheels.push(handle);
        }

        // Hinge both wheels at their centers; only the back one is driven.
        let mut motor = None;
        for (i, (&wheel, (ax, ay))) in wheels.iter().zip(WHEEL_ANCHORS).enumerate() {
            let mut hinge = RevoluteJointBuilder::new()
                .local_anchor1(point![ax, ay])
                .local_anchor2(point![0.0, 0.0])
                .contacts_enabled(false);
            if i == 0 {
                hinge = hinge.motor_velocity(motor_target(tuning.motor_speed), MOTOR_FACTOR);
            }
            let handle = impulse_joints.insert(chassis, wheel, hinge, true);
            motor.get_or_insert(handle);
        }
        let motor = motor.ok_or(PhysicsError::WheelCount {
            expected: WHEEL_ANCHORS.len(),
            got: 0,
        })?;

        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam_channel::unbounded();

        let params = IntegrationParameters {
            dt: tuning.timestep,
            ..Default::default()
        };

        tracing::info!(
            bodies = bodies.len(),
            colliders = colliders.len(),
            platforms = platforms.len(),
            boxes = boxes.len(),
            "physics scene built"
        );

        Ok(Self {
            gravity: vector![tuning.gravity.x, tuning.gravity.y],
            motor_speed: tuning.motor_speed,
            rng: StdRng::seed_from_u64(tuning.seed),
            tuning,
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints,
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            hooks: MaterialHooks { table: materials },
            events: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            contact_force_recv,
            character,
            character_collider,
            ground,
            platforms,
            boxes,
            star,
            star_collider,
            chassis,
            wheels,
            motor,
            stars_collected: 0,
        })
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Current back-wheel motor speed (positive drives toward +x).
    pub fn motor_speed(&self) -> f32 {
        self.motor_speed
    }

    /// Stars picked up since the scene was built.
    pub fn stars_collected(&self) -> u32 {
        self.stars_collected
    }

    /// Every body role present in the scene.
    pub fn roles(&self) -> Vec<BodyRole> {
        let mut roles = vec![BodyRole::Character, BodyRole::Ground];
        roles.extend((0..self.platforms.len()).map(BodyRole::Platform));
        roles.extend((0..self.boxes.len()).map(BodyRole::Box));
        roles.push(BodyRole::Star);
        roles.push(BodyRole::Chassis);
        roles.extend((0..self.wheels.len()).map(BodyRole::Wheel));
        roles
    }

    fn handle(&self, role: BodyRole) -> Option<RigidBodyHandle> {
        match role {
            BodyRole::Character => Some(self.character),
            BodyRole::Ground => Some(self.ground),
            BodyRole::Platform(i) => self.platforms.get(i).copied(),
            BodyRole::Box(i) => self.boxes.get(i).copied(),
            BodyRole::Star => Some(self.star),
            BodyRole::Chassis => Some(self.chassis),
            BodyRole::Wheel(i) => self.wheels.get(i).copied(),
        }
    }

    /// Position and angle of a body.
    pub fn pose(&self, role: BodyRole) -> Option<Pose2> {
        let body = self.bodies.get(self.handle(role)?)?;
        let t = body.translation();
        Some(Pose2::new(t.x, t.y, body.rotation().angle()))
    }

    pub fn velocity(&self, role: BodyRole) -> Option<Vec2> {
        let body = self.bodies.get(self.handle(role)?)?;
        let v = body.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    /// Clear user forces on every body, then pull dynamic bodies toward the
    /// pull center when `active`.
    pub fn apply_pull(&mut self, active: bool) {
        let strength = self.tuning.pull_strength;
        let center_y = self.tuning.pull_center_y;
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            if active && body.is_dynamic() {
                let t = body.translation();
                let f = pull_force(Vec2::new(t.x, t.y), strength, center_y);
                body.add_force(vector![f.x, f.y], true);
            }
        }
    }

    /// Reverse the car when it drives past either turn-around bound.
    pub fn update_car_motor(&mut self) {
        let x = self.bodies[self.chassis].translation().x;
        let next = motor_speed_for(
            x,
            self.motor_speed,
            self.tuning.motor_speed,
            self.tuning.car_turn_x,
        );
        if next != self.motor_speed {
            tracing::debug!(x, speed = next, "car motor reversed");
            self.set_motor_speed(next);
        }
    }

    pub fn set_motor_speed(&mut self, speed: f32) {
        if let Some(joint) = self.impulse_joints.get_mut(self.motor) {
            joint
                .data
                .set_motor_velocity(JointAxis::AngX, motor_target(speed), MOTOR_FACTOR);
        }
        self.motor_speed = speed;
    }

    /// Set moving-platform velocities for time `t` seconds.
    pub fn drive_platforms(&mut self, t: f64) {
        for (i, handle) in self.platforms.iter().enumerate() {
            let v = platform_velocity(i, t);
            self.bodies[*handle].set_linvel(vector![v.x, v.y], true);
        }
    }

    /// Horizontal character velocity: `direction` is -1, 0 or 1.
    pub fn set_walk(&mut self, direction: f32) {
        let speed = direction * self.tuning.walk_speed;
        let body = &mut self.bodies[self.character];
        let vy = body.linvel().y;
        body.set_linvel(vector![speed, vy], true);
    }

    /// Launch the character upward, keeping its horizontal velocity.
    pub fn jump(&mut self) {
        let speed = self.tuning.jump_speed;
        let body = &mut self.bodies[self.character];
        let vx = body.linvel().x;
        body.set_linvel(vector![vx, speed], true);
    }

    /// Whether the character is standing on something.
    ///
    /// Looks for a touching contact whose normal, oriented from the other
    /// body toward the character, points mostly up.
    pub fn can_jump(&self) -> bool {
        let up = vector![0.0, 1.0];
        for pair in self.narrow_phase.contact_pairs_with(self.character_collider) {
            if !pair.has_any_active_contact {
                continue;
            }
            for manifold in &pair.manifolds {
                if manifold.points.is_empty() {
                    continue;
                }
                // The manifold normal points from collider1 toward collider2.
                let mut d = manifold.data.normal.dot(&up);
                if pair.collider1 == self.character_collider {
                    d = -d;
                }
                if d > GROUND_NORMAL_THRESHOLD {
                    return true;
                }
            }
        }
        false
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self) -> StepReport {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.hooks,
            &self.events,
        );

        let mut report = StepReport::default();
        while let Ok(event) = self.collision_recv.try_recv() {
            if let CollisionEvent::Started(a, b, _) = event {
                if self.is_star_pickup(a, b) {
                    report.star_collected = true;
                }
            }
        }
        while self.contact_force_recv.try_recv().is_ok() {}

        if report.star_collected {
            self.respawn_star();
        }
        report
    }

    fn is_star_pickup(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        (a == self.star_collider && b == self.character_collider)
            || (b == self.star_collider && a == self.character_collider)
    }

    /// Drop the star back in from above at a random x, at rest.
    fn respawn_star(&mut self) {
        let x = self.tuning.star_respawn_width * (self.rng.r#gen::<f32>() - 0.5);
        let y = self.tuning.star_respawn_height;
        let star = &mut self.bodies[self.star];
        star.set_position(Isometry::translation(x, y), true);
        star.set_linvel(vector![0.0, 0.0], true);
        star.set_angvel(0.0, true);
        self.stars_collected += 1;
        tracing::info!(x, y, total = self.stars_collected, "star collected");
    }
}
