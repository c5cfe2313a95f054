use crate::GameError;
use crate::animator::GoonAnimator;
use crate::config::GameConfig;
use platformer_common::{EntityId, GameEvent};
use platformer_ecs::ComponentStore;
use platformer_input::{Action, Buttons, Controls, Key};
use platformer_kernel::{SystemBus, World};
use platformer_physics::{BodyRole, PhysicsScene};

/// An entity whose transform follows a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub entity: EntityId,
    pub role: BodyRole,
}

/// The running game: physics, key state, bus and the entity bindings.
pub struct Game {
    config: GameConfig,
    physics: PhysicsScene,
    controls: Controls,
    bus: SystemBus,
    animator: GoonAnimator,
    bindings: Vec<Binding>,
}

impl Game {
    /// Build the physics scene and bind it to the world's named entities.
    ///
    /// `Goon`, `Ground`, `Car` and `Star` bind to the first entity with that
    /// name; `Crate` and `Platform` entities bind to boxes and platforms in
    /// spawn order. Entities that aren't there are simply not synchronized.
    pub fn setup(
        world: &World,
        components: &ComponentStore,
        config: GameConfig,
    ) -> Result<Self, GameError> {
        let physics = PhysicsScene::new(&config.layout, config.tuning.clone())?;

        let mut bindings = Vec::new();
        let mut bind = |entity: Option<EntityId>, role: BodyRole| {
            if let Some(entity) = entity.filter(|e| world.get(*e).is_some()) {
                bindings.push(Binding { entity, role });
            }
        };
        bind(components.first_by_name("Goon"), BodyRole::Character);
        for (i, e) in components.by_name("Crate").into_iter().enumerate() {
            if i < physics.box_count() {
                bind(Some(e), BodyRole::Box(i));
            }
        }
        for (i, e) in components.by_name("Platform").into_iter().enumerate() {
            if i < physics.platform_count() {
                bind(Some(e), BodyRole::Platform(i));
            }
        }
        bind(components.first_by_name("Ground"), BodyRole::Ground);
        bind(components.first_by_name("Car"), BodyRole::Chassis);
        bind(components.first_by_name("Star"), BodyRole::Star);

        tracing::info!(bindings = bindings.len(), "game ready");
        Ok(Self {
            config,
            physics,
            controls: Controls::new(),
            bus: SystemBus::new(),
            animator: GoonAnimator::new(),
            bindings,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsScene {
        &self.physics
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn buttons(&self) -> Buttons {
        self.controls.buttons()
    }

    pub fn animator(&self) -> &GoonAnimator {
        &self.animator
    }

    /// Events emitted since the last tick.
    pub fn pending_events(&self) -> &[GameEvent] {
        self.bus.pending()
    }

    pub fn key_down(&mut self, key: Key) {
        let physics = &self.physics;
        let actions = self.controls.key_down(key, || physics.can_jump());
        self.apply(actions);
    }

    pub fn key_up(&mut self, key: Key) {
        let actions = self.controls.key_up(key);
        self.apply(actions);
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Jump => self.physics.jump(),
                Action::Emit(event) => self.bus.emit(event),
            }
        }
    }

    /// Run one frame and return the events it produced, key events
    /// included.
    pub fn tick(&mut self, world: &mut World) -> Vec<GameEvent> {
        let t = world.time();

        self.physics.apply_pull(self.controls.pulling());
        self.physics.update_car_motor();
        self.physics.drive_platforms(t);
        self.physics.set_walk(self.controls.walk_direction());

        if self.physics.step().star_collected {
            self.bus.emit(GameEvent::GoonFire);
        }

        self.sync(world);

        let dt = self.config.tuning.timestep;
        world.advance(f64::from(dt));

        let events = self.bus.drain();
        self.animator.update(dt);
        for event in &events {
            self.animator.handle(*event);
        }
        events
    }

    /// Copy each bound body's pose into its entity, keeping entity scale.
    fn sync(&self, world: &mut World) {
        let scale = self.config.render_scale;
        for binding in &self.bindings {
            let Some(pose) = self.physics.pose(binding.role) else {
                continue;
            };
            let Some(current) = world.get(binding.entity).map(|e| e.transform) else {
                continue;
            };
            let next = current.with_planar(
                pose.position.x * scale,
                pose.position.y * scale,
                pose.angle,
            );
            world.set_transform(binding.entity, next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::{ROOT_BUNDLE, load_project};
    use glam::{Vec2, Vec3};
    use platformer_assets::{AssetStore, BundleLoader};
    use platformer_common::Transform;
    use platformer_physics::SceneLayout;
    use std::path::PathBuf;

    fn loaded() -> (World, ComponentStore) {
        let mut world = World::new();
        let mut components = ComponentStore::new();
        let mut assets = AssetStore::new();
        let res = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../res");
        load_project(
            &BundleLoader::new(res),
            ROOT_BUNDLE,
            &mut world,
            &mut components,
            &mut assets,
            &mut |_, _| {},
        )
        .unwrap();
        (world, components)
    }

    /// Character alone on open ground, far from the car and platforms.
    fn open_field() -> GameConfig {
        GameConfig {
            layout: SceneLayout {
                character: Vec2::new(8.0, 0.0),
                platforms: Vec::new(),
                boxes: Vec::new(),
                star: Vec2::new(14.0, -0.5),
                ..SceneLayout::default()
            },
            ..GameConfig::default()
        }
    }

    fn goon(world: &World, components: &ComponentStore) -> Transform {
        let id = components.first_by_name("Goon").unwrap();
        world.get(id).unwrap().transform
    }

    #[test]
    fn binds_named_entities() {
        let (world, components) = loaded();
        let game = Game::setup(&world, &components, GameConfig::default()).unwrap();
        // goon, 3 crates, 3 platforms, ground, car, star
        assert_eq!(game.bindings().len(), 10);
        assert_eq!(game.bindings()[0].role, BodyRole::Character);
        let crates = components.by_name("Crate");
        assert!(game.bindings().contains(&Binding {
            entity: crates[2],
            role: BodyRole::Box(2)
        }));
    }

    #[test]
    fn missing_entities_are_skipped() {
        let mut world = World::new();
        let components = ComponentStore::new();
        let mut game = Game::setup(&world, &components, GameConfig::default()).unwrap();
        assert!(game.bindings().is_empty());
        assert!(game.tick(&mut world).is_empty());
        assert_eq!(world.tick(), 1);
    }

    #[test]
    fn tick_syncs_bound_entities() {
        let (mut world, components) = loaded();
        world.take_updated();
        let mut game = Game::setup(&world, &components, GameConfig::default()).unwrap();
        let before = goon(&world, &components);

        game.tick(&mut world);

        assert_eq!(world.tick(), 1);
        assert!((world.time() - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(world.take_updated().len(), 10);

        let pose = game.physics().pose(BodyRole::Character).unwrap();
        let t = goon(&world, &components);
        assert_eq!(t.position, Vec3::new(pose.position.x, pose.position.y, 0.0));
        assert!(t.position.y < 3.0);
        assert_eq!(t.scale, before.scale);
    }

    #[test]
    fn render_scale_multiplies_positions() {
        let (mut world, components) = loaded();
        let config = GameConfig {
            render_scale: 2.0,
            ..GameConfig::default()
        };
        let mut game = Game::setup(&world, &components, config).unwrap();
        game.tick(&mut world);
        let pose = game.physics().pose(BodyRole::Star).unwrap();
        let id = components.first_by_name("Star").unwrap();
        let t = world.get(id).unwrap().transform;
        assert_eq!(t.position.x, pose.position.x * 2.0);
        assert_eq!(t.position.y, pose.position.y * 2.0);
    }

    #[test]
    fn keys_emit_run_events() {
        let (mut world, components) = loaded();
        let mut game = Game::setup(&world, &components, open_field()).unwrap();

        game.key_down(Key::Right);
        assert_eq!(game.pending_events(), &[GameEvent::GoonRunRight]);
        let events = game.tick(&mut world);
        assert_eq!(events, vec![GameEvent::GoonRunRight]);
        assert_eq!(game.animator().clip(), crate::GoonClip::RunRight);
        // Walk speed less one step of damping.
        let vx = game.physics().velocity(BodyRole::Character).unwrap().x;
        assert!(vx > 1.9 && vx <= 2.0, "vx = {vx}");

        game.key_down(Key::Right);
        game.key_up(Key::Right);
        let events = game.tick(&mut world);
        assert_eq!(events, vec![GameEvent::GoonIdle]);
        assert_eq!(game.physics().velocity(BodyRole::Character).unwrap().x, 0.0);
    }

    #[test]
    fn jump_needs_ground() {
        let (mut world, components) = loaded();
        let mut game = Game::setup(&world, &components, open_field()).unwrap();

        // Airborne at spawn: the press is swallowed.
        game.key_down(Key::Space);
        assert!(game.buttons().space);
        assert!(game.physics().velocity(BodyRole::Character).unwrap().y <= 0.0);
        game.key_up(Key::Space);

        for _ in 0..120 {
            game.tick(&mut world);
        }
        game.key_down(Key::Up);
        assert_eq!(game.physics().velocity(BodyRole::Character).unwrap().y, 6.0);
    }

    #[test]
    fn star_pickup_fires() {
        let (mut world, components) = loaded();
        let mut config = open_field();
        config.layout.star = Vec2::new(8.0, 2.0);
        let mut game = Game::setup(&world, &components, config).unwrap();

        let mut fired = false;
        for _ in 0..180 {
            if game.tick(&mut world).contains(&GameEvent::GoonFire) {
                fired = true;
                break;
            }
        }
        assert!(fired);
        assert_eq!(game.animator().stars(), 1);
        assert!(game.animator().firing());

        let id = components.first_by_name("Star").unwrap();
        assert_eq!(world.get(id).unwrap().transform.position.y, 6.0);
    }

    #[test]
    fn pull_follows_f_key() {
        let (mut world, components) = loaded();
        let mut game = Game::setup(&world, &components, open_field()).unwrap();
        game.key_down(Key::F);
        assert!(game.buttons().f);
        for _ in 0..10 {
            game.tick(&mut world);
        }
        assert!(game.physics().pose(BodyRole::Character).unwrap().position.x < 8.0);
        game.key_up(Key::F);
        assert!(!game.buttons().f);
    }
}
