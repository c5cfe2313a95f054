use crossbeam_channel::{Receiver, TryRecvError};
use glam::Vec2;
use platformer_assets::{AssetStore, BundleLoader, CanvasConfig};
use platformer_ecs::ComponentStore;
use platformer_game::{Game, GameConfig, LoadPhase, ROOT_BUNDLE, load_project};
use platformer_input::Key;
use platformer_kernel::World;
use platformer_physics::BodyRole;
use std::path::PathBuf;
use winit::keyboard::KeyCode;

/// Frames a slow machine may catch up in one redraw before time is dropped.
const MAX_CATCH_UP: u32 = 5;

/// Messages from the loader thread.
enum LoaderMsg {
    Progress { handled: usize, total: usize },
    Done(Box<LoadedScene>),
    Failed(String),
}

struct LoadedScene {
    world: World,
    components: ComponentStore,
    assets: AssetStore,
    canvas: CanvasConfig,
}

/// A loaded scene with its game running.
pub struct Running {
    pub world: World,
    pub components: ComponentStore,
    pub game: Game,
}

/// Everything between the capability check and the running game.
pub struct Session {
    phase: LoadPhase,
    config: GameConfig,
    loader: Option<Receiver<LoaderMsg>>,
    running: Option<Running>,
    /// Handed to the renderer once, right after the bundle loads.
    fresh_assets: Option<AssetStore>,
    canvas: CanvasConfig,
    accumulator: f64,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self {
            phase: LoadPhase::CheckingClient,
            config,
            loader: None,
            running: None,
            fresh_assets: None,
            canvas: CanvasConfig::default(),
            accumulator: 0.0,
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn running(&self) -> Option<&Running> {
        self.running.as_ref()
    }

    pub fn canvas(&self) -> CanvasConfig {
        self.canvas
    }

    /// End the session with a message for the overlay.
    pub fn fail(&mut self, message: String) {
        tracing::error!(%message, "session failed");
        self.phase = LoadPhase::Failed(message);
        self.loader = None;
    }

    /// Start loading the root bundle from `res` on a worker thread.
    pub fn start_loading(&mut self, res: PathBuf) {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.phase = LoadPhase::progress(0, 1);
        self.loader = Some(rx);

        std::thread::spawn(move || {
            let mut world = World::new();
            let mut components = ComponentStore::new();
            let mut assets = AssetStore::new();
            let result = load_project(
                &BundleLoader::new(res),
                ROOT_BUNDLE,
                &mut world,
                &mut components,
                &mut assets,
                &mut |handled, total| {
                    let _ = tx.send(LoaderMsg::Progress { handled, total });
                },
            );
            let msg = match result {
                Ok(loaded) => {
                    tracing::info!(
                        project = %loaded.project.id,
                        entities = loaded.entity_count,
                        "project loaded"
                    );
                    LoaderMsg::Done(Box::new(LoadedScene {
                        world,
                        components,
                        assets,
                        canvas: loaded.canvas,
                    }))
                }
                Err(e) => LoaderMsg::Failed(LoadPhase::failure_message(e)),
            };
            // The receiver is gone if the window closed mid-load.
            let _ = tx.send(msg);
        });
    }

    /// Apply at most one loader message. Called once per frame, so every
    /// progress step is drawn before the next one lands.
    pub fn poll_loader(&mut self) {
        let Some(rx) = self.loader.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(LoaderMsg::Progress { handled, total }) => {
                self.phase = LoadPhase::progress(handled, total);
            }
            Ok(LoaderMsg::Done(scene)) => {
                self.loader = None;
                self.prepare(*scene);
            }
            Ok(LoaderMsg::Failed(message)) => self.fail(message),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.fail(LoadPhase::failure_message("loader stopped"));
            }
        }
    }

    fn prepare(&mut self, scene: LoadedScene) {
        self.phase = LoadPhase::Preparing;
        let LoadedScene {
            world,
            components,
            assets,
            canvas,
        } = scene;
        match Game::setup(&world, &components, self.config.clone()) {
            Ok(game) => {
                self.canvas = canvas;
                self.fresh_assets = Some(assets);
                self.running = Some(Running {
                    world,
                    components,
                    game,
                });
                self.accumulator = 0.0;
                self.phase = LoadPhase::Running;
            }
            Err(e) => self.fail(LoadPhase::failure_message(e)),
        }
    }

    /// Assets of a freshly loaded scene, once.
    pub fn take_fresh_assets(&mut self) -> Option<AssetStore> {
        self.fresh_assets.take()
    }

    /// Tick the game at its fixed timestep for `dt` seconds of wall time.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, dt: f64) -> u32 {
        let Some(running) = self.running.as_mut() else {
            return 0;
        };
        let step = f64::from(running.game.config().tuning.timestep);
        self.accumulator = (self.accumulator + dt).min(step * f64::from(MAX_CATCH_UP));
        let mut ticks = 0;
        while self.accumulator >= step {
            for event in running.game.tick(&mut running.world) {
                tracing::debug!(channel = event.channel(), "game event");
            }
            self.accumulator -= step;
            ticks += 1;
        }
        ticks
    }

    pub fn key_down(&mut self, key: Key) {
        if let Some(running) = self.running.as_mut() {
            running.game.key_down(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Some(running) = self.running.as_mut() {
            running.game.key_up(key);
        }
    }

    /// Render-space position of the character, for the camera.
    pub fn focus(&self) -> Option<Vec2> {
        let running = self.running.as_ref()?;
        let binding = running
            .game
            .bindings()
            .iter()
            .find(|b| b.role == BodyRole::Character)?;
        let data = running.world.get(binding.entity)?;
        Some(data.transform.position.truncate())
    }
}

/// Map a physical key to the game's keys.
pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowUp => Key::Up,
        KeyCode::Space => Key::Space,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyF => Key::F,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn res_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../res")
    }

    fn wait_for_load(session: &mut Session) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while matches!(
            session.phase(),
            LoadPhase::LoadingBundle { .. } | LoadPhase::Preparing
        ) {
            assert!(Instant::now() < deadline, "loader timed out");
            session.poll_loader();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn maps_game_keys() {
        assert_eq!(map_key(KeyCode::ArrowUp), Key::Up);
        assert_eq!(map_key(KeyCode::Space), Key::Space);
        assert_eq!(map_key(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(map_key(KeyCode::ArrowRight), Key::Right);
        assert_eq!(map_key(KeyCode::KeyF), Key::F);
        assert_eq!(map_key(KeyCode::KeyQ), Key::Other);
    }

    #[test]
    fn loads_and_runs_shipped_bundle() {
        let mut session = Session::new(GameConfig::default());
        assert_eq!(session.phase(), &LoadPhase::CheckingClient);
        session.start_loading(res_dir());
        wait_for_load(&mut session);

        assert_eq!(session.phase(), &LoadPhase::Running);
        assert!(session.take_fresh_assets().is_some());
        assert!(session.take_fresh_assets().is_none());
        assert_eq!(session.canvas(), CanvasConfig::Resizable);

        let start = session.focus().unwrap();
        assert_eq!(session.advance(1.0 / 60.0 + 1e-6), 1);
        assert_eq!(session.running().unwrap().world.tick(), 1);
        assert!(session.focus().unwrap().y < start.y);
    }

    #[test]
    fn missing_bundle_fails_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new(GameConfig::default());
        session.start_loading(dir.path().to_path_buf());
        wait_for_load(&mut session);
        match session.phase() {
            LoadPhase::Failed(message) => {
                assert!(message.starts_with("Failed to load project:"))
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert!(session.running().is_none());
        assert_eq!(session.advance(1.0), 0);
    }

    #[test]
    fn progress_advances_one_step_per_poll() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut session = Session::new(GameConfig::default());
        session.phase = LoadPhase::progress(0, 4);
        session.loader = Some(rx);
        for handled in 1..=4 {
            tx.send(LoaderMsg::Progress { handled, total: 4 }).unwrap();
        }

        let mut percents = Vec::new();
        for _ in 0..4 {
            session.poll_loader();
            percents.push(session.phase().percent().unwrap());
        }
        assert_eq!(percents, vec![25, 50, 75, 100]);

        drop(tx);
        session.poll_loader();
        assert!(session.phase().is_failed());
    }

    #[test]
    fn catch_up_is_bounded() {
        let mut session = Session::new(GameConfig::default());
        session.start_loading(res_dir());
        wait_for_load(&mut session);
        assert_eq!(session.advance(10.0), MAX_CATCH_UP);
    }
}
