mod script;

use anyhow::Context;
use clap::{Parser, Subcommand};
use platformer_assets::{AssetStore, BundleLoader};
use platformer_ecs::ComponentStore;
use platformer_game::{
    ClientKind, ClientProfile, Game, GameConfig, LoadPhase, ROOT_BUNDLE, check_client,
    load_project,
};
use platformer_kernel::World;
use platformer_render::{DebugTextRenderer, RenderView, Renderer};
use platformer_tools::WorldInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "platformer-cli", about = "Headless runner for the platformer demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Gameplay tuning YAML; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective gameplay tuning
    Info,
    /// Run the client capability check
    Check {
        /// Client kind: firefox, chrome, opera, safari, cocoonjs, ie<N>, native
        #[arg(long, default_value = "native")]
        client: ClientKind,
        /// Pretend no graphics API is present
        #[arg(long)]
        no_graphics: bool,
        /// Pretend the graphics API is present but no context can be made
        #[arg(long)]
        graphics_disabled: bool,
    },
    /// Load the scene bundle and list its entities
    Inspect {
        /// Resource directory holding the bundle
        #[arg(long, default_value = "res")]
        res: PathBuf,
        #[arg(long, default_value = ROOT_BUNDLE)]
        bundle: String,
    },
    /// Load the scene and run the game headless
    Run {
        #[arg(long, default_value = "res")]
        res: PathBuf,
        #[arg(long, default_value = ROOT_BUNDLE)]
        bundle: String,
        /// Number of frames to tick
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Key script, e.g. "right@0,space@30,right^90"
        #[arg(short, long, default_value = "")]
        script: String,
        /// Print the world every N frames (0 prints only the last frame)
        #[arg(long, default_value = "0")]
        every: u64,
    },
}

struct Loaded {
    world: World,
    components: ComponentStore,
    assets: AssetStore,
}

fn load(res: PathBuf, bundle: &str) -> anyhow::Result<Loaded> {
    let mut world = World::new();
    let mut components = ComponentStore::new();
    let mut assets = AssetStore::new();
    let mut last_percent = None;
    let result = load_project(
        &BundleLoader::new(res),
        bundle,
        &mut world,
        &mut components,
        &mut assets,
        &mut |handled, total| {
            if let Some(percent) = LoadPhase::progress(handled, total).percent() {
                if last_percent != Some(percent) {
                    tracing::debug!(percent, "loading");
                    last_percent = Some(percent);
                }
            }
        },
    );
    let loaded =
        result.map_err(|e| anyhow::anyhow!(LoadPhase::failure_message(&e)))?;
    tracing::info!(
        project = %loaded.project.id,
        entities = loaded.entity_count,
        canvas = ?loaded.canvas,
        "project loaded"
    );
    Ok(Loaded {
        world,
        components,
        assets,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = GameConfig::load_or_default(cli.config.as_deref())
        .context("loading game config")?;

    match cli.command {
        Commands::Info => {
            println!("platformer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("bundle: {ROOT_BUNDLE}");
            print!("{}", config.to_yaml()?);
        }
        Commands::Check {
            client,
            no_graphics,
            graphics_disabled,
        } => {
            let profile = ClientProfile {
                kind: client,
                graphics_api: !no_graphics,
                context_available: !no_graphics && !graphics_disabled,
            };
            match check_client(&profile) {
                Ok(()) => println!("{client:?}: supported"),
                Err(e) => {
                    println!("{e}");
                    println!("redirect: {}", e.redirect_url());
                    anyhow::bail!("client check failed for {client:?}");
                }
            }
        }
        Commands::Inspect { res, bundle } => {
            let loaded = load(res, &bundle)?;
            println!(
                "{}  assets={}",
                WorldInspector::summary(&loaded.world, &loaded.components),
                loaded.assets.len()
            );
            for (id, _) in WorldInspector::list_named(&loaded.components) {
                if let Some(info) =
                    WorldInspector::inspect_entity(&loaded.world, &loaded.components, id)
                {
                    println!("  {info}");
                }
            }
        }
        Commands::Run {
            res,
            bundle,
            frames,
            script,
            every,
        } => {
            let script = script::parse_script(&script)?;
            let Loaded {
                mut world,
                components,
                ..
            } = load(res, &bundle)?;
            let mut game = Game::setup(&world, &components, config)?;
            let renderer = DebugTextRenderer::new();
            let view = RenderView::default();

            for frame in 0..frames {
                for key_event in script.get(&frame).into_iter().flatten() {
                    if key_event.down {
                        game.key_down(key_event.key);
                    } else {
                        game.key_up(key_event.key);
                    }
                }
                for event in game.tick(&mut world) {
                    println!("[{frame:>5}] {}", event.channel());
                }
                if every > 0 && frame % every == 0 {
                    print!("{}", renderer.render(&world, &components, &view));
                }
            }

            print!("{}", renderer.render(&world, &components, &view));
            println!(
                "stars={} clip={} motor={:.0}",
                game.animator().stars(),
                game.animator().clip(),
                game.physics().motor_speed()
            );
        }
    }

    Ok(())
}
