use platformer_assets::{AssetError, AssetStore, BundleLoader, LoadedProject, load_percent};
use platformer_ecs::ComponentStore;
use platformer_kernel::World;

/// Bundle loaded at startup from the resource directory.
pub const ROOT_BUNDLE: &str = "root.bundle";

/// Where the session is between launch and the first frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    CheckingClient,
    LoadingBundle { percent: u32 },
    /// Bundle parsed; entities and GPU resources are being prepared.
    Preparing,
    Running,
    /// Terminal. Carries the message shown to the user.
    Failed(String),
}

impl LoadPhase {
    pub fn progress(handled: usize, total: usize) -> Self {
        Self::LoadingBundle {
            percent: load_percent(handled, total),
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self::Failed(Self::failure_message(error))
    }

    /// Text shown to the user when loading fails.
    pub fn failure_message(error: impl std::fmt::Display) -> String {
        format!("Failed to load project: {error}")
    }

    /// The loading overlay covers the canvas until the game runs.
    pub fn overlay_visible(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Progress bar fill in percent, when the bar is shown.
    pub fn percent(&self) -> Option<u32> {
        match self {
            Self::LoadingBundle { percent } => Some(*percent),
            Self::Preparing | Self::Running => Some(100),
            Self::CheckingClient | Self::Failed(_) => None,
        }
    }
}

/// Load `bundle_name`, find its project and spawn the main scene.
///
/// `progress` sees `(spawned, total)` as the scene's entities are created.
pub fn load_project(
    loader: &BundleLoader,
    bundle_name: &str,
    world: &mut World,
    components: &mut ComponentStore,
    assets: &mut AssetStore,
    progress: &mut dyn FnMut(usize, usize),
) -> Result<LoadedProject, AssetError> {
    let bundle = loader.load_bundle(bundle_name)?;
    let project = bundle.find_project()?;
    let project_ref = project.id.clone();
    loader.instantiate(&bundle, &project_ref, world, components, assets, progress)
}
