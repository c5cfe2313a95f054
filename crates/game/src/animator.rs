use platformer_common::GameEvent;

const FIRE_FLASH_SECONDS: f32 = 0.4;

/// Locomotion clip the character is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoonClip {
    #[default]
    Idle,
    RunLeft,
    RunRight,
}

impl std::fmt::Display for GoonClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::RunLeft => "run left",
            Self::RunRight => "run right",
        })
    }
}

/// Character state machine fed by bus events.
#[derive(Debug, Clone)]
pub struct GoonAnimator {
    clip: GoonClip,
    facing: f32,
    fire_remaining: f32,
    stars: u32,
}

impl Default for GoonAnimator {
    fn default() -> Self {
        Self {
            clip: GoonClip::Idle,
            facing: 1.0,
            fire_remaining: 0.0,
            stars: 0,
        }
    }
}

impl GoonAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::GoonFire => {
                self.fire_remaining = FIRE_FLASH_SECONDS;
                self.stars += 1;
            }
            GameEvent::GoonRunRight => {
                self.clip = GoonClip::RunRight;
                self.facing = 1.0;
            }
            GameEvent::GoonRunLeft => {
                self.clip = GoonClip::RunLeft;
                self.facing = -1.0;
            }
            // Idle keeps the last facing.
            GameEvent::GoonIdle => self.clip = GoonClip::Idle,
        }
    }

    /// Count down the fire flash.
    pub fn update(&mut self, dt: f32) {
        self.fire_remaining = (self.fire_remaining - dt).max(0.0);
    }

    pub fn clip(&self) -> GoonClip {
        self.clip
    }

    /// 1 facing right, -1 facing left.
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn firing(&self) -> bool {
        self.fire_remaining > 0.0
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }
}
