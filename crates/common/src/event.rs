use serde::{Deserialize, Serialize};

/// Semantic gameplay events broadcast on the system bus.
///
/// Consumers (the Goon animator, HUDs, logs) key off these rather than raw
/// input or physics state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// The character touched the star.
    GoonFire,
    GoonRunRight,
    GoonRunLeft,
    GoonIdle,
}

impl GameEvent {
    /// Channel name the event is published under.
    pub fn channel(self) -> &'static str {
        match self {
            Self::GoonFire => "goonFire",
            Self::GoonRunRight => "goonRunRight",
            Self::GoonRunLeft => "goonRunLeft",
            Self::GoonIdle => "goonIdle",
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names() {
        assert_eq!(GameEvent::GoonFire.channel(), "goonFire");
        assert_eq!(GameEvent::GoonRunRight.channel(), "goonRunRight");
        assert_eq!(GameEvent::GoonRunLeft.channel(), "goonRunLeft");
        assert_eq!(GameEvent::GoonIdle.to_string(), "goonIdle");
    }
}
