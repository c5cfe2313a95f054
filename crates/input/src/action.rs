use platformer_common::GameEvent;

/// What a key transition asks the game to do.
///
/// The game consumes actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Launch the character upward. Only produced when a jump was allowed.
    Jump,
    /// Publish an event on the system bus.
    Emit(GameEvent),
}

impl Action {
    /// The bus event carried by this action, if any.
    pub fn event(self) -> Option<GameEvent> {
        match self {
            Self::Emit(e) => Some(e),
            Self::Jump => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_extraction() {
        assert_eq!(
            Action::Emit(GameEvent::GoonIdle).event(),
            Some(GameEvent::GoonIdle)
        );
        assert_eq!(Action::Jump.event(), None);
    }
}
