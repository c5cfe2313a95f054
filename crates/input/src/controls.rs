use crate::action::Action;
use platformer_common::GameEvent;

/// Keys the game reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Space,
    Left,
    Right,
    F,
    Other,
}

impl Key {
    /// Map a DOM-style key code.
    pub fn from_code(code: u32) -> Self {
        match code {
            38 => Self::Up,
            32 => Self::Space,
            37 => Self::Left,
            39 => Self::Right,
            70 => Self::F,
            _ => Self::Other,
        }
    }

    /// Parse a key name as used on the command line (`left`, `space`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "space" => Some(Self::Space),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "f" => Some(Self::F),
            _ => None,
        }
    }
}

/// Held state of the gameplay buttons. Up and Space share the jump button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub space: bool,
    pub left: bool,
    pub right: bool,
    pub f: bool,
}

/// Key state machine: turns key transitions into actions.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    buttons: Buttons,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    /// Handle a key press.
    ///
    /// `can_jump` is consulted only on the press that starts a jump, never on
    /// auto-repeat.
    pub fn key_down(&mut self, key: Key, can_jump: impl FnOnce() -> bool) -> Vec<Action> {
        let mut actions = Vec::new();
        match key {
            Key::Up | Key::Space => {
                if !self.buttons.space {
                    if can_jump() {
                        actions.push(Action::Jump);
                    }
                    self.buttons.space = true;
                }
            }
            Key::Right => {
                if !self.buttons.right {
                    self.buttons.right = true;
                    self.buttons.left = false;
                    actions.push(Action::Emit(GameEvent::GoonRunRight));
                }
            }
            Key::Left => {
                if !self.buttons.left {
                    self.buttons.left = true;
                    self.buttons.right = false;
                    actions.push(Action::Emit(GameEvent::GoonRunLeft));
                }
            }
            Key::F => self.buttons.f = true,
            Key::Other => {}
        }
        if !actions.is_empty() {
            tracing::trace!(?key, ?actions, "key down");
        }
        actions
    }

    /// Handle a key release. Always reports the resulting locomotion state.
    pub fn key_up(&mut self, key: Key) -> Vec<Action> {
        match key {
            Key::Up | Key::Space => self.buttons.space = false,
            Key::Right => self.buttons.right = false,
            Key::Left => self.buttons.left = false,
            Key::F => self.buttons.f = false,
            Key::Other => {}
        }

        let event = if !self.buttons.left && !self.buttons.right {
            GameEvent::GoonIdle
        } else if self.buttons.left {
            GameEvent::GoonRunLeft
        } else {
            GameEvent::GoonRunRight
        };
        vec![Action::Emit(event)]
    }

    /// Horizontal walk direction: 1 right, -1 left, 0 standing.
    pub fn walk_direction(&self) -> f32 {
        if self.buttons.right {
            1.0
        } else if self.buttons.left {
            -1.0
        } else {
            0.0
        }
    }

    /// Whether the pull-toward-origin force mode is held.
    pub fn pulling(&self) -> bool {
        self.buttons.f
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(actions: &[Action]) -> Vec<GameEvent> {
        actions.iter().filter_map(|a| a.event()).collect()
    }

    #[test]
    fn key_codes_map() {
        assert_eq!(Key::from_code(38), Key::Up);
        assert_eq!(Key::from_code(32), Key::Space);
        assert_eq!(Key::from_code(37), Key::Left);
        assert_eq!(Key::from_code(39), Key::Right);
        assert_eq!(Key::from_code(70), Key::F);
        assert_eq!(Key::from_code(13), Key::Other);
        assert_eq!(Key::from_name("Space"), Some(Key::Space));
        assert_eq!(Key::from_name("enter"), None);
    }

    #[test]
    fn jump_only_when_allowed() {
        let mut c = Controls::new();
        assert_eq!(c.key_down(Key::Space, || true), vec![Action::Jump]);
        assert!(c.buttons().space);

        let mut grounded = Controls::new();
        assert!(grounded.key_down(Key::Up, || false).is_empty());
        // The button is still considered held.
        assert!(grounded.buttons().space);
    }

    #[test]
    fn held_jump_does_not_repeat() {
        let mut c = Controls::new();
        c.key_down(Key::Space, || true);
        let mut asked = false;
        let again = c.key_down(Key::Space, || {
            asked = true;
            true
        });
        assert!(again.is_empty());
        assert!(!asked);

        c.key_up(Key::Space);
        assert_eq!(c.key_down(Key::Up, || true), vec![Action::Jump]);
    }

    #[test]
    fn run_events_on_first_press_only() {
        let mut c = Controls::new();
        assert_eq!(
            events(&c.key_down(Key::Right, || false)),
            vec![GameEvent::GoonRunRight]
        );
        assert!(c.key_down(Key::Right, || false).is_empty());
        assert_eq!(c.walk_direction(), 1.0);
    }

    #[test]
    fn latest_direction_wins() {
        let mut c = Controls::new();
        c.key_down(Key::Right, || false);
        assert_eq!(
            events(&c.key_down(Key::Left, || false)),
            vec![GameEvent::GoonRunLeft]
        );
        assert!(c.buttons().left);
        assert!(!c.buttons().right);
        assert_eq!(c.walk_direction(), -1.0);

        // Right was cleared by the left press, so pressing it again fires.
        assert_eq!(
            events(&c.key_down(Key::Right, || false)),
            vec![GameEvent::GoonRunRight]
        );
    }

    #[test]
    fn release_reports_locomotion() {
        let mut c = Controls::new();
        c.key_down(Key::Left, || false);
        assert_eq!(events(&c.key_up(Key::Left)), vec![GameEvent::GoonIdle]);

        c.key_down(Key::Left, || false);
        // Releasing an unrelated key still reports the held direction.
        assert_eq!(events(&c.key_up(Key::Space)), vec![GameEvent::GoonRunLeft]);
        assert_eq!(events(&c.key_up(Key::Other)), vec![GameEvent::GoonRunLeft]);
    }

    #[test]
    fn f_toggles_pull() {
        let mut c = Controls::new();
        assert!(c.key_down(Key::F, || false).is_empty());
        assert!(c.pulling());
        assert_eq!(events(&c.key_up(Key::F)), vec![GameEvent::GoonIdle]);
        assert!(!c.pulling());
    }
}
