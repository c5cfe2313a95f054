use platformer_common::GameEvent;

/// Frame-scoped event queue for semantic gameplay events.
///
/// Producers `emit` during a frame; the frame owner drains once at the end
/// and fans the events out to consumers.
#[derive(Debug, Default)]
pub struct SystemBus {
    queue: Vec<GameEvent>,
}

impl SystemBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for this frame.
    pub fn emit(&mut self, event: GameEvent) {
        tracing::debug!(channel = event.channel(), "bus emit");
        self.queue.push(event);
    }

    /// Events queued since the last drain, in emission order.
    pub fn pending(&self) -> &[GameEvent] {
        &self.queue
    }

    /// Take all queued events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order() {
        let mut bus = SystemBus::new();
        bus.emit(GameEvent::GoonRunLeft);
        bus.emit(GameEvent::GoonFire);
        bus.emit(GameEvent::GoonIdle);
        assert_eq!(bus.pending().len(), 3);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![GameEvent::GoonRunLeft, GameEvent::GoonFire, GameEvent::GoonIdle]
        );
        assert!(bus.pending().is_empty());
        assert!(bus.drain().is_empty());
    }
}
