//! Queue of frame-loop events, drained by the embedding layer

use crate::event::GameEvent;

/// One `BlockFallen` event, lifted out of the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fall {
    pub block_id: String,
    pub golden: bool,
}

/// Events pushed by the frame loop, in emission order.
///
/// Falls can be pulled out on their own so scoring does not have to walk
/// launch and explosion traffic.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain everything, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove and return only the pending falls. Other events stay queued in
    /// their original order.
    pub fn drain_falls(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();
        self.events.retain(|event| match event {
            GameEvent::BlockFallen { block_id, golden } => {
                falls.push(Fall {
                    block_id: block_id.clone(),
                    golden: *golden,
                });
                false
            }
            _ => true,
        });
        falls
    }

    pub fn pending_falls(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::BlockFallen { .. }))
            .count()
    }

    pub fn has_golden_fall(&self) -> bool {
        self.events.iter().any(GameEvent::is_golden_fall)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn fallen(id: &str, golden: bool) -> GameEvent {
        GameEvent::BlockFallen {
            block_id: id.into(),
            golden,
        }
    }

    #[test]
    fn drain_returns_events_in_order_and_empties() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(fallen("b1", false));
        bus.push(GameEvent::Exploded {
            position: Vec3::new(0.0, 1.0, 0.0),
        });
        assert_eq!(bus.len(), 2);

        let events = bus.drain();
        assert_eq!(events[0], fallen("b1", false));
        assert!(matches!(events[1], GameEvent::Exploded { .. }));
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn drain_falls_leaves_other_events_queued() {
        let mut bus = EventBus::new();
        bus.push(GameEvent::LevelLoaded {
            level_id: "l1".into(),
            blocks: 3,
        });
        bus.push(fallen("a", false));
        bus.push(GameEvent::Exploded { position: Vec3::ZERO });
        bus.push(fallen("gold", true));

        assert_eq!(bus.pending_falls(), 2);
        assert!(bus.has_golden_fall());

        let falls = bus.drain_falls();
        assert_eq!(
            falls,
            vec![
                Fall { block_id: "a".into(), golden: false },
                Fall { block_id: "gold".into(), golden: true },
            ]
        );
        assert_eq!(bus.pending_falls(), 0);
        assert!(!bus.has_golden_fall());

        let rest = bus.drain();
        assert_eq!(rest.len(), 2);
        assert!(matches!(rest[0], GameEvent::LevelLoaded { .. }));
        assert!(matches!(rest[1], GameEvent::Exploded { .. }));
    }

    #[test]
    fn plain_falls_are_not_golden() {
        let mut bus = EventBus::new();
        bus.push(fallen("a", false));
        bus.push(fallen("b", false));
        assert_eq!(bus.pending_falls(), 2);
        assert!(!bus.has_golden_fall());
    }

    #[test]
    fn event_json_shape() {
        let event = fallen("gold", true);
        assert!(event.is_golden_fall());
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"event":"block_fallen","block_id":"gold","golden":true}"#);
    }
}
