use std::collections::BTreeMap;

use qiyaas_types::{GameMessage, KeyStatus, LetterKind, RoundId, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLossReason {
    NoStartingLetterMatch,
    WrongGuess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted {
        round_id: RoundId,
        date: String,
        starting_letters: String,
    },
    AdditionalLetterAdded {
        round_id: RoundId,
        kind: LetterKind,
        letter: char,
        positions_filled: usize,
    },
    LifeLost {
        round_id: RoundId,
        reason: LifeLossReason,
        lives_remaining: u8,
    },
    MessageShown {
        round_id: RoundId,
        message: GameMessage,
    },
    LetterEntered {
        round_id: RoundId,
        clue: usize,
        position: usize,
        letter: char,
    },
    WordSubmitted {
        round_id: RoundId,
        clue: usize,
        outcome: SubmitOutcome,
    },
    ClueSolved {
        round_id: RoundId,
        clue: usize,
        auto_completed: bool,
    },
    KeyboardUpdated {
        round_id: RoundId,
        statuses: BTreeMap<char, KeyStatus>,
    },
    HintToggled {
        round_id: RoundId,
        clue: usize,
        visible: bool,
    },
    RoundWon {
        round_id: RoundId,
        lives_remaining: u8,
    },
    RoundLost {
        round_id: RoundId,
    },
    AnswersRevealed {
        round_id: RoundId,
        clues: Vec<usize>,
    },
    RoundTornDown {
        round_id: RoundId,
        cancelled_tasks: usize,
    },
}

impl GameEvent {
    pub fn round_id(&self) -> RoundId {
        match self {
            GameEvent::RoundStarted { round_id, .. }
            | GameEvent::AdditionalLetterAdded { round_id, .. }
            | GameEvent::LifeLost { round_id, .. }
            | GameEvent::MessageShown { round_id, .. }
            | GameEvent::LetterEntered { round_id, .. }
            | GameEvent::WordSubmitted { round_id, .. }
            | GameEvent::ClueSolved { round_id, .. }
            | GameEvent::KeyboardUpdated { round_id, .. }
            | GameEvent::HintToggled { round_id, .. }
            | GameEvent::RoundWon { round_id, .. }
            | GameEvent::RoundLost { round_id }
            | GameEvent::AnswersRevealed { round_id, .. }
            | GameEvent::RoundTornDown { round_id, .. } => *round_id,
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    struct TestHandler {
        events: Arc<Mutex<Vec<GameEvent>>>,
    }

    impl GameEventHandler for TestHandler {
        fn handle_event(&mut self, event: GameEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_event_bus_fans_out() {
        let mut bus = GameEventBus::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        bus.add_handler(Box::new(TestHandler {
            events: first.clone(),
        }));
        bus.add_handler(Box::new(TestHandler {
            events: second.clone(),
        }));
        assert_eq!(bus.handler_count(), 2);

        let round_id = Uuid::new_v4();
        bus.publish(GameEvent::RoundLost { round_id });

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap()[0].round_id(), round_id);
    }
}
