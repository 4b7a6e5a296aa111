//! Fire-and-forget event sink
//!
//! The engine reports game events here and never waits on the result. A
//! presentation layer turns them into sound effects and toasts via
//! [`GameEvent::cues`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::state::{GameEvent, PowerUpKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    LevelStart,
    /// Skill/project/achievement picked up
    Collect,
    /// Bug hit
    Damage,
    PowerUp,
    PowerDown,
    LevelComplete,
    GameOver,
    /// UI click (pause, reset)
    Click,
}

/// One presentation action for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Sound(SoundEffect),
    Toast(String),
}

impl GameEvent {
    /// Sound and toast cues for this event
    pub fn cues(&self) -> Vec<Cue> {
        match self {
            GameEvent::LevelStarted { level, name } => vec![
                Cue::Sound(SoundEffect::LevelStart),
                Cue::Toast(format!("Level {}: {}", level + 1, name)),
            ],
            GameEvent::ObjectCollected { label, points, .. } => vec![
                Cue::Sound(SoundEffect::Collect),
                Cue::Toast(format!("{label} +{points}")),
            ],
            GameEvent::ObstacleHit {
                points, lives_left, ..
            } => vec![
                Cue::Sound(SoundEffect::Damage),
                Cue::Toast(format!("Bug! {points} ({lives_left} lives left)")),
            ],
            GameEvent::PowerUpActivated { kind } => vec![
                Cue::Sound(SoundEffect::PowerUp),
                Cue::Toast(format!("{} activated", kind.as_str())),
            ],
            GameEvent::PowerUpExpired { kind } => {
                let mut cues = vec![Cue::Sound(SoundEffect::PowerDown)];
                if *kind == PowerUpKind::BugShield {
                    cues.push(Cue::Toast("Shield down".to_string()));
                }
                cues
            }
            GameEvent::LevelComplete { score, .. } => vec![
                Cue::Sound(SoundEffect::LevelComplete),
                Cue::Toast(format!("Level complete! {score} points")),
            ],
            GameEvent::GameOver {
                reason,
                total_score,
            } => vec![
                Cue::Sound(SoundEffect::GameOver),
                Cue::Toast(format!("Game over: {}. Final score {}", reason.as_str(), total_score)),
            ],
            GameEvent::GameReset => vec![Cue::Sound(SoundEffect::Click)],
            GameEvent::Paused | GameEvent::Resumed => vec![Cue::Sound(SoundEffect::Click)],
        }
    }
}

/// Receives game events; must not block
pub trait Notifier {
    fn notify(&mut self, event: &GameEvent);
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _event: &GameEvent) {}
}

/// Writes each event's toast text to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, event: &GameEvent) {
        for cue in event.cues() {
            if let Cue::Toast(text) = cue {
                log::info!("{}", text);
            }
        }
    }
}

/// Keeps every event; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
