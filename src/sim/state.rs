//! Game state and core simulation types
//!
//! Everything the engine owns for one session lives here. External code only
//! ever sees these through a [`Snapshot`](super::Snapshot).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Timed power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Multiplies player speed
    SpeedBoost,
    /// Makes obstacles harmless (and passable)
    BugShield,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost",
            PowerUpKind::BugShield => "Bug Shield",
        }
    }
}

/// What an object does when the player touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Skill,
    Project,
    Achievement,
    /// Costs a life (and points) unless shielded
    Obstacle,
    PowerUp(PowerUpKind),
}

impl ObjectKind {
    /// Collecting this kind counts toward the level's win threshold
    pub fn is_collectible(&self) -> bool {
        matches!(
            self,
            ObjectKind::Skill | ObjectKind::Project | ObjectKind::Achievement
        )
    }
}

/// How an object moves each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovePattern {
    #[default]
    None,
    /// Sine oscillation along x around the anchor
    Horizontal { range: f32 },
    /// Sine oscillation along y around the anchor
    Vertical { range: f32 },
    /// Orbit around the anchor
    Circular { range: f32 },
    /// Steer toward the player at a constant step per tick
    Chase,
}

/// A collectible, obstacle, or power-up instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    /// Unique within a level
    pub id: u32,
    #[serde(default)]
    pub label: String,
    pub kind: ObjectKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Score delta on collection (negative for obstacles)
    pub points: i32,
    #[serde(default)]
    pub pattern: MovePattern,
    #[serde(default)]
    pub speed: f32,
    /// Oscillation anchor, set from `pos` when the level starts
    #[serde(default)]
    pub anchor: Vec2,
    /// Inert once set: no movement, no collisions, not rendered
    #[serde(default)]
    pub collected: bool,
}

impl GameObject {
    pub fn new(id: u32, label: impl Into<String>, kind: ObjectKind, pos: Vec2, points: i32) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            pos,
            size: Vec2::splat(30.0),
            points,
            pattern: MovePattern::None,
            speed: 0.0,
            anchor: pos,
            collected: false,
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_pattern(mut self, pattern: MovePattern, speed: f32) -> Self {
        self.pattern = pattern;
        self.speed = speed;
        self
    }

    /// Fresh copy of a level template for a new session
    pub fn instantiate(&self) -> Self {
        Self {
            anchor: self.pos,
            collected: false,
            ..self.clone()
        }
    }

    pub fn is_live(&self) -> bool {
        !self.collected
    }
}

/// Immovable wall; blocks the player, never collected
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticObstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

impl StaticObstacle {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Derived from held directions, magnitude per axis = effective speed
    pub vel: Vec2,
    /// Base level speed times the active speed multiplier
    pub effective_speed: f32,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            effective_speed: speed,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE), 0.0)
    }
}

/// An active timed effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpEffect {
    pub kind: PowerUpKind,
    pub remaining_ms: f64,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    OutOfLives,
    TimeUp,
    AllLevelsComplete,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::OutOfLives => "out of lives",
            GameOverReason::TimeUp => "time's up",
            GameOverReason::AllLevelsComplete => "all levels complete",
        }
    }
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for `start_game`
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Win threshold reached, waiting for `advance_level`
    LevelComplete,
    /// Run ended; only `reset_game` leaves this phase
    GameOver(GameOverReason),
}

/// Score, lives, clock and level progress for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Current level index (0-based)
    pub level_index: usize,
    /// Score for the current level
    pub score: i32,
    /// Sum of completed level scores
    pub total_score: i32,
    pub lives: u8,
    pub time_remaining_secs: u32,
    pub phase: GamePhase,
    /// Simulation suspended while set (only meaningful when playing)
    pub paused: bool,
    pub active_effects: Vec<PowerUpEffect>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            level_index: 0,
            score: 0,
            total_score: 0,
            lives: STARTING_LIVES,
            time_remaining_secs: 0,
            phase: GamePhase::NotStarted,
            paused: false,
            active_effects: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

/// Events emitted to the notifier (sound/toast layer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    LevelStarted { level: usize, name: String },
    ObjectCollected { id: u32, label: String, points: i32 },
    ObstacleHit { id: u32, points: i32, lives_left: u8 },
    PowerUpActivated { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    LevelComplete { level: usize, score: i32, total_score: i32 },
    GameOver { reason: GameOverReason, total_score: i32 },
    GameReset,
    Paused,
    Resumed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_resets_template() {
        let mut template = GameObject::new(1, "Rust", ObjectKind::Skill, Vec2::new(10.0, 20.0), 50);
        template.collected = true;
        template.anchor = Vec2::ZERO;

        let fresh = template.instantiate();
        assert!(!fresh.collected);
        assert_eq!(fresh.anchor, Vec2::new(10.0, 20.0));
        assert_eq!(fresh.points, 50);
    }

    #[test]
    fn test_object_kind_json_shape() {
        let kind: ObjectKind = serde_json::from_str("\"skill\"").unwrap();
        assert_eq!(kind, ObjectKind::Skill);

        let kind: ObjectKind = serde_json::from_str(r#"{"power_up":"bug_shield"}"#).unwrap();
        assert_eq!(kind, ObjectKind::PowerUp(PowerUpKind::BugShield));

        let pattern: MovePattern =
            serde_json::from_str(r#"{"type":"circular","range":40.0}"#).unwrap();
        assert_eq!(pattern, MovePattern::Circular { range: 40.0 });
    }

    #[test]
    fn test_collectible_kinds() {
        assert!(ObjectKind::Achievement.is_collectible());
        assert!(!ObjectKind::Obstacle.is_collectible());
        assert!(!ObjectKind::PowerUp(PowerUpKind::SpeedBoost).is_collectible());
    }

    #[test]
    fn test_reason_strings() {
        assert_eq!(GameOverReason::TimeUp.as_str(), "time's up");
        assert_eq!(GameOverReason::OutOfLives.as_str(), "out of lives");
        assert_eq!(GameOverReason::AllLevelsComplete.as_str(), "all levels complete");
    }
}
