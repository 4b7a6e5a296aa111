//! Tick-driven simulation module
//!
//! All gameplay logic lives here. This module must stay renderer-agnostic:
//! - Time enters only through `tick(dt_ms)` or an injected clock
//! - Object lists keep catalog order (collision order depends on it)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod movement;
pub mod powerup;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{player_hits, resolve_collisions};
pub use input::{Direction, InputController, KeyEvent};
pub use movement::MoveContext;
pub use powerup::{PowerUpManager, PowerUpTuning};
pub use schedule::{Scheduler, TimerId};
pub use state::{
    GameEvent, GameObject, GameOverReason, GamePhase, MovePattern, ObjectKind, Player,
    PowerUpEffect, PowerUpKind, SessionState, StaticObstacle,
};
pub use tick::{Engine, Snapshot, TimerEvent};
