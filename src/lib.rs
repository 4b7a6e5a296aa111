//! Portfolio Adventure - simulation core for the portfolio arcade minigame
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (movement, collisions, power-ups, session state)
//! - `catalog`: Level definitions (built-in and JSON-loaded)
//! - `settings`: Engine configuration
//! - `notify`: Fire-and-forget event sink for sound/toast presentation
//! - `clock`: Injectable time sources
//! - `autopilot`: Idle/demo input driver

pub mod autopilot;
pub mod catalog;
pub mod clock;
pub mod notify;
pub mod settings;
pub mod sim;

pub use catalog::{CatalogError, Level, LevelCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use notify::{Cue, LogNotifier, Notifier, RecordingNotifier};
pub use settings::{ConfigError, EngineConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation timestep (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per update to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const STARTING_LIVES: u8 = 3;

    /// Power-up durations (ms) and strength
    pub const SPEED_BOOST_MS: f64 = 5000.0;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
    pub const BUG_SHIELD_MS: f64 = 7000.0;

    /// Chasers hold position once this close to the player (arena units)
    pub const CHASE_STOP_DISTANCE: f32 = 5.0;

    /// Game clock resolution
    pub const CLOCK_STEP_MS: f64 = 1000.0;
}

/// AABB overlap test for two rectangles given by top-left corner and size.
///
/// Touching edges do not count as overlap.
#[inline]
pub fn rects_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Clamp a top-left position so a box of `size` stays inside the arena
#[inline]
pub fn clamp_to_arena(pos: Vec2, size: Vec2, arena: Vec2) -> Vec2 {
    let max = (arena - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}
