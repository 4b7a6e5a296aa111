//! Keyboard direction state to player velocity
//!
//! Level-triggered: key-down sets an axis, key-up of the same direction
//! zeroes that axis regardless of the opposite key.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a key name (arrow keys or WASD) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A discrete key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEvent {
    Down(Direction),
    Up(Direction),
}

/// Per-axis direction state (-1, 0, +1)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputController {
    axis: Vec2,
}

impl InputController {
    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(dir) => match dir {
                Direction::Up => self.axis.y = -1.0,
                Direction::Down => self.axis.y = 1.0,
                Direction::Left => self.axis.x = -1.0,
                Direction::Right => self.axis.x = 1.0,
            },
            KeyEvent::Up(dir) => match dir {
                Direction::Up | Direction::Down => self.axis.y = 0.0,
                Direction::Left | Direction::Right => self.axis.x = 0.0,
            },
        }
    }

    /// Velocity with each held axis at `±effective_speed`
    pub fn velocity(&self, effective_speed: f32) -> Vec2 {
        self.axis * effective_speed
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.axis = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_axis() {
        let mut input = InputController::default();
        input.apply(KeyEvent::Down(Direction::Right));
        input.apply(KeyEvent::Down(Direction::Up));
        assert_eq!(input.velocity(5.0), Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_key_up_zeroes_only_its_axis() {
        let mut input = InputController::default();
        input.apply(KeyEvent::Down(Direction::Left));
        input.apply(KeyEvent::Down(Direction::Down));
        input.apply(KeyEvent::Up(Direction::Left));
        assert_eq!(input.velocity(4.0), Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_release_zeroes_not_reverses() {
        let mut input = InputController::default();
        input.apply(KeyEvent::Down(Direction::Left));
        input.apply(KeyEvent::Up(Direction::Left));
        assert_eq!(input.velocity(4.0), Vec2::ZERO);
    }

    #[test]
    fn test_velocity_tracks_speed_changes() {
        let mut input = InputController::default();
        input.apply(KeyEvent::Down(Direction::Right));
        assert_eq!(input.velocity(5.0).x, 5.0);
        assert_eq!(input.velocity(7.5).x, 7.5);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("w"), Some(Direction::Up));
        assert_eq!(Direction::from_key("Escape"), None);
    }
}
