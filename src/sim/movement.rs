//! Player and object movement
//!
//! Pure functions: each tick computes the next player and object list from
//! the previous tick's values and never mutates its inputs.

use glam::Vec2;

use super::state::{GameObject, MovePattern, Player, StaticObstacle};
use crate::{clamp_to_arena, rects_overlap};

/// Level geometry and timing shared by every movement step
#[derive(Debug, Clone, Copy)]
pub struct MoveContext<'a> {
    pub arena: Vec2,
    pub obstacles: &'a [StaticObstacle],
    /// Time since the level started, including this tick
    pub elapsed_ms: f64,
    /// Nominal tick length; player velocity is expressed per tick of this size
    pub tick_ms: f64,
    pub chase_stop_distance: f32,
}

/// Advance the player and every live object by one tick.
///
/// The player moves first; chasers steer toward the player's new position.
pub fn step(
    dt_ms: f64,
    velocity: Vec2,
    ctx: &MoveContext,
    player: &Player,
    objects: &[GameObject],
) -> (Player, Vec<GameObject>) {
    let dt_factor = (dt_ms / ctx.tick_ms) as f32;
    let new_player = Player {
        pos: move_player(player.pos, player.size, velocity, dt_factor, ctx),
        vel: velocity,
        ..*player
    };

    let elapsed_secs = (ctx.elapsed_ms / 1000.0) as f32;
    let new_objects = objects
        .iter()
        .map(|obj| {
            if obj.collected {
                return obj.clone();
            }
            GameObject {
                pos: move_object(obj, elapsed_secs, new_player.pos, ctx.chase_stop_distance),
                ..obj.clone()
            }
        })
        .collect();

    (new_player, new_objects)
}

/// Candidate position clamped to the arena, or the old position if the
/// candidate overlaps any static obstacle. No sliding along walls.
pub fn move_player(pos: Vec2, size: Vec2, velocity: Vec2, dt_factor: f32, ctx: &MoveContext) -> Vec2 {
    let candidate = clamp_to_arena(pos + velocity * dt_factor, size, ctx.arena);
    let blocked = ctx
        .obstacles
        .iter()
        .any(|o| rects_overlap(candidate, size, o.pos, o.size));
    if blocked { pos } else { candidate }
}

/// Next position of a single object according to its pattern
pub fn move_object(obj: &GameObject, elapsed_secs: f32, player_pos: Vec2, stop_distance: f32) -> Vec2 {
    let phase = elapsed_secs * obj.speed;
    match obj.pattern {
        MovePattern::None => obj.pos,
        MovePattern::Horizontal { range } => {
            Vec2::new(obj.anchor.x + phase.sin() * range, obj.pos.y)
        }
        MovePattern::Vertical { range } => {
            Vec2::new(obj.pos.x, obj.anchor.y + phase.sin() * range)
        }
        MovePattern::Circular { range } => Vec2::new(
            obj.anchor.x + phase.cos() * range,
            obj.anchor.y + phase.sin() * range,
        ),
        MovePattern::Chase => chase_step(obj.pos, player_pos, obj.speed, stop_distance),
    }
}

/// Unit step of `speed` toward `target`; holds position within `stop_distance`
pub fn chase_step(pos: Vec2, target: Vec2, speed: f32, stop_distance: f32) -> Vec2 {
    let delta = target - pos;
    let dist = delta.length();
    if dist > stop_distance {
        pos + delta / dist * speed
    } else {
        pos
    }
}
