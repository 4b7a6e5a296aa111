//! Idle/demo mode - an AI that plays the game through key events
//!
//! Reads only the published snapshot and answers with key events, exactly
//! like a human player would. Randomness comes from a seeded PCG so demo
//! runs are reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::input::{Direction, KeyEvent};
use crate::sim::state::{GameObject, ObjectKind, PowerUpKind};
use crate::sim::tick::Snapshot;

/// Ticks without progress before trying to escape
const STUCK_TICKS: u32 = 12;
/// How long an escape burst lasts
const ESCAPE_TICKS: u32 = 24;
/// Dead zone so the player doesn't jitter around the target center
const AXIS_DEAD_ZONE: f32 = 2.0;
/// Bugs closer than this make power-ups more attractive
const DANGER_RADIUS: f32 = 90.0;

pub struct Autopilot {
    rng: Pcg32,
    held_x: Option<Direction>,
    held_y: Option<Direction>,
    last_pos: Option<Vec2>,
    stuck_ticks: u32,
    escape: Option<(Direction, u32)>,
}

fn center(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size * 0.5
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            held_x: None,
            held_y: None,
            last_pos: None,
            stuck_ticks: 0,
            escape: None,
        }
    }

    /// Pick the object to go after: nearest collectible, or the nearest
    /// power-up when a bug is close and the shield is down.
    pub fn choose_target<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a GameObject> {
        let player = center(snapshot.player.pos, snapshot.player.size);
        let dist = |o: &GameObject| (center(o.pos, o.size) - player).length();
        let nearest = move |filter: &dyn Fn(&GameObject) -> bool| {
            snapshot
                .objects
                .iter()
                .filter(|o| filter(*o))
                .min_by(|a, b| dist(*a).total_cmp(&dist(*b)))
        };

        let shielded = snapshot
            .session
            .active_effects
            .iter()
            .any(|e| e.kind == PowerUpKind::BugShield);
        let in_danger = !shielded
            && snapshot
                .objects
                .iter()
                .any(|o| o.kind == ObjectKind::Obstacle && dist(o) < DANGER_RADIUS);

        if in_danger {
            if let Some(power_up) = nearest(&|o: &GameObject| matches!(o.kind, ObjectKind::PowerUp(_))) {
                return Some(power_up);
            }
        }
        nearest(&|o: &GameObject| o.kind.is_collectible())
            .or_else(|| nearest(&|o: &GameObject| matches!(o.kind, ObjectKind::PowerUp(_))))
    }

    /// Key events for this tick
    pub fn drive(&mut self, snapshot: &Snapshot) -> Vec<KeyEvent> {
        if !snapshot.session.is_playing() || snapshot.session.paused {
            self.last_pos = None;
            self.stuck_ticks = 0;
            self.escape = None;
            return self.hold(None, None);
        }

        let pos = snapshot.player.pos;
        let (want_x, want_y) = self.desired(snapshot);
        let moving = want_x.is_some() || want_y.is_some();

        if moving && self.last_pos == Some(pos) {
            self.stuck_ticks += 1;
        } else {
            self.stuck_ticks = 0;
        }
        self.last_pos = Some(pos);

        if self.stuck_ticks >= STUCK_TICKS && self.escape.is_none() {
            let dir = match self.rng.random_range(0..4) {
                0 => Direction::Up,
                1 => Direction::Down,
                2 => Direction::Left,
                _ => Direction::Right,
            };
            log::debug!("Autopilot stuck at {:?}, escaping {:?}", pos, dir);
            self.escape = Some((dir, ESCAPE_TICKS));
            self.stuck_ticks = 0;
        }

        let (want_x, want_y) = match self.escape.as_mut() {
            Some((dir, ticks)) => {
                let dir = *dir;
                *ticks = ticks.saturating_sub(1);
                if *ticks == 0 {
                    self.escape = None;
                }
                match dir {
                    Direction::Left | Direction::Right => (Some(dir), None),
                    Direction::Up | Direction::Down => (None, Some(dir)),
                }
            }
            None => (want_x, want_y),
        };

        self.hold(want_x, want_y)
    }

    fn desired(&self, snapshot: &Snapshot) -> (Option<Direction>, Option<Direction>) {
        let Some(target) = self.choose_target(snapshot) else {
            return (None, None);
        };
        let delta = center(target.pos, target.size) - center(snapshot.player.pos, snapshot.player.size);
        let x = if delta.x > AXIS_DEAD_ZONE {
            Some(Direction::Right)
        } else if delta.x < -AXIS_DEAD_ZONE {
            Some(Direction::Left)
        } else {
            None
        };
        let y = if delta.y > AXIS_DEAD_ZONE {
            Some(Direction::Down)
        } else if delta.y < -AXIS_DEAD_ZONE {
            Some(Direction::Up)
        } else {
            None
        };
        (x, y)
    }

    /// Transition held keys to the wanted set. Releases come before presses
    /// because a key-up clears its whole axis.
    fn hold(&mut self, want_x: Option<Direction>, want_y: Option<Direction>) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for (held, want) in [(&mut self.held_x, want_x), (&mut self.held_y, want_y)] {
            if *held == want {
                continue;
            }
            if let Some(old) = held.take() {
                events.push(KeyEvent::Up(old));
            }
            if let Some(new) = want {
                events.push(KeyEvent::Down(new));
                *held = Some(new);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Level, LevelCatalog};
    use crate::settings::EngineConfig;
    use crate::sim::state::{GamePhase, SessionState, StaticObstacle};
    use crate::sim::tick::Engine;

    fn playing_snapshot(player_pos: Vec2, objects: Vec<GameObject>) -> Snapshot {
        let mut snapshot = Snapshot {
            objects,
            session: SessionState {
                phase: GamePhase::Playing,
                ..Default::default()
            },
            ..Default::default()
        };
        snapshot.player.pos = player_pos;
        snapshot
    }

    #[test]
    fn test_heads_for_nearest_collectible() {
        let objects = vec![
            GameObject::new(1, "far", ObjectKind::Skill, Vec2::new(700.0, 400.0), 50),
            GameObject::new(2, "near", ObjectKind::Skill, Vec2::new(300.0, 20.0), 50),
        ];
        let snapshot = playing_snapshot(Vec2::new(100.0, 100.0), objects);
        let mut pilot = Autopilot::new(1);
        assert_eq!(pilot.choose_target(&snapshot).map(|o| o.id), Some(2));
        assert_eq!(
            pilot.drive(&snapshot),
            vec![KeyEvent::Down(Direction::Right), KeyEvent::Down(Direction::Up)]
        );
        // Same wish next tick: nothing new to press
        assert!(pilot.drive(&snapshot).is_empty());
    }

    #[test]
    fn test_prefers_power_up_near_bugs() {
        let objects = vec![
            GameObject::new(1, "skill", ObjectKind::Skill, Vec2::new(200.0, 100.0), 50),
            GameObject::new(2, "bug", ObjectKind::Obstacle, Vec2::new(150.0, 100.0), -20),
            GameObject::new(
                3,
                "shield",
                ObjectKind::PowerUp(PowerUpKind::BugShield),
                Vec2::new(500.0, 400.0),
                10,
            ),
        ];
        let snapshot = playing_snapshot(Vec2::new(100.0, 100.0), objects);
        let pilot = Autopilot::new(1);
        assert_eq!(pilot.choose_target(&snapshot).map(|o| o.id), Some(3));
    }

    #[test]
    fn test_releases_keys_when_not_playing() {
        let objects = vec![GameObject::new(1, "s", ObjectKind::Skill, Vec2::new(300.0, 105.0), 50)];
        let mut snapshot = playing_snapshot(Vec2::new(100.0, 100.0), objects);
        let mut pilot = Autopilot::new(1);
        pilot.drive(&snapshot);

        snapshot.session.phase = GamePhase::LevelComplete;
        assert_eq!(pilot.drive(&snapshot), vec![KeyEvent::Up(Direction::Right)]);
    }

    #[test]
    fn test_direction_change_releases_first() {
        let mut pilot = Autopilot::new(1);
        pilot.hold(Some(Direction::Left), None);
        assert_eq!(
            pilot.hold(Some(Direction::Right), None),
            vec![KeyEvent::Up(Direction::Left), KeyEvent::Down(Direction::Right)]
        );
    }

    #[test]
    fn test_escapes_when_blocked() {
        let objects = vec![GameObject::new(1, "s", ObjectKind::Skill, Vec2::new(300.0, 100.0), 50)];
        let snapshot = playing_snapshot(Vec2::new(100.0, 100.0), objects);
        let mut pilot = Autopilot::new(7);
        for _ in 0..=STUCK_TICKS {
            pilot.drive(&snapshot);
        }
        assert!(pilot.escape.is_some());
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed: u64| {
            let level = Level {
                name: "Walls".to_string(),
                description: String::new(),
                time_limit_secs: 20,
                points_to_win: 100,
                base_speed: 5.0,
                background: String::new(),
                player_start: Vec2::new(20.0, 200.0),
                obstacles: vec![StaticObstacle::new(200.0, 150.0, 40.0, 200.0)],
                objects: vec![GameObject::new(1, "goal", ObjectKind::Skill, Vec2::new(400.0, 230.0), 100)],
            };
            let catalog = LevelCatalog::new(vec![level]).unwrap();
            let mut engine = Engine::new(EngineConfig::default(), catalog);
            let mut pilot = Autopilot::new(seed);
            engine.start_game();
            for _ in 0..600 {
                for event in pilot.drive(engine.snapshot()) {
                    engine.push_input(event);
                }
                engine.tick(crate::consts::TICK_MS);
            }
            engine.snapshot().clone()
        };
        assert_eq!(run(42), run(42));
    }
}
