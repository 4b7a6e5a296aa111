//! Player/object collision detection and effect resolution
//!
//! Runs once per tick after movement. Objects are visited in list order and
//! every overlap is applied immediately; nothing is rolled back.

use super::powerup::PowerUpManager;
use super::state::{
    GameEvent, GameObject, GameOverReason, GamePhase, ObjectKind, Player, SessionState,
};
use crate::rects_overlap;

/// AABB test between the player and an object
#[inline]
pub fn player_hits(player: &Player, obj: &GameObject) -> bool {
    rects_overlap(player.pos, player.size, obj.pos, obj.size)
}

/// Apply the effect of every live object the player overlaps.
///
/// All overlaps are applied in list order. The phase is decided once after
/// the pass: running out of lives wins over reaching the score target, and
/// only a collectible picked up this tick can complete the level.
pub fn resolve_collisions(
    player: &Player,
    objects: &mut [GameObject],
    session: &mut SessionState,
    powerups: &mut PowerUpManager,
    points_to_win: i32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !session.is_playing() {
        return events;
    }

    let mut collected_item = false;
    for obj in objects.iter_mut() {
        if obj.collected || !player_hits(player, obj) {
            continue;
        }

        match obj.kind {
            ObjectKind::Obstacle => {
                // Shielded: obstacle is transparent and stays live
                if powerups.shield_active() {
                    continue;
                }
                obj.collected = true;
                session.score += obj.points;
                session.lives = session.lives.saturating_sub(1);
                events.push(GameEvent::ObstacleHit {
                    id: obj.id,
                    points: obj.points,
                    lives_left: session.lives,
                });
            }
            ObjectKind::PowerUp(kind) => {
                obj.collected = true;
                session.score += obj.points;
                powerups.activate(kind);
                events.push(GameEvent::ObjectCollected {
                    id: obj.id,
                    label: obj.label.clone(),
                    points: obj.points,
                });
                events.push(GameEvent::PowerUpActivated { kind });
            }
            ObjectKind::Skill | ObjectKind::Project | ObjectKind::Achievement => {
                obj.collected = true;
                session.score += obj.points;
                collected_item = true;
                events.push(GameEvent::ObjectCollected {
                    id: obj.id,
                    label: obj.label.clone(),
                    points: obj.points,
                });
            }
        }
    }

    if session.lives == 0 {
        session.phase = GamePhase::GameOver(GameOverReason::OutOfLives);
        events.push(GameEvent::GameOver {
            reason: GameOverReason::OutOfLives,
            total_score: session.total_score + session.score,
        });
    } else if collected_item && session.score >= points_to_win {
        session.phase = GamePhase::LevelComplete;
        events.push(GameEvent::LevelComplete {
            level: session.level_index,
            score: session.score,
            total_score: session.total_score + session.score,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing() -> SessionState {
        SessionState {
            phase: GamePhase::Playing,
            time_remaining_secs: 60,
            ..Default::default()
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), Vec2::splat(40.0), 5.0)
    }

    fn obj(id: u32, kind: ObjectKind, points: i32) -> GameObject {
        GameObject::new(id, format!("obj{id}"), kind, Vec2::new(10.0, 10.0), points)
    }

    #[test]
    fn test_scenario_collect_to_win() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();

        let mut objects = vec![
            obj(1, ObjectKind::Skill, 50),
            obj(2, ObjectKind::Skill, 75),
            obj(3, ObjectKind::Project, 100),
        ];
        resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 250);
        assert_eq!(session.score, 225);
        assert_eq!(session.phase, GamePhase::Playing);

        let mut more = vec![obj(4, ObjectKind::Skill, 50)];
        let events = resolve_collisions(&player, &mut more, &mut session, &mut powerups, 250);
        assert_eq!(session.score, 275);
        assert_eq!(session.phase, GamePhase::LevelComplete);
        assert!(matches!(events.last(), Some(GameEvent::LevelComplete { score: 275, .. })));
    }

    #[test]
    fn test_collected_object_is_inert() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::Skill, 50), obj(2, ObjectKind::Obstacle, -20)];

        resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 1000);
        let (score, lives) = (session.score, session.lives);
        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 1000);

        assert!(events.is_empty());
        assert_eq!(session.score, score);
        assert_eq!(session.lives, lives);
    }

    #[test]
    fn test_obstacle_costs_life_and_points() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(7, ObjectKind::Obstacle, -20)];

        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 100);
        assert_eq!(session.score, -20);
        assert_eq!(session.lives, 2);
        assert!(objects[0].collected);
        assert_eq!(
            events,
            vec![GameEvent::ObstacleHit {
                id: 7,
                points: -20,
                lives_left: 2
            }]
        );
    }

    #[test]
    fn test_last_life_ends_game() {
        let player = player_at(0.0, 0.0);
        let mut session = SessionState {
            lives: 1,
            ..playing()
        };
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::Obstacle, -20), obj(2, ObjectKind::Skill, 500)];

        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 100);
        // Both overlaps apply; losing the last life wins over the score target
        assert!(objects.iter().all(|o| o.collected));
        assert_eq!(session.score, 480);
        assert_eq!(session.lives, 0);
        assert_eq!(session.phase, GamePhase::GameOver(GameOverReason::OutOfLives));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                reason: GameOverReason::OutOfLives,
                total_score: 480
            })
        );
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelComplete { .. })));
    }

    #[test]
    fn test_every_overlap_counts_after_reaching_target() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::Skill, 100), obj(2, ObjectKind::Skill, 50)];

        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 100);
        assert_eq!(session.score, 150);
        assert!(objects.iter().all(|o| o.collected));
        assert_eq!(session.phase, GamePhase::LevelComplete);
        assert_eq!(
            events,
            vec![
                GameEvent::ObjectCollected {
                    id: 1,
                    label: "obj1".to_string(),
                    points: 100
                },
                GameEvent::ObjectCollected {
                    id: 2,
                    label: "obj2".to_string(),
                    points: 50
                },
                GameEvent::LevelComplete {
                    level: 0,
                    score: 150,
                    total_score: 150
                },
            ]
        );
    }

    #[test]
    fn test_level_completes_only_once_per_tick() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![
            obj(1, ObjectKind::Skill, 60),
            obj(2, ObjectKind::Project, 60),
            obj(3, ObjectKind::Achievement, 60),
        ];

        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 50);
        let completions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(session.score, 180);
    }

    #[test]
    fn test_shield_makes_obstacles_transparent() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        powerups.activate(PowerUpKind::BugShield);
        let mut objects = vec![obj(1, ObjectKind::Obstacle, -20)];

        for _ in 0..5 {
            let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 100);
            assert!(events.is_empty());
        }
        assert_eq!(session.lives, 3);
        assert_eq!(session.score, 0);
        assert!(!objects[0].collected);

        // Shield gone: the same obstacle hits
        powerups.clear();
        resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 100);
        assert_eq!(session.lives, 2);
    }

    #[test]
    fn test_powerup_activates_effect() {
        let player = player_at(0.0, 0.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::PowerUp(PowerUpKind::SpeedBoost), 10)];

        let events = resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 5);
        assert!(powerups.is_active(PowerUpKind::SpeedBoost));
        assert_eq!(session.score, 10);
        // Power-ups never complete a level by themselves
        assert_eq!(session.phase, GamePhase::Playing);
        assert!(events.contains(&GameEvent::PowerUpActivated {
            kind: PowerUpKind::SpeedBoost
        }));
    }

    #[test]
    fn test_no_overlap_no_effect() {
        let player = player_at(200.0, 200.0);
        let mut session = playing();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::Skill, 50)];
        assert!(resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 10).is_empty());
        assert!(!objects[0].collected);
    }

    #[test]
    fn test_not_playing_is_noop() {
        let player = player_at(0.0, 0.0);
        let mut session = SessionState::default();
        let mut powerups = PowerUpManager::default();
        let mut objects = vec![obj(1, ObjectKind::Skill, 50)];
        assert!(resolve_collisions(&player, &mut objects, &mut session, &mut powerups, 10).is_empty());
        assert!(!objects[0].collected);
    }

    proptest! {
        #[test]
        fn prop_score_changes_by_exact_points(points in 1i32..500, start in -1000i32..1000) {
            let player = player_at(0.0, 0.0);
            let mut session = SessionState { score: start, ..playing() };
            let mut powerups = PowerUpManager::default();
            let mut objects = vec![obj(1, ObjectKind::Achievement, points)];
            resolve_collisions(&player, &mut objects, &mut session, &mut powerups, i32::MAX);
            prop_assert_eq!(session.score, start + points);
        }
    }
}
