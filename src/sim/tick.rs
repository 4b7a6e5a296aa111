//! Session engine and per-tick update
//!
//! The engine owns all session state. Each tick runs one mutation pass in a
//! fixed order: queued input, movement, collisions, effect decay, game clock.
//! Presentation code reads the resulting [`Snapshot`] and never mutates.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::input::{InputController, KeyEvent};
use super::movement::{self, MoveContext};
use super::powerup::PowerUpManager;
use super::schedule::Scheduler;
use super::state::{
    GameEvent, GameObject, GameOverReason, GamePhase, Player, SessionState, StaticObstacle,
};
use crate::catalog::LevelCatalog;
use crate::clamp_to_arena;
use crate::clock::{Clock, SystemClock};
use crate::consts::CLOCK_STEP_MS;
use crate::notify::{Notifier, NullNotifier};
use crate::settings::EngineConfig;

/// Timers driven by the engine's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second of the level countdown elapsed
    ClockSecond,
}

/// Immutable view of everything a renderer needs after a tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub level_name: String,
    pub arena: Vec2,
    pub player: Player,
    /// Uncollected objects only
    pub objects: Vec<GameObject>,
    pub obstacles: Vec<StaticObstacle>,
    pub session: SessionState,
}

pub struct Engine {
    config: EngineConfig,
    catalog: LevelCatalog,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,

    session: SessionState,
    player: Player,
    base_speed: f32,
    objects: Vec<GameObject>,
    obstacles: Vec<StaticObstacle>,
    points_to_win: i32,

    input: InputController,
    pending_input: VecDeque<KeyEvent>,
    powerups: PowerUpManager,
    timers: Scheduler<TimerEvent>,

    /// Time since the current level started (drives oscillation phase)
    level_elapsed_ms: f64,
    tick_count: u64,
    accumulator: f64,
    last_update_ms: Option<f64>,
    snapshot: Snapshot,
}

impl Engine {
    /// Engine on wall-clock time with no notifier attached
    pub fn new(config: EngineConfig, catalog: LevelCatalog) -> Self {
        let powerups = PowerUpManager::new(config.powerup_tuning());
        let player = Player::new(Vec2::ZERO, config.player_size(), 0.0);
        let session = SessionState {
            lives: config.starting_lives,
            ..Default::default()
        };
        let mut engine = Self {
            config,
            catalog,
            clock: Box::new(SystemClock::new()),
            notifier: Box::new(NullNotifier),
            session,
            player,
            base_speed: 0.0,
            objects: Vec::new(),
            obstacles: Vec::new(),
            points_to_win: 0,
            input: InputController::default(),
            pending_input: VecDeque::new(),
            powerups,
            timers: Scheduler::new(),
            level_elapsed_ms: 0.0,
            tick_count: 0,
            accumulator: 0.0,
            last_update_ms: None,
            snapshot: Snapshot::default(),
        };
        engine.publish();
        engine
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self.last_update_ms = None;
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    // === Read-only views ===

    /// Latest published snapshot
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    // === Commands ===

    /// NotStarted -> Playing at level 0 with full lives
    pub fn start_game(&mut self) {
        if self.session.phase != GamePhase::NotStarted {
            log::debug!("start_game ignored in {:?}", self.session.phase);
            return;
        }
        self.session = SessionState {
            lives: self.config.starting_lives,
            ..Default::default()
        };
        self.start_level(0);
    }

    /// LevelComplete -> next level, or GameOver when none remain
    pub fn advance_level(&mut self) {
        if self.session.phase != GamePhase::LevelComplete {
            log::debug!("advance_level ignored in {:?}", self.session.phase);
            return;
        }
        self.session.total_score += self.session.score;
        self.session.score = 0;

        let next = self.session.level_index + 1;
        if next < self.catalog.len() {
            self.start_level(next);
        } else {
            self.end_game(GameOverReason::AllLevelsComplete);
            self.publish();
        }
    }

    /// Back to NotStarted, dropping the level and every pending timer
    pub fn reset_game(&mut self) {
        if self.session.phase == GamePhase::NotStarted {
            log::debug!("reset_game ignored: not started");
            return;
        }
        self.stop_timers();
        self.session = SessionState {
            lives: self.config.starting_lives,
            ..Default::default()
        };
        self.objects.clear();
        self.obstacles.clear();
        self.points_to_win = 0;
        self.base_speed = 0.0;
        self.player = Player::new(Vec2::ZERO, self.config.player_size(), 0.0);
        self.input.clear();
        self.pending_input.clear();
        self.level_elapsed_ms = 0.0;
        log::info!("Game reset");
        self.emit(GameEvent::GameReset);
        self.publish();
    }

    /// Suspend/resume simulation while playing
    pub fn toggle_pause(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        self.session.paused = !self.session.paused;
        if self.session.paused {
            self.emit(GameEvent::Paused);
        } else {
            self.emit(GameEvent::Resumed);
        }
        self.publish();
    }

    /// Queue a key event for the next tick
    pub fn push_input(&mut self, event: KeyEvent) {
        self.pending_input.push_back(event);
    }

    // === Simulation ===

    /// Run as many fixed steps as the clock allows. Returns steps taken.
    pub fn update(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let Some(last) = self.last_update_ms.replace(now) else {
            return 0;
        };
        self.accumulator += (now - last).max(0.0);

        let step = self.config.tick_ms;
        let mut substeps = 0;
        while self.accumulator >= step && substeps < self.config.max_substeps {
            self.tick(step);
            self.accumulator -= step;
            substeps += 1;
        }
        if self.accumulator >= step {
            log::debug!("Dropping {:.1}ms of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Advance the simulation by one step of `dt_ms`
    pub fn tick(&mut self, dt_ms: f64) {
        // Input queue is drained first; events outside play are discarded
        let playing = self.session.is_playing();
        for event in self.pending_input.drain(..) {
            if playing {
                self.input.apply(event);
            }
        }

        if !playing || self.session.paused {
            self.publish();
            return;
        }

        self.tick_count += 1;
        self.level_elapsed_ms += dt_ms;

        // Movement
        self.player.effective_speed = self.base_speed * self.powerups.speed_multiplier();
        let velocity = self.input.velocity(self.player.effective_speed);
        let ctx = MoveContext {
            arena: self.config.arena(),
            obstacles: &self.obstacles,
            elapsed_ms: self.level_elapsed_ms,
            tick_ms: self.config.tick_ms,
            chase_stop_distance: self.config.chase_stop_distance,
        };
        let (player, objects) = movement::step(dt_ms, velocity, &ctx, &self.player, &self.objects);
        self.player = player;
        self.objects = objects;

        // Collisions
        let events = resolve_collisions(
            &self.player,
            &mut self.objects,
            &mut self.session,
            &mut self.powerups,
            self.points_to_win,
        );
        for event in events {
            self.emit(event);
        }

        // Timers only observe state after movement and collisions settled
        if self.session.is_playing() {
            for kind in self.powerups.decay(dt_ms) {
                self.emit(GameEvent::PowerUpExpired { kind });
            }
            self.run_timers(dt_ms);
        }

        self.session.active_effects = self.powerups.effects().to_vec();

        match self.session.phase {
            GamePhase::Playing => {}
            GamePhase::LevelComplete => {
                log::info!(
                    "Level {} complete with {} points",
                    self.session.level_index + 1,
                    self.session.score
                );
                self.stop_timers();
            }
            GamePhase::GameOver(reason) => {
                log::info!("Game over: {}", reason.as_str());
                self.stop_timers();
            }
            GamePhase::NotStarted => {}
        }

        self.player.effective_speed = self.base_speed * self.powerups.speed_multiplier();
        self.publish();
    }

    fn run_timers(&mut self, dt_ms: f64) {
        let mut fired = self.timers.advance(dt_ms);
        while !fired.is_empty() {
            for timer in fired {
                if timer.epoch != self.timers.epoch() {
                    log::debug!("Dropping stale timer {:?}", timer.event);
                    continue;
                }
                if !self.session.is_playing() {
                    return;
                }
                match timer.event {
                    TimerEvent::ClockSecond => self.clock_second(timer.due_ms),
                }
            }
            // Catch timers rescheduled inside a long step
            fired = self.timers.advance(0.0);
        }
    }

    fn clock_second(&mut self, due_ms: f64) {
        self.session.time_remaining_secs = self.session.time_remaining_secs.saturating_sub(1);
        if self.session.time_remaining_secs == 0 {
            self.end_game(GameOverReason::TimeUp);
        } else {
            self.timers
                .schedule_at(due_ms + CLOCK_STEP_MS, TimerEvent::ClockSecond);
        }
    }

    fn start_level(&mut self, index: usize) {
        let Some(level) = self.catalog.get(index).cloned() else {
            self.end_game(GameOverReason::AllLevelsComplete);
            self.publish();
            return;
        };

        self.stop_timers();
        self.session.level_index = index;
        self.session.score = 0;
        self.session.time_remaining_secs = level.time_limit_secs;
        self.session.phase = GamePhase::Playing;
        self.session.paused = false;
        self.session.active_effects.clear();

        self.objects = level.instantiate_objects();
        self.obstacles = level.obstacles.clone();
        self.points_to_win = level.points_to_win;
        self.base_speed = level.base_speed;
        let player_size = self.config.player_size();
        let spawn = clamp_to_arena(level.player_start, player_size, self.config.arena());
        if spawn != level.player_start {
            log::warn!(
                "Level {} spawn {:?} is outside the arena, moved to {:?}",
                index + 1,
                level.player_start,
                spawn
            );
        }
        self.player = Player::new(spawn, player_size, level.base_speed);
        self.input.clear();
        self.pending_input.clear();
        self.level_elapsed_ms = 0.0;
        self.timers.schedule_in(CLOCK_STEP_MS, TimerEvent::ClockSecond);

        let name = level.name.clone();
        log::info!("Starting level {}: {}", index + 1, name);
        self.emit(GameEvent::LevelStarted { level: index, name });
        self.publish();
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.session.phase = GamePhase::GameOver(reason);
        self.stop_timers();
        self.emit(GameEvent::GameOver {
            reason,
            total_score: self.session.total_score + self.session.score,
        });
    }

    /// Cancel the countdown and drop all effects
    fn stop_timers(&mut self) {
        self.timers.clear();
        self.powerups.clear();
        self.session.active_effects.clear();
    }

    fn emit(&mut self, event: GameEvent) {
        self.notifier.notify(&event);
    }

    fn publish(&mut self) {
        let level_name = self
            .catalog
            .get(self.session.level_index)
            .map(|l| l.name.clone())
            .unwrap_or_default();
        self.snapshot = Snapshot {
            tick: self.tick_count,
            level_name,
            arena: self.config.arena(),
            player: self.player,
            objects: self.objects.iter().filter(|o| o.is_live()).cloned().collect(),
            obstacles: self.obstacles.clone(),
            session: self.session.clone(),
        };
    }
}
