//! Timed power-up effects
//!
//! At most one effect per kind. Re-activating a kind resets its timer to the
//! full duration; durations and multipliers never stack.

use serde::{Deserialize, Serialize};

use super::state::{PowerUpEffect, PowerUpKind};
use crate::consts::*;

/// Durations and strengths for each effect kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTuning {
    pub speed_boost_ms: f64,
    pub speed_boost_multiplier: f32,
    pub bug_shield_ms: f64,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            speed_boost_ms: SPEED_BOOST_MS,
            speed_boost_multiplier: SPEED_BOOST_MULTIPLIER,
            bug_shield_ms: BUG_SHIELD_MS,
        }
    }
}

impl PowerUpTuning {
    pub fn duration_ms(&self, kind: PowerUpKind) -> f64 {
        match kind {
            PowerUpKind::SpeedBoost => self.speed_boost_ms,
            PowerUpKind::BugShield => self.bug_shield_ms,
        }
    }
}

/// Tracks active effects and the player modifiers they imply
#[derive(Debug, Clone, Default)]
pub struct PowerUpManager {
    tuning: PowerUpTuning,
    effects: Vec<PowerUpEffect>,
}

impl PowerUpManager {
    pub fn new(tuning: PowerUpTuning) -> Self {
        Self {
            tuning,
            effects: Vec::new(),
        }
    }

    /// Start an effect, or restart it at full duration if already active
    pub fn activate(&mut self, kind: PowerUpKind) {
        let duration = self.tuning.duration_ms(kind);
        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(effect) => effect.remaining_ms = duration,
            None => self.effects.push(PowerUpEffect {
                kind,
                remaining_ms: duration,
            }),
        }
        log::debug!("{} active for {}ms", kind.as_str(), duration);
    }

    /// Count down every effect; returns the kinds that expired this call
    pub fn decay(&mut self, dt_ms: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.effects.retain_mut(|effect| {
            effect.remaining_ms -= dt_ms;
            if effect.remaining_ms <= 0.0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        for kind in &expired {
            log::debug!("{} expired", kind.as_str());
        }
        expired
    }

    /// Drop all effects without notification (level start/reset)
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn shield_active(&self) -> bool {
        self.is_active(PowerUpKind::BugShield)
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.is_active(PowerUpKind::SpeedBoost) {
            self.tuning.speed_boost_multiplier
        } else {
            1.0
        }
    }

    pub fn effects(&self) -> &[PowerUpEffect] {
        &self.effects
    }
}
