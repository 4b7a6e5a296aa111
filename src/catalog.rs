//! Level definitions
//!
//! Ordered, immutable list of levels. Object lists are templates: the engine
//! instantiates fresh copies every time a level starts.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::{GameObject, MovePattern, ObjectKind, PowerUpKind, StaticObstacle};

/// Errors from loading or validating a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no levels")]
    Empty,
    #[error("level {level} ({name}): {reason}")]
    InvalidLevel {
        level: usize,
        name: String,
        reason: String,
    },
}

fn default_player_start() -> Vec2 {
    Vec2::new(20.0, 20.0)
}

/// One playable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub time_limit_secs: u32,
    pub points_to_win: i32,
    pub base_speed: f32,
    /// Presentation hint, not used by the simulation
    #[serde(default)]
    pub background: String,
    #[serde(default = "default_player_start")]
    pub player_start: Vec2,
    #[serde(default)]
    pub obstacles: Vec<StaticObstacle>,
    #[serde(default)]
    pub objects: Vec<GameObject>,
}

impl Level {
    /// Fresh object instances for a new attempt
    pub fn instantiate_objects(&self) -> Vec<GameObject> {
        self.objects.iter().map(GameObject::instantiate).collect()
    }

    fn validate(&self, index: usize) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidLevel {
            level: index,
            name: self.name.clone(),
            reason,
        };

        if self.points_to_win <= 0 {
            return Err(invalid(format!("points_to_win must be positive, got {}", self.points_to_win)));
        }
        if self.time_limit_secs == 0 {
            return Err(invalid("time_limit_secs must be non-zero".to_string()));
        }
        if self.base_speed < 0.0 {
            return Err(invalid(format!("base_speed must not be negative, got {}", self.base_speed)));
        }

        if !self.player_start.is_finite() || self.player_start.x < 0.0 || self.player_start.y < 0.0 {
            return Err(invalid(format!("player_start {:?} is outside the arena", self.player_start)));
        }

        let mut ids = HashSet::new();
        for obj in &self.objects {
            if !ids.insert(obj.id) {
                return Err(invalid(format!("duplicate object id {}", obj.id)));
            }
            if obj.size.x <= 0.0 || obj.size.y <= 0.0 {
                return Err(invalid(format!("object {} has non-positive size", obj.id)));
            }
        }
        for obstacle in &self.obstacles {
            if obstacle.size.x <= 0.0 || obstacle.size.y <= 0.0 {
                return Err(invalid("obstacle has non-positive size".to_string()));
            }
        }
        Ok(())
    }
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// Build a catalog from levels, validating each one
    pub fn new(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let catalog = Self { levels };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: LevelCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, level) in self.levels.iter().enumerate() {
            level.validate(i)?;
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// The three stock levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![skills_forest(), project_mountains(), achievement_castle()],
        }
    }
}

fn skill(id: u32, label: &str, x: f32, y: f32, points: i32) -> GameObject {
    GameObject::new(id, label, ObjectKind::Skill, Vec2::new(x, y), points)
}

fn project(id: u32, label: &str, x: f32, y: f32, points: i32) -> GameObject {
    GameObject::new(id, label, ObjectKind::Project, Vec2::new(x, y), points)
}

fn achievement(id: u32, label: &str, x: f32, y: f32, points: i32) -> GameObject {
    GameObject::new(id, label, ObjectKind::Achievement, Vec2::new(x, y), points)
}

fn bug(id: u32, x: f32, y: f32, pattern: MovePattern, speed: f32) -> GameObject {
    GameObject::new(id, "Bug", ObjectKind::Obstacle, Vec2::new(x, y), -20)
        .with_size(Vec2::splat(28.0))
        .with_pattern(pattern, speed)
}

fn power_up(id: u32, kind: PowerUpKind, x: f32, y: f32) -> GameObject {
    let label = match kind {
        PowerUpKind::SpeedBoost => "Coffee",
        PowerUpKind::BugShield => "Unit Tests",
    };
    GameObject::new(id, label, ObjectKind::PowerUp(kind), Vec2::new(x, y), 10)
        .with_size(Vec2::splat(24.0))
}

fn skills_forest() -> Level {
    Level {
        name: "Skills Forest".to_string(),
        description: "Gather core skills while dodging the odd bug".to_string(),
        time_limit_secs: 60,
        points_to_win: 250,
        base_speed: 5.0,
        background: "forest".to_string(),
        player_start: default_player_start(),
        obstacles: vec![
            StaticObstacle::new(200.0, 120.0, 60.0, 60.0),
            StaticObstacle::new(450.0, 300.0, 80.0, 50.0),
            StaticObstacle::new(620.0, 80.0, 50.0, 120.0),
        ],
        objects: vec![
            skill(1, "Rust", 120.0, 300.0, 50),
            skill(2, "TypeScript", 350.0, 60.0, 50),
            skill(3, "React", 560.0, 420.0, 75),
            skill(4, "Python", 720.0, 300.0, 50),
            skill(5, "SQL", 300.0, 400.0, 50),
            bug(6, 380.0, 220.0, MovePattern::Horizontal { range: 80.0 }, 1.5),
            bug(7, 700.0, 420.0, MovePattern::None, 0.0),
            power_up(8, PowerUpKind::SpeedBoost, 60.0, 440.0),
        ],
    }
}

fn project_mountains() -> Level {
    Level {
        name: "Project Mountains".to_string(),
        description: "Climb past shipped projects; some bugs have learned to hunt".to_string(),
        time_limit_secs: 75,
        points_to_win: 400,
        base_speed: 5.0,
        background: "mountains".to_string(),
        player_start: default_player_start(),
        obstacles: vec![
            StaticObstacle::new(150.0, 200.0, 120.0, 40.0),
            StaticObstacle::new(400.0, 0.0, 40.0, 180.0),
            StaticObstacle::new(400.0, 320.0, 40.0, 180.0),
            StaticObstacle::new(600.0, 220.0, 120.0, 40.0),
        ],
        objects: vec![
            project(1, "Portfolio Site", 80.0, 320.0, 100),
            project(2, "Chat Assistant", 300.0, 80.0, 125),
            project(3, "Resume Builder", 520.0, 120.0, 100),
            project(4, "Game Engine", 700.0, 400.0, 150),
            skill(5, "Docker", 250.0, 430.0, 50),
            bug(6, 300.0, 300.0, MovePattern::Vertical { range: 60.0 }, 2.0),
            bug(7, 560.0, 360.0, MovePattern::Circular { range: 50.0 }, 1.5),
            bug(8, 740.0, 40.0, MovePattern::Chase, 1.5),
            power_up(9, PowerUpKind::BugShield, 480.0, 440.0),
            power_up(10, PowerUpKind::SpeedBoost, 40.0, 160.0),
        ],
    }
}

fn achievement_castle() -> Level {
    Level {
        name: "Achievement Castle".to_string(),
        description: "Claim the trophies inside the castle walls".to_string(),
        time_limit_secs: 90,
        points_to_win: 600,
        base_speed: 6.0,
        background: "castle".to_string(),
        player_start: default_player_start(),
        obstacles: vec![
            StaticObstacle::new(100.0, 100.0, 600.0, 30.0),
            StaticObstacle::new(100.0, 370.0, 250.0, 30.0),
            StaticObstacle::new(450.0, 370.0, 250.0, 30.0),
            StaticObstacle::new(100.0, 130.0, 30.0, 170.0),
            StaticObstacle::new(670.0, 130.0, 30.0, 170.0),
        ],
        objects: vec![
            achievement(1, "Hackathon Winner", 380.0, 220.0, 200),
            achievement(2, "Open Source Maintainer", 200.0, 200.0, 150),
            achievement(3, "Conference Speaker", 560.0, 200.0, 150),
            achievement(4, "Certified Architect", 720.0, 440.0, 150),
            project(5, "Compiler", 40.0, 440.0, 100),
            bug(6, 400.0, 300.0, MovePattern::Horizontal { range: 150.0 }, 2.0),
            bug(7, 380.0, 30.0, MovePattern::Horizontal { range: 250.0 }, 1.0),
            bug(8, 760.0, 20.0, MovePattern::Chase, 2.0),
            bug(9, 20.0, 460.0, MovePattern::Chase, 1.5),
            power_up(10, PowerUpKind::BugShield, 740.0, 240.0),
            power_up(11, PowerUpKind::SpeedBoost, 40.0, 240.0),
        ],
    }
}
