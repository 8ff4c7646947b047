//! Level data
//!
//! Structured per-level records consumed from JSON files: spawn point,
//! container/obstacle/teleport descriptors, and the total grain target.
//! Missing or malformed data fails the load attempt; a missing *file* is
//! distinguishable because the driver reads it as "no more levels" - the
//! win condition, not an error.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;

use crate::consts::*;

/// Why a level failed to load.
#[derive(Debug)]
pub enum LevelLoadError {
    /// The level file does not exist.
    NotFound(PathBuf),
    /// The file exists but could not be read.
    Io(io::Error),
    /// The file is not valid level JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for LevelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelLoadError::NotFound(path) => {
                write!(f, "level file not found: {}", path.display())
            }
            LevelLoadError::Io(e) => write!(f, "failed to read level file: {}", e),
            LevelLoadError::Parse(e) => write!(f, "malformed level data: {}", e),
        }
    }
}

impl std::error::Error for LevelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelLoadError::Io(e) => Some(e),
            LevelLoadError::Parse(e) => Some(e),
            LevelLoadError::NotFound(_) => None,
        }
    }
}

impl From<serde_json::Error> for LevelLoadError {
    fn from(e: serde_json::Error) -> Self {
        LevelLoadError::Parse(e)
    }
}

impl LevelLoadError {
    /// The driver interprets a missing next level as the win condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LevelLoadError::NotFound(_))
    }
}

/// A container descriptor: position, size, capacity.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub needed_sugar: u32,
}

/// A static obstacle descriptor: endpoints plus material properties.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticData {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: String,
    pub line_width: f32,
    #[serde(default = "default_friction")]
    pub friction: f32,
    #[serde(default = "default_restitution")]
    pub restitution: f32,
}

/// A teleportation zone descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct TeleportData {
    pub entry: [f32; 2],
    pub exit: [f32; 2],
    #[serde(default = "default_entry_radius")]
    pub entry_radius: f32,
}

fn default_friction() -> f32 {
    OBSTACLE_FRICTION
}

fn default_restitution() -> f32 {
    OBSTACLE_RESTITUTION
}

fn default_entry_radius() -> f32 {
    TELEPORT_DEFAULT_RADIUS
}

/// One level's worth of data.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub spout_x: f32,
    pub spout_y: f32,
    pub number_sugar_grains: u32,
    pub buckets: Vec<BucketData>,
    pub statics: Vec<StaticData>,
    #[serde(default)]
    pub teleportations: Vec<TeleportData>,
    #[serde(default)]
    pub moving_bucket: Option<BucketData>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, LevelLoadError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(LevelLoadError::NotFound(path.to_path_buf()))
            }
            Err(e) => Err(LevelLoadError::Io(e)),
        }
    }

    pub fn spout(&self) -> Vec2 {
        Vec2::new(self.spout_x, self.spout_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL_JSON: &str = r#"{
        "spout_x": 500.0,
        "spout_y": 780.0,
        "number_sugar_grains": 40,
        "buckets": [
            {"x": 200.0, "y": 50.0, "width": 60.0, "height": 50.0, "needed_sugar": 10}
        ],
        "statics": [
            {"x1": 0.0, "y1": 300.0, "x2": 400.0, "y2": 250.0,
             "color": "white", "line_width": 3.0, "friction": 0.4, "restitution": 0.2}
        ],
        "teleportations": [
            {"entry": [296.0, 0.0], "exit": [900.0, 800.0]}
        ]
    }"#;

    #[test]
    fn test_parse_level() {
        let level = LevelData::from_json(LEVEL_JSON).unwrap();
        assert_eq!(level.spout(), Vec2::new(500.0, 780.0));
        assert_eq!(level.number_sugar_grains, 40);
        assert_eq!(level.buckets.len(), 1);
        assert_eq!(level.buckets[0].needed_sugar, 10);
        assert_eq!(level.statics[0].friction, 0.4);
        assert!(level.moving_bucket.is_none());
    }

    #[test]
    fn test_teleport_radius_defaults() {
        let level = LevelData::from_json(LEVEL_JSON).unwrap();
        assert_eq!(level.teleportations[0].entry_radius, TELEPORT_DEFAULT_RADIUS);
    }

    #[test]
    fn test_missing_field_fails_parse() {
        let err = LevelData::from_json(r#"{"spout_x": 1.0}"#).unwrap_err();
        assert!(matches!(err, LevelLoadError::Parse(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = LevelData::load(Path::new("/nonexistent/level99.json")).unwrap_err();
        assert!(err.is_not_found());
    }
}
