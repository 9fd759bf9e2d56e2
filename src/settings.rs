//! Generation settings and their persistence.
//!
//! `MazeSettings` is the flat record of every generation parameter; the
//! `SettingsStore` trait abstracts wherever that record lives, with
//! `JsonSettingsStore` persisting it as pretty-printed JSON on disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OublietteError, Result};
use crate::factory::WorldPos;

/// Flat record of all generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    // Dungeon
    pub maze_size: usize,
    pub origin: WorldPos,
    /// World units between adjacent room centers.
    pub tile_size: f32,
    /// World units between stacked layers.
    pub layer_height: f32,

    // Generation
    pub seed: u64,
    pub use_random_seed: bool,
    pub cutoff: bool,
    /// Percentage of visited cells at which traversal stops early.
    pub cutoff_point: u8,
    pub use_example_room: bool,
    pub mark_deadends: bool,
    pub mark_longest_path: bool,
    pub infinite_vertical: bool,

    // Rooms
    pub example_room: String,
    pub room_variations: Vec<String>,
    /// Weight per variation, same order as `room_variations`.
    pub variation_weights: Vec<u32>,
    pub stair_room: String,
    pub start_room: String,

    // Markers & materials
    pub deadend_marker: String,
    pub floor_material: String,
    pub path_material: String,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            maze_size: 10,
            origin: WorldPos::default(),
            tile_size: 4.0,
            layer_height: 3.0,
            seed: 1,
            use_random_seed: true,
            cutoff: false,
            cutoff_point: 1,
            use_example_room: true,
            mark_deadends: true,
            mark_longest_path: true,
            infinite_vertical: false,
            example_room: "room.example".to_string(),
            room_variations: Vec::new(),
            variation_weights: Vec::new(),
            deadend_marker: "marker.deadend".to_string(),
            stair_room: "room.stair".to_string(),
            start_room: "room.start".to_string(),
            floor_material: "default".to_string(),
            path_material: "path".to_string(),
        }
    }
}

impl MazeSettings {
    /// Reject invalid configurations before any generation starts.
    pub fn validate(&self) -> Result<()> {
        if self.maze_size < 2 {
            return Err(OublietteError::GridTooSmall {
                size: self.maze_size,
            });
        }
        if self.cutoff && !(1..=100).contains(&self.cutoff_point) {
            return Err(OublietteError::CutoffOutOfRange {
                point: self.cutoff_point,
            });
        }
        if !self.room_variations.is_empty()
            && self.room_variations.len() != self.variation_weights.len()
        {
            return Err(OublietteError::WeightCountMismatch {
                variations: self.room_variations.len(),
                weights: self.variation_weights.len(),
            });
        }
        // When no variations are supplied the example room is the fallback
        // even with `use_example_room` off.
        if self.example_room.is_empty() && self.room_variations.is_empty() {
            return Err(OublietteError::MissingReference {
                what: "example room",
            });
        }
        if self.mark_deadends && self.deadend_marker.is_empty() {
            return Err(OublietteError::MissingReference {
                what: "deadend marker",
            });
        }
        if self.mark_longest_path && self.path_material.is_empty() {
            return Err(OublietteError::MissingReference {
                what: "path material",
            });
        }
        if self.infinite_vertical && (self.stair_room.is_empty() || self.start_room.is_empty()) {
            return Err(OublietteError::MissingReference {
                what: "stair/start room",
            });
        }
        Ok(())
    }

    /// The seed generation will actually run with: the configured seed, or a
    /// fresh draw when `use_random_seed` is set.
    pub fn resolve_seed(&self) -> u64 {
        if self.use_random_seed {
            rand::thread_rng().gen_range(1..100_000)
        } else {
            self.seed
        }
    }
}

/// Abstract persistence for the settings record.
pub trait SettingsStore {
    fn load(&self) -> Result<MazeSettings>;
    fn save(&mut self, settings: &MazeSettings) -> Result<()>;
}

/// On-disk form: the settings plus a save stamp.
#[derive(Debug, Serialize, Deserialize)]
struct SavedSettings {
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    settings: MazeSettings,
}

/// Settings store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<MazeSettings> {
        if !self.path.exists() {
            return Err(OublietteError::MissingSettings {
                path: self.path.display().to_string(),
            });
        }
        let content = fs::read_to_string(&self.path)?;
        let saved: SavedSettings = serde_json::from_str(&content)?;
        Ok(saved.settings)
    }

    fn save(&mut self, settings: &MazeSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let saved = SavedSettings {
            saved_at: Utc::now(),
            settings: settings.clone(),
        };
        let content = serde_json::to_string_pretty(&saved)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(MazeSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_grid() {
        let settings = MazeSettings {
            maze_size: 1,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(OublietteError::GridTooSmall { size: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_cutoff() {
        let settings = MazeSettings {
            cutoff: true,
            cutoff_point: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(OublietteError::CutoffOutOfRange { point: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_weight_mismatch() {
        let settings = MazeSettings {
            room_variations: vec!["a".to_string(), "b".to_string()],
            variation_weights: vec![10],
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(OublietteError::WeightCountMismatch {
                variations: 2,
                weights: 1
            })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_marker() {
        let settings = MazeSettings {
            mark_deadends: true,
            deadend_marker: String::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_fixed_seed_resolves_to_itself() {
        let settings = MazeSettings {
            use_random_seed: false,
            seed: 42,
            ..Default::default()
        };
        assert_eq!(settings.resolve_seed(), 42);
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonSettingsStore::new(dir.path().join("settings.json"));

        let settings = MazeSettings {
            maze_size: 7,
            seed: 1234,
            use_random_seed: false,
            room_variations: vec!["room.a".to_string(), "room.b".to_string()],
            variation_weights: vec![70, 30],
            ..Default::default()
        };

        store.save(&settings).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_settings() {
        let dir = TempDir::new().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("absent.json"));
        assert!(matches!(
            store.load(),
            Err(OublietteError::MissingSettings { .. })
        ));
    }
}
