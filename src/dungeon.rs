//! The caller-facing dungeon facade.
//!
//! Wires the generator engine, layer manager, annotator and settings store
//! behind the six public operations: generate, save, generate-saved,
//! refresh-markers, destroy-all and update-layer.

use log::{info, warn};

use crate::annotate::Annotator;
use crate::error::{OublietteError, Result};
use crate::factory::{DestroyMode, RoomFactory};
use crate::generator::GenerationReport;
use crate::grid::Layer;
use crate::manager::{BufferedLayer, LayerManager};
use crate::settings::{MazeSettings, SettingsStore};

/// A generated dungeon and everything needed to regenerate it.
///
/// Owns the room factory and all layer state; generation runs to completion
/// within each call and is not reentrant.
pub struct Dungeon<F: RoomFactory> {
    settings: MazeSettings,
    factory: F,
    manager: LayerManager,
    annotator: Annotator,
    /// The single buffered layer outside infinite vertical mode.
    current: Option<BufferedLayer>,
    /// Seed the last generation actually ran with.
    resolved_seed: Option<u64>,
    destroy_mode: DestroyMode,
}

impl<F: RoomFactory> Dungeon<F> {
    pub fn new(settings: MazeSettings, factory: F) -> Self {
        Self::with_destroy_mode(settings, factory, DestroyMode::Immediate)
    }

    /// Tag every teardown this dungeon issues with `mode`; the factory
    /// decides what the tag means.
    pub fn with_destroy_mode(settings: MazeSettings, factory: F, mode: DestroyMode) -> Self {
        Self {
            settings,
            factory,
            manager: LayerManager::new(mode),
            annotator: Annotator::new(),
            current: None,
            resolved_seed: None,
            destroy_mode: mode,
        }
    }

    pub fn settings(&self) -> &MazeSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MazeSettings {
        &mut self.settings
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn manager(&self) -> &LayerManager {
        &self.manager
    }

    /// The layer the caller currently stands in.
    pub fn active_layer(&self) -> Option<&Layer> {
        if self.settings.infinite_vertical {
            self.manager.middle().map(|b| &b.layer)
        } else {
            self.current.as_ref().map(|b| &b.layer)
        }
    }

    /// Seed the last generation ran with.
    pub fn resolved_seed(&self) -> Option<u64> {
        self.resolved_seed
    }

    /// Generate from the current settings, tearing down anything built
    /// before. In infinite vertical mode this bootstraps layers 0..=2 and
    /// returns the active layer's report.
    pub fn generate(&mut self) -> Result<GenerationReport> {
        self.settings.validate()?;
        let seed = self.settings.resolve_seed();
        self.resolved_seed = Some(seed);
        info!("Generating with seed {seed}");

        if self.settings.infinite_vertical {
            // Stacked layers draw from the variation table when one is
            // configured; the example room is a single-layer convenience.
            self.settings.use_example_room = false;
            // Markers are force-disabled in this mode.
            self.annotator
                .clear(&self.settings, &mut self.factory, self.destroy_mode);
            self.teardown_current();
            let mut reports = self.manager.bootstrap(&self.settings, seed, &mut self.factory)?;
            if reports.len() != 3 {
                return Err(OublietteError::GenerationError {
                    reason: format!("bootstrap produced {} layers", reports.len()),
                });
            }
            return Ok(reports.swap_remove(1));
        }

        // Regeneration: the previous layer's rooms and markers must be gone
        // before the new grid goes up.
        self.destroy_all();

        let (buffered, report) = self
            .manager
            .generate_layer(0, &self.settings, seed, &mut self.factory)?;

        if self.settings.mark_deadends || self.settings.mark_longest_path {
            self.annotator.refresh(
                &buffered.layer,
                buffered.entrance,
                &self.settings,
                &mut self.factory,
                self.destroy_mode,
            );
        }

        self.current = Some(buffered);
        Ok(report)
    }

    /// Persist the current settings. The stored record pins the resolved
    /// seed and clears the random-seed flag so a later load reproduces this
    /// exact maze.
    pub fn save_current<S: SettingsStore>(&self, store: &mut S) -> Result<()> {
        let mut snapshot = self.settings.clone();
        snapshot.use_random_seed = false;
        if let Some(seed) = self.resolved_seed {
            snapshot.seed = seed;
        }
        store.save(&snapshot)
    }

    /// Load settings from the store and generate with them.
    pub fn generate_saved<S: SettingsStore>(&mut self, store: &S) -> Result<GenerationReport> {
        self.settings = store.load()?;
        self.generate()
    }

    /// Recompute deadend markers and longest-path highlighting for the
    /// current layer. Idempotent.
    pub fn refresh_markers(&mut self) -> Result<()> {
        if self.settings.infinite_vertical {
            warn!("Markers are disabled in infinite vertical mode");
            return Ok(());
        }
        match &self.current {
            Some(buffered) => {
                self.annotator.refresh(
                    &buffered.layer,
                    buffered.entrance,
                    &self.settings,
                    &mut self.factory,
                    self.destroy_mode,
                );
            }
            None => {
                // Nothing generated; converge to an empty scene.
                self.annotator
                    .clear(&self.settings, &mut self.factory, self.destroy_mode);
            }
        }
        Ok(())
    }

    /// Destroy every room and marker this dungeon tracks.
    pub fn destroy_all(&mut self) {
        self.annotator
            .clear(&self.settings, &mut self.factory, self.destroy_mode);
        self.teardown_current();
        self.manager.destroy_all(&mut self.factory);
    }

    /// Move the player-facing active layer one step up or down (infinite
    /// vertical mode only).
    pub fn update_layer(&mut self, target: i32) -> Result<()> {
        if !self.settings.infinite_vertical || self.manager.middle().is_none() {
            return Err(OublietteError::GenerationError {
                reason: "infinite vertical mode is not active".to_string(),
            });
        }
        let seed = self.resolved_seed.unwrap_or(self.settings.seed);
        self.manager
            .update_layer(target, &self.settings, seed, &mut self.factory)
    }

    fn teardown_current(&mut self) {
        if let Some(buffered) = self.current.take() {
            for handle in buffered.layer.room_handles() {
                self.factory.destroy_room(handle, self.destroy_mode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::RecordingFactory;

    fn fixed_dungeon(size: usize, seed: u64) -> Dungeon<RecordingFactory> {
        let settings = MazeSettings {
            maze_size: size,
            seed,
            use_random_seed: false,
            ..Default::default()
        };
        Dungeon::new(settings, RecordingFactory::new())
    }

    #[test]
    fn test_generate_builds_full_grid() {
        let mut dungeon = fixed_dungeon(6, 3);
        let report = dungeon.generate().unwrap();

        assert_eq!(report.visited_cells, 36);
        assert!(!report.cutoff_fired);
        let layer = dungeon.active_layer().unwrap();
        assert!(layer.stack.is_empty());
        assert!(layer.cells().iter().all(|c| c.visited));
    }

    #[test]
    fn test_regeneration_does_not_leak_rooms() {
        let mut dungeon = fixed_dungeon(6, 3);
        dungeon.generate().unwrap();
        let rooms_after_first = dungeon.factory().live_rooms();

        dungeon.generate().unwrap();
        assert_eq!(dungeon.factory().live_rooms(), rooms_after_first);
    }

    #[test]
    fn test_destroy_all_clears_scene() {
        let mut dungeon = fixed_dungeon(5, 7);
        dungeon.generate().unwrap();
        dungeon.destroy_all();
        assert_eq!(dungeon.factory().live_rooms(), 0);
        assert!(dungeon.active_layer().is_none());
    }

    #[test]
    fn test_update_layer_outside_infinite_mode() {
        let mut dungeon = fixed_dungeon(5, 7);
        dungeon.generate().unwrap();
        assert!(dungeon.update_layer(1).is_err());
    }

    #[test]
    fn test_save_current_pins_resolved_seed() {
        use crate::settings::JsonSettingsStore;
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonSettingsStore::new(dir.path().join("saved.json"));

        let settings = MazeSettings {
            maze_size: 5,
            use_random_seed: true,
            ..Default::default()
        };
        let mut dungeon = Dungeon::new(settings, RecordingFactory::new());
        dungeon.generate().unwrap();
        dungeon.save_current(&mut store).unwrap();

        let loaded = store.load().unwrap();
        assert!(!loaded.use_random_seed);
        assert_eq!(Some(loaded.seed), dungeon.resolved_seed());
    }
}
