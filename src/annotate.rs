//! Post-processing pass over a finished layer: deadend markers and
//! longest-path floor highlighting.
//!
//! The annotator owns every handle it creates or repaints, so a refresh can
//! remove exactly its previous output and never has to sweep the scene.

use log::debug;

use crate::factory::{DestroyMode, RoomFactory, RoomHandle, TileHandle};
use crate::generator::room_world_pos;
use crate::grid::{GridPos, Layer, Side, DIRECTIONS};
use crate::settings::MazeSettings;

/// Places deadend markers and recolors the longest-path floor tiles.
#[derive(Debug, Default)]
pub struct Annotator {
    markers: Vec<RoomHandle>,
    recolored: Vec<TileHandle>,
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles of the markers currently placed.
    pub fn marker_handles(&self) -> &[RoomHandle] {
        &self.markers
    }

    /// Tiles currently painted with the path material.
    pub fn recolored_tiles(&self) -> &[TileHandle] {
        &self.recolored
    }

    /// Remove previous markers and restore the default floor, then annotate
    /// the layer again. Idempotent: repeated calls on an unchanged layer
    /// converge to the same visible result.
    pub fn refresh<F: RoomFactory>(
        &mut self,
        layer: &Layer,
        entrance: GridPos,
        settings: &MazeSettings,
        factory: &mut F,
        mode: DestroyMode,
    ) {
        self.clear(settings, factory, mode);

        if settings.mark_deadends {
            self.place_markers(layer, entrance, settings, factory);
        }
        if settings.mark_longest_path {
            self.paint_longest_path(layer, settings, factory);
        }
    }

    /// Destroy placed markers and repaint recolored tiles with the default
    /// floor material.
    pub fn clear<F: RoomFactory>(
        &mut self,
        settings: &MazeSettings,
        factory: &mut F,
        mode: DestroyMode,
    ) {
        if !self.recolored.is_empty() {
            factory.recolor(&self.recolored, &settings.floor_material);
            self.recolored.clear();
        }
        for marker in self.markers.drain(..) {
            factory.destroy_room(marker, mode);
        }
    }

    fn place_markers<F: RoomFactory>(
        &mut self,
        layer: &Layer,
        entrance: GridPos,
        settings: &MazeSettings,
        factory: &mut F,
    ) {
        for &index in &layer.deadends {
            let pos = layer.cell(index).pos;
            // Markers sit on the base layer's floor plane.
            let world = room_world_pos(pos, entrance, 0, settings);
            let marker = factory.create_room(&settings.deadend_marker, world, 0.0);
            self.markers.push(marker);
        }
        debug!("Placed {} deadend markers", self.markers.len());
    }

    fn paint_longest_path<F: RoomFactory>(
        &mut self,
        layer: &Layer,
        settings: &MazeSettings,
        factory: &mut F,
    ) {
        let path = &layer.longest_path;
        for pair in path.windows(2) {
            let (here, there) = (pair[0], pair[1]);
            let here_pos = layer.cell(here).pos;
            let there_pos = layer.cell(there).pos;

            // Adjacent path cells differ on exactly one axis.
            let Some(dir) = DIRECTIONS
                .into_iter()
                .find(|d| d.step(here_pos, layer.size()) == Some(there_pos))
            else {
                continue;
            };

            if let Some(room) = layer.cell(here).room {
                self.recolored.extend(factory.tiles(room, Side::Middle));
                self.recolored.extend(factory.tiles(room, dir.into()));
            }
            if let Some(room) = layer.cell(there).room {
                self.recolored
                    .extend(factory.tiles(room, dir.opposite().into()));
            }
        }

        if !self.recolored.is_empty() {
            factory.recolor(&self.recolored, &settings.path_material);
        }
        debug!("Recolored {} longest-path tiles", self.recolored.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{RecordingFactory, WorldPos};
    use crate::generator::{base_entrance, Generator};
    use pretty_assertions::assert_eq;

    fn generated_layer(
        factory: &mut RecordingFactory,
        settings: &MazeSettings,
    ) -> (Layer, GridPos) {
        let entrance = base_entrance(settings.maze_size);
        let generator = Generator::new(settings, factory, settings.seed, 0, DestroyMode::Immediate);
        let (layer, _) = generator.generate(entrance).unwrap();
        (layer, entrance)
    }

    fn fixed_settings() -> MazeSettings {
        MazeSettings {
            maze_size: 6,
            seed: 11,
            use_random_seed: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_marker_per_deadend() {
        let settings = fixed_settings();
        let mut factory = RecordingFactory::new();
        let (layer, entrance) = generated_layer(&mut factory, &settings);

        let mut annotator = Annotator::new();
        annotator.refresh(&layer, entrance, &settings, &mut factory, DestroyMode::Immediate);

        assert_eq!(annotator.marker_handles().len(), layer.deadends.len());
        assert_eq!(
            factory.rooms_of_variant(&settings.deadend_marker).len(),
            layer.deadends.len()
        );
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let settings = fixed_settings();
        let mut factory = RecordingFactory::new();
        let (layer, entrance) = generated_layer(&mut factory, &settings);

        let mut annotator = Annotator::new();
        annotator.refresh(&layer, entrance, &settings, &mut factory, DestroyMode::Immediate);

        let marker_positions: Vec<WorldPos> = factory
            .rooms_of_variant(&settings.deadend_marker)
            .iter()
            .map(|h| factory.room(*h).unwrap().position)
            .collect();
        let painted_once = factory.tiles_with_material(&settings.path_material);
        assert!(!painted_once.is_empty());

        annotator.refresh(&layer, entrance, &settings, &mut factory, DestroyMode::Immediate);

        let marker_positions_again: Vec<WorldPos> = factory
            .rooms_of_variant(&settings.deadend_marker)
            .iter()
            .map(|h| factory.room(*h).unwrap().position)
            .collect();
        assert_eq!(marker_positions_again, marker_positions);
        assert_eq!(
            factory.tiles_with_material(&settings.path_material),
            painted_once
        );
    }

    #[test]
    fn test_clear_restores_floor() {
        let settings = fixed_settings();
        let mut factory = RecordingFactory::new();
        let (layer, entrance) = generated_layer(&mut factory, &settings);

        let mut annotator = Annotator::new();
        annotator.refresh(&layer, entrance, &settings, &mut factory, DestroyMode::Immediate);
        annotator.clear(&settings, &mut factory, DestroyMode::Immediate);

        assert!(factory.tiles_with_material(&settings.path_material).is_empty());
        assert!(factory.rooms_of_variant(&settings.deadend_marker).is_empty());
        assert!(annotator.marker_handles().is_empty());
        assert!(annotator.recolored_tiles().is_empty());
    }

    #[test]
    fn test_disabled_toggles_annotate_nothing() {
        let settings = MazeSettings {
            mark_deadends: false,
            mark_longest_path: false,
            ..fixed_settings()
        };
        let mut factory = RecordingFactory::new();
        let (layer, entrance) = generated_layer(&mut factory, &settings);

        let mut annotator = Annotator::new();
        annotator.refresh(&layer, entrance, &settings, &mut factory, DestroyMode::Immediate);

        assert!(annotator.marker_handles().is_empty());
        assert!(annotator.recolored_tiles().is_empty());
    }
}
