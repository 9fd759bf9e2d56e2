//! Layer Manager
//!
//! Buffers three vertically adjacent maze layers (below / middle / above)
//! for infinite vertical mode. Moving one layer up or down evicts the
//! farthest buffered layer, shifts the other two, and lazily generates the
//! next layer out, seeding its entrance with the recorded exit of the layer
//! beneath it.
//!
//! Each slot owns its `Layer`; teardown destroys exactly the handles that
//! layer tracked, never a scene-wide sweep.

use log::{debug, info};

use crate::error::{OublietteError, Result};
use crate::factory::{DestroyMode, RoomFactory};
use crate::generator::{base_entrance, room_world_pos, GenerationReport, Generator};
use crate::grid::{Direction, GridPos, Layer, DIRECTIONS};
use crate::settings::MazeSettings;

/// One buffered layer plus the context it was generated with.
#[derive(Debug, Clone)]
pub struct BufferedLayer {
    pub index: i32,
    pub entrance: GridPos,
    pub layer: Layer,
}

/// Holds the three-layer ring and the per-layer exit ledger.
#[derive(Debug, Default)]
pub struct LayerManager {
    below: Option<BufferedLayer>,
    middle: Option<BufferedLayer>,
    above: Option<BufferedLayer>,
    active_index: i32,
    /// Exit (longest-path endpoint) recorded per completed layer index;
    /// the entrance position of the layer above it.
    exit_positions: Vec<GridPos>,
    destroy_mode: DestroyMode,
}

impl LayerManager {
    pub fn new(destroy_mode: DestroyMode) -> Self {
        Self {
            destroy_mode,
            ..Self::default()
        }
    }

    pub fn active_index(&self) -> i32 {
        self.active_index
    }

    pub fn below(&self) -> Option<&BufferedLayer> {
        self.below.as_ref()
    }

    pub fn middle(&self) -> Option<&BufferedLayer> {
        self.middle.as_ref()
    }

    pub fn above(&self) -> Option<&BufferedLayer> {
        self.above.as_ref()
    }

    pub fn exit_of(&self, layer_index: i32) -> Option<GridPos> {
        usize::try_from(layer_index)
            .ok()
            .and_then(|i| self.exit_positions.get(i))
            .copied()
    }

    /// Generate the initial below/middle/above stack (layers 0, 1, 2) and
    /// park the player on layer 1.
    pub fn bootstrap<F: RoomFactory>(
        &mut self,
        settings: &MazeSettings,
        seed: u64,
        factory: &mut F,
    ) -> Result<Vec<GenerationReport>> {
        self.destroy_all(factory);

        let mut reports = Vec::with_capacity(3);
        for index in 0..3 {
            let (buffered, report) = self.generate_layer(index, settings, seed, factory)?;
            match index {
                0 => self.below = Some(buffered),
                1 => self.middle = Some(buffered),
                _ => self.above = Some(buffered),
            }
            reports.push(report);
        }
        self.active_index = 1;
        info!("Bootstrapped layers 0..=2, active layer 1");
        Ok(reports)
    }

    /// Move the active layer to `target`. Only steps of one layer are
    /// supported; anything else is rejected with the buffers untouched.
    pub fn update_layer<F: RoomFactory>(
        &mut self,
        target: i32,
        settings: &MazeSettings,
        seed: u64,
        factory: &mut F,
    ) -> Result<()> {
        if target == self.active_index {
            return Ok(());
        }
        match target - self.active_index {
            1 => self.ascend(target, settings, seed, factory),
            -1 => self.descend(target, settings, seed, factory),
            _ => Err(OublietteError::NonAdjacentTransition {
                active: self.active_index,
                requested: target,
            }),
        }
    }

    fn ascend<F: RoomFactory>(
        &mut self,
        target: i32,
        settings: &MazeSettings,
        seed: u64,
        factory: &mut F,
    ) -> Result<()> {
        // Generate first so a failure leaves the buffers untouched.
        let (fresh, _) = self.generate_layer(target + 1, settings, seed, factory)?;

        if let Some(evicted) = self.below.take() {
            self.destroy_layer(evicted, factory);
        }
        self.below = self.middle.take();
        self.middle = self.above.take();
        self.above = Some(fresh);
        self.active_index = target;
        debug!("Ascended to layer {target}");
        Ok(())
    }

    fn descend<F: RoomFactory>(
        &mut self,
        target: i32,
        settings: &MazeSettings,
        seed: u64,
        factory: &mut F,
    ) -> Result<()> {
        if target < 1 {
            // Layer 0 is the floor; there is nothing to buffer beneath it.
            return Err(OublietteError::TransitionBelowGround { requested: target });
        }

        let (fresh, _) = self.generate_layer(target - 1, settings, seed, factory)?;

        if let Some(evicted) = self.above.take() {
            self.destroy_layer(evicted, factory);
        }
        self.above = self.middle.take();
        self.middle = self.below.take();
        self.below = Some(fresh);
        self.active_index = target;
        debug!("Descended to layer {target}");
        Ok(())
    }

    /// Generate one layer, record its exit, and (in infinite mode) splice in
    /// the stair and start transition rooms.
    pub fn generate_layer<F: RoomFactory>(
        &mut self,
        index: i32,
        settings: &MazeSettings,
        seed: u64,
        factory: &mut F,
    ) -> Result<(BufferedLayer, GenerationReport)> {
        let entrance = if index == 0 {
            base_entrance(settings.maze_size)
        } else {
            self.exit_of(index - 1)
                .ok_or_else(|| OublietteError::GenerationError {
                    reason: format!("no recorded exit for layer {} to enter layer {index}", index - 1),
                })?
        };

        let generator = Generator::new(settings, factory, seed, index, self.destroy_mode);
        let (mut layer, report) = generator.generate(entrance)?;

        self.record_exit(index, report.exit);

        if settings.infinite_vertical {
            self.place_stair_room(&mut layer, index, entrance, settings, factory);
            if index > 0 {
                self.place_start_room(&mut layer, index, entrance, settings, factory);
            }
        }

        Ok((
            BufferedLayer {
                index,
                entrance,
                layer,
            },
            report,
        ))
    }

    fn record_exit(&mut self, index: i32, exit: GridPos) {
        let Ok(index) = usize::try_from(index) else {
            return;
        };
        if self.exit_positions.len() <= index {
            self.exit_positions.resize(index + 1, GridPos::default());
        }
        self.exit_positions[index] = exit;
    }

    /// Swap the longest-path end room for the stair room connecting to the
    /// next layer up, rotated so its entrance faces the cell's open doorway.
    fn place_stair_room<F: RoomFactory>(
        &self,
        layer: &mut Layer,
        index: i32,
        entrance: GridPos,
        settings: &MazeSettings,
        factory: &mut F,
    ) {
        let Some(end) = layer.end_cell else {
            return;
        };
        let yaw = layer
            .cell(end)
            .first_doorway()
            .map(Direction::entrance_yaw)
            .unwrap_or(0.0);
        let world = room_world_pos(layer.cell(end).pos, entrance, index, settings);

        if let Some(old) = layer.cell_mut(end).room.take() {
            factory.destroy_room(old, self.destroy_mode);
        }
        let stair = factory.create_room(&settings.stair_room, world, yaw);
        layer.cell_mut(end).room = Some(stair);
    }

    /// Swap the entrance cell's room for the start room arriving from the
    /// layer below, re-opening the same doorways on the replacement.
    fn place_start_room<F: RoomFactory>(
        &self,
        layer: &mut Layer,
        index: i32,
        entrance: GridPos,
        settings: &MazeSettings,
        factory: &mut F,
    ) {
        let Some(cell_index) = layer.index_of(entrance) else {
            return;
        };
        let doorways = layer.cell(cell_index).doorways;
        let world = room_world_pos(entrance, entrance, index, settings);

        let start = factory.create_room(&settings.start_room, world, 0.0);
        for dir in DIRECTIONS {
            if doorways[dir.index()] {
                factory.destroy_door(start, dir);
            }
        }

        if let Some(old) = layer.cell_mut(cell_index).room.take() {
            factory.destroy_room(old, self.destroy_mode);
        }
        layer.cell_mut(cell_index).room = Some(start);
    }

    /// Destroy one evicted layer's tracked rooms.
    fn destroy_layer<F: RoomFactory>(&self, buffered: BufferedLayer, factory: &mut F) {
        debug!("Evicting layer {}", buffered.index);
        for handle in buffered.layer.room_handles() {
            factory.destroy_room(handle, self.destroy_mode);
        }
    }

    /// Tear down every buffered layer and forget the exit ledger.
    pub fn destroy_all<F: RoomFactory>(&mut self, factory: &mut F) {
        for slot in [self.below.take(), self.middle.take(), self.above.take()] {
            if let Some(buffered) = slot {
                self.destroy_layer(buffered, factory);
            }
        }
        self.exit_positions.clear();
        self.active_index = 0;
    }
}
