//! The maze generation engine.
//!
//! Builds one `Layer` with iterative recursive backtracking: a randomized
//! depth-first traversal that carves a spanning tree of doorways through the
//! grid, recording deadends and the longest path, with an optional early
//! cutoff once a configured share of cells has been visited.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{OublietteError, Result};
use crate::factory::{DestroyMode, RoomFactory, WorldPos};
use crate::grid::{Direction, GridPos, Layer};
use crate::generator::variation::select_room_variant;
use crate::settings::MazeSettings;

/// World position of a cell's room: grid coordinates scaled by the tile
/// size, lifted by the layer height, shifted so the entrance row lands on
/// the configured origin.
pub fn room_world_pos(
    pos: GridPos,
    entrance: GridPos,
    layer_index: i32,
    settings: &MazeSettings,
) -> WorldPos {
    let mut world = settings.origin;
    world.x += pos.x as f32 * settings.tile_size;
    world.y += layer_index as f32 * settings.layer_height;
    world.z += pos.z as f32 * settings.tile_size;
    if layer_index == 0 {
        world.z -= entrance.z as f32 * settings.tile_size;
    } else {
        world.z -= settings.tile_size;
    }
    world
}

/// Entrance coordinate of the base layer: west edge, middle row.
pub fn base_entrance(size: usize) -> GridPos {
    let z = if size % 2 == 1 {
        (size - 1) / 2
    } else {
        size / 2 - 1
    };
    GridPos::new(0, z)
}

/// Summary of one finished generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub layer_index: i32,
    pub seed: u64,
    pub entrance: GridPos,
    /// Endpoint of the longest discovered path; the entrance position of the
    /// next layer up.
    pub exit: GridPos,
    pub visited_cells: usize,
    pub deadend_count: usize,
    pub longest_path_len: usize,
    pub cutoff_fired: bool,
}

/// Drives recursive backtracking over a single [`Layer`].
///
/// Not reentrant: one generator mutates one layer to completion within a
/// single call. All scene side effects go through the supplied factory.
pub struct Generator<'a, F: RoomFactory> {
    settings: &'a MazeSettings,
    factory: &'a mut F,
    layer_index: i32,
    seed: u64,
    rng: ChaCha8Rng,
    destroy_mode: DestroyMode,
    visited: usize,
    cutoff_fired: bool,
    backtracking: bool,
}

impl<'a, F: RoomFactory> Generator<'a, F> {
    /// Seed the per-layer random stream. Layers draw from distinct streams
    /// (`seed * (layer_index + 1)`) so each level of a stack differs.
    pub fn new(
        settings: &'a MazeSettings,
        factory: &'a mut F,
        seed: u64,
        layer_index: i32,
        destroy_mode: DestroyMode,
    ) -> Self {
        let stream = seed.wrapping_mul(layer_index as u64 + 1);
        Self {
            settings,
            factory,
            layer_index,
            seed,
            rng: ChaCha8Rng::seed_from_u64(stream),
            destroy_mode,
            visited: 0,
            cutoff_fired: false,
            backtracking: false,
        }
    }

    /// Build the layer and run traversal from `entrance` until the stack
    /// empties or the cutoff fires.
    pub fn generate(mut self, entrance: GridPos) -> Result<(Layer, GenerationReport)> {
        self.settings.validate()?;

        let mut layer = Layer::new(self.settings.maze_size)?;
        self.setup_grid(&mut layer, entrance)?;

        let entrance_index = layer
            .index_of(entrance)
            .ok_or_else(|| OublietteError::GenerationError {
                reason: format!(
                    "entrance ({}, {}) outside a size-{} grid",
                    entrance.x,
                    entrance.z,
                    layer.size()
                ),
            })?;

        self.traverse(&mut layer, entrance_index);

        if self.cutoff_fired {
            self.destroy_unvisited(&mut layer);
        }

        // Flush deferred door teardowns on both exits.
        for (room, dir) in layer.pending_doors.drain(..).collect::<Vec<_>>() {
            self.factory.destroy_door(room, dir);
        }

        let exit = layer
            .end_cell
            .map(|i| layer.cell(i).pos)
            .unwrap_or(entrance);

        let report = GenerationReport {
            layer_index: self.layer_index,
            seed: self.seed,
            entrance,
            exit,
            visited_cells: self.visited,
            deadend_count: layer.deadends.len(),
            longest_path_len: layer.longest_path.len(),
            cutoff_fired: self.cutoff_fired,
        };

        info!(
            "Generated layer {}: {} visited, {} deadends, longest path {}{}",
            report.layer_index,
            report.visited_cells,
            report.deadend_count,
            report.longest_path_len,
            if report.cutoff_fired { " (cutoff)" } else { "" }
        );

        Ok((layer, report))
    }

    /// Instantiate every cell's room through the factory and open the
    /// outward-facing doorway of the base layer's entrance.
    fn setup_grid(&mut self, layer: &mut Layer, entrance: GridPos) -> Result<()> {
        let size = layer.size();
        for index in 0..size * size {
            let variant = select_room_variant(self.settings, &mut self.rng).to_string();
            let pos = layer.cell(index).pos;
            let world = room_world_pos(pos, entrance, self.layer_index, self.settings);
            let handle = self.factory.create_room(&variant, world, 0.0);
            layer.cell_mut(index).room = Some(handle);
        }

        if self.layer_index == 0 {
            // The base entrance sits on the west edge; open it to the
            // outside. The outward bit has no partner cell.
            let index = entrance.index(size);
            layer.cell_mut(index).doorways[Direction::West.index()] = true;
            if let Some(room) = layer.cell(index).room {
                self.factory.destroy_door(room, Direction::West);
            }
        }
        Ok(())
    }

    /// The randomized depth-first loop.
    fn traverse(&mut self, layer: &mut Layer, entrance_index: usize) {
        let mut current = entrance_index;

        loop {
            if !layer.cell(current).visited {
                layer.cell_mut(current).visited = true;
                self.visited += 1;
            }

            let neighbors = layer.unvisited_neighbors(current);
            if !neighbors.is_empty() {
                self.backtracking = false;
                let next = neighbors[self.rng.gen_range(0..neighbors.len())];
                layer.stack.push(current);
                self.remove_walls(layer, current, next);
                current = next;
                continue;
            }

            if layer.stack.is_empty() {
                // Fully backtracked to the entrance: spanning tree complete.
                break;
            }

            if !self.backtracking {
                self.backtracking = true;
                layer.deadends.push(current);
                debug!(
                    "Deadend at ({}, {}), path depth {}",
                    layer.cell(current).pos.x,
                    layer.cell(current).pos.z,
                    layer.stack.len()
                );

                // Capture the path by value; the stack keeps mutating after
                // this point and must not alias the record.
                if layer.longest_path.len() < layer.stack.len() {
                    layer.longest_path = layer.stack.clone();
                    layer.end_cell = Some(current);
                }

                if self.settings.cutoff && self.cutoff_reached(layer) {
                    self.cutoff_fired = true;
                }
            }

            if let Some(previous) = layer.stack.pop() {
                current = previous;
            }
            if self.cutoff_fired {
                break;
            }
        }

        layer.current = Some(current);
    }

    /// Whether the configured share of this layer's cells has been visited.
    fn cutoff_reached(&self, layer: &Layer) -> bool {
        let total = (layer.size() * layer.size()) as f32;
        (self.visited as f32 / total) * 100.0 >= f32::from(self.settings.cutoff_point)
    }

    /// Open the shared wall between two adjacent cells and queue both rooms'
    /// doors for the end-of-generation flush. Doors stay in place while
    /// traversal runs; the flush is the sole teardown path.
    fn remove_walls(&mut self, layer: &mut Layer, a: usize, b: usize) {
        let Ok(dir) = layer.open_wall_pair(a, b) else {
            // Non-adjacent pairs are structurally excluded by neighbor
            // computation.
            return;
        };

        for (index, door_dir) in [(a, dir), (b, dir.opposite())] {
            if let Some(room) = layer.cell(index).room {
                if self.factory.get_door(room, door_dir).is_some() {
                    layer.pending_doors.push((room, door_dir));
                }
            }
        }
    }

    /// Cutoff keeps the partial maze; every unvisited cell's room goes away.
    fn destroy_unvisited(&mut self, layer: &mut Layer) {
        let unvisited: Vec<usize> = (0..layer.cells().len())
            .filter(|&i| !layer.cell(i).visited)
            .collect();
        debug!("Cutoff fired, destroying {} unvisited rooms", unvisited.len());
        for index in unvisited {
            if let Some(room) = layer.cell_mut(index).room.take() {
                self.factory.destroy_room(room, self.destroy_mode);
            }
        }
    }
}
