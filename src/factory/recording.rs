//! In-memory room factory.
//!
//! A complete stand-in world used by the CLI and the test suites: it creates
//! numbered handles, keeps per-room door and tile records, and tolerates
//! stale handles everywhere, so the core can be exercised without any real
//! scene behind it.

use std::collections::HashMap;

use crate::factory::{DestroyMode, DoorHandle, RoomFactory, RoomHandle, TileHandle, WorldPos};
use crate::grid::{Direction, Side, DIRECTIONS};

/// Material tiles carry until something repaints them.
pub const DEFAULT_TILE_MATERIAL: &str = "default";

const SIDES: [Side; 5] = [Side::Middle, Side::North, Side::East, Side::South, Side::West];

/// Book-keeping for one live room.
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub variant: String,
    pub position: WorldPos,
    pub rotation: f32,
    /// Door handle per direction; `None` once destroyed.
    pub doors: [Option<DoorHandle>; 4],
    tiles: HashMap<Side, Vec<TileHandle>>,
}

/// An in-memory [`RoomFactory`].
#[derive(Debug, Default)]
pub struct RecordingFactory {
    next_id: u64,
    rooms: HashMap<RoomHandle, RoomRecord>,
    tile_materials: HashMap<TileHandle, String>,
    destroyed_deferred: usize,
    destroyed_immediate: usize,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Number of rooms currently alive in the world.
    pub fn live_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Live rooms of the named variant.
    pub fn rooms_of_variant(&self, variant: &str) -> Vec<RoomHandle> {
        let mut handles: Vec<RoomHandle> = self
            .rooms
            .iter()
            .filter(|(_, r)| r.variant == variant)
            .map(|(h, _)| *h)
            .collect();
        handles.sort_by_key(|h| h.0);
        handles
    }

    /// Record for a live room.
    pub fn room(&self, handle: RoomHandle) -> Option<&RoomRecord> {
        self.rooms.get(&handle)
    }

    /// Current material of a tile, if the tile's room is still alive.
    pub fn tile_material(&self, tile: TileHandle) -> Option<&str> {
        self.tile_materials.get(&tile).map(String::as_str)
    }

    /// Live tiles currently painted with `material`.
    pub fn tiles_with_material(&self, material: &str) -> Vec<TileHandle> {
        let mut tiles: Vec<TileHandle> = self
            .tile_materials
            .iter()
            .filter(|(_, m)| m.as_str() == material)
            .map(|(t, _)| *t)
            .collect();
        tiles.sort();
        tiles
    }

    /// How many destroys were tagged with each teardown path.
    pub fn destroy_counts(&self) -> (usize, usize) {
        (self.destroyed_immediate, self.destroyed_deferred)
    }
}

impl RoomFactory for RecordingFactory {
    fn create_room(&mut self, variant: &str, position: WorldPos, rotation: f32) -> RoomHandle {
        let handle = RoomHandle(self.next_id());

        let mut doors = [None; 4];
        for dir in DIRECTIONS {
            doors[dir.index()] = Some(DoorHandle(self.next_id()));
        }

        let mut tiles = HashMap::new();
        for side in SIDES {
            let tile = TileHandle(self.next_id());
            self.tile_materials
                .insert(tile, DEFAULT_TILE_MATERIAL.to_string());
            tiles.insert(side, vec![tile]);
        }

        self.rooms.insert(
            handle,
            RoomRecord {
                variant: variant.to_string(),
                position,
                rotation,
                doors,
                tiles,
            },
        );
        handle
    }

    fn destroy_room(&mut self, handle: RoomHandle, mode: DestroyMode) {
        let Some(record) = self.rooms.remove(&handle) else {
            return; // stale handle, tolerated
        };
        for tiles in record.tiles.values() {
            for tile in tiles {
                self.tile_materials.remove(tile);
            }
        }
        match mode {
            DestroyMode::Immediate => self.destroyed_immediate += 1,
            DestroyMode::Deferred => self.destroyed_deferred += 1,
        }
    }

    fn get_door(&mut self, handle: RoomHandle, dir: Direction) -> Option<DoorHandle> {
        self.rooms.get(&handle).and_then(|r| r.doors[dir.index()])
    }

    fn destroy_door(&mut self, handle: RoomHandle, dir: Direction) {
        if let Some(record) = self.rooms.get_mut(&handle) {
            record.doors[dir.index()] = None;
        }
    }

    fn tiles(&mut self, handle: RoomHandle, side: Side) -> Vec<TileHandle> {
        self.rooms
            .get(&handle)
            .and_then(|r| r.tiles.get(&side).cloned())
            .unwrap_or_default()
    }

    fn recolor(&mut self, tiles: &[TileHandle], material: &str) {
        for tile in tiles {
            if let Some(entry) = self.tile_materials.get_mut(tile) {
                *entry = material.to_string();
            }
        }
    }
}
