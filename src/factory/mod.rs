//! Room Factory Module
//!
//! The seam between the maze core and whatever world owns the actual room
//! objects. The core never instantiates or destroys scene objects itself; it
//! requests creation and teardown through [`RoomFactory`] and keeps the
//! returned opaque handles.
//!
//! Every destroy/lookup must be safe on a stale or already-destroyed handle
//! and degrade to a no-op; the core calls them defensively.

pub mod recording;

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Side};

pub use recording::RecordingFactory;

/// Opaque handle to an externally-owned room instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomHandle(pub u64);

/// Opaque handle to a floor tile of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileHandle(pub u64);

/// Opaque handle to a door object of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoorHandle(pub u64);

/// World-space position handed to the factory when placing objects.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Which teardown path is in effect for a destroy request.
///
/// Immediate teardown is the authoring-time path; Deferred destruction lands
/// at the end of the owning world's frame. The core only tags the request,
/// the factory implementation decides what each mode means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestroyMode {
    #[default]
    Immediate,
    Deferred,
}

/// Capability consumed by the maze core to build and tear down rooms.
///
/// All calls are synchronous: creation and destruction take effect before
/// the next generator step runs, since wall removal and transition-room
/// placement depend on handles already existing. If the surrounding world
/// has a concurrent mutator, the implementation must serialize access.
pub trait RoomFactory {
    /// Instantiate a room of the named variant at `position` with the given
    /// yaw in degrees.
    fn create_room(&mut self, variant: &str, position: WorldPos, rotation: f32) -> RoomHandle;

    /// Destroy a room. No-op for stale handles.
    fn destroy_room(&mut self, handle: RoomHandle, mode: DestroyMode);

    /// Look up the door of a room in `dir`, if one still exists.
    fn get_door(&mut self, handle: RoomHandle, dir: Direction) -> Option<DoorHandle>;

    /// Destroy the door of a room in `dir`. No-op when the room or door is
    /// already gone.
    fn destroy_door(&mut self, handle: RoomHandle, dir: Direction);

    /// Floor tiles of a room on the given side. Empty for stale handles.
    fn tiles(&mut self, handle: RoomHandle, side: Side) -> Vec<TileHandle>;

    /// Repaint the given tiles with the named material. Stale tiles are
    /// skipped.
    fn recolor(&mut self, tiles: &[TileHandle], material: &str);
}
