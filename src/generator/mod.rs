//! Generator Module
//!
//! The recursive-backtracking engine and its supporting pieces:
//! - Randomized depth-first traversal over a Layer
//! - Weighted room-variation selection

pub mod engine;
pub mod variation;

pub use engine::{base_entrance, room_world_pos, GenerationReport, Generator};
pub use variation::{pick_weighted, select_room_variant};
