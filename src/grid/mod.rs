//! Grid Module
//!
//! Maze grid primitives:
//! - Cell positions and direction algebra
//! - Layer state (cells, traversal stack, longest path, deadends)

pub mod cell;
pub mod layer;

pub use cell::{Cell, Direction, GridPos, Side, DIRECTIONS};
pub use layer::Layer;
