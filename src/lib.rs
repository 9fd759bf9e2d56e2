//! Oubliette - Procedural Layered Maze Generator
//!
//! Oubliette carves grid-based maze/dungeon layouts with iterative
//! recursive backtracking, optionally stacking layers vertically with
//! connecting transition rooms, and regenerates any maze deterministically
//! from its seed.
//!
//! # Architecture
//!
//! - `grid`: cells, direction algebra and per-layer traversal state
//! - `generator`: the randomized depth-first engine and room variation picks
//! - `manager`: the three-layer buffer for infinite vertical mode
//! - `annotate`: deadend markers and longest-path highlighting
//! - `factory`: the Room Factory seam to whatever world owns the scene
//! - `settings`: the flat parameter record and its persistence
//! - `dungeon`: the caller-facing facade

pub mod annotate;
pub mod cli;
pub mod dungeon;
pub mod error;
pub mod factory;
pub mod generator;
pub mod grid;
pub mod manager;
pub mod settings;

pub use dungeon::Dungeon;
pub use error::{OublietteError, Result};
