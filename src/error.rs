//! Error handling for Oubliette
//!
//! Configuration problems are rejected before any scene mutation; transition
//! problems leave the buffered layers untouched.

use thiserror::Error;

/// Result type alias for Oubliette operations
pub type Result<T> = std::result::Result<T, OublietteError>;

/// Main error type for Oubliette operations
#[derive(Error, Debug)]
pub enum OublietteError {
    // Configuration Errors
    #[error("Maze size {size} is too small (minimum 2)")]
    GridTooSmall { size: usize },

    #[error("Cutoff point {point} is outside (0, 100]")]
    CutoffOutOfRange { point: u8 },

    #[error("Missing required reference: {what}")]
    MissingReference { what: &'static str },

    #[error("Room variation count {variations} does not match weight count {weights}")]
    WeightCountMismatch { variations: usize, weights: usize },

    // Settings Store Errors
    #[error("No saved settings found at: {path}")]
    MissingSettings { path: String },

    // Layer Transition Errors
    #[error("Cannot move from layer {active} to layer {requested}: transitions must be adjacent")]
    NonAdjacentTransition { active: i32, requested: i32 },

    #[error("Cannot move to layer {requested}: layer 0 is the dungeon floor")]
    TransitionBelowGround { requested: i32 },

    // Generation State Errors
    #[error("Layer generation failed: {reason}")]
    GenerationError { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OublietteError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            OublietteError::GridTooSmall { .. } => "GRID_TOO_SMALL",
            OublietteError::CutoffOutOfRange { .. } => "CUTOFF_OUT_OF_RANGE",
            OublietteError::MissingReference { .. } => "MISSING_REFERENCE",
            OublietteError::WeightCountMismatch { .. } => "WEIGHT_COUNT_MISMATCH",
            OublietteError::MissingSettings { .. } => "MISSING_SETTINGS",
            OublietteError::NonAdjacentTransition { .. } => "NON_ADJACENT_TRANSITION",
            OublietteError::TransitionBelowGround { .. } => "TRANSITION_BELOW_GROUND",
            OublietteError::GenerationError { .. } => "GENERATION_ERROR",
            OublietteError::Io(_) => "IO_ERROR",
            OublietteError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is a configuration error (rejected before mutation)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OublietteError::GridTooSmall { .. }
                | OublietteError::CutoffOutOfRange { .. }
                | OublietteError::MissingReference { .. }
                | OublietteError::WeightCountMismatch { .. }
        )
    }
}
