//! Deterministic mini-game module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Timestamps and viewport dimensions are injected by the caller
//! - No rendering or platform dependencies

pub mod catch;
pub mod puzzle;

pub use catch::{CatchSession, FallingItem, ItemKind, SessionPhase, Viewport};
pub use puzzle::{
    MoveOutcome, PUZZLE_IMAGES, PuzzleBoard, PuzzleImage, adjacent_indices, check_solved,
};
