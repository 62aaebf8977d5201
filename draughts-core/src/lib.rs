//! Draughts core - game engine and AI
//!
//! This crate provides the core logic for the draughts engine:
//! - Board geometry (8x8 grid, diagonal directions)
//! - Piece kinds and the two players
//! - Board state, move generation and validation
//! - Bounded LRU cache used as the search memo
//! - Depth-bounded alpha-beta AI

pub mod ai;
pub mod board;
pub mod cache;
pub mod game;
pub mod pieces;

// Re-exports for convenient access
pub use ai::{AlphaBetaEngine, Bound, GamePosition, SearchError};
pub use board::{Square, BOARD_SIZE, DIRECTIONS, MAX_SCORE, MIN_SCORE};
pub use cache::LruCache;
pub use game::{Board, Move, MoveEffect};
pub use pieces::{PieceKind, Player};
