//! Depth-bounded alpha-beta search with a bounded memo cache

use crate::cache::LruCache;
use crate::game::{Board, Move};
use crate::pieces::Player;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Transposition-cache entry count unless overridden
const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

/// Default RNG seed; games are reproducible unless a seed is supplied
const DEFAULT_SEED: u64 = 42;

/// Window bound wider than any reachable score
const INFINITY: i32 = i32::MAX;

// ============================================================================
// POSITION CAPABILITIES
// ============================================================================

/// What the search needs from a game state: move enumeration, move
/// application, static scoring, and structural equality/hash for cache
/// keying. Any rule variant providing these can share the engine.
pub trait GamePosition: Clone + Eq + Hash {
    type Move: Clone + PartialEq + fmt::Debug;

    /// All legal moves for `player`; empty means `player` has lost
    fn legal_moves(&self, player: Player) -> Vec<Self::Move>;

    /// Validate and commit a move; `false` leaves the state untouched
    fn apply_if_valid(&mut self, player: Player, mv: &Self::Move) -> bool;

    /// Static evaluation from `player`'s perspective
    fn score(&self, player: Player) -> i32;
}

impl GamePosition for Board {
    type Move = Move;

    fn legal_moves(&self, player: Player) -> Vec<Move> {
        Board::legal_moves(self, player)
    }

    fn apply_if_valid(&mut self, player: Player, mv: &Move) -> bool {
        Board::apply_if_valid(self, player, mv)
    }

    fn score(&self, player: Player) -> i32 {
        Board::score(self, player)
    }
}

// ============================================================================
// CACHE ENTRIES
// ============================================================================

/// How a cached score relates to the true minimax value. Pruning makes the
/// search fail-soft: a score produced under a cutoff is only a bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

/// Memo entry for one position. Only trustworthy for queries whose requested
/// draft does not exceed `draft`, and only through the lens of `bound`.
#[derive(Clone, Debug)]
struct CacheEntry<M> {
    draft: u32,
    score: i32,
    bound: Bound,
    best_reply: Option<M>,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Programming-contract violations surfaced by the engine. A player with no
/// legal moves is an ordinary game-over outcome, not an error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The move the search settled on failed board validation at the root.
    #[error("search chose a move the board rejected: {0}")]
    RejectedMove(String),
}

// ============================================================================
// ALPHA-BETA ENGINE
// ============================================================================

/// Adversarial search over any [`GamePosition`]: fail-soft alpha-beta with
/// an LRU-bounded transposition cache and cached-best-reply move ordering.
pub struct AlphaBetaEngine<P: GamePosition> {
    player: Player,
    depth: u32,
    cache: LruCache<P, CacheEntry<P::Move>>,
    rng: ChaCha8Rng,
    last_score: Option<i32>,
}

impl<P: GamePosition> AlphaBetaEngine<P> {
    pub fn new(player: Player, depth: u32) -> Self {
        Self::with_seed(player, depth, DEFAULT_SEED)
    }

    pub fn with_seed(player: Player, depth: u32, seed: u64) -> Self {
        Self {
            player,
            depth,
            cache: LruCache::new(DEFAULT_CACHE_CAPACITY),
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_score: None,
        }
    }

    /// Replace the transposition cache with one of the given capacity
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = LruCache::new(capacity);
        self
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Predicted score of the most recently chosen move
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }

    /// Pick the best move for this engine's player and apply it to `board`.
    /// `Ok(None)` means the player has no legal move and has lost.
    pub fn choose_move(&mut self, board: &mut P) -> Result<Option<P::Move>, SearchError> {
        let mut moves = board.legal_moves(self.player);
        if moves.is_empty() {
            self.last_score = None;
            return Ok(None);
        }

        // Shuffle first so equally scored moves are picked evenly.
        moves.shuffle(&mut self.rng);

        let mut best: Option<(P::Move, i32)> = None;
        for mv in moves {
            let score = self.alpha_beta(board, &mv, self.player, self.depth, -INFINITY, INFINITY);
            let better = match &best {
                Some((_, held)) => score > *held,
                None => true,
            };
            if better {
                best = Some((mv, score));
            }
        }
        let Some((chosen, score)) = best else {
            return Ok(None);
        };

        if !board.apply_if_valid(self.player, &chosen) {
            return Err(SearchError::RejectedMove(format!("{chosen:?}")));
        }
        self.last_score = Some(score);

        // Remember what the reached position should be worth.
        self.cache.put(
            board.clone(),
            CacheEntry {
                draft: self.depth,
                score,
                bound: Bound::Exact,
                best_reply: None,
            },
        );

        Ok(Some(chosen))
    }

    /// Score of `moving` playing `mv` on `board` and both sides then playing
    /// on for `draft` further plies, from the engine player's perspective.
    fn alpha_beta(
        &mut self,
        board: &P,
        mv: &P::Move,
        moving: Player,
        draft: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        let mut child = board.clone();
        if !child.apply_if_valid(moving, mv) {
            // Dead branch. The generator never produces these, but an
            // inconsistent caller gets a static score, not a crash.
            return board.score(self.player);
        }

        // The cache is keyed by the position reached after the move.
        let cached = self.cache.get(&child).cloned();
        if let Some(entry) = &cached {
            if entry.draft >= draft {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower if entry.score >= beta => return entry.score,
                    Bound::Upper if entry.score <= alpha => return entry.score,
                    _ => {}
                }
            }
        }

        if draft == 0 {
            return child.score(self.player);
        }

        let next = moving.opponent();
        let replies = child.legal_moves(next);
        if replies.is_empty() {
            return child.score(self.player);
        }

        let ordered = order_replies(
            &child,
            next,
            self.player,
            replies,
            cached.and_then(|entry| entry.best_reply),
        );

        let maximizing = next == self.player;
        let (orig_alpha, orig_beta) = (alpha, beta);
        let mut best_value = if maximizing { -INFINITY } else { INFINITY };
        let mut best_reply: Option<P::Move> = None;

        for reply in &ordered {
            let value = self.alpha_beta(&child, reply, next, draft - 1, alpha, beta);
            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_reply = Some(reply.clone());
                }
                alpha = alpha.max(value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_reply = Some(reply.clone());
                }
                beta = beta.min(value);
            }
            // Neither side will steer into the other's guaranteed range.
            if beta <= alpha {
                break;
            }
        }

        // Fail-soft classification against the window this node was given.
        let bound = if best_value <= orig_alpha {
            Bound::Upper
        } else if best_value >= orig_beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.put(
            child,
            CacheEntry {
                draft,
                score: best_value,
                bound,
                best_reply,
            },
        );

        best_value
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Order `mover`'s replies on `position`: the cached best reply for this
/// exact position first, the rest by one-ply static lookahead toward the
/// mover's objective, so the likely cutoff move is tried early.
fn order_replies<P: GamePosition>(
    position: &P,
    mover: Player,
    perspective: Player,
    replies: Vec<P::Move>,
    cached_best: Option<P::Move>,
) -> Vec<P::Move> {
    let mut scored: Vec<(P::Move, i32)> = replies
        .into_iter()
        .map(|reply| {
            let mut next = position.clone();
            let score = if next.apply_if_valid(mover, &reply) {
                next.score(perspective)
            } else {
                position.score(perspective)
            };
            (reply, score)
        })
        .collect();

    if mover == perspective {
        scored.sort_by(|a, b| b.1.cmp(&a.1));
    } else {
        scored.sort_by(|a, b| a.1.cmp(&b.1));
    }

    let mut ordered: Vec<P::Move> = scored.into_iter().map(|(mv, _)| mv).collect();
    if let Some(best) = cached_best {
        if let Some(found) = ordered.iter().position(|mv| *mv == best) {
            let mv = ordered.remove(found);
            ordered.insert(0, mv);
        }
    }
    ordered
}

// ============================================================================
// TESTS
// ============================================================================
