//! Move-legality seam. Positions only ever advance through a `Rules`
//! implementation; the parser itself never decides whether a move is legal.

use std::fmt;

use shakmaty::{san::SanPlus, Chess, Move, Position};
use thiserror::Error;

/// A move token rejected against the current position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{notation}: {reason}")]
pub struct IllegalMove {
    pub notation: String,
    pub reason: String,
}

/// Legality and application authority consulted by the tree builder.
///
/// Implementations interpret a textual move against a position and either
/// produce the resulting position plus a canonical move record, or reject it.
pub trait Rules {
    type Position: Clone;
    type Move: Clone + fmt::Debug;

    fn initial_position(&self) -> Self::Position;

    fn try_move(
        &self,
        position: &Self::Position,
        notation: &str,
    ) -> Result<(Self::Position, Self::Move), IllegalMove>;
}

/// Standard chess backed by shakmaty SAN parsing.
///
/// Accepts check/mate suffixes and trailing `!`/`?` quality suffixes glued
/// onto the move token; ambiguous-but-resolvable notation is left to the SAN
/// disambiguation rules.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl Rules for StandardRules {
    type Position = Chess;
    type Move = Move;

    fn initial_position(&self) -> Chess {
        Chess::default()
    }

    fn try_move(&self, position: &Chess, notation: &str) -> Result<(Chess, Move), IllegalMove> {
        let bare = notation.trim_end_matches(&['!', '?'][..]);
        let san: SanPlus = bare.parse().map_err(|e| IllegalMove {
            notation: notation.to_string(),
            reason: format!("unreadable move: {e}"),
        })?;
        let mv = san.san.to_move(position).map_err(|e| IllegalMove {
            notation: notation.to_string(),
            reason: format!("not legal here: {e}"),
        })?;
        let mut next = position.clone();
        next.play_unchecked(mv.clone());
        Ok((next, mv))
    }
}
