//! Navigation error types. All recoverable: the cursor is left untouched.

use notation_core::tree::VariationId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no branch choice is pending")]
    NoChoicePending,

    #[error("a branch choice is pending and must be answered first")]
    ChoicePending,

    #[error("variation {0:?} is not among the pending alternatives")]
    UnknownVariation(VariationId),

    #[error("ply {ply} out of range (main line has {len} moves)")]
    PlyOutOfRange { ply: usize, len: usize },
}
