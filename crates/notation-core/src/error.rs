//! Parse error taxonomy. All-or-nothing: any of these aborts the parse and
//! no partial tree is returned.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unbalanced variation bracket at byte {offset}")]
    UnbalancedVariation { offset: usize },

    #[error("unterminated comment at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("variation opened before any move at byte {offset}")]
    DanglingVariation { offset: usize },

    #[error("illegal move `{notation}` at byte {offset}: {reason}")]
    IllegalMove {
        notation: String,
        offset: usize,
        reason: String,
    },
}

impl ParseError {
    /// Byte offset in the original input where recovery became impossible.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnbalancedVariation { offset }
            | ParseError::UnterminatedComment { offset }
            | ParseError::DanglingVariation { offset }
            | ParseError::IllegalMove { offset, .. } => *offset,
        }
    }
}
