//! Annotated-game-notation parsing: movetext tokenizer, move-tree builder,
//! and the node-keyed annotation store.

pub mod annotations;
mod builder;
pub mod error;
pub mod game;
pub mod metadata;
pub mod rules;
pub mod token;
pub mod tree;

pub use game::{parse, ParsedGame};
