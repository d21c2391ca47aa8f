//! Playback over parsed game trees: the cursor state machine and autoplay.

pub mod autoplay;
pub mod error;
pub mod navigator;

pub use autoplay::Autoplay;
pub use error::NavigationError;
pub use navigator::{BranchChoice, Cursor, Navigator, PositionChanged, Step};
