//! Parse entry point: headers, tokens, tree, and annotations in one pass.

use std::sync::Arc;

use tracing::debug;

use crate::annotations::AnnotationStore;
use crate::builder;
use crate::error::ParseError;
use crate::metadata::{self, GameMetadata};
use crate::rules::Rules;
use crate::token;
use crate::tree::GameTree;

/// Everything produced by one parse. Re-parsing builds a fresh tree and
/// store pair; nothing is ever mutated in place.
#[derive(Debug)]
pub struct ParsedGame<P> {
    pub metadata: GameMetadata,
    pub tree: GameTree<P>,
    pub annotations: AnnotationStore,
}

impl<P> ParsedGame<P> {
    /// Split into shareable parts: the tree and store are read-only after
    /// parsing, so any number of cursors can hold them concurrently.
    pub fn into_shared(self) -> (GameMetadata, Arc<GameTree<P>>, Arc<AnnotationStore>) {
        (self.metadata, Arc::new(self.tree), Arc::new(self.annotations))
    }
}

/// Parse annotated game text: an optional tag-pair header block followed by
/// movetext with comments, quality codes, and nested variations.
pub fn parse<R: Rules>(text: &str, rules: &R) -> Result<ParsedGame<R::Position>, ParseError> {
    let (metadata, movetext_start) = metadata::parse_headers(text);
    let tokens = token::tokenize(&text[movetext_start..], movetext_start)?;
    let (tree, annotations) = builder::build(rules, &tokens)?;
    debug!(
        main_line = tree.main_line().len(),
        variations = tree.variations().count(),
        annotated = annotations.len(),
        "parsed game"
    );
    Ok(ParsedGame {
        metadata,
        tree,
        annotations,
    })
}
