//! Assembles the move tree from the token stream, one `Rules` call per move.
//!
//! Variation blocks are parsed by plain recursion: each block branches off
//! the node most recently appended to the enclosing line and replays from
//! that node's `position_before`. Any failure aborts the whole parse; a
//! silently skipped token would desynchronize the positions from the text.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::annotations::{AnnotationStore, QualityCode};
use crate::error::ParseError;
use crate::rules::Rules;
use crate::token::{GameResult, SpannedToken, Token};
use crate::tree::{GameTree, LineRef, MoveNode, NodeId, Variation, VariationId};

struct Cursor<'t> {
    tokens: &'t [SpannedToken],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn next(&mut self) -> Option<&'t SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }
}

struct TreeBuilder<'a, R: Rules> {
    rules: &'a R,
    next_node: u32,
    next_variation: u32,
    variations: HashMap<VariationId, Variation<R::Position>>,
    annotations: AnnotationStore,
    result: Option<GameResult>,
}

pub(crate) fn build<R: Rules>(
    rules: &R,
    tokens: &[SpannedToken],
) -> Result<(GameTree<R::Position>, AnnotationStore), ParseError> {
    let mut builder = TreeBuilder {
        rules,
        next_node: 0,
        next_variation: 0,
        variations: HashMap::new(),
        annotations: AnnotationStore::new(),
        result: None,
    };
    let mut cursor = Cursor { tokens, pos: 0 };
    let start = rules.initial_position();
    let main_line = builder.build_line(&mut cursor, LineRef::Main, &start, None)?;
    let tree = GameTree::new(start, main_line, builder.variations, builder.result);
    Ok((tree, builder.annotations))
}

impl<R: Rules> TreeBuilder<'_, R> {
    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    fn next_variation_id(&mut self) -> VariationId {
        let id = VariationId(self.next_variation);
        self.next_variation += 1;
        id
    }

    /// Parse one line (main or variation) until its closing bracket, a
    /// result marker, or the end of input. `parent_of_first` is the node the
    /// line's first move follows (the branch node's own parent).
    fn build_line(
        &mut self,
        cursor: &mut Cursor<'_>,
        line: LineRef,
        start: &R::Position,
        parent_of_first: Option<NodeId>,
    ) -> Result<Vec<MoveNode<R::Position>>, ParseError> {
        let mut moves: Vec<MoveNode<R::Position>> = Vec::new();
        let mut position = start.clone();

        while let Some(spanned) = cursor.next() {
            match &spanned.token {
                Token::MoveNumber(_) => {}
                Token::Move(text) => {
                    let (after, _canonical) =
                        self.rules.try_move(&position, text).map_err(|e| {
                            ParseError::IllegalMove {
                                notation: e.notation,
                                offset: spanned.offset,
                                reason: e.reason,
                            }
                        })?;
                    let id = self.next_node_id();
                    let parent = moves.last().map(|n| n.id).or(parent_of_first);
                    moves.push(MoveNode {
                        id,
                        notation: text.clone(),
                        position_before: position.clone(),
                        position_after: after.clone(),
                        parent,
                        variations: Vec::new(),
                    });
                    position = after;
                }
                Token::Nag(code) => match moves.last() {
                    Some(node) => self.annotations.set_quality(node.id, QualityCode(*code)),
                    None => debug!(code = %code, "quality code before any move of its line; dropped"),
                },
                Token::Comment(text) => match moves.last() {
                    Some(node) => self.annotations.set_comment(node.id, text),
                    None => debug!("comment before any move of its line; dropped"),
                },
                Token::VariationOpen => {
                    let Some(branch_index) = moves.len().checked_sub(1) else {
                        return Err(ParseError::DanglingVariation {
                            offset: spanned.offset,
                        });
                    };
                    let id = self.next_variation_id();
                    let start_position = moves[branch_index].position_before.clone();
                    let parent = moves[branch_index].parent;
                    let variation_moves = self.build_line(
                        cursor,
                        LineRef::Variation(id),
                        &start_position,
                        parent,
                    )?;
                    self.variations.insert(
                        id,
                        Variation {
                            id,
                            owner: line,
                            parent_ply: branch_index + 1,
                            start_position,
                            moves: variation_moves,
                        },
                    );
                    moves[branch_index].variations.push(id);
                }
                Token::VariationClose => break,
                Token::Result(result) => {
                    if line == LineRef::Main {
                        self.result = Some(*result);
                        break;
                    }
                    warn!(result = result.as_str(), "result marker inside a variation; ignored");
                }
            }
        }
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::parse;
    use crate::rules::StandardRules;

    #[test]
    fn test_variation_before_any_move_is_rejected() {
        let err = parse("(1. e4)", &StandardRules).unwrap_err();
        assert_eq!(err, ParseError::DanglingVariation { offset: 0 });
    }

    #[test]
    fn test_leading_comment_is_dropped() {
        let parsed = parse("{ opening notes } 1. e4", &StandardRules).unwrap();
        assert!(parsed.annotations.is_empty());
        assert_eq!(parsed.tree.main_line().len(), 1);
    }

    #[test]
    fn test_result_inside_variation_is_ignored() {
        let parsed = parse("1. e4 (1. d4 1-0) e5 0-1", &StandardRules).unwrap();
        assert_eq!(
            parsed.tree.result(),
            Some(crate::token::GameResult::BlackWins)
        );
        assert_eq!(parsed.tree.main_line().len(), 2);
    }

    #[test]
    fn test_empty_variation_is_allowed() {
        let parsed = parse("1. e4 ()", &StandardRules).unwrap();
        let node = &parsed.tree.main_line()[0];
        assert_eq!(node.variations.len(), 1);
        let variation = parsed.tree.variation(node.variations[0]).unwrap();
        assert!(variation.moves.is_empty());
    }

    #[test]
    fn test_tokens_after_result_are_ignored() {
        let parsed = parse("1. e4 1-0 e5", &StandardRules).unwrap();
        assert_eq!(parsed.tree.main_line().len(), 1);
    }
}
