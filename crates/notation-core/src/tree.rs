//! Parsed game tree: one main line plus variation subtrees, structurally
//! immutable once built. Share with `Arc` across any number of cursors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::annotations::AnnotationStore;
use crate::token::GameResult;

/// Stable identity of one ply in the tree. Never derived from the position:
/// two nodes that transpose into the same position keep distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariationId(pub(crate) u32);

/// Which line a cursor or variation lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRef {
    Main,
    Variation(VariationId),
}

/// One ply. `parent` is navigation metadata only; the node is owned by its
/// containing line, so the tree has no reference cycles.
#[derive(Debug, Clone)]
pub struct MoveNode<P> {
    pub id: NodeId,
    /// The move as written in the source text.
    pub notation: String,
    pub position_before: P,
    pub position_after: P,
    /// The node this one follows; `None` for the first ply of the game.
    pub parent: Option<NodeId>,
    /// Alternatives to this node, in source order.
    pub variations: Vec<VariationId>,
}

/// An alternative continuation branching off a line.
#[derive(Debug, Clone)]
pub struct Variation<P> {
    pub id: VariationId,
    /// The enclosing line this variation branches off.
    pub owner: LineRef,
    /// 1-based ply in the owner of the node this variation replaces.
    pub parent_ply: usize,
    /// Position before the branch (the replaced node's `position_before`).
    pub start_position: P,
    pub moves: Vec<MoveNode<P>>,
}

/// Root aggregate for one parsed game.
#[derive(Debug, Clone)]
pub struct GameTree<P> {
    start_position: P,
    main_line: Vec<MoveNode<P>>,
    variations: HashMap<VariationId, Variation<P>>,
    node_index: HashMap<NodeId, (LineRef, usize)>,
    result: Option<GameResult>,
}

impl<P> GameTree<P> {
    pub(crate) fn new(
        start_position: P,
        main_line: Vec<MoveNode<P>>,
        variations: HashMap<VariationId, Variation<P>>,
        result: Option<GameResult>,
    ) -> Self {
        let mut node_index = HashMap::new();
        for (i, node) in main_line.iter().enumerate() {
            node_index.insert(node.id, (LineRef::Main, i));
        }
        for variation in variations.values() {
            for (i, node) in variation.moves.iter().enumerate() {
                node_index.insert(node.id, (LineRef::Variation(variation.id), i));
            }
        }
        Self {
            start_position,
            main_line,
            variations,
            node_index,
            result,
        }
    }

    pub fn start_position(&self) -> &P {
        &self.start_position
    }

    pub fn main_line(&self) -> &[MoveNode<P>] {
        &self.main_line
    }

    pub fn variation(&self, id: VariationId) -> Option<&Variation<P>> {
        self.variations.get(&id)
    }

    pub fn variations(&self) -> impl Iterator<Item = &Variation<P>> {
        self.variations.values()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Moves of the given line; empty for an unknown variation id.
    pub fn line(&self, line: LineRef) -> &[MoveNode<P>] {
        match line {
            LineRef::Main => &self.main_line,
            LineRef::Variation(id) => self
                .variations
                .get(&id)
                .map(|v| v.moves.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Position shown at ply 0 of the given line.
    pub fn line_start(&self, line: LineRef) -> &P {
        match line {
            LineRef::Main => &self.start_position,
            LineRef::Variation(id) => self
                .variations
                .get(&id)
                .map(|v| &v.start_position)
                .unwrap_or(&self.start_position),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&MoveNode<P>> {
        let (line, index) = self.locate(id)?;
        self.line(line).get(index)
    }

    /// Line and 0-based index holding the given node.
    pub fn locate(&self, id: NodeId) -> Option<(LineRef, usize)> {
        self.node_index.get(&id).copied()
    }

    /// Nested JSON outline of the tree (moves, glyphs, comments, variations)
    /// for API and debug surfaces.
    pub fn outline_json(&self, annotations: &AnnotationStore) -> JsonValue {
        serde_json::json!({
            "result": self.result.map(|r| r.as_str()),
            "moves": self.line_json(&self.main_line, annotations),
        })
    }

    fn line_json(&self, moves: &[MoveNode<P>], annotations: &AnnotationStore) -> JsonValue {
        let entries: Vec<JsonValue> = moves
            .iter()
            .map(|node| {
                let annotation = annotations.get(node.id);
                let variations: Vec<JsonValue> = node
                    .variations
                    .iter()
                    .filter_map(|&id| self.variations.get(&id))
                    .map(|v| self.line_json(&v.moves, annotations))
                    .collect();
                serde_json::json!({
                    "move": node.notation,
                    "glyph": annotation
                        .and_then(|a| a.quality.as_ref())
                        .and_then(|q| q.glyph()),
                    "comment": annotation.and_then(|a| a.comment.clone()),
                    "variations": variations,
                })
            })
            .collect();
        JsonValue::Array(entries)
    }
}
