//! Playback cursor over a parsed game tree.
//!
//! The cursor is either on the main line or inside a variation; in both
//! cases `ply`/`index` 0 means "start position of that line" and `k` means
//! "k moves of that line played". Leaving a variation always restores the
//! owner line at the exact ply the branch was taken from, showing the same
//! position the variation started at.

use std::sync::Arc;

use notation_core::annotations::{Annotation, AnnotationStore};
use notation_core::tree::{GameTree, LineRef, NodeId, VariationId};
use tracing::trace;

use crate::error::NavigationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    MainLine { ply: usize },
    Variation { id: VariationId, index: usize },
}

/// Alternatives reported when the node about to be played carries
/// variations. The navigator never picks one silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChoice {
    /// Next move of the current line.
    pub continuation: String,
    /// Each non-empty variation and its first move, in source order.
    pub alternatives: Vec<(VariationId, String)>,
}

/// Outcome of a forward step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Hit the boundary of the current line: no next move going forward, or
    /// already at the start of the game going back. A variation never falls
    /// through to its owner.
    EndOfLine,
    /// Answer with `choose_main` or `choose_variation` to proceed.
    ChoiceRequired(BranchChoice),
}

/// Payload delivered to position-changed listeners on every successful
/// transition.
#[derive(Debug, Clone)]
pub struct PositionChanged<P> {
    pub position: P,
    /// Current node; `None` at the start of a line.
    pub node: Option<NodeId>,
    pub annotation: Option<Annotation>,
    pub choice_pending: bool,
}

type Listener<P> = Box<dyn Fn(&PositionChanged<P>) + Send>;

pub struct Navigator<P> {
    tree: Arc<GameTree<P>>,
    annotations: Arc<AnnotationStore>,
    cursor: Cursor,
    pending: Option<BranchChoice>,
    listeners: Vec<Listener<P>>,
}

impl<P: Clone> Navigator<P> {
    pub fn create(tree: Arc<GameTree<P>>, annotations: Arc<AnnotationStore>) -> Self {
        Self {
            tree,
            annotations,
            cursor: Cursor::MainLine { ply: 0 },
            pending: None,
            listeners: Vec::new(),
        }
    }

    pub fn on_position_changed(
        &mut self,
        listener: impl Fn(&PositionChanged<P>) + Send + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    pub fn tree(&self) -> &GameTree<P> {
        &self.tree
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn choice_pending(&self) -> Option<&BranchChoice> {
        self.pending.as_ref()
    }

    fn line_of(cursor: Cursor) -> (LineRef, usize) {
        match cursor {
            Cursor::MainLine { ply } => (LineRef::Main, ply),
            Cursor::Variation { id, index } => (LineRef::Variation(id), index),
        }
    }

    /// Position shown at the current cursor.
    pub fn position(&self) -> &P {
        let (line, index) = Self::line_of(self.cursor);
        if index == 0 {
            self.tree.line_start(line)
        } else {
            &self.tree.line(line)[index - 1].position_after
        }
    }

    pub fn current_node(&self) -> Option<NodeId> {
        let (line, index) = Self::line_of(self.cursor);
        if index == 0 {
            None
        } else {
            Some(self.tree.line(line)[index - 1].id)
        }
    }

    fn emit(&self) {
        let node = self.current_node();
        let event = PositionChanged {
            position: self.position().clone(),
            node,
            annotation: node.and_then(|id| self.annotations.get(id).cloned()),
            choice_pending: self.pending.is_some(),
        };
        for listener in &self.listeners {
            listener(&event);
        }
    }

    /// Unconditional jump, not a stepwise replay. Exits any variation and
    /// cancels any pending choice.
    pub fn jump_to_main(&mut self, ply: usize) -> Result<(), NavigationError> {
        let len = self.tree.main_line().len();
        if ply > len {
            return Err(NavigationError::PlyOutOfRange { ply, len });
        }
        self.pending = None;
        self.cursor = Cursor::MainLine { ply };
        trace!(ply, "jump to main line");
        self.emit();
        Ok(())
    }

    pub fn step_forward(&mut self) -> Result<Step, NavigationError> {
        if self.pending.is_some() {
            return Err(NavigationError::ChoicePending);
        }
        let (line, index) = Self::line_of(self.cursor);
        let Some(next) = self.tree.line(line).get(index) else {
            return Ok(Step::EndOfLine);
        };
        let alternatives: Vec<(VariationId, String)> = next
            .variations
            .iter()
            .filter_map(|&id| {
                let first = self.tree.variation(id)?.moves.first()?;
                Some((id, first.notation.clone()))
            })
            .collect();
        if !alternatives.is_empty() {
            let choice = BranchChoice {
                continuation: next.notation.clone(),
                alternatives,
            };
            self.pending = Some(choice.clone());
            trace!("branch choice pending");
            self.emit();
            return Ok(Step::ChoiceRequired(choice));
        }
        self.advance();
        Ok(Step::Moved)
    }

    fn advance(&mut self) {
        self.cursor = match self.cursor {
            Cursor::MainLine { ply } => Cursor::MainLine { ply: ply + 1 },
            Cursor::Variation { id, index } => Cursor::Variation {
                id,
                index: index + 1,
            },
        };
        self.emit();
    }

    /// Step toward the start. Inside a variation, index 0 is the
    /// distinguished at-start position showing `start_position`; one further
    /// step exits to the owner line at the ply the branch was taken from
    /// (one before the node the variation replaces), never past it.
    pub fn step_back(&mut self) -> Result<Step, NavigationError> {
        let had_pending = self.pending.take().is_some();
        match self.cursor {
            Cursor::MainLine { ply: 0 } => {
                if had_pending {
                    // the cursor stays put, but listeners must see the
                    // pending flag drop
                    self.emit();
                }
                Ok(Step::EndOfLine)
            }
            Cursor::MainLine { ply } => {
                self.cursor = Cursor::MainLine { ply: ply - 1 };
                self.emit();
                Ok(Step::Moved)
            }
            Cursor::Variation { id, index: 0 } => {
                let Some(variation) = self.tree.variation(id) else {
                    return Ok(Step::EndOfLine);
                };
                let exit_ply = variation.parent_ply - 1;
                self.cursor = match variation.owner {
                    LineRef::Main => Cursor::MainLine { ply: exit_ply },
                    LineRef::Variation(owner) => Cursor::Variation {
                        id: owner,
                        index: exit_ply,
                    },
                };
                trace!(exit_ply, "left variation");
                self.emit();
                Ok(Step::Moved)
            }
            Cursor::Variation { id, index } => {
                self.cursor = Cursor::Variation {
                    id,
                    index: index - 1,
                };
                self.emit();
                Ok(Step::Moved)
            }
        }
    }

    /// Answer a pending choice with the current line's own next move.
    pub fn choose_main(&mut self) -> Result<(), NavigationError> {
        if self.pending.take().is_none() {
            return Err(NavigationError::NoChoicePending);
        }
        self.advance();
        Ok(())
    }

    /// Answer a pending choice by entering a variation at its first move.
    pub fn choose_variation(&mut self, id: VariationId) -> Result<(), NavigationError> {
        let Some(choice) = self.pending.as_ref() else {
            return Err(NavigationError::NoChoicePending);
        };
        if !choice.alternatives.iter().any(|(vid, _)| *vid == id) {
            return Err(NavigationError::UnknownVariation(id));
        }
        self.pending = None;
        self.cursor = Cursor::Variation { id, index: 1 };
        trace!(?id, "entered variation");
        self.emit();
        Ok(())
    }
}
