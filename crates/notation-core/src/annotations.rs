//! Side store for comments and quality codes.
//!
//! Keyed by `NodeId`, never by position: two different move orders can reach
//! the identical position, and their commentary must stay independent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tree::NodeId;

/// `$n` quality code. Six codes carry a display glyph; any other code is
/// kept verbatim with no glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCode(pub u16);

impl QualityCode {
    pub fn glyph(&self) -> Option<&'static str> {
        match self.0 {
            1 => Some("!"),
            2 => Some("?"),
            3 => Some("!!"),
            4 => Some("??"),
            5 => Some("!?"),
            6 => Some("?!"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub comment: Option<String>,
    pub quality: Option<QualityCode>,
}

#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: HashMap<NodeId, Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Annotation> {
        self.entries.get(&id)
    }

    /// Set either field; `None` leaves the existing value in place.
    pub fn set(&mut self, id: NodeId, comment: Option<String>, quality: Option<QualityCode>) {
        let entry = self.entries.entry(id).or_default();
        if comment.is_some() {
            entry.comment = comment;
        }
        if quality.is_some() {
            entry.quality = quality;
        }
    }

    /// A second comment on the same node concatenates with a space.
    pub fn set_comment(&mut self, id: NodeId, text: &str) {
        let entry = self.entries.entry(id).or_default();
        match &mut entry.comment {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(text);
            }
            None => entry.comment = Some(text.to_string()),
        }
    }

    pub fn set_quality(&mut self, id: NodeId, code: QualityCode) {
        self.entries.entry(id).or_default().quality = Some(code);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
