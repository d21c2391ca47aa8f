//! Tag-pair header extraction.
//!
//! The leading `[Tag "value"]` block is split off before the movetext is
//! tokenized; the returned offset keeps downstream error positions relative
//! to the full input.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String,
    pub date: Option<String>,
    pub event: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            white: "Unknown".to_string(),
            black: "Unknown".to_string(),
            result: "*".to_string(),
            date: None,
            event: None,
        }
    }
}

/// Parse the header block, returning the metadata and the byte offset at
/// which the movetext begins.
pub fn parse_headers(text: &str) -> (GameMetadata, usize) {
    let movetext_start = header_block_len(text);
    let header_re = Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).unwrap();

    let mut metadata = GameMetadata::default();
    for cap in header_re.captures_iter(&text[..movetext_start]) {
        let value = cap[2].to_string();
        match &cap[1] {
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "Date" => metadata.date = Some(value),
            "Event" => metadata.event = Some(value),
            _ => {}
        }
    }
    (metadata, movetext_start)
}

/// Byte length of the leading block of `[`-lines and blank lines.
fn header_block_len(text: &str) -> usize {
    let mut len = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('[') {
            len += line.len();
        } else {
            break;
        }
    }
    len
}
