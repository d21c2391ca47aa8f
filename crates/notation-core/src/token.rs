//! Movetext tokenizer.
//!
//! Single pass over the raw text with three scanning modes: plain text,
//! comment (`{ ... }`, non-nesting, everything up to the closing brace is
//! literal), and variation (`( ... )`, tracked with a nesting depth counter).
//! Every token carries the byte offset of its start in the original input so
//! errors downstream can point at the exact spot.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Outcome marker that terminates the main line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    Unknown,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Unknown => "*",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `3.` / `3...` marker; display-only, dropped by the tree builder.
    MoveNumber(u32),
    /// Candidate move in its original textual form; legality is decided later.
    Move(String),
    /// `$n` quality code.
    Nag(u16),
    /// Comment block with braces stripped and surrounding whitespace trimmed.
    Comment(String),
    VariationOpen,
    VariationClose,
    Result(GameResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    /// Byte offset of the token start in the original input.
    pub offset: usize,
}

/// Tokenize movetext. `base` is the byte offset of `movetext` within the
/// original input (non-zero when a header block was split off), so reported
/// offsets always refer to the full input.
pub fn tokenize(movetext: &str, base: usize) -> Result<Vec<SpannedToken>, ParseError> {
    let bytes = movetext.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut depth = 0usize;

    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        let start = base + pos;
        match c {
            b'{' => match bytes[pos + 1..].iter().position(|&b| b == b'}') {
                Some(rel) => {
                    let inner = &movetext[pos + 1..pos + 1 + rel];
                    tokens.push(SpannedToken {
                        token: Token::Comment(inner.trim().to_string()),
                        offset: start,
                    });
                    pos = pos + 1 + rel + 1;
                }
                None => {
                    return Err(ParseError::UnterminatedComment {
                        offset: base + bytes.len(),
                    })
                }
            },
            b'(' => {
                depth += 1;
                tokens.push(SpannedToken {
                    token: Token::VariationOpen,
                    offset: start,
                });
                pos += 1;
            }
            b')' => {
                if depth == 0 {
                    return Err(ParseError::UnbalancedVariation { offset: start });
                }
                depth -= 1;
                tokens.push(SpannedToken {
                    token: Token::VariationClose,
                    offset: start,
                });
                pos += 1;
            }
            b'$' => {
                let mut end = pos + 1;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > pos + 1 {
                    let code = movetext[pos + 1..end].parse().unwrap_or(u16::MAX);
                    tokens.push(SpannedToken {
                        token: Token::Nag(code),
                        offset: start,
                    });
                    pos = end;
                } else {
                    // stray `$` with no digits: opaque token, let the rules reject it
                    let end = word_end(bytes, pos + 1);
                    push_word(&mut tokens, &movetext[pos..end], start);
                    pos = end;
                }
            }
            _ => {
                let end = word_end(bytes, pos);
                push_word(&mut tokens, &movetext[pos..end], start);
                pos = end;
            }
        }
    }

    if depth > 0 {
        return Err(ParseError::UnbalancedVariation {
            offset: base + bytes.len(),
        });
    }
    Ok(tokens)
}

fn word_end(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while end < bytes.len() {
        match bytes[end] {
            b'{' | b'(' | b')' | b'$' => break,
            b if b.is_ascii_whitespace() => break,
            _ => end += 1,
        }
    }
    end
}

/// Classify a whitespace-delimited word. Move-number markers may arrive glued
/// to the move itself (`1.e4`, `1...c5`), so the marker is split off and the
/// remainder reclassified.
fn push_word(tokens: &mut Vec<SpannedToken>, word: &str, offset: usize) {
    if word.is_empty() {
        return;
    }
    if let Some(result) = GameResult::from_word(word) {
        tokens.push(SpannedToken {
            token: Token::Result(result),
            offset,
        });
        return;
    }
    let digits = word.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0 {
        let dots = word[digits..].bytes().take_while(|&b| b == b'.').count();
        if dots > 0 {
            let number = word[..digits].parse().unwrap_or(0);
            tokens.push(SpannedToken {
                token: Token::MoveNumber(number),
                offset,
            });
            let rest = &word[digits + dots..];
            if !rest.is_empty() {
                push_word(tokens, rest, offset + digits + dots);
            }
            return;
        }
    }
    tokens.push(SpannedToken {
        token: Token::Move(word.to_string()),
        offset,
    });
}
