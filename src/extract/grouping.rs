//! Word/line grouping heuristic.
//!
//! Labels each raw token with a break marker so line boundaries can be
//! reconstructed from a flat word stream when the source format does not
//! supply layout-accurate grouping on its own.

/// How a token relates to the one that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
    /// The next token continues the same line.
    Soft,
    /// A line boundary falls after this token.
    Hard,
}

/// A raw positioned token as read from an extraction source, before
/// normalization into the record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub text: String,
    pub x0: f64,
    pub y0: f64,
    pub x2: f64,
    pub y2: f64,
    pub block: u32,
    pub line: u32,
}

/// Mark a break after each token in an ordered page stream.
///
/// Token `i` gets a hard break when there is no token `i + 1`, the next
/// token's block or line differs, or the next token's text starts with a
/// colon. The colon rule is kept as-is for compatibility with existing
/// documents; it has not been validated on a broader corpus.
pub fn mark_breaks(tokens: &[RawToken]) -> Vec<LineBreak> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| match tokens.get(i + 1) {
            None => LineBreak::Hard,
            Some(next) => {
                if next.block != token.block
                    || next.line != token.line
                    || next.text.starts_with(':')
                {
                    LineBreak::Hard
                } else {
                    LineBreak::Soft
                }
            }
        })
        .collect()
}
