use regex::Regex;
use lazy_static::lazy_static;
use crate::utils::{quote, error};
use crate::annotation::split_comment;
use crate::error::AstProtoError;

lazy_static! {
    pub static ref BLOCK_HEADER_RX: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{$").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    OpenBlock { keyword: String, name: String },
    CloseBlock,
    /// A field, enum value or oneof variant line, trimmed.
    Field(String),
    Comment,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind:   LineKind,
    pub line:   usize,
    pub column: usize,
}

/// Classifies every line of a schema. A line may open or close a block, not both.
pub fn tokenize_schema(text: &str) -> Result<Vec<Line>, AstProtoError> {
    let mut lines = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        let column = raw.len() - raw.trim_start().len() + 1;
        // Braces inside a trailing comment do not open or close blocks.
        let (code, _) = split_comment(trimmed);

        let kind = if trimmed.is_empty() {
            LineKind::Blank
        } else if trimmed.starts_with("//") {
            LineKind::Comment
        } else if code.contains('}') {
            LineKind::CloseBlock
        } else if code.contains('{') {
            let caps = BLOCK_HEADER_RX.captures(code).ok_or_else(|| {
                error(
                    &format!("Malformed block header {}", quote(trimmed)),
                    line,
                    column,
                )
            })?;
            LineKind::OpenBlock {
                keyword: caps[1].to_string(),
                name:    caps[2].to_string(),
            }
        } else {
            LineKind::Field(trimmed.to_string())
        };

        lines.push(Line { kind, line, column });
    }

    Ok(lines)
}
