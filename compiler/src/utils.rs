use crate::error::AstProtoError;

/// Renders `text` as a double-quoted, escaped string literal.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

pub fn error(msg: &str, line: usize, column: usize) -> AstProtoError {
    AstProtoError::ParseError {
        msg: msg.to_string(),
        line,
        column,
    }
}

pub fn invalid(decl: &str, msg: &str) -> AstProtoError {
    AstProtoError::InvalidDeclaration {
        decl: decl.to_string(),
        msg:  msg.to_string(),
    }
}

pub fn indent(space: usize, lines: Vec<String>) -> Vec<String> {
    let pad = " ".repeat(space);
    lines.into_iter().map(|l| format!("{}{}", pad, l)).collect()
}

pub fn strip_suffix<'a>(text: &'a str, suffix: &str) -> &'a str {
    text.strip_suffix(suffix).unwrap_or(text)
}
