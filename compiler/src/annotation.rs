use astproto_schema::Annotation;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GROUP_RX:     Regex = Regex::new(r"\(([^)]+)\)").unwrap();
    static ref SEPARATOR_RX: Regex = Regex::new(r":\s+").unwrap();
}

pub const COMMENT_MARKER: &str = "//";

/// Splits a declaration line into its code and its trailing comment, if any.
pub fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once(COMMENT_MARKER) {
        Some((code, comment)) => (code.trim_end(), Some(comment)),
        None                  => (line, None),
    }
}

/// Reads `(guard)`, `(guard: value)` out of comment text.
///
/// Only the first parenthesized group counts. Empty parts are dropped before
/// the remaining ones are assigned, so `(: value)` yields a guard of `value`.
pub fn extract_annotation(text: &str) -> Annotation {
    let group = match GROUP_RX.captures(text) {
        Some(caps) => caps[1].to_string(),
        None       => return Annotation::default(),
    };

    let mut parts = SEPARATOR_RX
        .splitn(&group, 2)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Annotation {
        guard: parts.next(),
        value: parts.next(),
    }
}

/// The annotation carried by a whole declaration line's trailing comment.
pub fn line_annotation(line: &str) -> Annotation {
    match split_comment(line) {
        (_, Some(comment)) => extract_annotation(comment),
        (_, None)          => Annotation::default(),
    }
}
