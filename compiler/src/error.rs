use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Invalid declaration \"{decl}\": {msg}")]
    InvalidDeclaration {
        decl: String,
        msg:  String,
    },

    #[error("Unknown type \"{0}\"")]
    UnknownType(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
