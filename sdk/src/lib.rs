//! astproto
//!
//! Entry point for turning an AST schema into TypeScript encoders.
//!
//! - Compiler API (re-exported from `astproto-compiler`)
//! - Helpers for reading schemas from and writing encoders to disk.

use std::{fs, path::Path};
use log::info;

pub use astproto_compiler::{
    compile_schema, compile_schema_to_typescript, generate_typescript, AstProtoError,
    GeneratorConfig,
};
pub use astproto_schema::{NodeKind, Schema, SchemaNode};

/// Parse a schema and render its node tree as pretty-printed JSON.
pub fn schema_to_json(text: &str) -> Result<String, AstProtoError> {
    let schema = compile_schema(text)?;
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Generate the encoder module for the schema at `input` and write it to `output`.
/// The output file is only touched once generation has fully succeeded.
pub fn generate_file(input: &Path, output: &Path, config: &GeneratorConfig) -> Result<(), AstProtoError> {
    let text = fs::read_to_string(input)?;
    let code = generate_typescript(&text, config)?;
    fs::write(output, code)?;
    info!("wrote {} → {}", input.display(), output.display());
    Ok(())
}

pub mod error {
    pub use astproto_compiler::error::AstProtoError;
}

pub mod schema {
    pub use astproto_schema::*;
}
