use astproto_schema::Schema;
use log::debug;
use crate::{
    config::GeneratorConfig,
    emitter::compile_schema_to_typescript,
    tokenizer::tokenize_schema,
    parser::parse_schema,
    error::AstProtoError,
};

/// Parse a textual schema into its node tree.
/// Returns `Err(AstProtoError)` if the schema is malformed.
pub fn compile_schema(text: &str) -> Result<Schema, AstProtoError> {
    let lines = tokenize_schema(text)?;
    debug!("classified {} schema lines", lines.len());
    parse_schema(&lines)
}

/// Parse a textual schema and generate the TypeScript encoder module for it.
/// Nothing is returned unless every node generated successfully.
pub fn generate_typescript(text: &str, config: &GeneratorConfig) -> Result<String, AstProtoError> {
    let schema = compile_schema(text)?;
    compile_schema_to_typescript(&schema, config)
}
