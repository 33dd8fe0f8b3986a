use astproto_schema::{NodeKind, Schema};
use log::info;
use crate::{
    config::GeneratorConfig,
    gen_ts::TypeScriptGenerator,
    utils::{indent, quote, strip_suffix},
    error::AstProtoError,
};

/// Top-level node-suffixed messages, suffix stripped, in declaration order.
pub fn node_types(schema: &Schema, config: &GeneratorConfig) -> Vec<String> {
    schema
        .nodes
        .iter()
        .filter(|(name, node)| node.kind == NodeKind::Message && name.ends_with(&config.node_suffix))
        .map(|(name, _)| strip_suffix(name, &config.node_suffix).to_string())
        .collect()
}

fn prologue(schema: &Schema, config: &GeneratorConfig) -> Vec<String> {
    let tags = node_types(schema, config)
        .iter()
        .map(|t| format!("{} = {},", t, quote(t)))
        .collect();

    let mut lines = vec![
        format!("import * as proto from {};", quote(&config.proto_import)),
        format!("import matchEncoding from {};", quote(&config.match_import)),
        format!("import interceptEnumError from {};", quote(&config.intercept_import)),
        "".to_string(),
        "export type ASTNode = {".to_string(),
        "  type: string,".to_string(),
        "  start: number,".to_string(),
        "  end: number,".to_string(),
        "  [x: string]: any".to_string(),
        "}".to_string(),
        "".to_string(),
        "export const enum NodeType {".to_string(),
    ];
    lines.extend(indent(2, tags));
    lines.push("}".to_string());
    lines.push("".to_string());
    lines
}

/// Compiles the whole schema into one TypeScript module.
pub fn compile_schema_to_typescript(
    schema: &Schema,
    config: &GeneratorConfig,
) -> Result<String, AstProtoError> {
    let blocks = TypeScriptGenerator::new(schema, config).generate()?;

    let mut lines = prologue(schema, config);
    lines.extend(blocks);

    info!(
        "generated {} encoders for {} node types",
        schema.node_count(),
        node_types(schema, config).len()
    );
    Ok(lines.join("\n"))
}
