use astproto_schema::{Modifier, NodeKind, OneofVariantList, Schema, SchemaNode, UNION_FIELD};
use indexmap::IndexMap;
use log::{debug, warn};
use crate::{
    config::GeneratorConfig,
    resolver::{
        classify_type, classify_variant, node_tag, output_name, parse_enum_value, parse_field,
        parse_variant, union_member_types, TypeClass, VariantClass,
    },
    utils::{indent, quote},
    error::AstProtoError,
};

/// Fields copied through as-is from the untyped node.
const PASS_THROUGH_FIELDS: [&str; 2] = ["start", "end"];

/// Which part of the untyped node a oneof variant's encoder receives.
#[derive(Debug, Clone, Copy)]
enum VariantSource<'a> {
    /// The node being encoded, reassembled from its destructured parts.
    WholeNode,
    /// A single property of the node.
    Property(&'a str),
}

impl VariantSource<'_> {
    fn encode(&self, type_: &str) -> String {
        match self {
            VariantSource::WholeNode      => format!("encode{}({{ type, start, end, ...props }})", type_),
            VariantSource::Property(name) => format!("encode{}({})", type_, prop(name)),
        }
    }
}

fn prop(name: &str) -> String {
    format!("props[{}]", quote(name))
}

/// Walks a schema and produces the TypeScript encoder functions for it.
pub struct TypeScriptGenerator<'a> {
    schema: &'a Schema,
    config: &'a GeneratorConfig,
}

impl<'a> TypeScriptGenerator<'a> {
    pub fn new(schema: &'a Schema, config: &'a GeneratorConfig) -> Self {
        TypeScriptGenerator { schema, config }
    }

    /// All function blocks, in declaration order. Nested encoders are
    /// embedded in their parent's body.
    pub fn generate(&self) -> Result<Vec<String>, AstProtoError> {
        self.transpile(&self.schema.nodes, &[])
    }

    fn transpile(
        &self,
        nodes: &IndexMap<String, SchemaNode>,
        parents: &[&str],
    ) -> Result<Vec<String>, AstProtoError> {
        let mut lines = Vec::new();

        for (name, node) in nodes {
            let mut path = parents.to_vec();
            path.push(name.as_str());
            let qualified = path.join(&self.config.path_separator);

            match node.kind {
                NodeKind::Enum => {
                    debug!("generating enum decoder for {}", qualified);
                    lines.extend(self.enum_encoder(name, &qualified, node)?);
                }
                NodeKind::Message => {
                    debug!("generating message encoder for {}", qualified);
                    let inner = self.transpile(&node.nested, &path)?;
                    lines.extend(self.message_encoder(name, &qualified, node, inner)?);
                }
            }
        }

        Ok(lines)
    }

    fn enum_encoder(
        &self,
        name: &str,
        qualified: &str,
        node: &SchemaNode,
    ) -> Result<Vec<String>, AstProtoError> {
        let mut checks = Vec::new();
        let mut tags = Vec::new();

        for raw in node.fields.keys() {
            let (symbol, tag) = parse_enum_value(raw)?;
            checks.push(format!(
                "if (value === {}) return proto.{}.{};",
                quote(&tag),
                qualified,
                symbol
            ));
            tags.push(format!("{},", quote(&tag)));
        }

        let mut lines = vec![format!(
            "export function encode{}(value: string): proto.{} {{",
            name, qualified
        )];
        lines.extend(indent(2, checks));
        lines.push("".to_string());
        lines.push("  throw {".to_string());
        lines.push("    expected: [".to_string());
        lines.extend(indent(6, tags));
        lines.push("    ],".to_string());
        lines.push("    found: value,".to_string());
        lines.push("  };".to_string());
        lines.push("}".to_string());
        lines.push("".to_string());
        Ok(lines)
    }

    fn message_encoder(
        &self,
        name: &str,
        qualified: &str,
        node: &SchemaNode,
        mut embeds: Vec<String>,
    ) -> Result<Vec<String>, AstProtoError> {
        let nullable = self.config.is_nullable(qualified);

        let (params, matcher) = if nullable {
            embeds.push("const { type, start, end, ...props } = ast ?? {}".to_string());
            ("ast", "type ?? \"null\", start, end")
        } else {
            ("{ type, start, end, ...props }", "String(type), start, end")
        };

        let arms = match node.union_variants() {
            Some(variants) => self.oneof_arms(Some(UNION_FIELD), variants, VariantSource::WholeNode)?,
            None           => self.field_arms(qualified, node)?,
        };

        let embeds = embeds
            .into_iter()
            .map(|line| match line.strip_prefix("export ") {
                Some(rest) => rest.to_string(),
                None       => line,
            })
            .collect();

        let mut lines = vec![format!(
            "export function encode{}({}: ASTNode): proto.{} {{",
            name, params, qualified
        )];
        lines.extend(indent(2, embeds));
        lines.push(format!("  return matchEncoding<proto.{}>({})", qualified, matcher));
        lines.extend(indent(4, arms));
        lines.push("    .end()".to_string());
        lines.push("}".to_string());
        lines.push("".to_string());
        Ok(lines)
    }

    /// The single match arm of a flat message, building the output field by field.
    fn field_arms(&self, qualified: &str, node: &SchemaNode) -> Result<Vec<String>, AstProtoError> {
        let guard = match self.config.fixed_guard(qualified) {
            Some(guard) => guard.to_string(),
            None        => node_tag(qualified, &self.config.node_suffix),
        };

        let mut props = Vec::new();
        for (key, oneof) in &node.fields {
            match oneof {
                Some(variants) => props.extend(self.oneof_field(qualified, key, variants)?),
                None           => props.push(self.plain_field(key)?),
            }
        }

        let mut lines = vec![format!(".with({}, () => ({{", guard)];
        lines.extend(indent(2, props));
        lines.push("}))".to_string());
        Ok(lines)
    }

    fn plain_field(&self, raw: &str) -> Result<String, AstProtoError> {
        let decl = parse_field(raw)?;

        if PASS_THROUGH_FIELDS.contains(&decl.name.as_str()) {
            return Ok(format!("{},", decl.name));
        }

        let annotation = decl.annotation;
        let source = annotation
            .value
            .or(annotation.guard)
            .unwrap_or_else(|| prop(&decl.name));
        let type_ = decl.type_.as_str();
        let class = classify_type(self.schema, type_);

        let value = match class {
            TypeClass::Enum      => format!("interceptEnumError(() => encode{}({}), start, end)", type_, source),
            TypeClass::Message   => format!("encode{}({})", type_, source),
            TypeClass::Primitive => source.clone(),
        };

        let value = match decl.modifier {
            Modifier::Required => value,
            Modifier::Optional => format!("{} ? {} : undefined", source, value),
            Modifier::Repeated => match class {
                TypeClass::Message => format!("{}.map((item: ASTNode) => encode{}(item))", source, type_),
                TypeClass::Enum => {
                    warn!("repeated enum field \"{}\" is unsupported, decoding element-wise", raw);
                    format!(
                        "{}.map((item: string) => interceptEnumError(() => encode{}(item), start, end))",
                        source, type_
                    )
                }
                TypeClass::Primitive => {
                    warn!("repeated primitive field \"{}\" is unsupported, passing through", raw);
                    source
                }
            },
        };

        Ok(format!("{}: {},", output_name(&decl.name), value))
    }

    /// A oneof group declared as a field of a flat message.
    fn oneof_field(
        &self,
        qualified: &str,
        key: &str,
        variants: &OneofVariantList,
    ) -> Result<Vec<String>, AstProtoError> {
        let out = output_name(key);

        let (matcher, source) = if self.config.switches_on_typeof(qualified) {
            (
                format!("{p} === null ? \"null\" : typeof {p}", p = prop(key)),
                VariantSource::WholeNode,
            )
        } else {
            (format!("{}.type", prop(key)), VariantSource::Property(key))
        };

        let mut lines = vec![format!(
            "{}: matchEncoding<proto.{}[{}]>({}, start, end)",
            out,
            qualified,
            quote(&out),
            matcher
        )];
        lines.extend(indent(2, self.oneof_arms(None, variants, source)?));
        lines.push("  .end(),".to_string());
        Ok(lines)
    }

    /// One match arm per variant. With `parent_key`, each arm's result is
    /// wrapped under that key.
    fn oneof_arms(
        &self,
        parent_key: Option<&str>,
        variants: &OneofVariantList,
        source: VariantSource,
    ) -> Result<Vec<String>, AstProtoError> {
        let mut lines = Vec::new();
        let suffix = &self.config.node_suffix;

        for raw in variants {
            let variant = parse_variant(raw)?;
            let name = output_name(&variant.name);
            let value = variant
                .annotation
                .value
                .clone()
                .unwrap_or_else(|| source.encode(&variant.type_));

            let body = match parent_key {
                Some(key) => vec![
                    format!("{}: {{", key),
                    format!("  oneofKind: {},", quote(&name)),
                    format!("  {}: {}", name, value),
                    "}".to_string(),
                ],
                None => vec![
                    format!("oneofKind: {},", quote(&name)),
                    format!("{}: {}", name, value),
                ],
            };

            // A custom guard replaces the type's tags entirely, so the type
            // itself need not resolve.
            match variant.annotation.guard {
                Some(guard) => lines.push(format!(".with({}, () => ({{", guard)),
                None => match classify_variant(self.schema, &variant.type_, suffix)? {
                    VariantClass::Tag => {
                        lines.push(format!(".with({}, () => ({{", node_tag(&variant.type_, suffix)));
                    }
                    VariantClass::Union(members) => {
                        let tags = union_member_types(members)?
                            .iter()
                            .map(|t| format!("{},", node_tag(t, suffix)))
                            .collect();
                        lines.push(".with([".to_string());
                        lines.extend(indent(2, tags));
                        lines.push("], () => ({".to_string());
                    }
                },
            }
            lines.extend(indent(2, body));
            lines.push("}))".to_string());
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};

    fn generate(text: &str) -> String {
        let schema = parse_schema(&tokenize_schema(text).unwrap()).unwrap();
        let config = GeneratorConfig::default();
        TypeScriptGenerator::new(&schema, &config)
            .generate()
            .unwrap()
            .join("\n")
    }

    #[test]
    fn test_enum_decoder() {
        let code = generate("enum Color {\n  RED = \"r\";\n  BLUE = \"b\";\n}\n");
        let expected = [
            "export function encodeColor(value: string): proto.Color {",
            "  if (value === \"r\") return proto.Color.RED;",
            "  if (value === \"b\") return proto.Color.BLUE;",
            "",
            "  throw {",
            "    expected: [",
            "      \"r\",",
            "      \"b\",",
            "    ],",
            "    found: value,",
            "  };",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(code, expected);
    }

    #[test]
    fn test_flat_message_fields() {
        let code = generate(
            r#"
enum VariableKind {
  VAR = 0; // (var)
}
message VariableDeclarationNode {
  int32 start = 1;
  int32 end = 2;
  VariableKind kind = 3;
  repeated VariableDeclaratorNode declarations = 4;
  optional ExpressionNode init_value = 5;
  bool is_const = 6;
}
"#,
        );

        assert!(code.contains(
            "export function encodeVariableDeclarationNode({ type, start, end, ...props }: ASTNode): proto.VariableDeclarationNode {"
        ));
        assert!(code.contains(
            "  return matchEncoding<proto.VariableDeclarationNode>(String(type), start, end)"
        ));
        assert!(code.contains("    .with(NodeType.VariableDeclaration, () => ({"));
        assert!(code.contains("      start,\n      end,\n"));
        assert!(code.contains(
            "      kind: interceptEnumError(() => encodeVariableKind(props[\"kind\"]), start, end),"
        ));
        assert!(code.contains(
            "      declarations: props[\"declarations\"].map((item: ASTNode) => encodeVariableDeclaratorNode(item)),"
        ));
        assert!(code.contains(
            "      initValue: props[\"init_value\"] ? encodeExpressionNode(props[\"init_value\"]) : undefined,"
        ));
        assert!(code.contains("      isConst: props[\"is_const\"],"));
        assert!(code.contains("    }))\n    .end()\n}"));
    }

    #[test]
    fn test_union_wrapper_fan_out() {
        let code = generate(
            r#"
message Expression {
  oneof kind {
    IdentifierNode identifier = 1;
    LiteralNode literal = 2;
  }
}
message Pattern {
  oneof kind {
    Expression expression = 1;
    ArrayPatternNode array_pattern = 2;
  }
}
"#,
        );

        let expected_arm = [
            "    .with([",
            "      NodeType.Identifier,",
            "      NodeType.Literal,",
            "    ], () => ({",
            "      kind: {",
            "        oneofKind: \"expression\",",
            "        expression: encodeExpression({ type, start, end, ...props })",
            "      }",
            "    }))",
        ]
        .join("\n");
        assert!(code.contains(&expected_arm), "{}", code);
        assert!(code.contains("    .with(NodeType.ArrayPattern, () => ({"));
        assert!(code.contains("        oneofKind: \"arrayPattern\","));
    }

    #[test]
    fn test_field_oneof_and_annotations() {
        let code = generate(
            r#"
message LiteralNode {
  int32 start = 1;
  int32 end = 2;
  message RegEx {
    string pattern = 1;
  }
  oneof value {
    string string = 1; // ("string")
    null null = 2; // ("null": null)
  }
}
message PropertyNode {
  oneof key {
    IdentifierNode identifier = 1;
  }
}
"#,
        );

        assert!(code.contains(
            "      value: matchEncoding<proto.LiteralNode[\"value\"]>(props[\"value\"] === null ? \"null\" : typeof props[\"value\"], start, end)"
        ));
        assert!(code.contains("        .with(\"string\", () => ({"));
        assert!(code.contains("          string: encodestring({ type, start, end, ...props })"));
        assert!(code.contains("        .with(\"null\", () => ({\n          oneofKind: \"null\",\n          null: null\n        }))"));
        assert!(code.contains("      }))\n        .end(),"));

        // nested encoder is embedded, unexported, with the fixed guard
        assert!(code.contains("  function encodeRegEx({ type, start, end, ...props }: ASTNode): proto.LiteralNode_RegEx {"));
        assert!(code.contains("      .with(\"undefined\", () => ({"));

        assert!(code.contains(
            "      key: matchEncoding<proto.PropertyNode[\"key\"]>(props[\"key\"].type, start, end)"
        ));
        assert!(code.contains("          identifier: encodeIdentifierNode(props[\"key\"])"));
    }

    #[test]
    fn test_nullable_node_override() {
        let code = generate(
            r#"
message ArrayPatternNode {
  message Element {
    oneof kind {
      IdentifierNode identifier = 1;
      null null = 2; // ("null": "undefined")
    }
  }
}
"#,
        );

        assert!(code.contains("  function encodeElement(ast: ASTNode): proto.ArrayPatternNode_Element {"));
        assert!(code.contains("    const { type, start, end, ...props } = ast ?? {}"));
        assert!(code.contains("    return matchEncoding<proto.ArrayPatternNode_Element>(type ?? \"null\", start, end)"));
        assert!(code.contains("      .with(\"null\", () => ({\n        kind: {\n          oneofKind: \"null\",\n          null: \"undefined\"\n        }\n      }))"));
    }

    #[test]
    fn test_plain_field_override() {
        let code = generate("message ANode {\n  string raw = 1; // (props[\"extra\"].raw)\n  string value; // (null: \"undefined\")\n}\n");
        assert!(code.contains("      raw: props[\"extra\"].raw,"));
        assert!(code.contains("      value: \"undefined\","));
    }

    #[test]
    fn test_unknown_variant_type_fails() {
        let schema = parse_schema(
            &tokenize_schema("message Expression {\n  oneof kind {\n    Missing m = 1;\n  }\n}\n").unwrap(),
        )
        .unwrap();
        let config = GeneratorConfig::default();
        let err = TypeScriptGenerator::new(&schema, &config).generate().unwrap_err();
        assert!(matches!(err, AstProtoError::UnknownType(ref t) if t == "Missing"));
    }
}
