use astproto_schema::{FieldDeclaration, Modifier, OneofVariantList, Schema, VariantDeclaration};
use heck::ToLowerCamelCase;
use log::warn;
use crate::{
    annotation::{extract_annotation, line_annotation, split_comment},
    utils::{invalid, strip_suffix},
    error::AstProtoError,
};

/// How a field's declared type is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Primitive,
    Enum,
    Message,
}

/// How a oneof variant's type contributes match guards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantClass<'a> {
    /// Guarded by the type's own tag.
    Tag,
    /// Guarded by every tag of the nested union's `kind` variants.
    Union(&'a OneofVariantList),
}

/// Declaration text with the comment, `= value` and `;` removed.
fn declaration_code(raw: &str) -> &str {
    let (code, _) = split_comment(raw);
    let code = code.split('=').next().unwrap_or(code);
    code.trim().trim_end_matches(';').trim_end()
}

pub fn parse_field(raw: &str) -> Result<FieldDeclaration, AstProtoError> {
    let tokens: Vec<&str> = declaration_code(raw).split_whitespace().collect();

    let (modifier, type_, name) = match tokens.as_slice() {
        [modifier, type_, name] => {
            let modifier = match *modifier {
                "optional" => Modifier::Optional,
                "repeated" => Modifier::Repeated,
                other => {
                    warn!("unknown modifier \"{}\" in \"{}\", treating as required", other, raw);
                    Modifier::Required
                }
            };
            (modifier, *type_, *name)
        }
        [type_, name] => (Modifier::Required, *type_, *name),
        _ => return Err(invalid(raw, "expected \"[modifier] Type name\"")),
    };

    Ok(FieldDeclaration {
        modifier,
        type_:      type_.to_string(),
        name:       name.to_string(),
        annotation: line_annotation(raw),
    })
}

pub fn parse_variant(raw: &str) -> Result<VariantDeclaration, AstProtoError> {
    let tokens: Vec<&str> = declaration_code(raw).split_whitespace().collect();

    match tokens.as_slice() {
        [type_, name] => Ok(VariantDeclaration {
            type_:      type_.to_string(),
            name:       name.to_string(),
            annotation: line_annotation(raw),
        }),
        _ => Err(invalid(raw, "expected \"Type name\" inside oneof")),
    }
}

/// Splits an enum value line into its symbol and the external tag it matches.
///
/// The tag is the annotation guard, else a quoted right-hand literal,
/// else the symbol itself.
pub fn parse_enum_value(raw: &str) -> Result<(String, String), AstProtoError> {
    let (code, comment) = split_comment(raw);
    let (left, right) = code.split_once('=').unwrap_or((code, ""));
    let symbol = left.trim().trim_end_matches(';').trim_end();

    if symbol.is_empty() || symbol.contains(char::is_whitespace) {
        return Err(invalid(raw, "expected \"SYMBOL = value;\""));
    }

    if let Some(tag) = comment.and_then(|c| extract_annotation(c).guard) {
        return Ok((symbol.to_string(), tag));
    }

    let value = right.trim().trim_end_matches(';').trim_end();
    let tag = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(symbol);

    Ok((symbol.to_string(), tag.to_string()))
}

pub fn classify_type(schema: &Schema, type_: &str) -> TypeClass {
    if schema.is_enum(type_) {
        TypeClass::Enum
    } else if type_.starts_with(|c: char| c.is_ascii_uppercase()) {
        TypeClass::Message
    } else {
        TypeClass::Primitive
    }
}

/// Resolves one hop only: a union whose variants are unions is not flattened.
pub fn classify_variant<'a>(
    schema: &'a Schema,
    type_: &str,
    node_suffix: &str,
) -> Result<VariantClass<'a>, AstProtoError> {
    if type_.ends_with(node_suffix) || type_ == type_.to_lowercase() {
        return Ok(VariantClass::Tag);
    }

    match schema.get(type_) {
        Some(node) => Ok(node.union_variants().map_or(VariantClass::Tag, VariantClass::Union)),
        None => Err(AstProtoError::UnknownType(type_.to_string())),
    }
}

/// The types named by a union's variant lines, in declaration order.
pub fn union_member_types(variants: &OneofVariantList) -> Result<Vec<String>, AstProtoError> {
    variants
        .iter()
        .map(|raw| parse_variant(raw).map(|v| v.type_))
        .collect()
}

/// Output property name for a declared field name.
pub fn output_name(name: &str) -> String {
    name.to_lower_camel_case()
}

/// Node-tag constant for a node type name.
pub fn node_tag(type_: &str, node_suffix: &str) -> String {
    format!("NodeType.{}", strip_suffix(type_, node_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::parse_schema, tokenizer::tokenize_schema};

    fn schema(text: &str) -> Schema {
        parse_schema(&tokenize_schema(text).unwrap()).unwrap()
    }

    #[test]
    fn test_parse_field_shapes() {
        let f = parse_field("repeated StatementNode body = 3;").unwrap();
        assert_eq!(f.modifier, Modifier::Repeated);
        assert_eq!(f.type_, "StatementNode");
        assert_eq!(f.name, "body");

        let f = parse_field("optional ExpressionNode argument = 4;").unwrap();
        assert_eq!(f.modifier, Modifier::Optional);

        let f = parse_field(r#"string value; // (null: "undefined")"#).unwrap();
        assert_eq!(f.modifier, Modifier::Required);
        assert_eq!(f.name, "value");
        assert_eq!(f.annotation.value.as_deref(), Some("\"undefined\""));

        assert!(parse_field("lonely").is_err());
    }

    #[test]
    fn test_parse_variant() {
        let v = parse_variant(r#"null null = 5; // ("null": null)"#).unwrap();
        assert_eq!(v.type_, "null");
        assert_eq!(v.name, "null");
        assert_eq!(v.annotation.guard.as_deref(), Some("\"null\""));
        assert_eq!(v.annotation.value.as_deref(), Some("null"));

        assert!(parse_variant("optional A b = 1;").is_err());
    }

    #[test]
    fn test_parse_enum_value() {
        assert_eq!(parse_enum_value("VAR = 0; // (var)").unwrap(), ("VAR".into(), "var".into()));
        assert_eq!(parse_enum_value(r#"RED = "r";"#).unwrap(), ("RED".into(), "r".into()));
        assert_eq!(parse_enum_value("PLAIN = 3;").unwrap(), ("PLAIN".into(), "PLAIN".into()));
        assert_eq!(parse_enum_value("RED; // (r)").unwrap(), ("RED".into(), "r".into()));
        assert_eq!(parse_enum_value("BLUE;").unwrap(), ("BLUE".into(), "BLUE".into()));
        assert!(parse_enum_value("TWO WORDS = 1;").is_err());
    }

    #[test]
    fn test_classify() {
        let s = schema(
            "enum Kind {\n  A = 0;\n}\nmessage Expression {\n  oneof kind {\n    ANode a = 1;\n  }\n}\nmessage Plain {\n  string a = 1;\n}\n",
        );

        assert_eq!(classify_type(&s, "Kind"), TypeClass::Enum);
        assert_eq!(classify_type(&s, "ANode"), TypeClass::Message);
        assert_eq!(classify_type(&s, "string"), TypeClass::Primitive);

        assert_eq!(classify_variant(&s, "ANode", "Node").unwrap(), VariantClass::Tag);
        assert_eq!(classify_variant(&s, "boolean", "Node").unwrap(), VariantClass::Tag);
        assert_eq!(classify_variant(&s, "Plain", "Node").unwrap(), VariantClass::Tag);
        assert!(matches!(classify_variant(&s, "Expression", "Node").unwrap(), VariantClass::Union(v) if v.len() == 1));
        assert!(matches!(classify_variant(&s, "Missing", "Node"), Err(AstProtoError::UnknownType(_))));
    }

    #[test]
    fn test_names() {
        assert_eq!(output_name("type_parameters"), "typeParameters");
        assert_eq!(output_name("computed-key"), "computedKey");
        assert_eq!(output_name("null"), "null");
        assert_eq!(node_tag("ProgramNode", "Node"), "NodeType.Program");
    }
}
