use astproto_schema::{NodeKind, OneofVariantList, Schema, SchemaNode};
use log::debug;
use crate::{
    tokenizer::{Line, LineKind},
    utils::{error, quote},
    error::AstProtoError,
};

const MESSAGE_KEYWORD: &str = "message";
const ENUM_KEYWORD:    &str = "enum";
const ONEOF_KEYWORD:   &str = "oneof";

/// File-level protobuf statements that carry nothing for code generation.
const FILE_STATEMENTS: [&str; 4] = ["syntax", "package", "import", "option"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    TopLevel,
    InMessage,
    InOneof,
}

/// A block under construction. Finished blocks are attached to the frame below.
enum Frame {
    Node(SchemaNode),
    Oneof {
        name:     String,
        line:     usize,
        variants: OneofVariantList,
    },
}

impl Frame {
    fn describe(&self) -> (String, usize) {
        match self {
            Frame::Node(node)           => (node.name.clone(), node.line),
            Frame::Oneof { name, line, .. } => (name.clone(), *line),
        }
    }
}

fn is_file_statement(text: &str) -> bool {
    let keyword = text.split(|c: char| c.is_whitespace() || c == '=').next().unwrap_or("");
    FILE_STATEMENTS.contains(&keyword)
}

fn state(stack: &[Frame]) -> ParseState {
    match stack.last() {
        None                     => ParseState::TopLevel,
        Some(Frame::Node(_))     => ParseState::InMessage,
        Some(Frame::Oneof { .. }) => ParseState::InOneof,
    }
}

/// Builds the schema tree from classified lines in a single pass.
pub fn parse_schema(lines: &[Line]) -> Result<Schema, AstProtoError> {
    let mut schema = Schema::default();
    let mut stack: Vec<Frame> = Vec::new();

    for line in lines {
        match &line.kind {
            LineKind::Blank | LineKind::Comment => continue,

            LineKind::CloseBlock => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| error("Unbalanced \"}\"", line.line, line.column))?;

                match (frame, stack.last_mut()) {
                    (Frame::Node(node), None) => {
                        schema.nodes.insert(node.name.clone(), node);
                    }
                    (Frame::Node(node), Some(Frame::Node(parent))) => {
                        parent.nested.insert(node.name.clone(), node);
                    }
                    (Frame::Oneof { name, variants, .. }, Some(Frame::Node(parent))) => {
                        parent.fields.insert(name, Some(variants));
                    }
                    // Opening a block inside a oneof, or a oneof at the top level,
                    // is rejected before the frame is pushed.
                    (frame, _) => {
                        let (name, at) = frame.describe();
                        return Err(error(
                            &format!("Block {} has no valid parent", quote(&name)),
                            at,
                            1,
                        ));
                    }
                }
            }

            LineKind::OpenBlock { keyword, name } => {
                let current = state(&stack);

                if current == ParseState::InOneof {
                    return Err(error(
                        &format!("Cannot open {} inside a oneof", quote(name)),
                        line.line,
                        line.column,
                    ));
                }
                if let Some(Frame::Node(parent)) = stack.last() {
                    if parent.kind == NodeKind::Enum {
                        return Err(error(
                            &format!("Cannot open {} inside enum {}", quote(name), quote(&parent.name)),
                            line.line,
                            line.column,
                        ));
                    }
                }

                let frame = match keyword.as_str() {
                    ONEOF_KEYWORD => {
                        if current == ParseState::TopLevel {
                            return Err(error(
                                &format!("oneof {} must be declared inside a message", quote(name)),
                                line.line,
                                line.column,
                            ));
                        }
                        Frame::Oneof {
                            name:     name.clone(),
                            line:     line.line,
                            variants: Vec::new(),
                        }
                    }
                    MESSAGE_KEYWORD => Frame::Node(SchemaNode::new(name, NodeKind::Message, line.line)),
                    ENUM_KEYWORD    => Frame::Node(SchemaNode::new(name, NodeKind::Enum, line.line)),
                    other => {
                        return Err(error(
                            &format!("Unknown block keyword {}", quote(other)),
                            line.line,
                            line.column,
                        ));
                    }
                };
                stack.push(frame);
            }

            LineKind::Field(text) => match stack.last_mut() {
                None if is_file_statement(text) => {
                    debug!("skipping file-level statement {}", quote(text));
                }
                None => {
                    return Err(error(
                        &format!("Declaration {} outside of a block", quote(text)),
                        line.line,
                        line.column,
                    ));
                }
                Some(Frame::Oneof { variants, .. }) => variants.push(text.clone()),
                Some(Frame::Node(node)) => {
                    node.fields.insert(text.clone(), None);
                }
            },
        }
    }

    if let Some(frame) = stack.last() {
        let (name, at) = frame.describe();
        return Err(error(&format!("Unclosed block {}", quote(&name)), at, 1));
    }

    Ok(schema)
}
