//! In-memory model of an astproto schema.
//!
//! A schema is a brace-delimited, protobuf-like description of an AST:
//!
//! ```text
//! message IdentifierNode {
//!   int32 start = 1;
//!   int32 end = 2;
//!   string name = 3;
//! }
//! ```
//!
//! The compiler parses such text into a [`Schema`] and walks it to generate
//! one encoder per declared node.
//!
//! ```
//! use astproto_schema::*;
//!
//! let mut node = SchemaNode::new("IdentifierNode", NodeKind::Message, 1);
//! node.fields.insert("string name = 3;".to_owned(), None);
//!
//! let mut schema = Schema::default();
//! schema.nodes.insert(node.name.clone(), node);
//!
//! assert!(schema.get("IdentifierNode").is_some());
//! assert!(!schema.is_union("IdentifierNode"));
//! ```

pub mod types;

pub use types::*;
