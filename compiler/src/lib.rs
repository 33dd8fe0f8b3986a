//! astproto-compiler
//!
//! This crate implements:
//!  1) A line classifier + stack-machine parser for `.proto`-style AST schemas,
//!  2) Inline annotation extraction (`// (guard: value)`),
//!  3) Field-shape resolution (modifier, primitive / enum / message / union),
//!  4) Code generation (`compile_schema_to_typescript` → `String`),
//!  5) Error types (`AstProtoError`) and `GeneratorConfig`.

pub mod error;
pub mod config;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod annotation;
pub mod resolver;
pub mod gen_ts;
pub mod emitter;
pub mod compiler;

pub use compiler::compile_schema;
pub use compiler::generate_typescript;
pub use config::GeneratorConfig;
pub use emitter::compile_schema_to_typescript;
pub use error::AstProtoError;
