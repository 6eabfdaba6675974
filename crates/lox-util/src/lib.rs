//! lox-util - Core utilities and foundation types shared across the interpreter pipeline.
//!
//! This crate provides the small set of building blocks every other pipeline
//! crate (`lox-lex`, `lox-par`, `lox-sem`, `lox-interp`, `lox-drv`) depends on:
//!
//! - [`symbol`] - string interning for identifiers and reserved words
//! - [`error_sink`] - the shared diagnostic reporting surface ([`ErrorSink`])
//!
//! None of these types encode anything specific to Lox's grammar or runtime
//! semantics; they exist so that the lexer, parser, resolver, and interpreter
//! can share one notion of "how do we report a problem" without each stage
//! rolling its own.

pub mod error_sink;
pub mod symbol;

pub use error_sink::ErrorSink;
pub use symbol::Symbol;

pub use rustc_hash::{FxHashMap, FxHashSet};
