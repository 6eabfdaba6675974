//! lox-interp - The tree-walking executor (`spec.md` S4.4-S4.5).
//!
//! Consumes a resolved AST (the `Stmt` list from `lox-par` plus the
//! `ResolverMap` from `lox-sem`) and runs it directly - no intermediate
//! representation, no bytecode. Values are dynamically typed; scoping for
//! locals is driven by the resolver's precomputed distances, globals resolve
//! dynamically through the environment chain (spec S3, S9).

mod environment;
mod error;
mod interpreter;
mod native;
mod value;

pub use environment::Environment;
pub use error::{EvalResult, ExecResult, RuntimeError, Unwind};
pub use interpreter::Interpreter;
pub use value::{stringify, LoxClass, LoxFunction, LoxInstance, NativeFunction, Value};
