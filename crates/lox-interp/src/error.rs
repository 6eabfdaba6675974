//! Runtime error family (`spec.md` S7, "Runtime" row).
//!
//! Every variant carries the source line so the driver can report it through
//! `ErrorSink::runtime_error`, which writes the two-line `<MESSAGE>\n[line N]`
//! form spec S6 mandates. Message text is taken verbatim from the wording
//! recovered in `SPEC_FULL.md` S3 (itself grounded on
//! `original_source/lox/environment.py` and `callable.py`).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    OperandMustBeNumber { line: u32 },

    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers { line: u32 },

    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeTwoNumbersOrTwoStrings { line: u32 },

    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: u32 },

    #[error("Undefined property {name}.")]
    UndefinedProperty { name: String, line: u32 },

    #[error("Only instances have properties.")]
    OnlyInstancesHaveProperties { line: u32 },

    #[error("Only instances have fields.")]
    OnlyInstancesHaveFields { line: u32 },

    #[error("Expected {expected} arguments but got {got}.")]
    Arity { expected: usize, got: usize, line: u32 },

    #[error("Can only call functions and classes.")]
    NotCallable { line: u32 },
}

impl RuntimeError {
    /// Source line to report alongside the message (spec S6 two-line form).
    pub fn line(&self) -> u32 {
        match self {
            RuntimeError::OperandMustBeNumber { line }
            | RuntimeError::OperandsMustBeNumbers { line }
            | RuntimeError::OperandsMustBeTwoNumbersOrTwoStrings { line }
            | RuntimeError::UndefinedVariable { line, .. }
            | RuntimeError::UndefinedProperty { line, .. }
            | RuntimeError::OnlyInstancesHaveProperties { line }
            | RuntimeError::OnlyInstancesHaveFields { line }
            | RuntimeError::Arity { line, .. }
            | RuntimeError::NotCallable { line } => *line,
        }
    }
}

/// Non-local control transfer distinct from an ordinary runtime error (spec
/// S9 "`return` as non-local control flow"): a `return` statement anywhere in
/// a function body unwinds through arbitrarily nested block executions and
/// is caught only at the call frame that invoked the body.
#[derive(Debug)]
pub enum Unwind {
    Return(crate::value::Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

pub type EvalResult = Result<crate::value::Value, RuntimeError>;
pub type ExecResult = Result<(), Unwind>;
