//! Runtime value model (`spec.md` S3 "Runtime value", S4.4).
//!
//! `nil | bool | number | string | Function | Class | Instance`, plus a
//! `Native` variant for host-provided callables like `clock` (spec S4.4). A
//! `Function` carries its defining closure by reference (`Environment` is an
//! `Rc`-backed handle - see `environment.rs`), so a value can be cheaply
//! cloned without deep-copying the captured scope chain.

use std::rc::Rc;

use lox_par::FunctionDecl;
use lox_util::{FxHashMap, Symbol};

use crate::environment::Environment;

#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Function(Rc<LoxFunction>),
    Class(Rc<LoxClass>),
    Instance(Rc<std::cell::RefCell<LoxInstance>>),
    Native(Rc<NativeFunction>),
}

/// `{declaration, closure, is_initializer}` (spec S3). `is_initializer` is
/// `true` exactly when `declaration.name.lexeme == "init"` (spec invariant);
/// it changes what a bare `return` inside the body yields (spec S4.4
/// "Initializer special case").
#[derive(Debug)]
pub struct LoxFunction {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Environment,
    pub is_initializer: bool,
}

/// `{name, methods}` (spec S3). Methods are stored unbound - binding `this`
/// happens per-instance when a method is looked up (spec S4.4 "Method
/// binding"), not when the class itself is declared.
#[derive(Debug)]
pub struct LoxClass {
    pub name: Symbol,
    pub methods: FxHashMap<Symbol, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn find_method(&self, name: Symbol) -> Option<Rc<LoxFunction>> {
        self.methods.get(&name).cloned()
    }
}

/// `{class, fields}` (spec S3). `fields` starts empty; properties are only
/// ever created via `Set` (spec S4.4 "Property assignment").
#[derive(Debug)]
pub struct LoxInstance {
    pub class: Rc<LoxClass>,
    pub fields: FxHashMap<Symbol, Value>,
}

/// A host-implemented callable (spec S4.4 "Native function `clock`").
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: fn(&[Value]) -> Value,
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// `nil` and `false` are false; everything else is true (spec S4.4
/// "Truthiness") - notably `0` and `""` are truthy, unlike many scripting
/// languages.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Nil | Value::Bool(false))
}

/// Same-type comparison; cross-type is always false, both `nil` is true
/// (spec S4.4 "Equality"). Numbers compare as IEEE-754 floats, so `NaN` is
/// never equal to itself. Reference types compare by identity - two distinct
/// instances/classes/functions are never equal even with identical contents.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Class(x), Value::Class(y)) => Rc::ptr_eq(x, y),
        (Value::Instance(x), Value::Instance(y)) => Rc::ptr_eq(x, y),
        (Value::Native(x), Value::Native(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Stringification rules for `print` (spec S4.4). Rust's `f64` `Display`
/// already omits a trailing `.0` for whole numbers, but the explicit strip
/// mirrors `original_source/lox/interpreter.py::stringify` so the rule stays
/// visible rather than relying on an implementation accident.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            let s = n.to_string();
            s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
        }
        Value::String(s) => s.to_string(),
        Value::Function(f) => format!("<fn {}>", f.declaration.name.lexeme),
        Value::Class(c) => c.name.to_string(),
        Value::Instance(inst) => format!("{} instance", inst.borrow().class.name),
        Value::Native(n) => format!("<native fn {}>", n.name),
    }
}
