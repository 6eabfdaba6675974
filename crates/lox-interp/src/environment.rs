//! Environment: the runtime scope chain (`spec.md` S4.5).
//!
//! `{enclosing?, values}`, parent-pointing, with mutable mappings (spec S3).
//! A closure and the interpreter's active frame may share the same chain, so
//! this is an `Rc<RefCell<..>>` handle rather than an owned tree - cloning an
//! `Environment` clones the handle, not the frame (ground: `original_source/
//! lox/environment.py`'s `enclosing: Optional[Self]` parent pointer, adapted
//! to Rust's explicit shared-mutability story per spec S9).

use std::cell::RefCell;
use std::rc::Rc;

use lox_lex::Token;
use lox_util::{FxHashMap, Symbol};

use crate::error::RuntimeError;
use crate::value::Value;

struct Frame {
    values: FxHashMap<Symbol, Value>,
    enclosing: Option<Environment>,
}

#[derive(Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment(..)")
    }
}

impl Environment {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Frame {
            values: FxHashMap::default(),
            enclosing: None,
        })))
    }

    pub fn with_enclosing(enclosing: &Environment) -> Self {
        Self(Rc::new(RefCell::new(Frame {
            values: FxHashMap::default(),
            enclosing: Some(enclosing.clone()),
        })))
    }

    /// No-check insert in the current frame (spec S4.5 `define`) - redefining
    /// an existing name in the same frame silently overwrites it.
    pub fn define(&self, name: Symbol, value: Value) {
        self.0.borrow_mut().values.insert(name, value);
    }

    /// Walk the chain outward from this frame; error on miss (spec S4.5
    /// `get`). Used for globals, which the resolver never assigns a distance
    /// to (spec S4.4 "Variable access").
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        let frame = self.0.borrow();
        if let Some(value) = frame.values.get(&name.symbol()) {
            return Ok(value.clone());
        }
        match &frame.enclosing {
            Some(enclosing) => {
                let enclosing = enclosing.clone();
                drop(frame);
                enclosing.get(name)
            }
            None => Err(RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
        }
    }

    /// Walk the chain outward, overwriting the first frame that already
    /// binds `name`; error on miss (spec S4.5 `assign` - variables must be
    /// declared via `var` before they can be assigned).
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut frame = self.0.borrow_mut();
        if frame.values.contains_key(&name.symbol()) {
            frame.values.insert(name.symbol(), value);
            return Ok(());
        }
        match &frame.enclosing {
            Some(enclosing) => {
                let enclosing = enclosing.clone();
                drop(frame);
                enclosing.assign(name, value)
            }
            None => Err(RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
        }
    }

    fn ancestor(&self, distance: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..distance {
            let next = env
                .0
                .borrow()
                .enclosing
                .clone()
                .expect("resolver distance exceeds the live environment chain depth");
            env = next;
        }
        env
    }

    /// Access the `distance`-th ancestor's frame directly (spec S4.5
    /// `get_at`). The distance comes from the resolver and is trusted to
    /// still be correct at runtime (spec S4.5) - a mismatch is an interpreter
    /// bug, not a user-facing error.
    pub fn get_at(&self, distance: usize, name: Symbol) -> Value {
        self.ancestor(distance)
            .0
            .borrow()
            .values
            .get(&name)
            .cloned()
            .expect("resolver distance points at a binding that isn't present")
    }

    pub fn assign_at(&self, distance: usize, name: Symbol, value: Value) {
        self.ancestor(distance).0.borrow_mut().values.insert(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
