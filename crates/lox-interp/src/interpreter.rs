//! Tree-walking executor (`spec.md` S4.4).
//!
//! One `evaluate`/`execute` pair, each a single tagged match over `Expr`/
//! `Stmt` (spec S9 "Visitor pattern -> tagged dispatch"). `return` is
//! threaded back to the call frame that owns it via [`Unwind`] rather than
//! propagated as an ordinary error (spec S9, S5).

use std::rc::Rc;

use lox_lex::TokenKind;
use lox_par::{Expr, FunctionDecl, LiteralValue, NodeId, Stmt};
use lox_sem::ResolverMap;
use lox_util::{ErrorSink, FxHashMap, Symbol};

use crate::environment::Environment;
use crate::error::{EvalResult, ExecResult, RuntimeError, Unwind};
use crate::native;
use crate::value::{is_truthy, stringify, values_equal, LoxClass, LoxFunction, LoxInstance, NativeFunction, Value};

pub struct Interpreter<'a> {
    globals: Environment,
    environment: Environment,
    locals: &'a ResolverMap,
    errors: &'a ErrorSink,
}

impl<'a> Interpreter<'a> {
    pub fn new(locals: &'a ResolverMap, errors: &'a ErrorSink) -> Self {
        let globals = Environment::new();
        globals.define(
            Symbol::intern("clock"),
            Value::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: native::clock,
            })),
        );
        Self {
            environment: globals.clone(),
            globals,
            locals,
            errors,
        }
    }

    /// Execute a full program (or one REPL line) top to bottom. Stops at the
    /// first runtime error and reports it through the shared error sink
    /// (spec S7: "abort current top-level statement processing"); the caller
    /// is responsible for resetting the sink and re-invoking per REPL line.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => {
                    self.errors.runtime_error(err.to_string(), err.line());
                    return;
                }
                Err(Unwind::Return(_)) => {
                    // The resolver rejects `return` outside a function, so a
                    // clean pipeline run never reaches this arm.
                    return;
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Block { statements } => self.execute_in_new_scope(statements),
            Stmt::Class { name, methods } => self.execute_class(name, methods),
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Function(decl) => {
                let function = Rc::new(LoxFunction {
                    declaration: Rc::new(decl.clone()),
                    closure: self.environment.clone(),
                    is_initializer: false,
                });
                self.environment.define(decl.name.symbol(), Value::Function(function));
                Ok(())
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                println!("{}", stringify(&value));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.symbol(), value);
                Ok(())
            }
            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    /// Swap in a fresh child environment, run `statements`, then restore the
    /// previous environment unconditionally - on the normal path, a runtime
    /// error, or a `return` unwind (spec S4.4 "Block execution", S5).
    fn execute_in_new_scope(&mut self, statements: &[Stmt]) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, Environment::with_enclosing(&self.environment));
        let result = self.execute_block(statements);
        self.environment = previous;
        result
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> ExecResult {
        for stmt in statements {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn execute_class(&mut self, name: &lox_lex::Token, methods: &[FunctionDecl]) -> ExecResult {
        // Pre-declare so a method body could in principle resolve the
        // class's own name; mirrors the two-phase define the resolver
        // already performs for `Function` declarations.
        self.environment.define(name.symbol(), Value::Nil);

        let mut method_table = FxHashMap::default();
        for decl in methods {
            let is_initializer = decl.name.lexeme == "init";
            let function = Rc::new(LoxFunction {
                declaration: Rc::new(decl.clone()),
                closure: self.environment.clone(),
                is_initializer,
            });
            method_table.insert(decl.name.symbol(), function);
        }

        let class = Rc::new(LoxClass {
            name: name.symbol(),
            methods: method_table,
        });
        self.environment.define(name.symbol(), Value::Class(class));
        Ok(())
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => self.environment.assign_at(distance, name.symbol(), value.clone()),
                    None => self.globals.assign(name, value.clone())?,
                }
                Ok(value)
            }
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Call { callee, paren, arguments } => self.evaluate_call(callee, paren, arguments),
            Expr::Get { object, name } => {
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => {
                        if let Some(value) = instance.borrow().fields.get(&name.symbol()) {
                            return Ok(value.clone());
                        }
                        let class = instance.borrow().class.clone();
                        if let Some(method) = class.find_method(name.symbol()) {
                            return Ok(Value::Function(self.bind(&method, instance)));
                        }
                        Err(RuntimeError::UndefinedProperty {
                            name: name.lexeme.clone(),
                            line: name.line,
                        })
                    }
                    _ => Err(RuntimeError::OnlyInstancesHaveProperties { line: name.line }),
                }
            }
            Expr::Grouping { inner } => self.evaluate(inner),
            Expr::Literal { value } => Ok(self.evaluate_literal(value)),
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;
                match operator.kind {
                    TokenKind::Or if is_truthy(&left) => Ok(left),
                    TokenKind::And if !is_truthy(&left) => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expr::Set { object, name, value } => {
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => {
                        let value = self.evaluate(value)?;
                        instance.borrow_mut().fields.insert(name.symbol(), value.clone());
                        Ok(value)
                    }
                    _ => Err(RuntimeError::OnlyInstancesHaveFields { line: name.line }),
                }
            }
            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Minus => Ok(Value::Number(-number_operand(&right, operator.line)?)),
                    TokenKind::Bang => Ok(Value::Bool(!is_truthy(&right))),
                    _ => unreachable!("unary operator outside {{!, -}}"),
                }
            }
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
        }
    }

    fn evaluate_literal(&self, value: &LiteralValue) -> Value {
        match value {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::String(s) => Value::String(Rc::from(s.as_str())),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &lox_lex::Token, right: &Expr) -> EvalResult {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        let line = operator.line;
        match operator.kind {
            TokenKind::Minus => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Slash => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Number(a / b))
            }
            TokenKind::Star => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(Rc::from(format!("{a}{b}")))),
                _ => Err(RuntimeError::OperandsMustBeTwoNumbersOrTwoStrings { line }),
            },
            TokenKind::Greater => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = number_operands(&left, &right, line)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::BangEqual => Ok(Value::Bool(!values_equal(&left, &right))),
            TokenKind::EqualEqual => Ok(Value::Bool(values_equal(&left, &right))),
            _ => unreachable!("binary operator outside the grammar's binary set"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &lox_lex::Token, arguments: &[Expr]) -> EvalResult {
        let callee = self.evaluate(callee)?;
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate(argument)?);
        }
        self.call_value(callee, args, paren.line)
    }

    fn call_value(&mut self, callee: Value, args: Vec<Value>, line: u32) -> EvalResult {
        match callee {
            Value::Function(function) => {
                check_arity(function.declaration.parameters.len(), args.len(), line)?;
                self.call_function(&function, args)
            }
            Value::Native(native) => {
                check_arity(native.arity, args.len(), line)?;
                Ok((native.func)(&args))
            }
            Value::Class(class) => self.instantiate(class, args, line),
            _ => Err(RuntimeError::NotCallable { line }),
        }
    }

    fn instantiate(&mut self, class: Rc<LoxClass>, args: Vec<Value>, line: u32) -> EvalResult {
        let instance = Rc::new(std::cell::RefCell::new(LoxInstance {
            class: class.clone(),
            fields: FxHashMap::default(),
        }));
        if let Some(initializer) = class.find_method(Symbol::intern("init")) {
            check_arity(initializer.declaration.parameters.len(), args.len(), line)?;
            let bound = self.bind(&initializer, instance.clone());
            self.call_function(&bound, args)?;
        } else {
            check_arity(0, args.len(), line)?;
        }
        Ok(Value::Instance(instance))
    }

    /// A fresh `Function` whose closure is a new environment enclosing the
    /// method's original closure, with `this` bound to `instance` (spec
    /// S4.4 "Method binding").
    fn bind(&self, method: &Rc<LoxFunction>, instance: Rc<std::cell::RefCell<LoxInstance>>) -> Rc<LoxFunction> {
        let env = Environment::with_enclosing(&method.closure);
        env.define(Symbol::intern("this"), Value::Instance(instance));
        Rc::new(LoxFunction {
            declaration: method.declaration.clone(),
            closure: env,
            is_initializer: method.is_initializer,
        })
    }

    fn call_function(&mut self, function: &Rc<LoxFunction>, args: Vec<Value>) -> EvalResult {
        let call_env = Environment::with_enclosing(&function.closure);
        for (param, arg) in function.declaration.parameters.iter().zip(args) {
            call_env.define(param.symbol(), arg);
        }

        let previous = std::mem::replace(&mut self.environment, call_env);
        let result = self.execute_block(&function.declaration.body);
        self.environment = previous;

        if function.is_initializer {
            // `init` always yields the bound instance, regardless of what
            // (if anything) the body returned (spec S4.4 "Initializer
            // special case").
            let this = function.closure.get_at(0, Symbol::intern("this"));
            return match result {
                Ok(()) | Err(Unwind::Return(_)) => Ok(this),
                Err(Unwind::Error(err)) => Err(err),
            };
        }

        match result {
            Ok(()) => Ok(Value::Nil),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(err)) => Err(err),
        }
    }

    fn look_up_variable(&self, id: NodeId, name: &lox_lex::Token) -> EvalResult {
        match self.locals.get(&id) {
            Some(&distance) => Ok(self.environment.get_at(distance, name.symbol())),
            None => self.globals.get(name),
        }
    }
}

fn check_arity(expected: usize, got: usize, line: u32) -> Result<(), RuntimeError> {
    if expected == got {
        Ok(())
    } else {
        Err(RuntimeError::Arity { expected, got, line })
    }
}

fn number_operand(value: &Value, line: u32) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::OperandMustBeNumber { line }),
    }
}

fn number_operands(left: &Value, right: &Value, line: u32) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(RuntimeError::OperandsMustBeNumbers { line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_par::Parser;

    fn run(src: &str) -> bool {
        let errors = ErrorSink::new();
        let tokens = lox_lex::Lexer::new(src, &errors).scan_tokens();
        let statements = Parser::new(tokens, &errors).parse();
        assert!(!errors.had_error(), "unexpected parse error in {src:?}");
        let locals = lox_sem::Resolver::new(&errors).resolve(&statements);
        assert!(!errors.had_error(), "unexpected resolve error in {src:?}");
        let mut interpreter = Interpreter::new(&locals, &errors);
        interpreter.interpret(&statements);
        errors.had_runtime_error()
    }

    #[test]
    fn arithmetic_precedence() {
        assert!(!run("print 1 + 2 * 3;"));
    }

    #[test]
    fn string_concatenation() {
        assert!(!run("print \"hi\" + \" \" + \"there\";"));
    }

    #[test]
    fn block_scoping_shadows_then_restores() {
        assert!(!run("var a = \"outer\"; { var a = \"inner\"; print a; } print a;"));
    }

    #[test]
    fn recursive_fibonacci() {
        assert!(!run(
            "fun f(n){ if (n<=1) return n; return f(n-1)+f(n-2);} print f(6);"
        ));
    }

    #[test]
    fn closure_captures_definition_time_binding() {
        assert!(!run(
            "var a = \"global\"; { fun g(){print a;} g(); var a = \"block\"; g(); }"
        ));
    }

    #[test]
    fn class_init_and_field_access() {
        assert!(!run("class C { init(x){ this.x = x; } } print C(3).x;"));
    }

    #[test]
    fn adding_string_and_number_is_a_runtime_error() {
        assert!(run("print 1 + \"a\";"));
    }

    #[test]
    fn arithmetic_on_undeclared_global_is_a_runtime_error() {
        assert!(run("var a; print a + 1;"));
    }

    #[test]
    fn division_by_zero_follows_float_semantics_no_error() {
        assert!(!run("print 1 / 0;"));
    }

    #[test]
    fn calling_a_non_callable_is_a_runtime_error() {
        assert!(run("var a = 1; a();"));
    }

    #[test]
    fn wrong_arity_is_a_runtime_error() {
        assert!(run("fun f(a, b) { return a + b; } f(1);"));
    }

    #[test]
    fn accessing_property_on_non_instance_is_a_runtime_error() {
        assert!(run("var a = 1; print a.x;"));
    }

    #[test]
    fn method_this_binds_per_instance() {
        assert!(!run(
            "class Counter { init() { this.n = 0; } inc() { this.n = this.n + 1; return this.n; } } var c = Counter(); print c.inc(); print c.inc();"
        ));
    }

    #[test]
    fn clock_is_callable_with_zero_arity() {
        assert!(!run("print clock();"));
    }

    #[test]
    fn undefined_global_read_is_a_runtime_error() {
        assert!(run("print undeclared;"));
    }

    #[test]
    fn logical_or_returns_left_value_unchanged_when_truthy() {
        assert!(!run("print 1 or 2;"));
    }

    #[test]
    fn for_loop_desugars_and_executes() {
        assert!(!run("var total = 0; for (var i = 0; i < 5; i = i + 1) total = total + i; print total;"));
    }
}
