//! lox-sem - The resolver: a single static pass over the AST that computes,
//! for every variable-use expression, the lexical distance to its declaring
//! scope (`spec.md` S4.3).
//!
//! The interpreter consults the resulting [`ResolverMap`] instead of walking
//! the environment chain dynamically for local names; this is what makes
//! closures see the binding that was live at definition time rather than
//! whatever a later same-named local happens to shadow (spec S8, scenario
//! #7). Absence of an entry for a node means "resolve dynamically at the
//! global environment" - the resolver never reports ambiguity for globals.

mod scope;

use lox_par::{Expr, FunctionDecl, NodeId, Stmt};
use lox_util::{ErrorSink, FxHashMap, Symbol};
use scope::ScopeStack;

/// Side-table from variable-use node identity to lexical distance. Keyed by
/// `NodeId` (node identity), never by structural equality (spec S3, S9).
pub type ResolverMap = FxHashMap<NodeId, usize>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    None,
    Class,
}

pub struct Resolver<'a> {
    scopes: ScopeStack,
    locals: ResolverMap,
    current_function: FunctionKind,
    current_class: ClassKind,
    errors: &'a ErrorSink,
}

impl<'a> Resolver<'a> {
    pub fn new(errors: &'a ErrorSink) -> Self {
        Self {
            scopes: ScopeStack::new(),
            locals: FxHashMap::default(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            errors,
        }
    }

    /// Resolve an entire program, returning the completed side-table.
    pub fn resolve(mut self, statements: &[Stmt]) -> ResolverMap {
        self.resolve_statements(statements);
        self.locals
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { statements } => {
                self.scopes.push();
                self.resolve_statements(statements);
                self.scopes.pop();
            }
            Stmt::Class { name, methods } => {
                self.declare(name);
                self.define(name);

                let enclosing_class = self.current_class;
                self.current_class = ClassKind::Class;

                self.scopes.push();
                self.scopes.declare(Symbol::intern("this"));
                self.scopes.define(Symbol::intern("this"));

                for method in methods {
                    let kind = if method.name.lexeme == "init" {
                        FunctionKind::Initializer
                    } else {
                        FunctionKind::Method
                    };
                    self.resolve_function(method, kind);
                }

                self.scopes.pop();
                self.current_class = enclosing_class;
            }
            Stmt::Expression { expr } => self.resolve_expr(expr),
            Stmt::Function(decl) => {
                // Declare+define the function's own name before resolving
                // its body so recursive calls resolve.
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FunctionKind::Function);
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }
            Stmt::Print { expr } => self.resolve_expr(expr),
            Stmt::Return { keyword, value } => {
                if self.current_function == FunctionKind::None {
                    self.errors
                        .token_error(keyword.line, false, &keyword.lexeme, "Can't return from top-level code.");
                }
                if let Some(value) = value {
                    if self.current_function == FunctionKind::Initializer {
                        self.errors.token_error(
                            keyword.line,
                            false,
                            &keyword.lexeme,
                            "Can't return a value from an initializer.",
                        );
                    }
                    self.resolve_expr(value);
                }
            }
            Stmt::Var { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            }
        }
    }

    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = self.current_function;
        self.current_function = kind;

        self.scopes.push();
        for param in &decl.parameters {
            self.declare(param);
            self.define(param);
        }
        self.resolve_statements(&decl.body);
        self.scopes.pop();

        self.current_function = enclosing_function;
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.symbol());
            }
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for arg in arguments {
                    self.resolve_expr(arg);
                }
            }
            Expr::Get { object, .. } => self.resolve_expr(object),
            Expr::Grouping { inner } => self.resolve_expr(inner),
            Expr::Literal { .. } => {}
            Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }
            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }
            Expr::This { id, keyword } => {
                if self.current_class == ClassKind::None {
                    self.errors.token_error(
                        keyword.line,
                        false,
                        &keyword.lexeme,
                        "Can't use 'this' outside of a class.",
                    );
                    return;
                }
                self.resolve_local(*id, Symbol::intern("this"));
            }
            Expr::Unary { right, .. } => self.resolve_expr(right),
            Expr::Variable { id, name } => {
                let sym = name.symbol();
                if self.scopes.innermost_status(sym) == Some(false) {
                    self.errors.token_error(
                        name.line,
                        false,
                        &name.lexeme,
                        "Can't read local variable in its own initializer.",
                    );
                }
                self.resolve_local(*id, sym);
            }
        }
    }

    fn declare(&mut self, name: &lox_lex::Token) {
        if self.scopes.is_empty() {
            return;
        }
        if self.scopes.declare(name.symbol()) {
            self.errors.token_error(
                name.line,
                false,
                &name.lexeme,
                "Already a variable with this name in this scope.",
            );
        }
    }

    fn define(&mut self, name: &lox_lex::Token) {
        self.scopes.define(name.symbol());
    }

    fn resolve_local(&mut self, id: NodeId, name: Symbol) {
        if let Some(distance) = self.scopes.resolve_distance(name) {
            self.locals.insert(id, distance);
        }
        // No entry means: resolve dynamically at the global environment.
    }
}
