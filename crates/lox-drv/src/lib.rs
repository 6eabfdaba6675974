//! lox-drv - CLI entry point: REPL loop, file execution, exit-code mapping.
//!
//! Ties the four pipeline crates together: `lox-lex` -> `lox-par` ->
//! `lox-sem` -> `lox-interp`. Each source unit (one REPL line, or the whole
//! contents of a script file) runs through all four stages against a fresh
//! [`ErrorSink`]; the accumulated flags on that sink become the process exit
//! code (0 clean, 65 a scan/parse/resolve error, 70 a runtime error).

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;
use lox_interp::Interpreter;
use lox_lex::Lexer;
use lox_par::Parser;
use lox_sem::Resolver;
use lox_util::ErrorSink;

/// Resolved invocation mode and options for one process run (spec S6: file
/// mode or REPL mode, mutually exclusive).
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub enum Mode {
    File(PathBuf),
    Repl,
}

impl Config {
    /// Parse `std::env::args()`-style arguments (argv[0] already stripped).
    ///
    /// Usage: `loxi [--verbose|-v] [script]`. More than one positional
    /// argument is a usage error (spec S6 names no multi-file mode).
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut verbose = false;
        let mut script = None;
        for arg in args {
            match arg.as_str() {
                "--verbose" | "-v" => verbose = true,
                _ if script.is_none() => script = Some(PathBuf::from(arg)),
                _ => return Err("Usage: loxi [--verbose] [script]".to_string()),
            }
        }
        let mode = match script {
            Some(path) => Mode::File(path),
            None => Mode::Repl,
        };
        Ok(Config { mode, verbose })
    }
}

/// A single pipeline run over one session's worth of options (spec S2
/// pipeline: scan -> parse -> resolve -> interpret).
pub struct Session {
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Session { config }
    }

    /// Dispatch to file or REPL mode and return the process exit code.
    pub fn run(&self) -> anyhow::Result<i32> {
        match &self.config.mode {
            Mode::File(path) => self.run_file(path),
            Mode::Repl => self.run_repl(),
        }
    }

    /// Run a whole file as one unit: a runtime error still lets exit code 65
    /// win if a scan/parse/resolve error also occurred (spec S6, S7 - pre-
    /// runtime errors short-circuit interpretation entirely).
    fn run_file(&self, path: &Path) -> anyhow::Result<i32> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("couldn't read {}: {e}", path.display()))?;
        let errors = ErrorSink::new();
        self.run_source(&source, &errors);
        Ok(errors.exit_code())
    }

    /// Read-eval-print loop: one line per pipeline run, error flags reset
    /// between lines so one bad line doesn't poison the rest of the session
    /// (spec S6). The REPL's own exit code is always 0 - only `exit`
    /// (ctrl-d / EOF) ends it.
    fn run_repl(&self) -> anyhow::Result<i32> {
        let errors = ErrorSink::new();
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        loop {
            print!("> ");
            stdout.flush().ok();
            let mut line = String::new();
            let bytes_read = stdin.lock().read_line(&mut line)?;
            if bytes_read == 0 {
                println!();
                return Ok(0);
            }
            errors.reset();
            self.run_source(&line, &errors);
        }
    }

    fn run_source(&self, source: &str, errors: &ErrorSink) {
        if self.config.verbose {
            debug!("scanning {} bytes", source.len());
        }
        let tokens = Lexer::new(source, errors).scan_tokens();
        if errors.had_error() {
            return;
        }

        if self.config.verbose {
            debug!("parsing {} tokens", tokens.len());
        }
        let statements = Parser::new(tokens, errors).parse();
        if errors.had_error() {
            return;
        }

        if self.config.verbose {
            debug!("resolving {} statements", statements.len());
        }
        let locals = Resolver::new(errors).resolve(&statements);
        if errors.had_error() {
            return;
        }

        if self.config.verbose {
            debug!("resolver produced {} local bindings", locals.len());
        }
        let mut interpreter = Interpreter::new(&locals, errors);
        interpreter.interpret(&statements);
    }
}
