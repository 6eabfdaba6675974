//! End-to-end CLI tests driving the `loxi` binary directly (`spec.md` S6,
//! S8 end-to-end scenarios table).

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn loxi() -> Command {
    Command::cargo_bin("loxi").expect("loxi binary should build")
}

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".lox").expect("create temp script");
    file.write_all(source.as_bytes()).expect("write temp script");
    file
}

#[test]
fn arithmetic_and_print_exit_clean() {
    let file = script("print 1 + 2 * 3;");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("7\n"));
}

#[test]
fn string_concatenation() {
    let file = script("print \"hello\" + \" \" + \"world\";");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("hello world\n"));
}

#[test]
fn block_scoping_shadows_then_restores() {
    let file = script("var a = \"outer\"; { var a = \"inner\"; print a; } print a;");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("inner\nouter\n"));
}

#[test]
fn recursive_function_call() {
    let file = script("fun fib(n) { if (n <= 1) return n; return fib(n - 1) + fib(n - 2); } print fib(10);");
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("55\n"));
}

/// spec S8 scenario #5/#7: a closure sees the binding live when it was
/// defined, not a later same-named shadow in the same enclosing block.
#[test]
fn closure_captures_definition_time_binding_not_a_later_shadow() {
    let file = script(
        "var a = \"global\"; { fun g(){print a;} g(); var a = \"block\"; g(); }",
    );
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("global\nglobal\n"));
}

#[test]
fn class_instantiation_initializer_and_method_call() {
    let file = script(
        "class Counter { init() { this.n = 0; } inc() { this.n = this.n + 1; return this.n; } } \
         var c = Counter(); print c.inc(); print c.inc();",
    );
    loxi()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n2\n"));
}

#[test]
fn a_parse_error_exits_sixty_five_and_reports_on_stderr() {
    let file = script("var;");
    loxi()
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(predicate::str::contains("[line 1] Error"));
}

#[test]
fn a_runtime_type_error_exits_seventy_and_reports_on_stderr() {
    let file = script("print 1 + \"a\";");
    loxi()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Operands must be two numbers or two strings."));
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let file = script("print undeclared;");
    loxi()
        .arg(file.path())
        .assert()
        .code(70)
        .stderr(predicate::str::contains("Undefined variable 'undeclared'."));
}

#[test]
fn missing_script_file_is_reported_without_a_panic() {
    loxi()
        .arg("/nonexistent/path/does-not-exist.lox")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn verbose_flag_is_accepted_alongside_a_script() {
    let file = script("print 1;");
    loxi()
        .arg("--verbose")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n"));
}

#[test]
fn two_positional_arguments_is_a_usage_error() {
    loxi()
        .arg("a.lox")
        .arg("b.lox")
        .assert()
        .code(64)
        .stderr(predicate::str::contains("Usage"));
}
