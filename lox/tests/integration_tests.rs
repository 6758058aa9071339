use insta::assert_snapshot;
use lox::{run_file, run_repl, run_source, RunOptions};
use lox_interp::{EnvError, RuntimeError, RuntimeErrorKind};
use lox_source::SyntaxErrors;
use lox_value::Value;
use std::fs;

/// Runs `source` and returns its result along with everything printed.
fn interpret(source: &str) -> (anyhow::Result<Option<Value>>, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = run_source("test.lox", source, RunOptions::default(), &mut out, &mut err);
    assert!(err.is_empty());
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn smoke_program() {
    let (result, out) = interpret(
        r#"
        // greet
        var greeting = "hello" + " " + "world";
        print greeting;
        var x = 2;
        var y;
        print y;
        y = x * 10 / 4;
        print y;
        print -y >= 0 or !(x == 2);
        x + y;"#,
    );
    assert_eq!(result.unwrap(), Some(Value::Number(7.0)));
    assert_snapshot!(out.trim_end(), @r###"
    "hello world"
    nil
    5
    false
    "###);
}

#[test]
fn syntax_errors_are_aggregated() {
    let (result, out) = interpret("print 1;\nvar = 2;\nprint (3;\nvar s = \"open");
    // nothing runs when the program does not parse
    assert!(out.is_empty());

    let err = result.unwrap_err();
    let errors = err.downcast_ref::<SyntaxErrors>().unwrap();
    assert_eq!(errors.len(), 3);
    assert_snapshot!(errors, @r###"
    test.lox:2:1: expected "Ident", got Eq: "="
    test.lox:3:8: expected ")", got SemiColon: ";"
    test.lox:4:10: unterminated string literal
    "###);
}

#[test]
fn runtime_error_stops_evaluation() {
    let (result, out) = interpret("print 1;\nvar a = 1;\nvar a = 2;\nprint 2;");
    assert_eq!(out, "1\n");

    let err = result.unwrap_err();
    let err = err.downcast_ref::<RuntimeError>().unwrap();
    assert_eq!(err.line, 3);
    assert!(matches!(
        &err.kind,
        RuntimeErrorKind::Env(EnvError::AlreadyDefined { name, .. }) if name == "a"
    ));
}

#[test]
fn tokenise_only() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let options = RunOptions {
        tokenise: true,
        timings: true,
    };
    // tokenising does not need the program to parse
    let result = run_source("test.lox", "print (1", options, &mut out, &mut err).unwrap();
    assert_eq!(result, None);
    assert_snapshot!(String::from_utf8(out).unwrap().trim_end(), @r###"
    <Token::Print line=1 start=0 end=5>
    <Token::OpenParen line=1 start=6 end=7>
    <Token::Number line=1 start=7 end=8>
    <Token::EOF line=1 start=8 end=8>
    "###);
    assert!(String::from_utf8(err).unwrap().contains("Took"));
}

#[test]
fn run_file_prints_result() {
    let path = std::env::temp_dir().join(format!("lox-run-file-{}.lox", std::process::id()));
    fs::write(&path, "var x = 20;\nprint x;\nx / 8;").unwrap();

    let mut out = Vec::new();
    let result = run_file(&path, RunOptions::default(), &mut out, Vec::new());
    fs::remove_file(&path).unwrap();

    result.unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "20\n2.5\n");
}

#[test]
fn repl_session() {
    let input = "var x = 2;\nx + 3;\n\nprint \"hi\";\nx = ;\ny;\nx;\n";
    let mut out = Vec::new();
    let mut err = Vec::new();
    run_repl(input.as_bytes(), &mut out, &mut err).unwrap();

    // state survives errors on earlier lines
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "-> -> 5\n-> -> \"hi\"\n-> -> -> 2\n-> "
    );
    assert_snapshot!(String::from_utf8(err).unwrap().trim_end(), @r###"
    REPL:1:6: expected expression, got SemiColon: ";"
    runtime error: line 1: use of undefined variable "y"
    "###);
}

#[test]
fn repl_empty_input() {
    let mut out = Vec::new();
    run_repl(&b""[..], &mut out, Vec::new()).unwrap();
    assert_eq!(out, b"-> ");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let depth = 100_000;
    let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
    let (result, out) = interpret(&source);
    assert!(out.is_empty());

    let err = result.unwrap_err();
    let errors = err.downcast_ref::<SyntaxErrors>().unwrap();
    assert_snapshot!(errors, @"test.lox:1:263: expression nested too deeply (limit is 256)");

    // the REPL reports it and keeps its state
    let input = format!("var x = 1;\n{}x;\nx;\n", "-".repeat(depth));
    let mut out = Vec::new();
    let mut err = Vec::new();
    run_repl(input.as_bytes(), &mut out, &mut err).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "-> -> -> 1\n-> ");
    assert_snapshot!(
        String::from_utf8(err).unwrap().trim_end(),
        @"REPL:1:257: expression nested too deeply (limit is 256)"
    );
}
