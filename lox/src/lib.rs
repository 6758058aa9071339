//! Drivers for the Lox pipeline: running a source file, dumping its tokens and the interactive
//! read, eval, print loop.

use anyhow::Context;
use lox_interp::Interpreter;
use lox_parser::lexer::Lexer;
use lox_parser::parser::Parser;
use lox_source::Source;
use lox_value::Value;
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Shown before every line read by the REPL.
pub const PROMPT: &str = "-> ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Only print the token stream.
    pub tokenise: bool,
    /// Print the elapsed time to the diagnostics sink.
    pub timings: bool,
}

/// Reads the file at `path` and runs it, printing the value of the last statement if it has one.
pub fn run_file(
    path: &Path,
    options: RunOptions,
    mut out: impl Write,
    err: impl Write,
) -> anyhow::Result<()> {
    let content =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&content);
    let name = path.display().to_string();

    if let Some(value) = run_source(&name, &content, options, &mut out, err)? {
        writeln!(out, "{}", value)?;
    }
    Ok(())
}

/// Runs `content`, named `name` in diagnostics.
///
/// With [`RunOptions::tokenise`] the tokens are printed to `out` and nothing is evaluated.
/// Otherwise every syntax error is returned at once, or the value of the last statement.
pub fn run_source(
    name: &str,
    content: &str,
    options: RunOptions,
    mut out: impl Write,
    mut err: impl Write,
) -> anyhow::Result<Option<Value>> {
    let start = Instant::now();

    if options.tokenise {
        let count = tokenise(content, &mut out)?;
        if options.timings {
            let elapsed = start.elapsed();
            let throughput = count as f64 / elapsed.as_secs_f64();
            writeln!(err, "\nTook {:?} ({} tokens, {:.0} tokens/s)", elapsed, count, throughput)?;
        }
        return Ok(None);
    }

    let source = Source::new(name, content);
    let program = Parser::new(&source).parse()?;
    tracing::debug!(
        name,
        statements = program.statements.len(),
        elapsed = ?start.elapsed(),
        "parsed"
    );

    let result = Interpreter::new(&mut out, &mut err).eval(&program)?;
    if options.timings {
        writeln!(err, "\nTook {:?}", start.elapsed())?;
    }
    Ok(result)
}

/// Prints every token of `content`, one per line, up to and including `EOF`.
///
/// Returns the number of tokens printed.
pub fn tokenise(content: &str, out: impl Write) -> io::Result<usize> {
    let mut out = BufWriter::new(out);
    let mut count = 0;
    for token in Lexer::new(content) {
        writeln!(out, "{}", token)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

/// Reads lines from `input` until it is exhausted, evaluating each one.
///
/// Variables survive from one line to the next. Errors are written to `err` and the loop carries
/// on; values other than `nil` are echoed to `out`.
pub fn run_repl(input: impl BufRead, out: impl Write, err: impl Write) -> io::Result<()> {
    let mut interpreter = Interpreter::new(out, err);
    let mut lines = input.lines();

    loop {
        write!(interpreter.output(), "{}", PROMPT)?;
        interpreter.output().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let source = Source::new("REPL", &line);
        let program = match Parser::new(&source).parse() {
            Ok(program) => program,
            Err(errors) => {
                writeln!(interpreter.diagnostics(), "{}", errors)?;
                continue;
            }
        };

        match interpreter.eval(&program) {
            Ok(Some(value)) => writeln!(interpreter.output(), "{}", value)?,
            Ok(None) => {}
            Err(error) => interpreter.report(&error)?,
        }
    }
}
