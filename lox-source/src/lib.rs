//! Source code representation and error management.

use std::{cell::RefCell, fmt, ops::Range};

/// Represents source code.
pub struct Source<'a> {
    /// Name used as the prefix of diagnostics (a file path or `"REPL"`).
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` named `name` with the specified `content`.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self {
            name,
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// Computes the 1-indexed `(line, column)` of the byte `offset`.
    ///
    /// The column counts bytes since the last newline before `offset`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        line_col(self.content, offset)
    }

    /// Computes the [`Position`] of `span`. The span must not cross a newline for `end_col` to be
    /// meaningful.
    pub fn position(&self, span: Range<usize>) -> Position {
        Position::of(self.content, span)
    }

    /// Records a syntax error at the byte `offset` with the specified `message`.
    pub fn report(&self, message: impl ToString, offset: usize, span: Range<usize>) {
        let (line, column) = self.line_col(offset);
        self.errors.add_error(SyntaxError {
            file: self.name.to_string(),
            message: message.to_string(),
            span,
            line,
            column,
        });
    }
}

/// Line and column information about a span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column of the first byte.
    pub start_col: usize,
    /// 1-indexed column just past the last byte.
    pub end_col: usize,
}

impl Position {
    pub fn of(content: &str, span: Range<usize>) -> Self {
        let (line, start_col) = line_col(content, span.start);
        Self {
            line,
            start_col,
            end_col: start_col + span.end.saturating_sub(span.start),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.line, self.start_col, self.end_col)
    }
}

fn line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut last_newline_end = 0;
    for (index, byte) in content.bytes().enumerate() {
        if index >= offset {
            break;
        }
        if byte == b'\n' {
            last_newline_end = index + 1;
            line += 1;
        }
    }

    (line, 1 + offset.saturating_sub(last_newline_end))
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// The name of the source the error occurred in.
    pub file: String,
    pub message: String,
    /// Byte span of the offending token.
    pub span: Range<usize>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{file}:{line}:{column}: {message}",
            file = self.file,
            line = self.line,
            column = self.column,
            message = self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

/// Every syntax error recorded while parsing a source, reported as one value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the accumulated errors, in the order they were added.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }

    /// Returns the accumulated errors as a single error value, or `None` if there are none.
    pub fn aggregate(&self) -> Option<SyntaxErrors> {
        if self.is_empty() {
            None
        } else {
            Some(SyntaxErrors(self.errors()))
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}
