use crate::ast::{Expression, Ident, Program};
use crate::lexer::{LexError, Lexer};
use crate::token::{Kind, Precedence, Token};
use lox_source::{Source, SyntaxError, SyntaxErrors};

mod expr;
mod stmt;

/// How deeply expressions may nest before parsing gives up on the statement.
pub const MAX_DEPTH: usize = 256;

/// Recursive descent parser with two tokens of lookahead.
///
/// Every `parse_*` method starts with `current` on the first token of the construct it parses and
/// leaves `current` on its last token.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Cached token for peeking.
    next: Token,
    /// Set by the first error of a statement. Further errors are not reported until the parser
    /// synchronises on the end of the statement.
    panicking: bool,
    /// Height of the expression being parsed, in nested operands.
    depth: usize,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let eof = Token::new(Kind::Eof, 0..0, 1);
        let mut parser = Self {
            lexer: Lexer::new(source.content),
            current: eof,
            next: eof,
            panicking: false,
            depth: 0,
            source,
        };
        // read 2 tokens so current and next are set
        parser.advance();
        parser.advance();
        parser
    }
}

impl<'a> Parser<'a> {
    /// Parses the entire source.
    ///
    /// Returns every recorded syntax error as one value if there was any.
    pub fn parse(&mut self) -> Result<Program, SyntaxErrors> {
        let program = self.parse_program();
        match self.source.errors.aggregate() {
            Some(errors) => Err(errors),
            None => Ok(program),
        }
    }

    /// Parses the entire source.
    ///
    /// Errors are accumulated in the [`Source`]. If there is any, the returned program has no
    /// statements.
    #[tracing::instrument(level = "trace", skip_all, fields(name = self.source.name))]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.current.is(Kind::Eof) {
            let errors = self.source.errors.len();
            let statement = self.parse_stmt();
            if self.panicking || self.source.errors.len() > errors {
                self.synchronise();
            } else if self.source.has_no_errors() {
                statements.push(statement);
            }
            self.advance(); // eat `;`
        }

        if !self.source.has_no_errors() {
            statements.clear();
        }
        Program { statements }
    }

    /// The syntax errors recorded so far, in order.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.source.errors.errors()
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn advance(&mut self) {
        self.current = self.next;
        self.next = self.lexer.next_token();
        if self.next.is(Kind::Error) {
            self.lex_error(self.next);
        }
        tracing::trace!(current = %self.current, "advance");
    }

    /// Advances onto the next token if it is of the given `kind`, records a syntax error otherwise.
    fn expect(&mut self, kind: Kind) -> bool {
        if self.next.is(kind) {
            self.advance(); // it matches, it is now self.current
            return true;
        }

        if self.next.is(Kind::Eof) {
            // don't show an empty lexeme
            self.syntax_error(format!("expected {:?}, got {}", kind.lexeme(), self.next.kind));
        } else {
            self.syntax_error(format!(
                "expected {:?}, got {}: {:?}",
                kind.lexeme(),
                self.next.kind,
                self.lexeme(self.next)
            ));
        }
        false
    }

    /// Raises an unexpected token error for `current`, where `wanted` should have been.
    fn unexpected(&mut self, wanted: &str) -> Expression {
        if self.current.is(Kind::Eof) {
            self.syntax_error(format!("expected {}, got EOF", wanted));
        } else {
            self.syntax_error(format!(
                "expected {}, got {}: {:?}",
                wanted,
                self.current.kind,
                self.lexeme(self.current)
            ));
        }
        Expression::Error(self.current)
    }

    /// Records a syntax error positioned at `current`, or just past it if the input ends there.
    fn syntax_error(&mut self, message: String) {
        if self.panicking {
            return;
        }
        self.panicking = true;

        let offset = if self.next.is(Kind::Eof) {
            self.current.end
        } else {
            self.current.start
        };
        tracing::trace!(%message, offset, "syntax error");
        self.source.report(message, offset, self.current.span());
    }

    /// Converts a lex error token into a syntax error positioned at the token itself.
    fn lex_error(&mut self, token: Token) {
        let message = match self.lexer.last_error() {
            Some(LexError::UnterminatedString) => LexError::UnterminatedString.to_string(),
            _ => match self.lexeme(token).chars().next() {
                Some(character) => format!("{} {:?}", LexError::UnexpectedCharacter, character),
                None => LexError::UnexpectedCharacter.to_string(),
            },
        };
        self.panicking = true;
        self.source.report(message, token.start, token.span());
    }

    /// Skips to the `;` ending the current statement (or EOF) and resumes reporting errors.
    fn synchronise(&mut self) {
        while !self.current.is(Kind::SemiColon) && !self.current.is(Kind::Eof) {
            self.advance();
        }
        self.panicking = false;
    }

    fn lexeme(&self, token: Token) -> &'a str {
        token.lexeme(self.source.content)
    }

    fn parse_ident(&mut self) -> Ident {
        Ident {
            name: self.lexeme(self.current).to_string(),
            token: self.current,
        }
    }
}
