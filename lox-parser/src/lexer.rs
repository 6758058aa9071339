use crate::token::{Kind, Token};
use logos::Logos;
use lox_source::Position;

/// Why the lexer produced a [`Kind::Error`] token.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string literal")]
    UnterminatedString,
}

/// Raw scanner output, before keyword lookup and line tracking.
#[derive(Debug, Logos, Clone, Copy, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"\s+")]
enum RawToken {
    // punctuation
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    SemiColon,

    // operators
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("!=")]
    BangEq,
    #[token("==")]
    DoubleEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,

    // literals
    #[token("\"", string_body)]
    String,
    #[regex("[0-9]+", number_fraction)]
    Number,
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // misc
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    Comment,
}

/// Consumes a string literal up to and including the next unescaped `"`.
/// Consumes the rest of the input if there is none.
fn string_body(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexError> {
    let remainder = lex.remainder();
    let mut escaped = false;
    for (index, byte) in remainder.bytes().enumerate() {
        match byte {
            b'"' if !escaped => {
                lex.bump(index + 1);
                return Ok(());
            }
            b'\\' if !escaped => escaped = true,
            _ => escaped = false,
        }
    }

    lex.bump(remainder.len());
    Err(LexError::UnterminatedString)
}

/// Extends an integer with a fractional part, but only if a digit follows the `.`.
/// Otherwise the `.` is left for the next token.
fn number_fraction(lex: &mut logos::Lexer<RawToken>) {
    let remainder = lex.remainder().as_bytes();
    if remainder.first() == Some(&b'.') && remainder.get(1).map_or(false, u8::is_ascii_digit) {
        let digits = remainder[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        lex.bump(1 + digits);
    }
}

impl RawToken {
    fn kind(self, slice: &str) -> Kind {
        match self {
            RawToken::OpenParen => Kind::OpenParen,
            RawToken::CloseParen => Kind::CloseParen,
            RawToken::OpenBrace => Kind::OpenBrace,
            RawToken::CloseBrace => Kind::CloseBrace,
            RawToken::Comma => Kind::Comma,
            RawToken::Dot => Kind::Dot,
            RawToken::SemiColon => Kind::SemiColon,
            RawToken::Minus => Kind::Minus,
            RawToken::Plus => Kind::Plus,
            RawToken::Star => Kind::Star,
            RawToken::Slash => Kind::Slash,
            RawToken::Bang => Kind::Bang,
            RawToken::Eq => Kind::Eq,
            RawToken::BangEq => Kind::BangEq,
            RawToken::DoubleEq => Kind::DoubleEq,
            RawToken::Greater => Kind::Greater,
            RawToken::GreaterEq => Kind::GreaterEq,
            RawToken::Less => Kind::Less,
            RawToken::LessEq => Kind::LessEq,
            RawToken::String => Kind::String,
            RawToken::Number => Kind::Number,
            RawToken::Ident => Kind::keyword(slice).0,
            // skipped by the scanner, never produced
            RawToken::Comment => Kind::Error,
        }
    }
}

/// Pull based scanner over a source string.
///
/// Whitespace and comments are skipped. Bad input never stops the scan: it produces
/// [`Kind::Error`] tokens and scanning resumes after them. Once the source is exhausted every call
/// to [`Lexer::next_token`] returns an [`Kind::Eof`] token.
pub struct Lexer<'a> {
    source: &'a str,
    raw: logos::Lexer<'a, RawToken>,
    /// Current line number.
    line: usize,
    /// Offset up to which newlines have been counted into `line`.
    counted: usize,
    last_error: Option<LexError>,
    /// Set once the [`Iterator`] implementation has yielded `Eof`.
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            raw: RawToken::lexer(source),
            line: 1,
            counted: 0,
            last_error: None,
            exhausted: false,
        }
    }

    /// Returns the next token from the input.
    pub fn next_token(&mut self) -> Token {
        let result = match self.raw.next() {
            Some(result) => result,
            None => {
                let end = self.source.len();
                self.count_lines(end);
                return Token::new(Kind::Eof, end..end, self.line);
            }
        };

        let span = self.raw.span();
        self.count_lines(span.start);

        match result {
            Ok(raw) => Token::new(raw.kind(self.raw.slice()), span, self.line),
            Err(error) => {
                self.last_error = Some(error);
                let span = match error {
                    // point at the string contents, not the opening quote
                    LexError::UnterminatedString => span.start + 1..span.end,
                    LexError::UnexpectedCharacter => span,
                };
                Token::new(Kind::Error, span, self.line)
            }
        }
    }

    /// The reason the most recent [`Kind::Error`] token was produced.
    pub fn last_error(&self) -> Option<LexError> {
        self.last_error
    }

    /// Line and column information for `token`.
    pub fn position(&self, token: &Token) -> Position {
        Position::of(self.source, token.span())
    }

    fn count_lines(&mut self, offset: usize) {
        if offset <= self.counted {
            return;
        }
        self.line += self.source.as_bytes()[self.counted..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.counted = offset;
    }
}

/// Yields every token up to and including the first [`Kind::Eof`].
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        self.exhausted = token.is(Kind::Eof);
        Some(token)
    }
}
