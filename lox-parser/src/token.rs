//! Lexical tokens of the Lox language.

use std::fmt;
use std::ops::Range;

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Only generated once the source is exhausted. Zero width.
    Eof,
    /// Lex error, e.g. an unexpected character or an unterminated string.
    Error,

    // punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Dot,
    SemiColon,

    // operators
    Minus, // NOTE: can also be unary
    Plus,
    Star,
    Slash,
    Bang,
    Eq,
    BangEq,
    DoubleEq,
    Greater,
    GreaterEq,
    Less,
    LessEq,

    // literals
    String,
    Number,
    Ident,

    // keywords
    If,
    Else,
    Or,
    And,
    For,
    While,
    True,
    False,
    Class,
    Super,
    This,
    Fun,
    Var,
    Nil,
    Print,
    Return,
}

impl Kind {
    /// The name of the kind, as used in the textual form of a [`Token`].
    pub fn name(self) -> &'static str {
        match self {
            Kind::Eof => "EOF",
            Kind::Error => "Error",
            Kind::OpenParen => "OpenParen",
            Kind::CloseParen => "CloseParen",
            Kind::OpenBrace => "OpenBrace",
            Kind::CloseBrace => "CloseBrace",
            Kind::Comma => "Comma",
            Kind::Dot => "Dot",
            Kind::SemiColon => "SemiColon",
            Kind::Minus => "Minus",
            Kind::Plus => "Plus",
            Kind::Star => "Star",
            Kind::Slash => "Slash",
            Kind::Bang => "Bang",
            Kind::Eq => "Eq",
            Kind::BangEq => "BangEq",
            Kind::DoubleEq => "DoubleEq",
            Kind::Greater => "Greater",
            Kind::GreaterEq => "GreaterEq",
            Kind::Less => "Less",
            Kind::LessEq => "LessEq",
            Kind::String => "String",
            Kind::Number => "Number",
            Kind::Ident => "Ident",
            Kind::If => "If",
            Kind::Else => "Else",
            Kind::Or => "Or",
            Kind::And => "And",
            Kind::For => "For",
            Kind::While => "While",
            Kind::True => "True",
            Kind::False => "False",
            Kind::Class => "Class",
            Kind::Super => "Super",
            Kind::This => "This",
            Kind::Fun => "Fun",
            Kind::Var => "Var",
            Kind::Nil => "Nil",
            Kind::Print => "Print",
            Kind::Return => "Return",
        }
    }

    /// The source text of the kind.
    ///
    /// Kinds with fixed text (e.g. `SemiColon`, `While`) return that text; `Ident`, `Number`,
    /// `String` and the sentinels return their name like [`Kind::name`] does.
    pub fn lexeme(self) -> &'static str {
        match self {
            Kind::OpenParen => "(",
            Kind::CloseParen => ")",
            Kind::OpenBrace => "{",
            Kind::CloseBrace => "}",
            Kind::Comma => ",",
            Kind::Dot => ".",
            Kind::SemiColon => ";",
            Kind::Minus => "-",
            Kind::Plus => "+",
            Kind::Star => "*",
            Kind::Slash => "/",
            Kind::Bang => "!",
            Kind::Eq => "=",
            Kind::BangEq => "!=",
            Kind::DoubleEq => "==",
            Kind::Greater => ">",
            Kind::GreaterEq => ">=",
            Kind::Less => "<",
            Kind::LessEq => "<=",
            Kind::If => "if",
            Kind::Else => "else",
            Kind::Or => "or",
            Kind::And => "and",
            Kind::For => "for",
            Kind::While => "while",
            Kind::True => "true",
            Kind::False => "false",
            Kind::Class => "class",
            Kind::Super => "super",
            Kind::This => "this",
            Kind::Fun => "fun",
            Kind::Var => "var",
            Kind::Nil => "nil",
            Kind::Print => "print",
            Kind::Return => "return",
            Kind::Eof | Kind::Error | Kind::String | Kind::Number | Kind::Ident => self.name(),
        }
    }

    /// Looks up `ident` in the keyword table.
    ///
    /// Returns the keyword kind and `true` on an exact match, `(Kind::Ident, false)` otherwise.
    pub fn keyword(ident: &str) -> (Kind, bool) {
        let kind = match ident {
            "if" => Kind::If,
            "else" => Kind::Else,
            "or" => Kind::Or,
            "and" => Kind::And,
            "for" => Kind::For,
            "while" => Kind::While,
            "true" => Kind::True,
            "false" => Kind::False,
            "class" => Kind::Class,
            "super" => Kind::Super,
            "this" => Kind::This,
            "fun" => Kind::Fun,
            "var" => Kind::Var,
            "nil" => Kind::Nil,
            "print" => Kind::Print,
            "return" => Kind::Return,
            _ => return (Kind::Ident, false),
        };
        (kind, true)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binding strength of binary and prefix operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Accepts any expression.
    Min,
    /// `==`, `!=`
    Equality,
    /// `<`, `<=`, `>`, `>=`, `or`, `and`
    Comparison,
    /// `+`, `-`
    AddSubtract,
    /// `*`, `/`
    MulDivide,
    /// Prefix `!` and `-`
    Unary,
    Max,
}

/// A lexical token: its kind and where it is in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset just past the last byte of the token.
    pub end: usize,
    /// 1-indexed line the token starts on.
    pub line: usize,
}

impl Token {
    pub fn new(kind: Kind, span: Range<usize>, line: usize) -> Self {
        Self {
            kind,
            start: span.start,
            end: span.end,
            line,
        }
    }

    /// Reports whether the token is of the given `kind`.
    pub fn is(&self, kind: Kind) -> bool {
        self.kind == kind
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The source text covered by the token.
    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span()).unwrap_or_default()
    }

    /// Reports whether the token is a binary operator.
    pub fn is_binary_op(&self) -> bool {
        self.precedence() > Precedence::Min
    }

    /// Returns the precedence of the token as a binary operator, or [`Precedence::Min`] if it is
    /// not one.
    pub fn precedence(&self) -> Precedence {
        match self.kind {
            Kind::DoubleEq | Kind::BangEq => Precedence::Equality,
            Kind::Less | Kind::LessEq | Kind::Greater | Kind::GreaterEq | Kind::Or | Kind::And => {
                Precedence::Comparison
            }
            Kind::Plus | Kind::Minus => Precedence::AddSubtract,
            Kind::Star | Kind::Slash => Precedence::MulDivide,
            _ => Precedence::Min,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Token::{} line={} start={} end={}>",
            self.kind, self.line, self.start, self.end
        )
    }
}
