//! Abstract syntax tree.

use crate::token::{Kind, Token};
use std::fmt;

/// Implemented by every AST node.
pub trait Node {
    /// The first token associated with the node.
    fn token(&self) -> Token;
}

/// An identifier (e.g. `foo`).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Ident(Ident),
    Number {
        value: f64,
        token: Token,
    },
    Bool {
        value: bool,
        token: Token,
    },
    String {
        value: String,
        token: Token,
    },
    Nil {
        token: Token,
    },
    /// A prefix expression (e.g. `-a`, `!b`).
    Unary {
        op: Token,
        operand: Box<Expression>,
    },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expression>,
        op: Token,
        rhs: Box<Expression>,
    },
    /// A parenthesized expression (e.g. `(a + b)`).
    Grouped {
        inner: Box<Expression>,
        lparen: Token,
        rparen: Token,
    },
    /// An assignment to an existing variable (e.g. `a = 1`).
    Assign {
        target: Ident,
        value: Box<Expression>,
    },
    /// Placeholder left where an expression failed to parse.
    Error(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its value (e.g. `1 + 2;`).
    Expression(Expression),
    Print { keyword: Token, value: Expression },
    Return { keyword: Token, value: Expression },
    Declaration(Declaration),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `var <ident> = <value>;` or `var <ident>;`
    Var {
        ident: Ident,
        value: Option<Expression>,
    },
}

/// The root of the tree: every statement in a source, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Ident {
    fn token(&self) -> Token {
        self.token
    }
}

impl Node for Expression {
    fn token(&self) -> Token {
        match self {
            Expression::Ident(ident) => ident.token,
            Expression::Number { token, .. }
            | Expression::Bool { token, .. }
            | Expression::String { token, .. }
            | Expression::Nil { token } => *token,
            Expression::Unary { op, .. } => *op,
            Expression::Binary { lhs, .. } => lhs.token(),
            Expression::Grouped { lparen, .. } => *lparen,
            Expression::Assign { target, .. } => target.token,
            Expression::Error(token) => *token,
        }
    }
}

impl Node for Statement {
    fn token(&self) -> Token {
        match self {
            Statement::Expression(expression) => expression.token(),
            Statement::Print { keyword, .. } | Statement::Return { keyword, .. } => *keyword,
            Statement::Declaration(declaration) => declaration.token(),
        }
    }
}

impl Node for Declaration {
    fn token(&self) -> Token {
        match self {
            Declaration::Var { ident, .. } => ident.token,
        }
    }
}

impl Node for Program {
    /// The first token of the first statement, or [`Kind::Eof`] if the program is empty.
    fn token(&self) -> Token {
        match self.statements.first() {
            Some(statement) => statement.token(),
            None => Token::new(Kind::Eof, 0..0, 1),
        }
    }
}

/// Renders the expression with every operation fully parenthesized, e.g. `-a * b` is `((-a) * b)`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Ident(ident) => f.write_str(&ident.name),
            Expression::Number { value, .. } => write!(f, "{}", value),
            Expression::Bool { value, .. } => write!(f, "{}", value),
            Expression::String { value, .. } => write!(f, "{:?}", value),
            Expression::Nil { .. } => f.write_str("nil"),
            Expression::Unary { op, operand } => write!(f, "({}{})", op.kind.lexeme(), operand),
            Expression::Binary { lhs, op, rhs } => {
                write!(f, "({} {} {})", lhs, op.kind.lexeme(), rhs)
            }
            // the inner expression already carries its own parentheses
            Expression::Grouped { inner, .. } => write!(f, "{}", inner),
            Expression::Assign { target, value } => write!(f, "({} = {})", target.name, value),
            Expression::Error(_) => f.write_str("<error>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: Kind, start: usize, end: usize) -> Token {
        Token::new(kind, start..end, 1)
    }

    fn number(value: f64, start: usize) -> Expression {
        Expression::Number {
            value,
            token: token(Kind::Number, start, start + 1),
        }
    }

    #[test]
    fn test_first_token() {
        // 1 + 2
        let binary = Expression::Binary {
            lhs: Box::new(number(1.0, 0)),
            op: token(Kind::Plus, 2, 3),
            rhs: Box::new(number(2.0, 4)),
        };
        assert_eq!(binary.token(), token(Kind::Number, 0, 1));

        let statement = Statement::Print {
            keyword: token(Kind::Print, 0, 5),
            value: number(1.0, 6),
        };
        assert_eq!(statement.token(), token(Kind::Print, 0, 5));

        let program = Program::default();
        assert!(program.token().is(Kind::Eof));
    }

    #[test]
    fn test_display() {
        // -(1 + 2) * x
        let expression = Expression::Binary {
            lhs: Box::new(Expression::Unary {
                op: token(Kind::Minus, 0, 1),
                operand: Box::new(Expression::Grouped {
                    inner: Box::new(Expression::Binary {
                        lhs: Box::new(number(1.0, 2)),
                        op: token(Kind::Plus, 4, 5),
                        rhs: Box::new(number(2.0, 6)),
                    }),
                    lparen: token(Kind::OpenParen, 1, 2),
                    rparen: token(Kind::CloseParen, 7, 8),
                }),
            }),
            op: token(Kind::Star, 9, 10),
            rhs: Box::new(Expression::Ident(Ident {
                name: "x".to_string(),
                token: token(Kind::Ident, 11, 12),
            })),
        };
        assert_eq!(expression.to_string(), "((-(1 + 2)) * x)");
    }
}
