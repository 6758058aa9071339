use super::*;

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_prec`] with [`Precedence::Min`].
    pub fn parse_expr(&mut self) -> Expression {
        self.parse_expr_prec(Precedence::Min)
    }

    /// Parses an expression whose binary operators all bind tighter than `precedence`.
    #[tracing::instrument(level = "trace", skip(self))]
    fn parse_expr_prec(&mut self, precedence: Precedence) -> Expression {
        if self.depth >= MAX_DEPTH {
            return self.too_deep();
        }

        let depth = self.depth;
        self.depth += 1;
        let mut lhs = self.parse_primary_expr(precedence);

        while !self.next.is(Kind::SemiColon) && self.next.precedence() > precedence {
            self.advance(); // self.current is now the operator
            // every fold adds a level on the left
            self.depth += 1;
            lhs = self.parse_binary_expr(lhs);
        }

        self.depth = depth;
        lhs
    }

    /// Reports an expression nested past [`MAX_DEPTH`] and skips the rest of the statement,
    /// leaving `self.current` just before its `;`.
    fn too_deep(&mut self) -> Expression {
        let token = self.current;
        self.syntax_error(format!("expression nested too deeply (limit is {})", MAX_DEPTH));
        while !self.next.is(Kind::SemiColon) && !self.next.is(Kind::Eof) {
            self.advance();
        }
        Expression::Error(token)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self, precedence: Precedence) -> Expression {
        // NOTE: prefix operators are handled here
        match self.current.kind {
            // assignment is only allowed where any expression is
            Kind::Ident if precedence == Precedence::Min && self.next.is(Kind::Eq) => {
                self.parse_assign_expr()
            }
            Kind::Ident => Expression::Ident(self.parse_ident()),
            Kind::Number => self.parse_number_expr(),
            Kind::String => self.parse_string_expr(),
            Kind::True | Kind::False => Expression::Bool {
                value: self.current.is(Kind::True),
                token: self.current,
            },
            Kind::Nil => Expression::Nil {
                token: self.current,
            },
            Kind::Bang | Kind::Minus => self.parse_unary_expr(),
            Kind::OpenParen => self.parse_grouped_expr(),
            Kind::Error => {
                // already reported when it was scanned
                self.panicking = true;
                Expression::Error(self.current)
            }
            _ => self.unexpected("expression"),
        }
    }

    fn parse_unary_expr(&mut self) -> Expression {
        let op = self.current;
        self.advance();
        let operand = self.parse_expr_prec(Precedence::Unary);
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Parses the right hand side of a binary expression. `self.current` must be the operator.
    #[tracing::instrument(level = "trace", skip_all)]
    fn parse_binary_expr(&mut self, lhs: Expression) -> Expression {
        let op = self.current;
        self.advance();
        // same precedence on the right makes operators left associative
        let rhs = self.parse_expr_prec(op.precedence());
        Expression::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    fn parse_grouped_expr(&mut self) -> Expression {
        let lparen = self.current;
        self.advance();
        let inner = self.parse_expr();
        self.expect(Kind::CloseParen);
        Expression::Grouped {
            inner: Box::new(inner),
            lparen,
            rparen: self.current,
        }
    }

    /// Parses `<ident> = <value>`. Right associative: `a = b = c` is `a = (b = c)`.
    fn parse_assign_expr(&mut self) -> Expression {
        let target = self.parse_ident();
        self.advance(); // eat ident
        self.advance(); // eat `=`
        let value = self.parse_expr();
        Expression::Assign {
            target,
            value: Box::new(value),
        }
    }

    /* Expressions.Literals */
    fn parse_number_expr(&mut self) -> Expression {
        let token = self.current;
        let text = self.lexeme(token);
        let value = match text.parse::<f64>() {
            Ok(value) => value,
            Err(err) => {
                self.syntax_error(format!("invalid number literal {:?}: {}", text, err));
                0.0
            }
        };
        Expression::Number { value, token }
    }

    fn parse_string_expr(&mut self) -> Expression {
        let token = self.current;
        let value = match unquote(self.lexeme(token)) {
            Ok(value) => value,
            Err(err) => {
                self.syntax_error(err.to_string());
                String::new()
            }
        };
        Expression::String { value, token }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum UnquoteError {
    #[error("string literal is not quoted")]
    NotQuoted,
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
    #[error("string literal ends with a lone '\\'")]
    TrailingBackslash,
}

/// Strips the quotes of a string literal and processes its escape sequences.
fn unquote(literal: &str) -> Result<String, UnquoteError> {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(UnquoteError::NotQuoted)?;

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some(other) => return Err(UnquoteError::UnknownEscape(other)),
            None => return Err(UnquoteError::TrailingBackslash),
        };
        value.push(escaped);
    }

    Ok(value)
}
