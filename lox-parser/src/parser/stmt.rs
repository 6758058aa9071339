use super::*;
use crate::ast::{Declaration, Statement};

impl<'a> Parser<'a> {
    /// Parses a statement, leaving `self.current` on its terminating `;`.
    #[tracing::instrument(level = "trace", skip_all, fields(token = %self.current))]
    pub fn parse_stmt(&mut self) -> Statement {
        match self.current.kind {
            Kind::Var => self.parse_var_declaration(),
            Kind::Return => self.parse_return_stmt(),
            Kind::Print => self.parse_print_stmt(),
            _ => {
                // expression statement
                let expression = self.parse_expr();
                self.expect(Kind::SemiColon);
                Statement::Expression(expression)
            }
        }
    }

    fn parse_var_declaration(&mut self) -> Statement {
        self.expect(Kind::Ident);
        let ident = self.parse_ident();
        let value = if self.next.is(Kind::Eq) {
            self.advance(); // eat ident
            self.advance(); // eat `=`
            Some(self.parse_expr())
        } else {
            None
        };
        self.expect(Kind::SemiColon);
        Statement::Declaration(Declaration::Var { ident, value })
    }

    fn parse_return_stmt(&mut self) -> Statement {
        let keyword = self.current;
        self.advance();
        let value = self.parse_expr();
        self.expect(Kind::SemiColon);
        Statement::Return { keyword, value }
    }

    fn parse_print_stmt(&mut self) -> Statement {
        let keyword = self.current;
        self.advance();
        let value = self.parse_expr();
        self.expect(Kind::SemiColon);
        Statement::Print { keyword, value }
    }
}
