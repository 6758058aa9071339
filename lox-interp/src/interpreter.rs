use crate::environment::{EnvError, Environment};
use lox_parser::ast::{Declaration, Expression, Node, Program, Statement};
use lox_parser::token::{Kind, Token};
use lox_value::{display, equal, is_truthy, Value, ValueKind};
use std::io::{self, Write};

/// An error raised while evaluating a program. Evaluation stops at the first one.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct RuntimeError {
    /// Line of the token the error is attributed to.
    pub line: usize,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(line: usize, kind: impl Into<RuntimeErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeErrorKind {
    #[error("operand of unary '-' must be a Number, got {0}")]
    Negate(ValueKind),
    #[error("{side} operand of '{op}' must be a Number, got {kind}")]
    NonNumericOperand {
        side: &'static str,
        op: &'static str,
        kind: ValueKind,
    },
    #[error("invalid operand types for '+': left (String) + right ({0})")]
    Concatenate(ValueKind),
    #[error("unsupported {arity} operator '{op}'")]
    UnsupportedOperator { arity: &'static str, op: &'static str },
    #[error("assignment to undefined variable {0:?}")]
    UndefinedAssignment(String),
    #[error("invalid expression")]
    InvalidExpression,
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Tree-walking interpreter.
///
/// `print` writes to `stdout`, [`Interpreter::report`] writes to `stderr`. Variables are kept in
/// a global environment that lives as long as the interpreter, so consecutive calls to
/// [`Interpreter::eval`] share state.
pub struct Interpreter<W: Write, E: Write> {
    stdout: W,
    stderr: E,
    env: Environment,
}

impl<W: Write, E: Write> Interpreter<W, E> {
    pub fn new(stdout: W, stderr: E) -> Self {
        Self {
            stdout,
            stderr,
            env: Environment::globals(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The sink `print` writes to.
    pub fn output(&mut self) -> &mut W {
        &mut self.stdout
    }

    /// The sink diagnostics are written to.
    pub fn diagnostics(&mut self) -> &mut E {
        &mut self.stderr
    }

    /// Gives back the output sinks.
    pub fn into_sinks(self) -> (W, E) {
        (self.stdout, self.stderr)
    }

    /// Writes `error` to the diagnostics sink.
    pub fn report(&mut self, error: &RuntimeError) -> io::Result<()> {
        writeln!(self.stderr, "runtime error: {}", error)
    }

    /// Evaluates every statement of `program` in order and returns the value of the last one.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn eval(&mut self, program: &Program) -> Result<Option<Value>, RuntimeError> {
        let mut result = None;
        for statement in &program.statements {
            result = self.eval_statement(statement)?;
        }
        Ok(result)
    }

    /// Evaluates a statement. Declarations and `print` produce no value.
    pub fn eval_statement(&mut self, statement: &Statement) -> Result<Option<Value>, RuntimeError> {
        tracing::debug!(line = statement.token().line, "eval statement");
        match statement {
            Statement::Expression(expression) => self.eval_expression(expression),
            Statement::Print { keyword, value } => {
                let value = self.eval_expression(value)?;
                writeln!(self.stdout, "{}", display(value.as_ref()))
                    .map_err(|err| RuntimeError::new(keyword.line, err))?;
                Ok(None)
            }
            // TODO: unwind to the caller once functions exist
            Statement::Return { value, .. } => self.eval_expression(value),
            Statement::Declaration(Declaration::Var { ident, value }) => {
                let value = match value {
                    Some(value) => self.eval_expression(value)?,
                    None => None,
                };
                self.env
                    .define(&ident.name, value)
                    .map_err(|err| RuntimeError::new(ident.token.line, err))?;
                Ok(None)
            }
        }
    }

    pub fn eval_expression(&mut self, expression: &Expression) -> Result<Option<Value>, RuntimeError> {
        match expression {
            Expression::Ident(ident) => match self.env.get(&ident.name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::new(
                    ident.token.line,
                    EnvError::UndefinedVariable(ident.name.clone()),
                )),
            },
            Expression::Number { value, .. } => Ok(Some(Value::Number(*value))),
            Expression::Bool { value, .. } => Ok(Some(Value::from_bool(*value))),
            Expression::String { value, .. } => Ok(Some(Value::from(value.as_str()))),
            Expression::Nil { .. } => Ok(None),
            Expression::Unary { op, operand } => self.eval_unary(*op, operand),
            Expression::Binary { lhs, op, rhs } => self.eval_binary(lhs, *op, rhs),
            Expression::Grouped { inner, .. } => self.eval_expression(inner),
            Expression::Assign { target, value } => {
                let value = self.eval_expression(value)?;
                self.env
                    .assign(&target.name, value.clone())
                    .map_err(|err| match err {
                        EnvError::UndefinedVariable(name) => RuntimeError::new(
                            target.token.line,
                            RuntimeErrorKind::UndefinedAssignment(name),
                        ),
                        err => RuntimeError::new(target.token.line, err),
                    })?;
                Ok(value)
            }
            Expression::Error(token) => {
                Err(RuntimeError::new(token.line, RuntimeErrorKind::InvalidExpression))
            }
        }
    }

    fn eval_unary(&mut self, op: Token, operand: &Expression) -> Result<Option<Value>, RuntimeError> {
        let operand = self.eval_expression(operand)?;
        match op.kind {
            Kind::Minus => match operand {
                Some(Value::Number(val)) => Ok(Some(Value::Number(-val))),
                other => Err(RuntimeError::new(
                    op.line,
                    RuntimeErrorKind::Negate(ValueKind::of(other.as_ref())),
                )),
            },
            Kind::Bang => Ok(Some(Value::from_bool(!is_truthy(operand.as_ref())))),
            _ => Err(RuntimeError::new(
                op.line,
                RuntimeErrorKind::UnsupportedOperator {
                    arity: "unary",
                    op: op.kind.lexeme(),
                },
            )),
        }
    }

    fn eval_binary(
        &mut self,
        lhs: &Expression,
        op: Token,
        rhs: &Expression,
    ) -> Result<Option<Value>, RuntimeError> {
        // short circuiting operators only evaluate `rhs` when they have to
        match op.kind {
            Kind::And => {
                let left = self.eval_expression(lhs)?;
                if !is_truthy(left.as_ref()) {
                    return Ok(Some(Value::from_bool(false)));
                }
                let right = self.eval_expression(rhs)?;
                return Ok(Some(Value::from_bool(is_truthy(right.as_ref()))));
            }
            Kind::Or => {
                let left = self.eval_expression(lhs)?;
                if is_truthy(left.as_ref()) {
                    return Ok(Some(Value::from_bool(true)));
                }
                let right = self.eval_expression(rhs)?;
                return Ok(Some(Value::from_bool(is_truthy(right.as_ref()))));
            }
            _ => {}
        }

        let left = self.eval_expression(lhs)?;
        let right = self.eval_expression(rhs)?;

        /// Generate evaluation of an operator on two numbers.
        macro_rules! num_binary_op {
            ($op: tt, $result: path) => {{
                let (a, b) = numeric_operands(op, &left, &right)?;
                $result(a $op b)
            }};
        }

        let value = match op.kind {
            Kind::Plus => match left.as_ref().and_then(Value::cast_to_str) {
                Some(a) => match right.as_ref().and_then(Value::cast_to_str) {
                    Some(b) => Value::from(format!("{}{}", a, b)),
                    None => {
                        return Err(RuntimeError::new(
                            op.line,
                            RuntimeErrorKind::Concatenate(ValueKind::of(right.as_ref())),
                        ))
                    }
                },
                None => num_binary_op!(+, Value::Number),
            },
            Kind::Minus => num_binary_op!(-, Value::Number),
            Kind::Star => num_binary_op!(*, Value::Number),
            // IEEE semantics, dividing by zero gives inf or NaN
            Kind::Slash => num_binary_op!(/, Value::Number),
            Kind::Greater => num_binary_op!(>, Value::from_bool),
            Kind::GreaterEq => num_binary_op!(>=, Value::from_bool),
            Kind::Less => num_binary_op!(<, Value::from_bool),
            Kind::LessEq => num_binary_op!(<=, Value::from_bool),
            Kind::DoubleEq => Value::from_bool(equal(left.as_ref(), right.as_ref())),
            Kind::BangEq => Value::from_bool(!equal(left.as_ref(), right.as_ref())),
            _ => {
                return Err(RuntimeError::new(
                    op.line,
                    RuntimeErrorKind::UnsupportedOperator {
                        arity: "binary",
                        op: op.kind.lexeme(),
                    },
                ))
            }
        };
        Ok(Some(value))
    }
}

/// Validates that both operands of `op` are numbers.
fn numeric_operands(
    op: Token,
    left: &Option<Value>,
    right: &Option<Value>,
) -> Result<(f64, f64), RuntimeError> {
    let operand = |side: &'static str, value: &Option<Value>| {
        value.as_ref().and_then(Value::cast_to_number).ok_or_else(|| {
            RuntimeError::new(
                op.line,
                RuntimeErrorKind::NonNumericOperand {
                    side,
                    op: op.kind.lexeme(),
                    kind: ValueKind::of(value.as_ref()),
                },
            )
        })
    };
    Ok((operand("left", left)?, operand("right", right)?))
}
