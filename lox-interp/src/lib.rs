//! Tree-walking evaluation of Lox programs.

pub mod environment;
pub mod interpreter;

pub use environment::{EnvError, Environment};
pub use interpreter::{Interpreter, RuntimeError, RuntimeErrorKind};
