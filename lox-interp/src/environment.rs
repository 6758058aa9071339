use lox_value::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("variable {name:?} already defined in this scope ({scope})")]
    AlreadyDefined { name: String, scope: String },
    #[error("use of undefined variable {0:?}")]
    UndefinedVariable(String),
}

/// A scope mapping variable names to values, chained to the scope enclosing it.
///
/// A binding holds `None` when the variable is `nil`. A nested scope owns its parent and gives it
/// back with [`Environment::into_parent`], so the parent always outlives it.
#[derive(Debug, Default)]
pub struct Environment {
    /// Only used in diagnostics.
    name: String,
    parent: Option<Box<Environment>>,
    bindings: HashMap<String, Option<Value>>,
}

impl Environment {
    /// Creates a scope with no parent.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            bindings: HashMap::new(),
        }
    }

    /// The root scope of an interpreter.
    pub fn globals() -> Self {
        Self::new("globals")
    }

    /// Creates a scope nested inside `parent`.
    pub fn enclosed(name: impl Into<String>, parent: Environment) -> Self {
        Self {
            parent: Some(Box::new(parent)),
            ..Self::new(name)
        }
    }

    /// Discards this scope and its bindings, returning the enclosing scope if there is one.
    pub fn into_parent(self) -> Option<Environment> {
        self.parent.map(|parent| *parent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `name` in this scope. Shadowing a variable of an enclosing scope is allowed,
    /// redefining one of this scope is not.
    pub fn define(&mut self, name: &str, value: Option<Value>) -> Result<(), EnvError> {
        if self.bindings.contains_key(name) {
            return Err(EnvError::AlreadyDefined {
                name: name.to_string(),
                scope: self.name.clone(),
            });
        }

        tracing::debug!(name, scope = %self.name, "define");
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Looks up `name`, innermost scope first.
    ///
    /// Returns `None` if the variable is not bound anywhere, `Some(&None)` if it is bound to `nil`.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        let mut scope = Some(self);
        while let Some(env) = scope {
            if let Some(value) = env.bindings.get(name) {
                return Some(value);
            }
            scope = env.parent.as_deref();
        }
        None
    }

    /// Rebinds `name` in the nearest scope that defines it. Never creates a binding.
    pub fn assign(&mut self, name: &str, value: Option<Value>) -> Result<(), EnvError> {
        if let Some(binding) = self.bindings.get_mut(name) {
            tracing::debug!(name, scope = %self.name, "assign");
            *binding = value;
            Ok(())
        } else if let Some(parent) = self.parent.as_mut() {
            parent.assign(name, value)
        } else {
            Err(EnvError::UndefinedVariable(name.to_string()))
        }
    }
}
