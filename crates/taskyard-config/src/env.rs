//! Variable substitution for resource fields.
//!
//! Resources never interpret variable syntax themselves. They hand their
//! resolvable strings to an [`Environment`] and store whatever comes back.

use std::collections::BTreeMap;

use nom::{
    IResult, Parser,
    bytes::complete::{take_while, take_while1},
    combinator::recognize,
    sequence::pair,
};
use taskyard_common::error::{Result, TaskyardError};

/// A source of variable values used while resolving resources.
pub trait Environment {
    /// Substitutes every variable expression in `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskyardError::Resolution`] if an expression is malformed
    /// or names an unknown variable.
    fn resolve(&self, value: &str) -> Result<String>;

    /// Resolves each entry of `values`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by [`Environment::resolve`].
    fn resolve_slice(&self, values: &[String]) -> Result<Vec<String>> {
        values.iter().map(|v| self.resolve(v)).collect()
    }
}

const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parses a variable name at the start of `input`.
fn variable_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_continue))).parse(input)
}

/// An [`Environment`] backed by a map of variables.
///
/// Recognised syntax:
/// - `$NAME` and `${NAME}` expand to the variable's value;
/// - `$$` expands to a literal `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarEnv {
    vars: BTreeMap<String, String>,
}

impl VarEnv {
    /// Creates an environment with no variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment from the variables of the current process.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Sets `name` to `value`, replacing any previous value.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.vars.insert(name.into(), value.into());
        self
    }

    /// Returns the value of `name`, if defined.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    fn lookup(&self, expression: &str, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| TaskyardError::Resolution {
            expression: expression.to_owned(),
            message: format!("variable \"{name}\" is not defined"),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VarEnv {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for VarEnv {
    fn resolve(&self, value: &str) -> Result<String> {
        let malformed = |message: &str| TaskyardError::Resolution {
            expression: value.to_owned(),
            message: message.to_owned(),
        };

        let mut resolved = String::with_capacity(value.len());
        let mut remaining = value;

        while let Some(idx) = remaining.find('$') {
            resolved.push_str(&remaining[..idx]);
            let after = &remaining[idx + 1..];

            if let Some(rest) = after.strip_prefix('$') {
                resolved.push('$');
                remaining = rest;
            } else if let Some(braced) = after.strip_prefix('{') {
                let Some(end) = braced.find('}') else {
                    return Err(malformed("unterminated \"${\" expression"));
                };
                let name = &braced[..end];
                match variable_name(name) {
                    Ok(("", _)) => resolved.push_str(self.lookup(value, name)?),
                    _ => return Err(malformed(&format!("invalid variable name \"{name}\""))),
                }
                remaining = &braced[end + 1..];
            } else {
                let (rest, name) = variable_name(after)
                    .map_err(|_| malformed("expected a variable name after \"$\""))?;
                resolved.push_str(self.lookup(value, name)?);
                remaining = rest;
            }
        }

        resolved.push_str(remaining);
        Ok(resolved)
    }
}
