//! Placeholder substitution for descriptor paths.
//!
//! Descriptor path strings may contain `$(NAME)` tokens (output directory,
//! module directory, user-supplied definitions). Substitution is eager: every
//! token is resolved before a path leaves the resolver, and an unresolved
//! token is an error rather than being passed through verbatim. One rule for
//! every platform and every field.

use std::collections::BTreeMap;

use thiserror::Error;

/// Error produced while substituting placeholders in a single string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstituteError {
    #[error("unresolved placeholder `$({0})`")]
    Unresolved(String),

    #[error("unterminated placeholder (missing `)`): `{0}`")]
    Unterminated(String),
}

/// An ordered map of placeholder names to their values.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderEnv {
    vars: BTreeMap<String, String>,
}

impl PlaceholderEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        PlaceholderEnv::default()
    }

    /// Define a placeholder, replacing any previous value.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Look up a placeholder value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Defined placeholder names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Replace every `$(NAME)` token in `input` with its defined value.
    pub fn substitute(&self, input: &str) -> Result<String, SubstituteError> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("$(") {
            output.push_str(&rest[..start]);
            let token = &rest[start + 2..];
            let end = token
                .find(')')
                .ok_or_else(|| SubstituteError::Unterminated(rest[start..].to_string()))?;
            let name = &token[..end];

            match self.vars.get(name) {
                Some(value) => output.push_str(value),
                None => return Err(SubstituteError::Unresolved(name.to_string())),
            }

            rest = &token[end + 1..];
        }

        output.push_str(rest);
        Ok(output)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlaceholderEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = PlaceholderEnv::new();
        for (k, v) in iter {
            env.define(k, v);
        }
        env
    }
}
