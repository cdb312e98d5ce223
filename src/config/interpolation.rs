//! Variable interpolation for installer command templates.
//!
//! Installer command lines are configured as argv templates using
//! `${variable}` syntax.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//!
//! # Example
//!
//! ```yaml
//! install_command: ["msiexec", "/i", "${installer}", "/qn", "/norestart"]
//! # With installer="C:\Temp\jdk.msi", runs: msiexec /i C:\Temp\jdk.msi /qn /norestart
//! ```

use crate::error::{Result, SetupError};
use std::collections::HashMap;
use std::path::Path;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing ${var} interpolations.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(escaped) = after.strip_prefix("${") {
            // $${...} -> literal ${...}
            let end = escaped.find('}').map(|i| i + 1).unwrap_or(escaped.len());
            literal.push_str("${");
            literal.push_str(&escaped[..end]);
            rest = &escaped[end..];
        } else if let Some(body) = after.strip_prefix('{') {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            let (name, remainder) = match body.find('}') {
                Some(end) => (&body[..end], &body[end + 1..]),
                None => (body, ""),
            };
            segments.push(Segment::Variable(name.to_string()));
            rest = remainder;
        } else if let Some(stripped) = after.strip_prefix('$') {
            literal.push('$');
            rest = stripped;
        } else {
            literal.push('$');
            rest = after;
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Values available to command templates.
#[derive(Debug, Clone, Default)]
pub struct InterpolationContext {
    vars: HashMap<String, String>,
}

impl InterpolationContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    /// Add a path variable, rendered with the platform's separators.
    pub fn with_path(self, name: &str, path: &Path) -> Self {
        let rendered = path.display().to_string();
        self.with(name, rendered)
    }

    /// Resolve a variable name to its value.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// Resolve all variables in an interpolated string.
///
/// # Errors
///
/// Returns `ConfigValidation` if any variable is not found in the context.
pub fn resolve_string(input: &str, context: &InterpolationContext) -> Result<String> {
    let mut result = String::new();
    for segment in parse_interpolation(input) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => {
                let value = context
                    .resolve(&name)
                    .ok_or_else(|| SetupError::ConfigValidation {
                        message: format!("Unresolved variable: ${{{}}} in '{}'", name, input),
                    })?;
                result.push_str(value);
            }
        }
    }
    Ok(result)
}

/// Resolve every argument of an argv template.
pub fn resolve_argv(template: &[String], context: &InterpolationContext) -> Result<Vec<String>> {
    if template.is_empty() {
        return Err(SetupError::ConfigValidation {
            message: "Installer command must not be empty".to_string(),
        });
    }
    template
        .iter()
        .map(|arg| resolve_string(arg, context))
        .collect()
}
