// src/recipe/template.rs

//! Minimal Jinja-style templating for recipe files
//!
//! Conda recipes conventionally open with variable definitions and refer to
//! them further down:
//!
//! ```text
//! {% set name = "odl" %}
//! {% set version = "0.7.0" %}
//!
//! package:
//!   name: {{ name|lower }}
//!   version: {{ version }}
//! ```
//!
//! Only `set` statements with string literals (or references to earlier
//! variables) and `{{ var }}` expressions with `lower`/`upper` filters are
//! understood. Anything else is rejected rather than passed through.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// Variables conda-build provides without a `set` statement
const BUILTINS: &[(&str, &str)] = &[("PYTHON", "python")];

/// Expand `{% set %}` statements and `{{ }}` expressions in recipe text
pub fn render(content: &str) -> Result<String> {
    let mut vars: HashMap<String, String> = BUILTINS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let mut out = String::with_capacity(content.len());

    for (lineno, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if let Some(stmt) = trimmed
            .strip_prefix("{%")
            .and_then(|s| s.strip_suffix("%}"))
        {
            let stmt = stmt.trim_matches(|c: char| c == '-' || c.is_whitespace());
            let (name, value) = parse_set(stmt, &vars)
                .map_err(|reason| template_error(lineno, reason))?;
            debug!("Template variable {} = {:?}", name, value);
            vars.insert(name, value);
            continue;
        }

        let rendered = substitute(line, &vars).map_err(|reason| template_error(lineno, reason))?;
        out.push_str(&rendered);
        out.push('\n');
    }

    Ok(out)
}

fn template_error(lineno: usize, reason: String) -> Error {
    Error::invalid("template", format!("line {}: {}", lineno + 1, reason))
}

/// Parse the body of `{% set name = value %}`
fn parse_set(
    stmt: &str,
    vars: &HashMap<String, String>,
) -> std::result::Result<(String, String), String> {
    let body = stmt
        .strip_prefix("set ")
        .ok_or_else(|| format!("unsupported statement '{{% {} %}}'", stmt))?;
    let (name, value) = body
        .split_once('=')
        .ok_or_else(|| format!("expected 'set name = value', found '{}'", body))?;

    let name = name.trim();
    if !is_identifier(name) {
        return Err(format!("invalid variable name '{}'", name));
    }

    let value = value.trim();
    let value = match unquote(value) {
        Some(literal) => substitute(literal, vars)?,
        None => evaluate(value, vars)?,
    };

    Ok((name.to_string(), value))
}

/// Replace every `{{ expr }}` in a line
fn substitute(line: &str, vars: &HashMap<String, String>) -> std::result::Result<String, String> {
    let mut result = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| "unterminated '{{' expression".to_string())?;
        result.push_str(&evaluate(&after[..end], vars)?);
        rest = &after[end + 2..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Evaluate `var` or `var | filter | filter`
fn evaluate(expr: &str, vars: &HashMap<String, String>) -> std::result::Result<String, String> {
    let mut parts = expr.split('|').map(str::trim);
    let name = parts.next().unwrap_or_default();

    if !is_identifier(name) {
        return Err(format!("unsupported expression '{}'", expr.trim()));
    }
    let mut value = vars
        .get(name)
        .cloned()
        .ok_or_else(|| format!("undefined variable '{}'", name))?;

    for filter in parts {
        value = match filter {
            "lower" => value.to_lowercase(),
            "upper" => value.to_uppercase(),
            other => return Err(format!("unsupported filter '{}'", other)),
        };
    }

    Ok(value)
}

fn unquote(s: &str) -> Option<&str> {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_set_and_substitute() {
        let content = r#"{% set name = "ODL" %}
{% set version = "0.7.0" %}
package:
  name: {{ name|lower }}
  version: {{ version }}
"#;
        let rendered = render(content).unwrap();
        assert!(rendered.contains("name: odl"));
        assert!(rendered.contains("version: 0.7.0"));
        assert!(!rendered.contains("{%"));
    }

    #[test]
    fn test_set_may_reference_earlier_variable() {
        let content = "{% set version = \"1.2\" %}\n{% set tag = \"v{{ version }}\" %}\n{%- set v = version -%}\nrev: {{ tag }} {{ v }}\n";
        assert_eq!(render(content).unwrap(), "rev: v1.2 1.2\n");
    }

    #[test]
    fn test_builtin_python_variable() {
        let rendered = render("script: {{ PYTHON }} -m pip install .").unwrap();
        assert_eq!(rendered, "script: python -m pip install .\n");
    }

    #[test]
    fn test_undefined_variable_is_rejected() {
        let err = render("name: {{ nope }}").unwrap_err();
        assert_eq!(err.kind(), "InvalidField");
        assert!(err.to_string().contains("undefined variable 'nope'"));
    }

    #[test]
    fn test_unsupported_constructs_are_rejected() {
        assert!(render("{% if win %}").is_err());
        assert!(render("x: {{ compiler('c') }}").is_err());
        assert!(render("x: {{ name").is_err());
        assert!(render("{% set n = \"a\" %}\nx: {{ n|title }}").is_err());
    }

    #[test]
    fn test_plain_yaml_passes_through() {
        let content = "package:\n  name: odl\n";
        assert_eq!(render(content).unwrap(), content);
    }
}
