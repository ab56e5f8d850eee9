//! Leafref path expressions.
//!
//! Only the subset of XPath allowed in a leafref `path` is understood:
//! an absolute path (`/if:interfaces/if:interface/if:name`) or a relative
//! one (`../../neighbor/id`). Predicates are accepted and dropped, since
//! they constrain instances and never change the referenced schema node.

use crate::error::ParseError;
use std::fmt;

/// One downward step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    /// Textual prefix, resolved through the referencing module's imports.
    pub prefix: Option<String>,
    /// Local node name.
    pub name: String,
}

/// Parsed leafref path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpr {
    raw: String,
    absolute: bool,
    up: usize,
    steps: Vec<PathStep>,
}

impl PathExpr {
    /// Parses a path expression.
    ///
    /// # Errors
    /// Returns `ParseError` if the expression is empty, has unbalanced
    /// predicates or is not a valid absolute or relative path.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyPath);
        }

        let stripped = strip_predicates(trimmed)?;
        let absolute = stripped.starts_with('/');
        let body = stripped.strip_prefix('/').unwrap_or(&stripped);

        let mut up = 0;
        let mut steps = Vec::new();
        for segment in body.split('/').map(str::trim) {
            if segment.is_empty() {
                return Err(ParseError::invalid_path(trimmed, "empty step"));
            }
            if segment == ".." {
                if absolute || !steps.is_empty() {
                    return Err(ParseError::invalid_path(
                        trimmed,
                        "'..' is only allowed at the start of a relative path",
                    ));
                }
                up += 1;
                continue;
            }
            steps.push(parse_step(trimmed, segment)?);
        }

        if steps.is_empty() {
            return Err(ParseError::invalid_path(trimmed, "path selects no node"));
        }
        if !absolute && up == 0 {
            return Err(ParseError::invalid_path(
                trimmed,
                "relative path must start with '..'",
            ));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            absolute,
            up,
            steps,
        })
    }

    /// Returns the path as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true for an absolute path.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Returns the number of leading `..` steps.
    #[must_use]
    pub fn up(&self) -> usize {
        self.up
    }

    /// Returns the downward steps.
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn strip_predicates(path: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in path.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::UnbalancedPredicate {
                        path: path.to_string(),
                    })?;
            }
            '\'' | '"' if depth > 0 => quote = Some(c),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    if depth != 0 || quote.is_some() {
        return Err(ParseError::UnbalancedPredicate {
            path: path.to_string(),
        });
    }
    Ok(out)
}

fn parse_step(path: &str, segment: &str) -> Result<PathStep, ParseError> {
    let (prefix, name) = match segment.split_once(':') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, segment),
    };
    if let Some(prefix) = prefix {
        if !is_identifier(prefix) {
            return Err(ParseError::invalid_path(
                path,
                format!("invalid prefix '{prefix}'"),
            ));
        }
    }
    if !is_identifier(name) {
        return Err(ParseError::invalid_path(
            path,
            format!("invalid node name '{name}'"),
        ));
    }
    Ok(PathStep {
        prefix: prefix.map(str::to_string),
        name: name.to_string(),
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative() {
        let path = PathExpr::parse("../../neighbor/neighbor2-id").unwrap();
        assert!(!path.is_absolute());
        assert_eq!(path.up(), 2);
        assert_eq!(path.steps().len(), 2);
        assert_eq!(path.steps()[1].name, "neighbor2-id");
        assert_eq!(path.steps()[1].prefix, None);
    }

    #[test]
    fn test_parse_absolute_with_prefixes() {
        let path = PathExpr::parse("/if:interfaces/if:interface/if:name").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path.up(), 0);
        assert_eq!(path.steps()[0].prefix.as_deref(), Some("if"));
        assert_eq!(path.steps()[2].name, "name");
        assert_eq!(path.as_str(), "/if:interfaces/if:interface/if:name");
    }

    #[test]
    fn test_parse_strips_predicates() {
        let path =
            PathExpr::parse("/a:list[a:name = current()/../a:ref]/a:value").unwrap();
        assert_eq!(path.steps().len(), 2);
        assert_eq!(path.steps()[0].name, "list");
        assert_eq!(path.steps()[1].name, "value");

        let quoted = PathExpr::parse("/x[name='a]b']/y").unwrap();
        assert_eq!(quoted.steps()[1].name, "y");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathExpr::parse("  "), Err(ParseError::EmptyPath));
        assert!(matches!(
            PathExpr::parse("/a[b"),
            Err(ParseError::UnbalancedPredicate { .. })
        ));
        assert!(matches!(
            PathExpr::parse("a/b"),
            Err(ParseError::InvalidPath { .. })
        ));
        assert!(matches!(
            PathExpr::parse("../a/../b"),
            Err(ParseError::InvalidPath { .. })
        ));
        assert!(matches!(
            PathExpr::parse("../.."),
            Err(ParseError::InvalidPath { .. })
        ));
        assert!(matches!(
            PathExpr::parse("/a//b"),
            Err(ParseError::InvalidPath { .. })
        ));
    }
}
