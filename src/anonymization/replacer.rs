//! Replacers: what a field gets overwritten with
//!
//! A replacer is either a zero-argument generator or a literal string.
//! Values read from configuration that are neither are kept as
//! [`Replacer::Unsupported`] and only rejected when the runner tries to apply
//! them, so a page may already hold earlier substitutions when that happens.

use std::fmt;
use std::sync::Arc;

/// Source of generated values
pub trait ValueGenerator: Send + Sync {
    /// Produces the next value
    fn generate(&self) -> String;

    /// Short label for logs
    fn describe(&self) -> String {
        "generator".to_string()
    }
}

impl<F> ValueGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Replacement applied to one field
#[derive(Clone)]
pub enum Replacer {
    /// Called once per record; the result is truncated to the field's max length
    Generator(Arc<dyn ValueGenerator>),

    /// Assigned verbatim, never truncated
    Literal(String),

    /// A configured value of the wrong type, described for the error message
    Unsupported(String),
}

impl Replacer {
    /// Wraps a generator
    pub fn generator<G>(generator: G) -> Self
    where
        G: ValueGenerator + 'static,
    {
        Self::Generator(Arc::new(generator))
    }

    /// Wraps a literal
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Interprets a configured `value = ...` entry
    ///
    /// Strings become literals; anything else is kept as unsupported.
    pub fn from_toml(value: &toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Self::Literal(s.clone()),
            other => Self::Unsupported(format!("{} `{}`", other.type_str(), other)),
        }
    }

    /// Label for logs and reports
    pub fn describe(&self) -> String {
        match self {
            Self::Generator(generator) => generator.describe(),
            Self::Literal(_) => "literal".to_string(),
            Self::Unsupported(found) => format!("unsupported {found}"),
        }
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator(generator) => f
                .debug_tuple("Generator")
                .field(&generator.describe())
                .finish(),
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Unsupported(found) => f.debug_tuple("Unsupported").field(found).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_generator() {
        let replacer = Replacer::generator(|| "X".repeat(3));
        match replacer {
            Replacer::Generator(generator) => assert_eq!(generator.generate(), "XXX"),
            other => panic!("expected generator, got {other:?}"),
        }
    }

    #[test]
    fn test_from_toml_string_is_literal() {
        let replacer = Replacer::from_toml(&toml::Value::String("fixed@example.com".into()));
        assert!(matches!(replacer, Replacer::Literal(ref s) if s == "fixed@example.com"));
    }

    #[test]
    fn test_from_toml_integer_is_unsupported() {
        let replacer = Replacer::from_toml(&toml::Value::Integer(12345));
        match replacer {
            Replacer::Unsupported(found) => {
                assert!(found.contains("integer"));
                assert!(found.contains("12345"));
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(Replacer::literal("a").describe(), "literal");
        assert_eq!(Replacer::generator(String::new).describe(), "generator");
        assert!(Replacer::Unsupported("boolean `true`".into())
            .describe()
            .starts_with("unsupported"));
    }
}
