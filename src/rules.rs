// src/rules.rs

use crate::error::RuleError;
use regex::Regex;
use serde::Deserialize;

/// Folds a family of request paths (e.g. `/user/123/orders`) into a single
/// metric tag value (e.g. `/user/$id/orders`).
///
/// A rule matches a path when its regexp matches, or when both prefix and
/// suffix are set and match, or when only one of them is set and matches.
/// A rule without any criteria never matches.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct PathTransformingRule {
    regexp: Option<Regex>,
    prefix: Option<String>,
    suffix: Option<String>,
    transformed: String,
}

/// The rule as it is written in the configuration file.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRule {
    #[serde(default)]
    regexp: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    suffix: Option<String>,
    transformed: String,
}

impl TryFrom<RawRule> for PathTransformingRule {
    type Error = RuleError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        let mut rule = PathTransformingRule::new(raw.transformed);
        if let Some(prefix) = raw.prefix {
            rule = rule.with_prefix(prefix);
        }
        if let Some(suffix) = raw.suffix {
            rule = rule.with_suffix(suffix);
        }
        match raw.regexp {
            Some(pattern) if !pattern.is_empty() => rule.with_regexp(&pattern),
            _ => Ok(rule),
        }
    }
}

impl PathTransformingRule {
    /// Creates a rule without criteria. It won't match anything until a
    /// regexp, prefix or suffix is added.
    pub fn new(transformed: impl Into<String>) -> Self {
        Self {
            regexp: None,
            prefix: None,
            suffix: None,
            transformed: transformed.into(),
        }
    }

    pub fn with_regexp(mut self, pattern: &str) -> Result<Self, RuleError> {
        let regexp = Regex::new(pattern).map_err(|source| RuleError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        self.regexp = Some(regexp);
        Ok(self)
    }

    /// An empty prefix is the same as no prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into()).filter(|p| !p.is_empty());
        self
    }

    /// An empty suffix is the same as no suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into()).filter(|s| !s.is_empty());
        self
    }

    pub fn transformed(&self) -> &str {
        &self.transformed
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.regexp.as_ref().is_some_and(|re| re.is_match(path)) {
            return true;
        }

        match (self.prefix.as_deref(), self.suffix.as_deref()) {
            (Some(prefix), Some(suffix)) => path.starts_with(prefix) && path.ends_with(suffix),
            (Some(prefix), None) => path.starts_with(prefix),
            (None, Some(suffix)) => path.ends_with(suffix),
            (None, None) => false,
        }
    }
}

/// Returns the output of the first matching rule, or `path` unchanged when
/// no rule matches.
pub fn transform_path<'a>(path: &'a str, rules: &'a [PathTransformingRule]) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(path))
        .map_or(path, PathTransformingRule::transformed)
}
