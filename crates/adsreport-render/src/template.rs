//! Single-pass `{name}` placeholder substitution.
//!
//! A template and its value map must agree exactly: every placeholder needs
//! a value and every value needs a placeholder. Substituted values are
//! never rescanned, so a value containing `{x}` is emitted literally.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::TemplateError;

/// Lowercase identifiers in braces. CSS blocks (`{ margin: 0 }`) never match.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("valid placeholder regex"));

/// Placeholder name to rendered value.
pub type Values = BTreeMap<&'static str, String>;

#[derive(Debug, Clone)]
pub struct Template {
    name: &'static str,
    source: &'static str,
    placeholders: BTreeSet<String>,
}

impl Template {
    #[must_use]
    pub fn new(name: &'static str, source: &'static str) -> Self {
        let placeholders = PLACEHOLDER
            .captures_iter(source)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect();
        Self {
            name,
            source,
            placeholders,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Checks that `values` covers this template's placeholders exactly.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingValue`] for the first placeholder
    /// without a value, or [`TemplateError::UnknownPlaceholder`] for the
    /// first value the template never uses.
    pub fn check(&self, values: &Values) -> Result<(), TemplateError> {
        if let Some(missing) = self
            .placeholders
            .iter()
            .find(|p| !values.contains_key(p.as_str()))
        {
            return Err(TemplateError::MissingValue {
                template: self.name,
                placeholder: missing.clone(),
            });
        }
        if let Some(unknown) = values.keys().find(|k| !self.placeholders.contains(**k)) {
            return Err(TemplateError::UnknownPlaceholder {
                template: self.name,
                placeholder: (*unknown).to_string(),
            });
        }
        Ok(())
    }

    /// Substitutes every placeholder in one pass.
    ///
    /// # Errors
    ///
    /// Fails before producing any output if [`Self::check`] fails.
    pub fn render(&self, values: &Values) -> Result<String, TemplateError> {
        self.check(values)?;
        let rendered = PLACEHOLDER.replace_all(self.source, |cap: &Captures<'_>| {
            values.get(&cap[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}
