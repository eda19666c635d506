//! Analysis configuration.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::diagnostics::{Diagnostic, Severity, codes};

/// Parameters reported by `deprecated-parameter` unless configured otherwise.
pub const DEFAULT_DEPRECATED_PARAMETERS: &[&str] =
    &["decimals", "sql_foreign_key", "foreign_key", "scoping"];

/// Errors from loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "serde")]
    #[error("invalid analysis configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown diagnostic code '{0}'")]
    UnknownCode(String),
}

/// Tunables for [`analyze`](super::analyze).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Codes whose diagnostics are dropped.
    pub disabled_rules: BTreeSet<String>,
    /// Severity to report a code with instead of its default.
    pub severity_overrides: BTreeMap<String, Severity>,
    pub report_unused_views: bool,
    pub deprecated_parameters: BTreeSet<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            disabled_rules: BTreeSet::new(),
            severity_overrides: BTreeMap::new(),
            report_unused_views: true,
            deprecated_parameters: DEFAULT_DEPRECATED_PARAMETERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_rule(mut self, code: impl Into<String>) -> Self {
        self.disabled_rules.insert(code.into());
        self
    }

    pub fn with_severity(mut self, code: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(code.into(), severity);
        self
    }

    pub fn with_unused_views(mut self, report: bool) -> Self {
        self.report_unused_views = report;
        self
    }

    pub fn with_deprecated_parameter(mut self, name: impl Into<String>) -> Self {
        self.deprecated_parameters.insert(name.into());
        self
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        !self.disabled_rules.contains(code)
    }

    pub fn is_deprecated(&self, parameter: &str) -> bool {
        self.deprecated_parameters.contains(parameter)
    }

    /// Apply disabling and severity overrides to a diagnostic.
    ///
    /// Parse errors are always kept as errors.
    pub fn apply(&self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        if diagnostic.code == codes::PARSE_ERROR {
            return Some(diagnostic);
        }
        if !self.is_enabled(&diagnostic.code) {
            return None;
        }
        match self.severity_overrides.get(&diagnostic.code) {
            Some(severity) => Some(diagnostic.with_severity(*severity)),
            None => Some(diagnostic),
        }
    }

    /// Reject configurations that name codes the analyzer never reports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = self
            .disabled_rules
            .iter()
            .chain(self.severity_overrides.keys());
        for code in named {
            if !codes::ALL.contains(&code.as_str()) {
                return Err(ConfigError::UnknownCode(code.clone()));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}
