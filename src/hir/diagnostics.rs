//! Diagnostics: positioned validation messages.

use crate::base::Span;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Information => 3,
            Severity::Hint => 4,
        }
    }
}

/// Value of [`Diagnostic::source`].
pub const DIAGNOSTIC_SOURCE: &str = "lookml";

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The document the diagnostic belongs to.
    pub uri: String,
    pub range: Span,
    pub severity: Severity,
    /// One of the constants in [`codes`], or a custom rule's code.
    pub code: String,
    pub message: String,
    pub source: &'static str,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        uri: impl Into<String>,
        range: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            range,
            severity,
            code: code.into(),
            message: message.into(),
            source: DIAGNOSTIC_SOURCE,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(
        code: impl Into<String>,
        uri: impl Into<String>,
        range: Span,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, code, uri, range, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(
        code: impl Into<String>,
        uri: impl Into<String>,
        range: Span,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, code, uri, range, message)
    }

    pub fn information(
        code: impl Into<String>,
        uri: impl Into<String>,
        range: Span,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Information, code, uri, range, message)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes reported by the analyzer.
pub mod codes {
    /// The document could not be parsed.
    pub const PARSE_ERROR: &str = "parse-error";
    /// A base view or join target names no view.
    pub const UNDEFINED_VIEW: &str = "undefined-view";
    pub const MISSING_SQL_ON: &str = "missing-sql-on";
    pub const INVALID_RELATIONSHIP: &str = "invalid-relationship";
    /// Two fields of one view share a name.
    pub const DUPLICATE_FIELD: &str = "duplicate-field";
    /// Two top-level constructs of one kind share a name in one file.
    pub const DUPLICATE_CONSTRUCT: &str = "duplicate-construct";
    pub const INVALID_MEASURE_TYPE: &str = "invalid-measure-type";
    pub const MISSING_SQL: &str = "missing-sql";
    pub const INVALID_DIMENSION_TYPE: &str = "invalid-dimension-type";
    pub const DEPRECATED_PARAMETER: &str = "deprecated-parameter";
    pub const NAMING_CONVENTION: &str = "naming-convention";
    pub const UNUSED_VIEW: &str = "unused-view";
    pub const CYCLIC_JOIN: &str = "cyclic-join";

    /// Every built-in code.
    pub const ALL: &[&str] = &[
        PARSE_ERROR,
        UNDEFINED_VIEW,
        MISSING_SQL_ON,
        INVALID_RELATIONSHIP,
        DUPLICATE_FIELD,
        DUPLICATE_CONSTRUCT,
        INVALID_MEASURE_TYPE,
        MISSING_SQL,
        INVALID_DIMENSION_TYPE,
        DEPRECATED_PARAMETER,
        NAMING_CONVENTION,
        UNUSED_VIEW,
        CYCLIC_JOIN,
    ];
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
