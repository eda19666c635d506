//! Validation rules.
//!
//! Each rule is an isolated unit: [`run_rules`] executes it inside
//! `catch_unwind`, and a rule that returns an error or panics contributes no
//! diagnostics while every other rule still runs.

mod view_rules;
mod workspace_rules;

use std::panic::{AssertUnwindSafe, catch_unwind};

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::syntax::{Explore, LookmlFile, View};

use super::config::AnalysisConfig;
use super::diagnostics::Diagnostic;
use super::model::SemanticModel;

pub use view_rules::{
    DIMENSION_TYPES, DeprecatedParameterRule, DimensionTypeRule, DuplicateConstructRule,
    DuplicateFieldRule, MEASURE_TYPES, MeasureTypeRule, MissingSqlRule, NamingConventionRule,
};
pub use workspace_rules::{CyclicJoinRule, UnusedViewRule};

/// A rule could not complete its check.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule '{rule}' failed: {message}")]
    Failed { rule: String, message: String },
}

impl RuleError {
    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        RuleError::Failed {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// A successfully parsed document as seen by the rules.
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    pub uri: &'a str,
    pub ast: &'a LookmlFile,
}

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub files: &'a [SourceFile<'a>],
    /// Symbols and references resolved so far.
    pub model: &'a SemanticModel,
    pub config: &'a AnalysisConfig,
    /// Names used as an explore base view or join target anywhere.
    pub referenced_views: &'a FxHashSet<String>,
}

impl<'a> RuleContext<'a> {
    /// Every view occurrence, duplicates included.
    pub fn views(&self) -> impl Iterator<Item = (&'a str, &'a View)> + '_ {
        self.files
            .iter()
            .flat_map(|f| f.ast.views.values().map(move |v| (f.uri, v)))
    }

    /// Every explore, top level and inside models.
    pub fn explores(&self) -> impl Iterator<Item = (&'a str, &'a Explore)> + '_ {
        self.files
            .iter()
            .flat_map(|f| f.ast.all_explores().map(move |e| (f.uri, e)))
    }
}

/// A validation rule.
pub trait Rule: Send + Sync {
    /// Diagnostic code this rule reports; disabling the code skips the rule.
    fn code(&self) -> &str;

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError>;
}

/// Per-view rules followed by whole-workspace rules.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(DuplicateConstructRule),
        Box::new(DuplicateFieldRule),
        Box::new(MeasureTypeRule),
        Box::new(MissingSqlRule),
        Box::new(DimensionTypeRule),
        Box::new(DeprecatedParameterRule),
        Box::new(NamingConventionRule),
        Box::new(UnusedViewRule),
        Box::new(CyclicJoinRule),
    ]
}

/// Run every enabled rule, isolating failures.
pub fn run_rules(rules: &[Box<dyn Rule>], ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for rule in rules {
        if !ctx.config.is_enabled(rule.code()) {
            continue;
        }
        let mut sink = Vec::new();
        match catch_unwind(AssertUnwindSafe(|| rule.check(ctx, &mut sink))) {
            Ok(Ok(())) => {
                debug!(rule = rule.code(), count = sink.len(), "rule finished");
                out.append(&mut sink);
            }
            Ok(Err(err)) => {
                warn!(rule = rule.code(), error = %err, "rule failed; discarding its diagnostics")
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(
                    rule = rule.code(),
                    panic = %message,
                    "rule panicked; discarding its diagnostics"
                );
            }
        }
    }
    out
}
