//! Per-file and per-view validation rules.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::base::Span;
use crate::syntax::{AstNode, FieldNode, NamedMap, NodeInfo};

use super::{Rule, RuleContext, RuleError};
use crate::hir::diagnostics::{Diagnostic, codes};

/// Valid `type:` values of a measure.
pub const MEASURE_TYPES: &[&str] = &[
    "count",
    "count_distinct",
    "sum",
    "average",
    "min",
    "max",
    "median",
    "percentile",
    "number",
    "yesno",
    "list",
];

/// Valid `type:` values of a dimension.
pub const DIMENSION_TYPES: &[&str] = &[
    "string", "number", "int", "yesno", "tier", "date", "date_time", "time", "duration",
    "location", "zipcode",
];

static SNAKE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*$").unwrap_or_else(|e| panic!("invalid naming pattern: {e}"))
});

/// Two top-level constructs of one kind with the same name in one file.
/// Every occurrence but the last is reported. A view defined in several
/// files is reported everywhere but in the last file by URI.
pub struct DuplicateConstructRule;

impl DuplicateConstructRule {
    fn report<T>(
        uri: &str,
        kind: &str,
        map: &NamedMap<T>,
        info: impl Fn(&T) -> &NodeInfo,
        sink: &mut Vec<Diagnostic>,
    ) {
        for (name, node) in map.shadowed() {
            sink.push(Diagnostic::warning(
                codes::DUPLICATE_CONSTRUCT,
                uri,
                info(node).span,
                format!(
                    "{kind} '{name}' is declared again later in this file; the last declaration is used"
                ),
            ));
        }
    }
}

impl Rule for DuplicateConstructRule {
    fn code(&self) -> &str {
        codes::DUPLICATE_CONSTRUCT
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for file in ctx.files {
            let ast = file.ast;
            Self::report(file.uri, "View", &ast.views, |v| &v.info, sink);
            Self::report(file.uri, "Explore", &ast.explores, |e| &e.info, sink);
            Self::report(file.uri, "Model", &ast.models, |m| &m.info, sink);
            Self::report(file.uri, "Dashboard", &ast.dashboards, |d| &d.info, sink);
            for model in ast.models.values() {
                Self::report(file.uri, "Explore", &model.explores, |e| &e.info, sink);
            }
        }

        let mut definitions: BTreeMap<&str, Vec<(&str, Span)>> = BTreeMap::new();
        for file in ctx.files {
            for (_, view) in file.ast.views.effective() {
                if !view.is_refinement() {
                    definitions
                        .entry(view.base_name())
                        .or_default()
                        .push((file.uri, view.info.span));
                }
            }
        }
        for (name, found) in &definitions {
            let Some(((winner, _), shadowed)) = found.split_last() else {
                continue;
            };
            for (uri, span) in shadowed {
                sink.push(Diagnostic::warning(
                    codes::DUPLICATE_CONSTRUCT,
                    *uri,
                    *span,
                    format!(
                        "View '{name}' is also declared in '{winner}'; that declaration is used"
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Field names shared by several fields of one view, across field kinds.
pub struct DuplicateFieldRule;

impl Rule for DuplicateFieldRule {
    fn code(&self) -> &str {
        codes::DUPLICATE_FIELD
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, view) in ctx.views() {
            let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
            for field in view.fields() {
                let count = seen.entry(field.name()).or_default();
                *count += 1;
                if *count > 1 {
                    sink.push(Diagnostic::error(
                        codes::DUPLICATE_FIELD,
                        uri,
                        field.info().span,
                        format!(
                            "Duplicate field name '{}' in view '{}'",
                            field.name(),
                            view.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

pub struct MeasureTypeRule;

impl Rule for MeasureTypeRule {
    fn code(&self) -> &str {
        codes::INVALID_MEASURE_TYPE
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, view) in ctx.views() {
            for measure in view.measures.values() {
                let Some(measure_type) = measure.measure_type.as_deref() else {
                    continue;
                };
                if !MEASURE_TYPES.contains(&measure_type) {
                    sink.push(Diagnostic::error(
                        codes::INVALID_MEASURE_TYPE,
                        uri,
                        measure.info.span,
                        format!(
                            "Invalid measure type '{measure_type}'. Valid types are: {}",
                            MEASURE_TYPES.join(", ")
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A dimension with no `sql` that is not a primary key.
pub struct MissingSqlRule;

impl Rule for MissingSqlRule {
    fn code(&self) -> &str {
        codes::MISSING_SQL
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, view) in ctx.views() {
            for dimension in view.dimensions.values() {
                if dimension.sql.is_none() && !dimension.primary_key {
                    sink.push(Diagnostic::warning(
                        codes::MISSING_SQL,
                        uri,
                        dimension.info.span,
                        format!("Dimension '{}' has no sql parameter", dimension.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

pub struct DimensionTypeRule;

impl Rule for DimensionTypeRule {
    fn code(&self) -> &str {
        codes::INVALID_DIMENSION_TYPE
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, view) in ctx.views() {
            for dimension in view.dimensions.values() {
                let Some(data_type) = dimension.data_type.as_deref() else {
                    continue;
                };
                if !DIMENSION_TYPES.contains(&data_type) {
                    sink.push(Diagnostic::error(
                        codes::INVALID_DIMENSION_TYPE,
                        uri,
                        dimension.info.span,
                        format!(
                            "Invalid dimension type '{data_type}'. Valid types are: {}",
                            DIMENSION_TYPES.join(", ")
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parameters from the configured deprecated set, anywhere in a file.
pub struct DeprecatedParameterRule;

impl Rule for DeprecatedParameterRule {
    fn code(&self) -> &str {
        codes::DEPRECATED_PARAMETER
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for file in ctx.files {
            for node in file.ast.as_node().descendants() {
                for key in node.parameters().keys() {
                    if !ctx.config.is_deprecated(key) {
                        continue;
                    }
                    let span = node
                        .parameters()
                        .span(key)
                        .filter(|s| !s.is_unknown())
                        .unwrap_or_else(|| node.span());
                    sink.push(Diagnostic::warning(
                        codes::DEPRECATED_PARAMETER,
                        file.uri,
                        span,
                        format!("Parameter '{key}' is deprecated"),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// View and field names must be snake_case.
pub struct NamingConventionRule;

impl NamingConventionRule {
    fn check_name(uri: &str, kind: &str, name: &str, span: Span, sink: &mut Vec<Diagnostic>) {
        if !SNAKE_CASE.is_match(name) {
            sink.push(Diagnostic::information(
                codes::NAMING_CONVENTION,
                uri,
                span,
                format!("{kind} name '{name}' should be snake_case"),
            ));
        }
    }
}

impl Rule for NamingConventionRule {
    fn code(&self) -> &str {
        codes::NAMING_CONVENTION
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, view) in ctx.views() {
            Self::check_name(uri, "View", view.base_name(), view.info.name_span, sink);
            for field in view.fields() {
                let kind = match field {
                    FieldNode::Dimension(_) => "Dimension",
                    FieldNode::Measure(_) => "Measure",
                    FieldNode::Filter(_) => "Filter",
                    FieldNode::Parameter(_) => "Parameter",
                    FieldNode::DimensionGroup(_) => "Dimension group",
                };
                Self::check_name(uri, kind, field.name(), field.info().name_span, sink);
            }
        }
        Ok(())
    }
}
