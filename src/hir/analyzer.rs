//! The semantic analyzer.
//!
//! `analyze` is a pure function of the document set: it rebuilds every
//! symbol, reference and diagnostic from scratch.
//!
//! ```text
//! 1. parse errors      one diagnostic per unparsable document
//! 2. symbols           views, fields, explores, joins, models
//! 3. cross references  base views, join targets, ${...} in sql / sql_on
//! 4. view rules        duplicate-field, invalid-*-type, missing-sql, ...
//! 5. workspace rules   unused-view, cyclic-join
//! ```

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::base::Span;
use crate::project::WorkspaceDocument;
use crate::syntax::{
    Explore, FieldNode, Join, LookmlFile, NodeInfo, Parameters, RelationshipValue, View,
};

use super::config::AnalysisConfig;
use super::diagnostics::{Diagnostic, DiagnosticCollector, codes};
use super::embedded::{EmbeddedReference, extract_embedded_references};
use super::model::{ModelBuilder, SemanticModel};
use super::rules::{Rule, RuleContext, SourceFile, default_rules, run_rules};
use super::symbols::{Declaration, Location, SymbolId, SymbolKind};

/// Analyze `documents` with the default rule set.
pub fn analyze<'a>(
    documents: impl IntoIterator<Item = &'a WorkspaceDocument>,
    config: &AnalysisConfig,
) -> SemanticModel {
    Analyzer::new(config.clone()).analyze(documents)
}

/// An analyzer with a configurable rule set.
pub struct Analyzer {
    config: AnalysisConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            rules: default_rules(),
        }
    }

    /// Replace the rule set.
    pub fn with_rules(mut self, rules: Vec<Box<dyn Rule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Add a rule after the default ones.
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }

    pub fn analyze<'a>(
        &self,
        documents: impl IntoIterator<Item = &'a WorkspaceDocument>,
    ) -> SemanticModel {
        let mut documents: Vec<&WorkspaceDocument> = documents.into_iter().collect();
        documents.sort_by(|a, b| a.uri().cmp(b.uri()));

        let mut diagnostics = DiagnosticCollector::new();

        // Pass 1
        for doc in &documents {
            if let Some(err) = doc.parse().error() {
                diagnostics.add(Diagnostic::error(
                    codes::PARSE_ERROR,
                    doc.uri(),
                    Span::from_coords(0, 0, 0, 0),
                    err.to_string(),
                ));
            }
        }
        debug!(errors = diagnostics.len(), "parse error pass");

        let files: Vec<SourceFile<'_>> = documents
            .iter()
            .filter_map(|doc| {
                Some(SourceFile {
                    uri: doc.uri(),
                    ast: doc.ast()?,
                })
            })
            .collect();

        // Pass 2
        let mut builder = ModelBuilder::new();
        declare_views(&mut builder, &files);
        for file in &files {
            declare_file(&mut builder, file.uri, file.ast);
        }
        debug!(symbols = builder.model().symbol_count(), "symbol pass");

        // Pass 3
        let mut resolver = Resolver {
            builder: &mut builder,
            diagnostics: &mut diagnostics,
            referenced_views: FxHashSet::default(),
        };
        for file in &files {
            resolver.resolve_file(file.uri, file.ast);
        }
        let referenced_views = resolver.referenced_views;
        debug!(views = referenced_views.len(), "cross reference pass");

        // Passes 4 and 5
        let ctx = RuleContext {
            files: &files,
            model: builder.model(),
            config: &self.config,
            referenced_views: &referenced_views,
        };
        let rule_diagnostics = run_rules(&self.rules, &ctx);
        debug!(diagnostics = rule_diagnostics.len(), "rule passes");
        diagnostics.extend(rule_diagnostics);

        let diagnostics = diagnostics
            .take()
            .into_iter()
            .filter_map(|d| self.config.apply(d))
            .collect();
        builder.finish(diagnostics)
    }
}

fn declaration(uri: &str, info: &NodeInfo) -> Declaration {
    Declaration {
        uri: uri.to_string(),
        span: info.span,
        name_span: info.name_span,
        node: info.id,
    }
}

/// Every definition and refinement of one view name, in URI order.
#[derive(Default)]
struct ViewGroup<'a> {
    definitions: Vec<(&'a str, &'a View)>,
    refinements: Vec<(&'a str, &'a View)>,
}

/// Declare one view symbol per name. The last definition in URI order wins
/// and only its fields are declared; refinements then add or override fields
/// on that same symbol.
fn declare_views(builder: &mut ModelBuilder, files: &[SourceFile<'_>]) {
    let mut groups: IndexMap<&str, ViewGroup<'_>> = IndexMap::new();
    for file in files {
        for (_, view) in file.ast.views.effective() {
            if !view.is_refinement() {
                let group = groups.entry(view.base_name()).or_default();
                group.definitions.push((file.uri, view));
            }
        }
        for view in file.ast.views.values().filter(|v| v.is_refinement()) {
            let group = groups.entry(view.base_name()).or_default();
            group.refinements.push((file.uri, view));
        }
    }

    for (name, group) in &groups {
        let winner = group.definitions.last();
        let Some(&(uri, primary)) = winner.or(group.refinements.first()) else {
            continue;
        };
        let view_id = builder.declare(
            SymbolKind::View,
            name,
            name.to_string(),
            declaration(uri, &primary.info),
            None,
        );
        if let Some(&(uri, view)) = winner {
            declare_fields(builder, uri, name, view, view_id);
        }
        for &(uri, refinement) in &group.refinements {
            if !std::ptr::eq(refinement, primary) {
                builder.attach_node(uri, refinement.info.id, view_id);
                builder.add_reference(view_id, Location::new(uri, refinement.info.name_span));
            }
            declare_fields(builder, uri, name, refinement, view_id);
        }
    }
}

fn declare_fields(
    builder: &mut ModelBuilder,
    uri: &str,
    view_name: &str,
    view: &View,
    view_id: SymbolId,
) {
    for field in view.fields() {
        let qualified = format!("{view_name}.{}", field.name());
        let field_id = builder.declare(
            SymbolKind::of_field(&field),
            field.name(),
            qualified,
            declaration(uri, field.info()),
            Some(view_id),
        );
        if let FieldNode::DimensionGroup(group) = field {
            for timeframe in &group.timeframes {
                builder.alias_timeframe(
                    format!("{view_name}.{}_{timeframe}", group.name),
                    field_id,
                );
            }
        }
    }
}

fn declare_file(builder: &mut ModelBuilder, uri: &str, file: &LookmlFile) {
    for (name, model) in file.models.effective() {
        builder.declare(
            SymbolKind::Model,
            name,
            name.to_string(),
            declaration(uri, &model.info),
            None,
        );
        for (_, explore) in model.explores.effective() {
            declare_explore(builder, uri, explore);
        }
    }

    for (_, explore) in file.explores.effective() {
        declare_explore(builder, uri, explore);
    }
}

fn declare_explore(builder: &mut ModelBuilder, uri: &str, explore: &Explore) {
    let explore_id = builder.declare(
        SymbolKind::Explore,
        &explore.name,
        explore.name.clone(),
        declaration(uri, &explore.info),
        None,
    );
    for join in explore.joins.values() {
        builder.declare(
            SymbolKind::Join,
            &join.name,
            format!("{}.{}", explore.name, join.name),
            declaration(uri, &join.info),
            Some(explore_id),
        );
    }
}

/// Pass 3 state.
struct Resolver<'b> {
    builder: &'b mut ModelBuilder,
    diagnostics: &'b mut DiagnosticCollector,
    referenced_views: FxHashSet<String>,
}

impl Resolver<'_> {
    fn resolve_file(&mut self, uri: &str, file: &LookmlFile) {
        for explore in file.all_explores() {
            self.resolve_explore(uri, explore);
        }
        // shadowed definitions have no symbol and contribute no references
        let model = self.builder.model();
        let live: Vec<&View> = file
            .views
            .values()
            .filter(|v| model.symbol_for_node(uri, v.info.id).is_some())
            .collect();
        for view in live {
            self.resolve_view(uri, view);
        }
    }

    fn view_id(&self, name: &str) -> Option<SymbolId> {
        self.builder.model().view(name).map(|s| s.id)
    }

    fn reference(&mut self, id: SymbolId, uri: &str, span: Span) {
        self.builder.add_reference(id, Location::new(uri, span));
    }

    /// Span of the `from:`/`view_name:` entry naming a view, or `fallback`.
    fn view_param_span(parameters: &Parameters, fallback: Span) -> Span {
        ["from", "view_name"]
            .iter()
            .filter(|key| parameters.get_str(key).is_some())
            .find_map(|key| parameters.span(key))
            .filter(|span| !span.is_unknown())
            .unwrap_or(fallback)
    }

    fn resolve_explore(&mut self, uri: &str, explore: &Explore) {
        let base = explore.effective_base_view();
        self.referenced_views.insert(base.to_string());
        match (&explore.base_view, self.view_id(base)) {
            (_, Some(id)) => {
                let span = Self::view_param_span(&explore.parameters, explore.info.name_span);
                self.reference(id, uri, span);
            }
            (Some(name), None) => self.diagnostics.add(Diagnostic::error(
                codes::UNDEFINED_VIEW,
                uri,
                explore.info.span,
                format!("Explore '{}' references undefined view '{name}'", explore.name),
            )),
            // the implicit base view is optional
            (None, None) => {}
        }

        let mut aliases: FxHashMap<&str, &str> = FxHashMap::default();
        aliases.insert(&explore.name, base);
        for join in explore.joins.values() {
            aliases.insert(&join.name, &join.view);
        }

        for join in explore.joins.values() {
            self.resolve_join(uri, explore, join, &aliases);
        }
    }

    fn resolve_join(
        &mut self,
        uri: &str,
        explore: &Explore,
        join: &Join,
        aliases: &FxHashMap<&str, &str>,
    ) {
        self.referenced_views.insert(join.view.clone());
        match self.view_id(&join.view) {
            Some(id) => {
                let span = Self::view_param_span(&join.parameters, join.info.name_span);
                self.reference(id, uri, span);
            }
            None => self.diagnostics.add(Diagnostic::error(
                codes::UNDEFINED_VIEW,
                uri,
                join.info.span,
                format!(
                    "Join '{}' in explore '{}' references undefined view '{}'",
                    join.name, explore.name, join.view
                ),
            )),
        }

        match &join.sql_on {
            Some(sql_on) => {
                for reference in extract_embedded_references(sql_on) {
                    let head = aliases
                        .get(reference.head.as_str())
                        .copied()
                        .unwrap_or(reference.head.as_str());
                    let target = match &reference.field {
                        Some(field) => self.builder.model().field(head, field).map(|s| s.id),
                        None => self.view_id(head),
                    };
                    if let Some(id) = target {
                        self.reference(id, uri, reference.span(sql_on, join.sql_on_span));
                    }
                }
            }
            None => self.diagnostics.add(Diagnostic::error(
                codes::MISSING_SQL_ON,
                uri,
                join.info.span,
                format!("Join '{}' in explore '{}' has no sql_on", join.name, explore.name),
            )),
        }

        if let Some(RelationshipValue::Unknown(value)) = &join.relationship {
            let span = join
                .parameters
                .span("relationship")
                .filter(|s| !s.is_unknown())
                .unwrap_or(join.info.span);
            self.diagnostics.add(Diagnostic::error(
                codes::INVALID_RELATIONSHIP,
                uri,
                span,
                format!(
                    "Invalid relationship '{value}'. Valid values are: one_to_one, one_to_many, many_to_one, many_to_many"
                ),
            ));
        }
    }

    fn resolve_view(&mut self, uri: &str, view: &View) {
        let mut expressions: Vec<(&str, Span)> = view.fields().filter_map(|f| f.sql()).collect();
        if let Some(table) = &view.derived_table {
            expressions.extend(table.sql.as_deref().map(|sql| (sql, table.sql_span)));
        }
        for (text, origin) in expressions {
            for reference in extract_embedded_references(text) {
                if let Some(id) = self.resolve_in_view(view, &reference) {
                    self.reference(id, uri, reference.span(text, origin));
                }
            }
        }
    }

    /// `${field}` resolves against the enclosing view first, then as a view;
    /// `${view.field}` as a field, or the view itself for `SQL_TABLE_NAME`.
    /// Anything else (`${TABLE}`, database columns) is ignored.
    fn resolve_in_view(&self, view: &View, reference: &EmbeddedReference) -> Option<SymbolId> {
        let model = self.builder.model();
        match &reference.field {
            None => model
                .field(view.base_name(), &reference.head)
                .or_else(|| model.view(&reference.head))
                .map(|s| s.id),
            Some(field) => model
                .field(&reference.head, field)
                .or_else(|| {
                    (field == "SQL_TABLE_NAME")
                        .then(|| model.view(&reference.head))
                        .flatten()
                })
                .map(|s| s.id),
        }
    }
}
