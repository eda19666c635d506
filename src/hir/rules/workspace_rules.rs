//! Whole-workspace rules: unused views and join cycles.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::hir::diagnostics::{Diagnostic, codes};
use crate::hir::embedded::extract_embedded_references;
use crate::hir::symbols::SymbolKind;
use crate::syntax::Explore;

use super::{Rule, RuleContext, RuleError};

/// A view that no explore uses as base view or join target.
///
/// Only reported when the workspace declares at least one explore.
pub struct UnusedViewRule;

impl Rule for UnusedViewRule {
    fn code(&self) -> &str {
        codes::UNUSED_VIEW
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        if !ctx.config.report_unused_views || ctx.explores().next().is_none() {
            return Ok(());
        }
        let views = ctx
            .model
            .symbols()
            .filter(|s| s.kind == SymbolKind::View);
        for view in views {
            if ctx.referenced_views.contains(&view.name) {
                continue;
            }
            sink.push(Diagnostic::information(
                codes::UNUSED_VIEW,
                view.declaration.uri.clone(),
                view.declaration.name_span,
                format!("View '{}' is not used by any explore", view.name),
            ));
        }
        Ok(())
    }
}

/// A join graph in which some view can reach itself. One warning per explore.
pub struct CyclicJoinRule;

/// Directed view → view edges of one explore's join graph.
///
/// A join's target depends on every view its `sql_on` mentions, or on the
/// base view when it mentions none.
pub(crate) fn join_graph(explore: &Explore) -> FxHashMap<String, Vec<String>> {
    let base = explore.effective_base_view();
    // join and explore names alias views inside sql_on
    let mut aliases: FxHashMap<&str, &str> = FxHashMap::default();
    aliases.insert(&explore.name, base);
    for join in explore.joins.values() {
        aliases.insert(&join.name, &join.view);
    }
    let resolve = |name: &str| -> String {
        aliases.get(name).copied().unwrap_or(name).to_string()
    };

    let mut edges: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for join in explore.joins.values() {
        let target = join.view.as_str();
        let mut sources: Vec<String> = Vec::new();
        for reference in join
            .sql_on
            .as_deref()
            .map(extract_embedded_references)
            .unwrap_or_default()
        {
            let source = resolve(&reference.head);
            if source != target && !sources.contains(&source) {
                sources.push(source);
            }
        }
        if sources.is_empty() && base != target {
            sources.push(base.to_string());
        }
        for source in sources {
            let targets = edges.entry(source).or_default();
            if !targets.iter().any(|t| t == target) {
                targets.push(target.to_string());
            }
        }
    }
    edges
}

/// First cycle reachable from `start`, as the path that closes it.
pub(crate) fn find_cycle(
    edges: &FxHashMap<String, Vec<String>>,
    start: &str,
) -> Option<Vec<String>> {
    fn visit(
        node: &str,
        edges: &FxHashMap<String, Vec<String>>,
        path: &mut Vec<String>,
        done: &mut FxHashSet<String>,
    ) -> Option<Vec<String>> {
        if let Some(at) = path.iter().position(|p| p == node) {
            let mut cycle = path[at..].to_vec();
            cycle.push(node.to_string());
            return Some(cycle);
        }
        if done.contains(node) {
            return None;
        }
        path.push(node.to_string());
        for next in edges.get(node).into_iter().flatten() {
            if let Some(cycle) = visit(next, edges, path, done) {
                return Some(cycle);
            }
        }
        path.pop();
        done.insert(node.to_string());
        None
    }

    visit(start, edges, &mut Vec::new(), &mut FxHashSet::default())
}

impl Rule for CyclicJoinRule {
    fn code(&self) -> &str {
        codes::CYCLIC_JOIN
    }

    fn check(&self, ctx: &RuleContext<'_>, sink: &mut Vec<Diagnostic>) -> Result<(), RuleError> {
        for (uri, explore) in ctx.explores() {
            let edges = join_graph(explore);
            if let Some(cycle) = find_cycle(&edges, explore.effective_base_view()) {
                sink.push(Diagnostic::warning(
                    codes::CYCLIC_JOIN,
                    uri,
                    explore.info.span,
                    format!(
                        "Explore '{}' has a cyclic join path: {}",
                        explore.name,
                        cycle.join(" -> ")
                    ),
                ));
            }
        }
        Ok(())
    }
}
