//! Hover information implementation.

use std::fmt::Write;

use crate::base::{Position, Span};
use crate::hir::{SemanticModel, Symbol, SymbolKind};
use crate::project::Workspace;
use crate::syntax::AstNode;

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// The range the hover applies to: the declaration or reference under
    /// the cursor.
    pub range: Span,
}

/// Get hover information for the symbol at a position.
///
/// Returns `None` when nothing resolvable is under the cursor.
pub fn hover(workspace: &Workspace, uri: &str, position: Position) -> Option<HoverResult> {
    let model = workspace.model_ref();
    let (symbol, range) = model.symbol_range_at(uri, position)?;
    let node = workspace
        .get_document(&symbol.declaration.uri)
        .and_then(|doc| doc.ast())
        .and_then(|ast| ast.find_node(symbol.declaration.node));

    Some(HoverResult {
        contents: render(model, symbol, node),
        range,
    })
}

fn render(model: &SemanticModel, symbol: &Symbol, node: Option<AstNode<'_>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "```lookml\n{}: {}\n```", symbol.kind.key_prefix(), symbol.name);

    if let Some(parent) = model.parent(symbol) {
        let owner = match parent.kind {
            SymbolKind::Explore => "Explore",
            _ => "View",
        };
        let _ = writeln!(out, "\n{owner}: `{}`", parent.name);
    }

    let Some(node) = node else {
        return out;
    };
    let mut lines: Vec<String> = Vec::new();
    let mut line = |label: &str, value: &str| lines.push(format!("**{label}:** {value}"));

    match node {
        AstNode::View(view) => {
            if let Some(table) = &view.sql_table_name {
                line("Table", &format!("`{}`", table.trim()));
            }
            if view.derived_table.is_some() {
                line("Derived table", "yes");
            }
            let fields = view.fields().count();
            line("Fields", &fields.to_string());
        }
        AstNode::Dimension(dimension) => {
            if let Some(t) = &dimension.data_type {
                line("Type", t);
            }
            if dimension.primary_key {
                line("Primary key", "yes");
            }
            if dimension.hidden {
                line("Hidden", "yes");
            }
            text_attributes(&mut line, &dimension.label, &dimension.description);
        }
        AstNode::Measure(measure) => {
            if let Some(t) = &measure.measure_type {
                line("Type", t);
            }
            if measure.hidden {
                line("Hidden", "yes");
            }
            if !measure.drill_fields.is_empty() {
                line("Drill fields", &measure.drill_fields.join(", "));
            }
            text_attributes(&mut line, &measure.label, &measure.description);
        }
        AstNode::Filter(filter) => {
            if let Some(t) = &filter.data_type {
                line("Type", t);
            }
            if filter.hidden {
                line("Hidden", "yes");
            }
            text_attributes(&mut line, &filter.label, &filter.description);
        }
        AstNode::Parameter(parameter) => {
            if let Some(t) = &parameter.data_type {
                line("Type", t);
            }
            if let Some(default) = &parameter.default_value {
                line("Default", default);
            }
            text_attributes(&mut line, &parameter.label, &parameter.description);
        }
        AstNode::DimensionGroup(group) => {
            if let Some(t) = &group.group_type {
                line("Type", t);
            }
            if !group.timeframes.is_empty() {
                line("Timeframes", &group.timeframes.join(", "));
            }
            if group.hidden {
                line("Hidden", "yes");
            }
            text_attributes(&mut line, &group.label, &group.description);
        }
        AstNode::Explore(explore) => {
            line("Base view", explore.effective_base_view());
            let joins: Vec<&str> = explore.joins.values().map(|j| j.name.as_str()).collect();
            if !joins.is_empty() {
                line("Joins", &joins.join(", "));
            }
        }
        AstNode::Join(join) => {
            line("View", &join.view);
            if let Some(relationship) = &join.relationship {
                line("Relationship", relationship.as_str());
            }
            if let Some(join_type) = &join.join_type {
                line("Type", join_type);
            }
        }
        AstNode::Model(model_node) => {
            if let Some(connection) = &model_node.connection {
                line("Connection", connection);
            }
            if !model_node.includes.is_empty() {
                line("Includes", &model_node.includes.join(", "));
            }
        }
        AstNode::File(_) | AstNode::Dashboard(_) | AstNode::DerivedTable(_) => {}
    }

    if !lines.is_empty() {
        out.push('\n');
        for l in &lines {
            let _ = writeln!(out, "{l}  ");
        }
    }

    let sql = match node {
        AstNode::Dimension(d) => d.sql.as_deref(),
        AstNode::Measure(m) => m.sql.as_deref(),
        AstNode::Filter(f) => f.sql.as_deref(),
        AstNode::DimensionGroup(g) => g.sql.as_deref(),
        AstNode::Join(j) => j.sql_on.as_deref(),
        _ => None,
    };
    if let Some(sql) = sql {
        let _ = write!(out, "\n```sql\n{}\n```\n", sql.trim());
    }
    out
}

fn text_attributes(
    line: &mut impl FnMut(&str, &str),
    label: &Option<String>,
    description: &Option<String>,
) {
    if let Some(label) = label {
        line("Label", label);
    }
    if let Some(description) = description {
        line("Description", description);
    }
}
