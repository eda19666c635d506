//! Completion suggestions implementation.

use std::sync::Arc;

use crate::base::{LineIndex, Position, TextSize};
use crate::hir::SemanticModel;
use crate::hir::SymbolKind;
use crate::hir::rules::{DIMENSION_TYPES, MEASURE_TYPES};
use crate::parser::{TokenKind, tokenize};
use crate::project::WorkspaceDocument;
use crate::syntax::{NodeKind, Relationship};

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionKind {
    /// A parameter key such as `sql` or `type`.
    Keyword,
    /// A construct template such as `dimension: name { }`.
    Snippet,
    View,
    Field,
    /// An allowed parameter value.
    Value,
}

impl CompletionKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionKind::Keyword => 14, // Keyword
            CompletionKind::Snippet => 15, // Snippet
            CompletionKind::View => 7,     // Class
            CompletionKind::Field => 5,    // Field
            CompletionKind::Value => 20,   // EnumMember
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug)]
pub struct CompletionItem {
    pub label: Arc<str>,
    pub kind: CompletionKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Text to insert; may be a snippet with `$1`-style placeholders.
    pub insert_text: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_priority: 100,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<Arc<str>>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }

    /// Whether `insert_text` contains snippet placeholders.
    pub fn is_snippet(&self) -> bool {
        self.insert_text.as_deref().is_some_and(|t| t.contains('$'))
    }
}

/// Where the cursor is, as far as completion is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// After `${`: view names.
    ViewReference,
    /// After `${view.`: fields of that view.
    FieldReference(String),
    /// After `key:` on the current line.
    Value { key: String, scope: NodeKind },
    /// Inside a construct body (the file itself at top level).
    Parameters(NodeKind),
}

/// Get completion suggestions at a position.
pub fn completions(
    model: &SemanticModel,
    document: &WorkspaceDocument,
    position: Position,
) -> Vec<CompletionItem> {
    let context = completion_context(document, position);
    let mut items = match &context {
        CompletionContext::ViewReference => view_completions(model),
        CompletionContext::FieldReference(view) => field_completions(model, view),
        CompletionContext::Value { key, scope } => value_completions(model, key, *scope),
        CompletionContext::Parameters(kind) => parameter_completions(*kind),
    };
    items.sort_by(|a, b| {
        a.sort_priority
            .cmp(&b.sort_priority)
            .then_with(|| a.label.cmp(&b.label))
    });
    items.dedup_by(|a, b| a.label == b.label);
    items
}

/// Infer the completion context at `position`.
pub fn completion_context(document: &WorkspaceDocument, position: Position) -> CompletionContext {
    let index = LineIndex::new(document.content());
    let line = index.line_text(position.line).unwrap_or_default();
    let before: String = line.chars().take(position.column).collect();

    if let Some(inner) = open_reference(&before) {
        return match inner.split_once('.') {
            Some((view, _)) => CompletionContext::FieldReference(view.trim().to_string()),
            None => CompletionContext::ViewReference,
        };
    }

    let scope = enclosing_kind(document, &index, position);
    if let Some(key) = value_key(&before) {
        return CompletionContext::Value { key, scope };
    }
    CompletionContext::Parameters(scope)
}

/// Text after an unclosed `${` in `before`.
fn open_reference(before: &str) -> Option<&str> {
    let start = before.rfind("${")?;
    let inner = &before[start + 2..];
    (!inner.contains('}')).then_some(inner)
}

/// `key` when the line reads `key: partial_value` up to the cursor.
fn value_key(before: &str) -> Option<String> {
    let (key, value) = before.trim_start().split_once(':')?;
    let key = key.trim();
    let simple = |s: &str| s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    (!key.is_empty() && simple(key) && simple(value.trim())).then(|| key.to_string())
}

/// Innermost construct containing `position`: from the AST when the
/// document parsed, otherwise from the open braces before the cursor.
fn enclosing_kind(document: &WorkspaceDocument, index: &LineIndex, position: Position) -> NodeKind {
    if let Some(ast) = document.ast() {
        let kind = ast.node_at(position).kind();
        // the cursor may sit inside a block the last parse did not see yet
        if kind != NodeKind::File {
            return kind;
        }
    }
    let offset = index
        .offset(position)
        .unwrap_or_else(|| TextSize::of(document.content()));
    let prefix = &document.content()[..usize::from(offset)];
    open_blocks(prefix)
        .into_iter()
        .rev()
        .find_map(|key| keyword_kind(&key))
        .unwrap_or(NodeKind::File)
}

/// Keys of the `{` blocks still open at the end of `text`, outermost first.
fn open_blocks(text: &str) -> Vec<String> {
    let mut stack = Vec::new();
    let mut pending_key: Option<String> = None;
    let mut last_ident: Option<String> = None;
    for token in tokenize(text).into_iter().filter(|t| !t.kind.is_trivia()) {
        match token.kind {
            TokenKind::Ident => last_ident = Some(token.text.to_string()),
            TokenKind::Colon => pending_key = last_ident.take().or(pending_key),
            TokenKind::LBrace => stack.push(pending_key.take().unwrap_or_default()),
            TokenKind::RBrace => {
                stack.pop();
                pending_key = None;
            }
            _ => {}
        }
    }
    stack
}

fn keyword_kind(key: &str) -> Option<NodeKind> {
    Some(match key {
        "view" => NodeKind::View,
        "explore" => NodeKind::Explore,
        "model" => NodeKind::Model,
        "dashboard" => NodeKind::Dashboard,
        "dimension" => NodeKind::Dimension,
        "measure" => NodeKind::Measure,
        "filter" => NodeKind::Filter,
        "parameter" => NodeKind::Parameter,
        "dimension_group" => NodeKind::DimensionGroup,
        "join" => NodeKind::Join,
        "derived_table" => NodeKind::DerivedTable,
        _ => return None,
    })
}

fn view_completions(model: &SemanticModel) -> Vec<CompletionItem> {
    model
        .symbols()
        .filter(|s| s.kind == SymbolKind::View)
        .map(|s| {
            CompletionItem::new(s.name.clone(), CompletionKind::View)
                .with_detail("view")
                .with_priority(10)
        })
        .collect()
}

fn field_completions(model: &SemanticModel, view: &str) -> Vec<CompletionItem> {
    let Some(view_symbol) = model.view(view) else {
        return Vec::new();
    };
    let mut items: Vec<CompletionItem> = model
        .children(view_symbol.id)
        .map(|field| {
            CompletionItem::new(field.name.clone(), CompletionKind::Field)
                .with_detail(field.kind.display())
                .with_priority(10)
        })
        .collect();
    items.extend(model.timeframe_fields(view).into_iter().map(|(name, group)| {
        CompletionItem::new(name, CompletionKind::Field)
            .with_detail(format!("timeframe of {}", group.name))
            .with_priority(20)
    }));
    items
}

fn value_completions(model: &SemanticModel, key: &str, scope: NodeKind) -> Vec<CompletionItem> {
    let values: Vec<String> = match (key, scope) {
        ("type", NodeKind::Dimension) => DIMENSION_TYPES.iter().map(|s| s.to_string()).collect(),
        ("type", NodeKind::Measure) => MEASURE_TYPES.iter().map(|s| s.to_string()).collect(),
        ("type", NodeKind::DimensionGroup) => vec!["time".into(), "duration".into()],
        ("type", NodeKind::Join) => ["left_outer", "inner", "full_outer", "cross"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ("relationship", _) => Relationship::ALL.iter().map(|r| r.as_str().to_string()).collect(),
        ("from" | "view_name", NodeKind::Explore | NodeKind::Join) => {
            return view_completions(model);
        }
        ("primary_key" | "hidden", _) => vec!["yes".into(), "no".into()],
        _ => Vec::new(),
    };
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            CompletionItem::new(value, CompletionKind::Value)
                .with_detail(key.to_string())
                .with_priority(i as u32)
        })
        .collect()
}

/// `(label, insert text, documentation)` entries valid inside `kind`.
fn parameters_for(kind: NodeKind) -> &'static [(&'static str, &'static str, &'static str)] {
    match kind {
        NodeKind::File => &[
            ("view", "view: ${1:name} {\n  $0\n}", "Declare a view"),
            ("explore", "explore: ${1:name} {\n  $0\n}", "Declare an explore"),
            ("include", "include: \"${1:*.view.lkml}\"", "Include files"),
            ("connection", "connection: \"${1:name}\"", "Database connection"),
        ],
        NodeKind::View => &[
            (
                "dimension",
                "dimension: ${1:name} {\n  type: ${2:string}\n  sql: \\${TABLE}.${3:column} ;;\n}",
                "Declare a dimension",
            ),
            ("measure", "measure: ${1:name} {\n  type: ${2:count}\n}", "Declare a measure"),
            (
                "dimension_group",
                "dimension_group: ${1:name} {\n  type: time\n  timeframes: [${2:date}]\n  sql: \\${TABLE}.${3:column} ;;\n}",
                "Declare a dimension group",
            ),
            ("filter", "filter: ${1:name} {\n  type: ${2:string}\n}", "Declare a filter field"),
            (
                "parameter",
                "parameter: ${1:name} {\n  type: ${2:string}\n}",
                "Declare a parameter field",
            ),
            ("sql_table_name", "sql_table_name: $0 ;;", "Table the view reads from"),
            ("derived_table", "derived_table: {\n  sql: $0 ;;\n}", "Table defined by a query"),
            ("label", "label: \"$0\"", "Display label"),
            ("extends", "extends: [$0]", "Views this view extends"),
        ],
        NodeKind::Dimension => &[
            ("type", "type: ", "Dimension data type"),
            ("sql", "sql: $0 ;;", "SQL expression"),
            ("primary_key", "primary_key: yes", "Marks the primary key"),
            ("hidden", "hidden: yes", "Hide from the field picker"),
            ("label", "label: \"$0\"", "Display label"),
            ("description", "description: \"$0\"", "Field description"),
            ("value_format", "value_format: \"$0\"", "Excel-style value format"),
        ],
        NodeKind::Measure => &[
            ("type", "type: ", "Aggregation type"),
            ("sql", "sql: $0 ;;", "SQL expression"),
            ("hidden", "hidden: yes", "Hide from the field picker"),
            ("label", "label: \"$0\"", "Display label"),
            ("description", "description: \"$0\"", "Field description"),
            ("value_format", "value_format: \"$0\"", "Excel-style value format"),
            ("drill_fields", "drill_fields: [$0]", "Fields shown on drill"),
        ],
        NodeKind::Filter => &[
            ("type", "type: ", "Filter data type"),
            ("sql", "sql: $0 ;;", "SQL expression"),
            ("label", "label: \"$0\"", "Display label"),
            ("description", "description: \"$0\"", "Field description"),
            ("hidden", "hidden: yes", "Hide from the field picker"),
        ],
        NodeKind::Parameter => &[
            ("type", "type: ", "Parameter data type"),
            ("allowed_value", "allowed_value: {\n  value: \"$0\"\n}", "An allowed value"),
            ("default_value", "default_value: \"$0\"", "Default value"),
            ("label", "label: \"$0\"", "Display label"),
            ("description", "description: \"$0\"", "Field description"),
            ("hidden", "hidden: yes", "Hide from the field picker"),
        ],
        NodeKind::DimensionGroup => &[
            ("type", "type: ", "time or duration"),
            ("timeframes", "timeframes: [$0]", "Generated timeframes"),
            ("sql", "sql: $0 ;;", "SQL expression"),
            ("datatype", "datatype: ", "Database column type"),
            ("convert_tz", "convert_tz: no", "Time zone conversion"),
            ("label", "label: \"$0\"", "Display label"),
            ("hidden", "hidden: yes", "Hide from the field picker"),
        ],
        NodeKind::Explore => &[
            (
                "join",
                "join: ${1:view} {\n  type: left_outer\n  sql_on: $2 ;;\n  relationship: ${3:many_to_one}\n}",
                "Join a view",
            ),
            ("from", "from: ", "Base view"),
            ("view_name", "view_name: ", "Base view"),
            ("label", "label: \"$0\"", "Display label"),
            ("description", "description: \"$0\"", "Explore description"),
            ("sql_always_where", "sql_always_where: $0 ;;", "Mandatory filter"),
        ],
        NodeKind::Join => &[
            ("sql_on", "sql_on: $0 ;;", "Join condition"),
            ("relationship", "relationship: ", "Join cardinality"),
            ("type", "type: ", "Join type"),
            ("view_label", "view_label: \"$0\"", "Label for the joined view"),
            ("from", "from: ", "Joined view"),
        ],
        NodeKind::Model => &[
            ("explore", "explore: ${1:name} {\n  $0\n}", "Declare an explore"),
            ("connection", "connection: \"${1:name}\"", "Database connection"),
            ("include", "include: \"${1:*.view.lkml}\"", "Include files"),
        ],
        NodeKind::DerivedTable => &[
            ("sql", "sql: $0 ;;", "Query defining the table"),
            ("datagroup_trigger", "datagroup_trigger: ", "Persistence trigger"),
            ("persist_for", "persist_for: \"$0\"", "Persistence duration"),
        ],
        NodeKind::Dashboard => &[
            ("title", "title: \"$0\"", "Dashboard title"),
            ("layout", "layout: ", "Dashboard layout"),
        ],
    }
}

fn parameter_completions(kind: NodeKind) -> Vec<CompletionItem> {
    parameters_for(kind)
        .iter()
        .enumerate()
        .map(|(i, (label, insert, doc))| {
            let item_kind = if insert.contains('{') && !insert.starts_with("sql") {
                CompletionKind::Snippet
            } else {
                CompletionKind::Keyword
            };
            CompletionItem::new(*label, item_kind)
                .with_insert_text(*insert)
                .with_documentation(*doc)
                .with_detail(kind.keyword())
                .with_priority(i as u32)
        })
        .collect()
}
