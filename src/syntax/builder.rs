//! AST builder: raw parse output → typed [`LookmlFile`].
//!
//! Walks the raw tree by construct-kind key, pairing every entry with its
//! position entry at the same index. Building never fails; missing position
//! data yields unknown (all-zero) spans.

use std::path::Path;
use std::sync::Arc;

use crate::base::{LineIndex, Position, Span, TextSize};
use crate::parser::{
    self, ParseError, PositionEntry, PositionTree, RawDocument, RawEntry, RawObject,
};

use super::named_map::NamedMap;
use super::nodes::{
    Dashboard, DerivedTable, Dimension, DimensionGroup, Explore, Filter, Join, LookmlFile,
    Measure, Model, NodeId, NodeInfo, ParameterField, RelationshipValue, View,
};
use super::value::{ParameterValue, Parameters};

/// Keys represented as child collections instead of parameters.
const FILE_STRUCTURAL: &[&str] = &[
    "view",
    "explore",
    "model",
    "dashboard",
    "include",
    "connection",
];
const VIEW_STRUCTURAL: &[&str] = &[
    "dimension",
    "measure",
    "filter",
    "parameter",
    "dimension_group",
    "derived_table",
];
const EXPLORE_STRUCTURAL: &[&str] = &["join"];
const MODEL_STRUCTURAL: &[&str] = &["explore", "connection", "include"];

const MODEL_FILE_SUFFIX: &str = ".model.lkml";

/// Parse `text` and build its AST in one step.
pub fn build_file(text: &str, file_name: &str) -> Result<LookmlFile, ParseError> {
    let raw = parser::parse(text)?;
    Ok(AstBuilder::new(file_name).with_source(text).build(&raw))
}

/// Builds a [`LookmlFile`] from a [`RawDocument`].
pub struct AstBuilder<'s> {
    file_name: String,
    source: Option<(&'s str, LineIndex)>,
    next_id: u32,
}

/// One raw entry together with its (possibly missing) positions.
#[derive(Clone, Copy)]
struct Located<'r> {
    entry: &'r RawEntry,
    position: Option<&'r PositionEntry>,
}

impl<'r> Located<'r> {
    fn span(&self) -> Span {
        self.position.map(|p| p.span).unwrap_or_default()
    }

    fn name_span(&self) -> Span {
        self.position
            .and_then(|p| p.name_span)
            .unwrap_or_else(|| self.span())
    }

    fn key_span(&self) -> Span {
        self.position.map(|p| p.key_span).unwrap_or_default()
    }

    fn value_span(&self) -> Span {
        self.position.map(|p| p.value_span).unwrap_or_default()
    }

    fn body(&self) -> Option<(&'r RawObject, Option<&'r PositionTree>)> {
        let body = self.entry.value.as_object()?;
        Some((body, self.position.and_then(|p| p.children.as_ref())))
    }
}

/// Pair each entry of `body` with its positions.
fn located<'r>(body: &'r RawObject, positions: Option<&'r PositionTree>) -> Vec<Located<'r>> {
    body.entries
        .iter()
        .enumerate()
        .map(|(i, entry)| Located {
            entry,
            position: positions.and_then(|p| p.entry(i)),
        })
        .collect()
}

impl<'s> AstBuilder<'s> {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: None,
            next_id: 0,
        }
    }

    /// Attach the source text so nodes record their raw text.
    pub fn with_source(mut self, text: &'s str) -> Self {
        self.source = Some((text, LineIndex::new(text)));
        self
    }

    pub fn build(mut self, raw: &RawDocument) -> LookmlFile {
        let entries = located(raw.tree(), Some(raw.positions()));

        let mut info = self.info(Span::unknown(), Span::unknown());
        info.span = self.file_span(&entries);
        info.name_span = info.span;

        let mut file = LookmlFile {
            info,
            file_name: self.file_name.clone(),
            views: NamedMap::new(),
            explores: NamedMap::new(),
            models: NamedMap::new(),
            dashboards: NamedMap::new(),
            connection: None,
            includes: Vec::new(),
            parameters: self.parameters(&entries, FILE_STRUCTURAL),
        };

        for item in &entries {
            match item.entry.key.as_str() {
                "view" => {
                    if let Some((name, view)) = self.build_view(item) {
                        file.views.insert(name, view);
                    }
                }
                "explore" => {
                    if let Some((name, explore)) = self.build_explore(item) {
                        file.explores.insert(name, explore);
                    }
                }
                "model" => {
                    if let Some((name, model)) = self.build_model(item) {
                        file.models.insert(name, model);
                    }
                }
                "dashboard" => {
                    if let Some((name, dashboard)) = self.build_dashboard(item) {
                        file.dashboards.insert(name, dashboard);
                    }
                }
                "connection" => file.connection = item.entry.value.as_text(),
                "include" => file.includes.extend(
                    ParameterValue::from_raw(&item.entry.value).as_string_list(),
                ),
                _ => {}
            }
        }

        if let Some(model) = self.implicit_model(&file, &entries) {
            file.models.insert(model.name.clone(), model);
        }

        file
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn info(&mut self, span: Span, name_span: Span) -> NodeInfo {
        let mut info = NodeInfo::new(self.next_id());
        info.span = span;
        info.name_span = name_span;
        info.raw = self.raw_text(span);
        info
    }

    fn raw_text(&self, span: Span) -> Option<Arc<str>> {
        if span.is_unknown() {
            return None;
        }
        let (text, index) = self.source.as_ref()?;
        let start = usize::from(index.offset(span.start)?);
        let end = usize::from(index.offset(span.end)?);
        text.get(start..end).map(Arc::from)
    }

    fn file_span(&self, entries: &[Located<'_>]) -> Span {
        let end = entries
            .iter()
            .map(|e| e.span().end)
            .max()
            .unwrap_or_default();
        match &self.source {
            Some((text, index)) if !text.is_empty() => {
                Span::new(Position::default(), index.position(TextSize::of(*text)))
            }
            _ if end == Position::default() => Span::unknown(),
            _ => Span::new(Position::default(), end),
        }
    }

    fn parameters(&self, entries: &[Located<'_>], structural: &[&str]) -> Parameters {
        let mut params = Parameters::new();
        for item in entries {
            if structural.contains(&item.entry.key.as_str()) {
                continue;
            }
            params.insert(
                item.entry.key.clone(),
                ParameterValue::from_raw_entry(item.entry),
                item.span(),
            );
        }
        params
    }

    fn build_view(&mut self, item: &Located<'_>) -> Option<(String, View)> {
        let name = item.entry.name.clone()?;
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, VIEW_STRUCTURAL);

        let mut view = View {
            info,
            name: name.clone(),
            sql_table_name: parameters.get_str("sql_table_name").map(str::to_string),
            parameters,
            dimensions: NamedMap::new(),
            measures: NamedMap::new(),
            filters: NamedMap::new(),
            parameter_fields: NamedMap::new(),
            dimension_groups: NamedMap::new(),
            derived_table: None,
        };

        for child in &entries {
            match child.entry.key.as_str() {
                "dimension" => {
                    if let Some(field) = self.build_dimension(child) {
                        view.dimensions.insert(field.name.clone(), field);
                    }
                }
                "measure" => {
                    if let Some(field) = self.build_measure(child) {
                        view.measures.insert(field.name.clone(), field);
                    }
                }
                "filter" => {
                    if let Some(field) = self.build_filter(child) {
                        view.filters.insert(field.name.clone(), field);
                    }
                }
                "parameter" => {
                    if let Some(field) = self.build_parameter_field(child) {
                        view.parameter_fields.insert(field.name.clone(), field);
                    }
                }
                "dimension_group" => {
                    if let Some(field) = self.build_dimension_group(child) {
                        view.dimension_groups.insert(field.name.clone(), field);
                    }
                }
                "derived_table" => view.derived_table = self.build_derived_table(child),
                _ => {}
            }
        }

        Some((name, view))
    }

    /// Common pieces of every field: name, info, parameters, sql text/span.
    fn field_parts(
        &mut self,
        item: &Located<'_>,
    ) -> Option<(String, NodeInfo, Parameters, Option<String>, Span)> {
        let name = item.entry.name.clone()?;
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, &[]);
        let (sql, sql_span) = entries
            .iter()
            .rev()
            .find(|e| e.entry.key == "sql")
            .map(|e| (e.entry.value.as_text(), e.value_span()))
            .unwrap_or((None, Span::unknown()));
        Some((name, info, parameters, sql, sql_span))
    }

    fn build_dimension(&mut self, item: &Located<'_>) -> Option<Dimension> {
        let (name, info, parameters, sql, sql_span) = self.field_parts(item)?;
        Some(Dimension {
            info,
            name,
            data_type: text(&parameters, "type"),
            sql,
            sql_span,
            primary_key: flag(&parameters, "primary_key"),
            hidden: flag(&parameters, "hidden"),
            label: text(&parameters, "label"),
            description: text(&parameters, "description"),
            parameters,
        })
    }

    fn build_measure(&mut self, item: &Located<'_>) -> Option<Measure> {
        let (name, info, parameters, sql, sql_span) = self.field_parts(item)?;
        Some(Measure {
            info,
            name,
            measure_type: text(&parameters, "type"),
            sql,
            sql_span,
            hidden: flag(&parameters, "hidden"),
            label: text(&parameters, "label"),
            description: text(&parameters, "description"),
            drill_fields: list(&parameters, "drill_fields"),
            parameters,
        })
    }

    fn build_filter(&mut self, item: &Located<'_>) -> Option<Filter> {
        let (name, info, parameters, sql, sql_span) = self.field_parts(item)?;
        Some(Filter {
            info,
            name,
            data_type: text(&parameters, "type"),
            sql,
            sql_span,
            hidden: flag(&parameters, "hidden"),
            label: text(&parameters, "label"),
            description: text(&parameters, "description"),
            parameters,
        })
    }

    fn build_parameter_field(&mut self, item: &Located<'_>) -> Option<ParameterField> {
        let (name, info, parameters, _, _) = self.field_parts(item)?;
        Some(ParameterField {
            info,
            name,
            data_type: text(&parameters, "type"),
            hidden: flag(&parameters, "hidden"),
            label: text(&parameters, "label"),
            description: text(&parameters, "description"),
            default_value: text(&parameters, "default_value"),
            parameters,
        })
    }

    fn build_dimension_group(&mut self, item: &Located<'_>) -> Option<DimensionGroup> {
        let (name, info, parameters, sql, sql_span) = self.field_parts(item)?;
        let mut timeframes = list(&parameters, "timeframes");
        if timeframes.is_empty() {
            timeframes = list(&parameters, "intervals");
        }
        Some(DimensionGroup {
            info,
            name,
            group_type: text(&parameters, "type"),
            sql,
            sql_span,
            timeframes,
            hidden: flag(&parameters, "hidden"),
            label: text(&parameters, "label"),
            description: text(&parameters, "description"),
            parameters,
        })
    }

    fn build_derived_table(&mut self, item: &Located<'_>) -> Option<DerivedTable> {
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.key_span());
        let parameters = self.parameters(&entries, &[]);
        let (sql, sql_span) = entries
            .iter()
            .rev()
            .find(|e| e.entry.key == "sql")
            .map(|e| (e.entry.value.as_text(), e.value_span()))
            .unwrap_or((None, Span::unknown()));
        Some(DerivedTable {
            info,
            parameters,
            sql,
            sql_span,
        })
    }

    fn build_explore(&mut self, item: &Located<'_>) -> Option<(String, Explore)> {
        let name = item.entry.name.clone()?;
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, EXPLORE_STRUCTURAL);

        let mut joins = NamedMap::new();
        for child in entries.iter().filter(|e| e.entry.key == "join") {
            if let Some(join) = self.build_join(child) {
                joins.insert(join.name.clone(), join);
            }
        }

        let base_view = text(&parameters, "from").or_else(|| text(&parameters, "view_name"));
        Some((
            name.clone(),
            Explore {
                info,
                name,
                parameters,
                joins,
                base_view,
            },
        ))
    }

    fn build_join(&mut self, item: &Located<'_>) -> Option<Join> {
        let name = item.entry.name.clone()?;
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, &[]);

        let (sql_on, sql_on_span) = entries
            .iter()
            .rev()
            .find(|e| e.entry.key == "sql_on")
            .map(|e| (e.entry.value.as_text(), e.value_span()))
            .unwrap_or((None, Span::unknown()));
        let view = text(&parameters, "from")
            .or_else(|| text(&parameters, "view_name"))
            .unwrap_or_else(|| name.clone());

        Some(Join {
            info,
            view,
            sql_on,
            sql_on_span,
            relationship: parameters
                .get_str("relationship")
                .map(RelationshipValue::from_text),
            join_type: text(&parameters, "type"),
            name,
            parameters,
        })
    }

    fn build_model(&mut self, item: &Located<'_>) -> Option<(String, Model)> {
        let name = item.entry.name.clone()?;
        let (body, positions) = item.body()?;
        let entries = located(body, positions);
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, MODEL_STRUCTURAL);

        let mut model = Model {
            info,
            name: name.clone(),
            parameters,
            explores: NamedMap::new(),
            connection: None,
            includes: Vec::new(),
        };
        for child in &entries {
            match child.entry.key.as_str() {
                "explore" => {
                    if let Some((name, explore)) = self.build_explore(child) {
                        model.explores.insert(name, explore);
                    }
                }
                "connection" => model.connection = child.entry.value.as_text(),
                "include" => model.includes.extend(
                    ParameterValue::from_raw(&child.entry.value).as_string_list(),
                ),
                _ => {}
            }
        }
        Some((name, model))
    }

    fn build_dashboard(&mut self, item: &Located<'_>) -> Option<(String, Dashboard)> {
        let name = item.entry.name.clone()?;
        let entries = item
            .body()
            .map(|(body, positions)| located(body, positions))
            .unwrap_or_default();
        let info = self.info(item.span(), item.name_span());
        let parameters = self.parameters(&entries, &[]);
        let dashboard = Dashboard {
            info,
            name: name.clone(),
            parameters,
        };
        Some((name, dashboard))
    }

    /// A `<name>.model.lkml` file is itself a model: its top-level
    /// `connection` and `include` belong to a model named after the file.
    fn implicit_model(&mut self, file: &LookmlFile, entries: &[Located<'_>]) -> Option<Model> {
        let base = Path::new(&self.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file_name)
            .to_string();
        let name = base.strip_suffix(MODEL_FILE_SUFFIX)?.to_string();
        if file.models.contains(&name) {
            return None;
        }
        let anchor = entries
            .iter()
            .find(|e| e.entry.key == "connection")
            .map(|e| (e.span(), e.value_span()))
            .unwrap_or_default();
        Some(Model {
            info: self.info(anchor.0, anchor.1),
            name,
            parameters: Parameters::new(),
            explores: NamedMap::new(),
            connection: file.connection.clone(),
            includes: file.includes.clone(),
        })
    }
}

fn text(parameters: &Parameters, key: &str) -> Option<String> {
    parameters.get_str(key).map(str::to_string)
}

fn flag(parameters: &Parameters, key: &str) -> bool {
    parameters
        .get(key)
        .and_then(ParameterValue::as_bool)
        .unwrap_or(false)
}

fn list(parameters: &Parameters, key: &str) -> Vec<String> {
    parameters
        .get(key)
        .map(ParameterValue::as_string_list)
        .unwrap_or_default()
}
