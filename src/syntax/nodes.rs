//! Typed LookML AST.
//!
//! Every node carries a [`NodeInfo`] (identity, spans, optional source text).
//! Named nodes have a `name`, parameterized nodes a [`Parameters`] map holding
//! every key that is not a structural child collection.

use std::sync::Arc;

use crate::base::{Position, Span};

use super::named_map::NamedMap;
use super::value::Parameters;

/// Identity of a node within one file, assigned by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Data shared by every node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    /// Whole construct, key through closing brace.
    pub span: Span,
    /// Just the name (equal to `span` for unnamed nodes).
    pub name_span: Span,
    /// Source text of `span`, when the builder was given the source.
    pub raw: Option<Arc<str>>,
}

impl NodeInfo {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            span: Span::unknown(),
            name_span: Span::unknown(),
            raw: None,
        }
    }
}

/// Discriminant of [`AstNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    View,
    Explore,
    Model,
    Dashboard,
    Dimension,
    Measure,
    Filter,
    Parameter,
    DimensionGroup,
    Join,
    DerivedTable,
}

impl NodeKind {
    /// The LookML keyword introducing this construct.
    pub fn keyword(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::View => "view",
            NodeKind::Explore => "explore",
            NodeKind::Model => "model",
            NodeKind::Dashboard => "dashboard",
            NodeKind::Dimension => "dimension",
            NodeKind::Measure => "measure",
            NodeKind::Filter => "filter",
            NodeKind::Parameter => "parameter",
            NodeKind::DimensionGroup => "dimension_group",
            NodeKind::Join => "join",
            NodeKind::DerivedTable => "derived_table",
        }
    }
}

/// Allowed `relationship:` values of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relationship {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Relationship {
    pub const ALL: [Relationship; 4] = [
        Relationship::OneToOne,
        Relationship::OneToMany,
        Relationship::ManyToOne,
        Relationship::ManyToMany,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "one_to_one" => Some(Relationship::OneToOne),
            "one_to_many" => Some(Relationship::OneToMany),
            "many_to_one" => Some(Relationship::ManyToOne),
            "many_to_many" => Some(Relationship::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::OneToOne => "one_to_one",
            Relationship::OneToMany => "one_to_many",
            Relationship::ManyToOne => "many_to_one",
            Relationship::ManyToMany => "many_to_many",
        }
    }
}

/// A relationship as written: either one of the canonical values or anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationshipValue {
    Known(Relationship),
    Unknown(String),
}

impl RelationshipValue {
    pub fn from_text(value: &str) -> Self {
        Relationship::parse(value)
            .map(RelationshipValue::Known)
            .unwrap_or_else(|| RelationshipValue::Unknown(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            RelationshipValue::Known(r) => r.as_str(),
            RelationshipValue::Unknown(s) => s,
        }
    }
}

/// A parsed `.lkml` file.
#[derive(Debug, Clone, PartialEq)]
pub struct LookmlFile {
    pub info: NodeInfo,
    pub file_name: String,
    pub views: NamedMap<View>,
    pub explores: NamedMap<Explore>,
    pub models: NamedMap<Model>,
    pub dashboards: NamedMap<Dashboard>,
    /// Top-level `connection:` (model files).
    pub connection: Option<String>,
    /// Top-level `include:` patterns in source order.
    pub includes: Vec<String>,
    /// Any other top-level keys (`datagroup`, `access_grant`, ...).
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub dimensions: NamedMap<Dimension>,
    pub measures: NamedMap<Measure>,
    pub filters: NamedMap<Filter>,
    pub parameter_fields: NamedMap<ParameterField>,
    pub dimension_groups: NamedMap<DimensionGroup>,
    pub derived_table: Option<DerivedTable>,
    pub sql_table_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub data_type: Option<String>,
    pub sql: Option<String>,
    /// Where the `sql` text starts, for positioning embedded references.
    pub sql_span: Span,
    pub primary_key: bool,
    pub hidden: bool,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub measure_type: Option<String>,
    pub sql: Option<String>,
    pub sql_span: Span,
    pub hidden: bool,
    pub label: Option<String>,
    pub description: Option<String>,
    pub drill_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub data_type: Option<String>,
    pub sql: Option<String>,
    pub sql_span: Span,
    pub hidden: bool,
    pub label: Option<String>,
    pub description: Option<String>,
}

/// A `parameter:` field (user-selectable value), not to be confused with
/// [`Parameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterField {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub data_type: Option<String>,
    pub hidden: bool,
    pub label: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionGroup {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    /// `time` or `duration`
    pub group_type: Option<String>,
    pub sql: Option<String>,
    pub sql_span: Span,
    pub timeframes: Vec<String>,
    pub hidden: bool,
    pub label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub info: NodeInfo,
    pub parameters: Parameters,
    pub sql: Option<String>,
    pub sql_span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explore {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub joins: NamedMap<Join>,
    /// `from:` or `view_name:`, unresolved.
    pub base_view: Option<String>,
}

impl Explore {
    /// The view this explore starts from: the explicit base view or, by
    /// LookML convention, the view named like the explore.
    pub fn effective_base_view(&self) -> &str {
        self.base_view.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    /// Target view: `from:`, `view_name:` or the join name.
    pub view: String,
    pub sql_on: Option<String>,
    pub sql_on_span: Span,
    pub relationship: Option<RelationshipValue>,
    pub join_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
    pub explores: NamedMap<Explore>,
    pub connection: Option<String>,
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub info: NodeInfo,
    pub name: String,
    pub parameters: Parameters,
}

/// Borrowed view of any AST node, for exhaustive dispatch.
#[derive(Debug, Clone, Copy)]
pub enum AstNode<'a> {
    File(&'a LookmlFile),
    View(&'a View),
    Explore(&'a Explore),
    Model(&'a Model),
    Dashboard(&'a Dashboard),
    Dimension(&'a Dimension),
    Measure(&'a Measure),
    Filter(&'a Filter),
    Parameter(&'a ParameterField),
    DimensionGroup(&'a DimensionGroup),
    Join(&'a Join),
    DerivedTable(&'a DerivedTable),
}

impl<'a> AstNode<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::File(_) => NodeKind::File,
            AstNode::View(_) => NodeKind::View,
            AstNode::Explore(_) => NodeKind::Explore,
            AstNode::Model(_) => NodeKind::Model,
            AstNode::Dashboard(_) => NodeKind::Dashboard,
            AstNode::Dimension(_) => NodeKind::Dimension,
            AstNode::Measure(_) => NodeKind::Measure,
            AstNode::Filter(_) => NodeKind::Filter,
            AstNode::Parameter(_) => NodeKind::Parameter,
            AstNode::DimensionGroup(_) => NodeKind::DimensionGroup,
            AstNode::Join(_) => NodeKind::Join,
            AstNode::DerivedTable(_) => NodeKind::DerivedTable,
        }
    }

    pub fn info(&self) -> &'a NodeInfo {
        match self {
            AstNode::File(n) => &n.info,
            AstNode::View(n) => &n.info,
            AstNode::Explore(n) => &n.info,
            AstNode::Model(n) => &n.info,
            AstNode::Dashboard(n) => &n.info,
            AstNode::Dimension(n) => &n.info,
            AstNode::Measure(n) => &n.info,
            AstNode::Filter(n) => &n.info,
            AstNode::Parameter(n) => &n.info,
            AstNode::DimensionGroup(n) => &n.info,
            AstNode::Join(n) => &n.info,
            AstNode::DerivedTable(n) => &n.info,
        }
    }

    pub fn id(&self) -> NodeId {
        self.info().id
    }

    pub fn span(&self) -> Span {
        self.info().span
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            AstNode::File(n) => Some(&n.file_name),
            AstNode::View(n) => Some(&n.name),
            AstNode::Explore(n) => Some(&n.name),
            AstNode::Model(n) => Some(&n.name),
            AstNode::Dashboard(n) => Some(&n.name),
            AstNode::Dimension(n) => Some(&n.name),
            AstNode::Measure(n) => Some(&n.name),
            AstNode::Filter(n) => Some(&n.name),
            AstNode::Parameter(n) => Some(&n.name),
            AstNode::DimensionGroup(n) => Some(&n.name),
            AstNode::Join(n) => Some(&n.name),
            AstNode::DerivedTable(_) => None,
        }
    }

    pub fn parameters(&self) -> &'a Parameters {
        match self {
            AstNode::File(n) => &n.parameters,
            AstNode::View(n) => &n.parameters,
            AstNode::Explore(n) => &n.parameters,
            AstNode::Model(n) => &n.parameters,
            AstNode::Dashboard(n) => &n.parameters,
            AstNode::Dimension(n) => &n.parameters,
            AstNode::Measure(n) => &n.parameters,
            AstNode::Filter(n) => &n.parameters,
            AstNode::Parameter(n) => &n.parameters,
            AstNode::DimensionGroup(n) => &n.parameters,
            AstNode::Join(n) => &n.parameters,
            AstNode::DerivedTable(n) => &n.parameters,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<AstNode<'a>> {
        let mut children = match self {
            AstNode::File(f) => {
                let mut c: Vec<AstNode<'a>> = Vec::new();
                c.extend(f.views.values().map(AstNode::View));
                c.extend(f.explores.values().map(AstNode::Explore));
                c.extend(f.models.values().map(AstNode::Model));
                c.extend(f.dashboards.values().map(AstNode::Dashboard));
                c
            }
            AstNode::View(v) => {
                let mut c: Vec<AstNode<'a>> = v.fields().map(FieldNode::as_node).collect();
                c.extend(v.derived_table.as_ref().map(AstNode::DerivedTable));
                c
            }
            AstNode::Explore(e) => e.joins.values().map(AstNode::Join).collect(),
            AstNode::Model(m) => m.explores.values().map(AstNode::Explore).collect(),
            _ => Vec::new(),
        };
        children.sort_by_key(|c| c.span().start);
        children
    }

    /// Innermost node whose span contains `position`, searching this subtree.
    pub fn node_at(&self, position: Position) -> Option<AstNode<'a>> {
        let mut best: Option<AstNode<'a>> =
            self.span().contains(position).then_some(*self);
        for child in self.children() {
            if let Some(found) = child.node_at(position) {
                let smaller = match best {
                    Some(current) => found.span().is_smaller_than(&current.span()),
                    None => true,
                };
                if smaller {
                    best = Some(found);
                }
            }
        }
        best
    }

    /// Pre-order walk of this subtree.
    pub fn descendants(&self) -> Vec<AstNode<'a>> {
        let mut out = vec![*self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }
}

/// Any of the five field kinds a view owns.
#[derive(Debug, Clone, Copy)]
pub enum FieldNode<'a> {
    Dimension(&'a Dimension),
    Measure(&'a Measure),
    Filter(&'a Filter),
    Parameter(&'a ParameterField),
    DimensionGroup(&'a DimensionGroup),
}

impl<'a> FieldNode<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            FieldNode::Dimension(f) => &f.name,
            FieldNode::Measure(f) => &f.name,
            FieldNode::Filter(f) => &f.name,
            FieldNode::Parameter(f) => &f.name,
            FieldNode::DimensionGroup(f) => &f.name,
        }
    }

    pub fn as_node(self) -> AstNode<'a> {
        match self {
            FieldNode::Dimension(f) => AstNode::Dimension(f),
            FieldNode::Measure(f) => AstNode::Measure(f),
            FieldNode::Filter(f) => AstNode::Filter(f),
            FieldNode::Parameter(f) => AstNode::Parameter(f),
            FieldNode::DimensionGroup(f) => AstNode::DimensionGroup(f),
        }
    }

    pub fn info(&self) -> &'a NodeInfo {
        self.as_node().info()
    }

    /// The embedded-expression text and its position, if the field has `sql`.
    pub fn sql(&self) -> Option<(&'a str, Span)> {
        match self {
            FieldNode::Dimension(f) => f.sql.as_deref().map(|s| (s, f.sql_span)),
            FieldNode::Measure(f) => f.sql.as_deref().map(|s| (s, f.sql_span)),
            FieldNode::Filter(f) => f.sql.as_deref().map(|s| (s, f.sql_span)),
            FieldNode::DimensionGroup(f) => f.sql.as_deref().map(|s| (s, f.sql_span)),
            FieldNode::Parameter(_) => None,
        }
    }
}

impl View {
    /// Every field of every kind, in source order.
    pub fn fields(&self) -> impl Iterator<Item = FieldNode<'_>> {
        let mut fields: Vec<FieldNode<'_>> = Vec::new();
        fields.extend(self.dimensions.values().map(FieldNode::Dimension));
        fields.extend(self.dimension_groups.values().map(FieldNode::DimensionGroup));
        fields.extend(self.measures.values().map(FieldNode::Measure));
        fields.extend(self.filters.values().map(FieldNode::Filter));
        fields.extend(self.parameter_fields.values().map(FieldNode::Parameter));
        fields.sort_by_key(|f| f.info().span.start);
        fields.into_iter()
    }

    /// Whether this is a `+name` refinement of another view.
    pub fn is_refinement(&self) -> bool {
        self.name.starts_with('+')
    }

    /// Name of the view this one defines or refines.
    pub fn base_name(&self) -> &str {
        self.name.strip_prefix('+').unwrap_or(&self.name)
    }
}

impl LookmlFile {
    pub fn as_node(&self) -> AstNode<'_> {
        AstNode::File(self)
    }

    /// Innermost construct at `position`, or the file itself.
    pub fn node_at(&self, position: Position) -> AstNode<'_> {
        self.as_node()
            .node_at(position)
            .unwrap_or(AstNode::File(self))
    }

    pub fn find_node(&self, id: NodeId) -> Option<AstNode<'_>> {
        self.as_node()
            .descendants()
            .into_iter()
            .find(|n| n.id() == id)
    }

    /// Explores declared at top level and inside models.
    pub fn all_explores(&self) -> impl Iterator<Item = &Explore> {
        self.explores
            .values()
            .chain(self.models.values().flat_map(|m| m.explores.values()))
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
            && self.explores.is_empty()
            && self.models.is_empty()
            && self.dashboards.is_empty()
    }
}
