//! Typed LookML syntax tree.
//!
//! [`AstBuilder`] turns a [`RawDocument`](crate::parser::RawDocument) into a
//! [`LookmlFile`]: views with their fields, explores with joins, models and
//! dashboards. Every node records its span so consumers can map positions
//! back to constructs.

mod builder;
mod named_map;
mod nodes;
mod value;

pub use builder::{AstBuilder, build_file};
pub use named_map::NamedMap;
pub use nodes::{
    AstNode, Dashboard, DerivedTable, Dimension, DimensionGroup, Explore, FieldNode, Filter, Join,
    LookmlFile, Measure, Model, NodeId, NodeInfo, NodeKind, ParameterField, Relationship,
    RelationshipValue, View,
};
pub use value::{ParameterValue, Parameters, Scalar};
