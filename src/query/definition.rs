//! Query definition model.
//!
//! The serde model for a query document: an optional global filter plus a
//! list of views. Filters are either a single expression string or a
//! nested group keyed by `and`, `or` and `not`; a group carrying several
//! of those keys combines them with an implicit AND.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::SortDirection;

/// A complete query definition: global filters plus one or more views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<View>,
}

/// One filter node: a leaf expression or a nested group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Expression(String),
    Group(FilterGroup),
}

/// A group of child filters joined by logical connectives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub and: Vec<FilterValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub or: Vec<FilterValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not: Vec<FilterValue>,
}

impl FilterValue {
    pub fn expr(src: impl Into<String>) -> Self {
        FilterValue::Expression(src.into())
    }

    pub fn and(children: Vec<FilterValue>) -> Self {
        FilterValue::Group(FilterGroup {
            and: children,
            ..FilterGroup::default()
        })
    }

    pub fn or(children: Vec<FilterValue>) -> Self {
        FilterValue::Group(FilterGroup {
            or: children,
            ..FilterGroup::default()
        })
    }

    pub fn not(children: Vec<FilterValue>) -> Self {
        FilterValue::Group(FilterGroup {
            not: children,
            ..FilterGroup::default()
        })
    }

    /// Joins an optional global filter with an optional view filter.
    ///
    /// Both present means both must hold, so they nest under one AND.
    pub fn combined(global: Option<&FilterValue>, view: Option<&FilterValue>) -> Option<FilterValue> {
        match (global, view) {
            (Some(g), Some(v)) => Some(FilterValue::and(vec![g.clone(), v.clone()])),
            (Some(g), None) => Some(g.clone()),
            (None, Some(v)) => Some(v.clone()),
            (None, None) => None,
        }
    }
}

/// How a view presents its entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    Table,
    Cards,
    List,
}

/// Table row height presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowHeight {
    Short,
    Medium,
    Tall,
    Extra,
}

/// Card image scaling behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFit {
    Cover,
    Contain,
    Fill,
    ScaleDown,
    None,
}

/// One sort key: a property name and a direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortItem {
    pub property: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// One view over the filtered entry set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "type", default)]
    pub view_type: ViewType,
    #[serde(default)]
    pub name: String,
    /// Column list, doubling as a legacy ascending sort when `sort` is absent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub summaries: BTreeMap<String, String>,
    #[serde(rename = "rowHeight", default, skip_serializing_if = "Option::is_none")]
    pub row_height: Option<RowHeight>,
    #[serde(rename = "cardSize", default, skip_serializing_if = "Option::is_none")]
    pub card_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "imageFit", default, skip_serializing_if = "Option::is_none")]
    pub image_fit: Option<ImageFit>,
    #[serde(
        rename = "imageAspectRatio",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_aspect_ratio: Option<f64>,
}

impl View {
    /// The implicit view used when a definition declares none
    pub fn default_table() -> Self {
        View {
            view_type: ViewType::Table,
            name: "Table".to_string(),
            order: vec!["file.name".to_string()],
            ..View::default()
        }
    }

    /// Displayed columns; a view without an explicit order shows the name
    pub fn columns(&self) -> Vec<String> {
        if self.order.is_empty() {
            vec!["file.name".to_string()]
        } else {
            self.order.clone()
        }
    }
}
