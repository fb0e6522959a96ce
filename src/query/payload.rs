//! Output payloads.
//!
//! The serializable result of resolving a query document: one payload per
//! view plus the full path list of the site, in a shape renderers can
//! consume without touching the engine again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::definition::View;

/// One matched entry as it appears in a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPayload {
    pub path: String,
    #[serde(rename = "appPath")]
    pub app_path: String,
    pub metadata: serde_json::Value,
}

/// One computed column summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub value: serde_json::Value,
    pub function: String,
}

/// The resolved output of a single view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewPayload {
    pub view: View,
    pub columns: Vec<String>,
    pub rows: Vec<RowPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<BTreeMap<String, SummaryPayload>>,
}

/// The resolved output of a whole query document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutput {
    pub views: Vec<ViewPayload>,
    #[serde(rename = "allSitePaths")]
    pub all_site_paths: Vec<String>,
}
