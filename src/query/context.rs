//! Execution context.

/// Ambient parameters for resolving one query document.
///
/// `root_dir` names a directory prefix that was stripped from entry paths
/// at ingestion time; the compiler and runtime compensate for it so
/// expressions can keep using the original full paths.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub site_id: String,
    pub root_dir: Option<String>,
}

impl QueryContext {
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            root_dir: None,
        }
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }
}
