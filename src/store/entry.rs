//! Content entry model.

use serde_json::Value;

/// One content item belonging to a site.
///
/// `path` is site-relative and unique within a site. `folder` and `name`
/// are not stored; they are derived by splitting `path`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Site-relative path, e.g. `notes/ideas.md`
    pub path: String,
    /// Application-facing path used by the rendering layer for links
    pub app_path: String,
    /// File extension without the dot, empty if none
    pub extension: String,
    /// Freeform metadata parsed from the entry's frontmatter
    pub metadata: Value,
}

impl Entry {
    /// Creates an entry, deriving the extension from the path.
    ///
    /// `app_path` defaults to `path`; the ingestion pipeline overrides it
    /// via [`Entry::with_app_path`] when the two differ.
    pub fn new(path: impl Into<String>, metadata: Value) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            app_path: path.clone(),
            path,
            extension,
            metadata,
        }
    }

    /// Sets the application-facing path
    pub fn with_app_path(mut self, app_path: impl Into<String>) -> Self {
        self.app_path = app_path.into();
        self
    }

    /// File name: the last path segment
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// Folder: everything before the last path segment, empty at the root
    pub fn folder(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    /// Looks up a top-level metadata key
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

fn extension_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or("");
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[idx + 1..].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_derived_attributes() {
        let entry = Entry::new("notes/deep/ideas.md", json!({}));
        assert_eq!(entry.extension, "md");
        assert_eq!(entry.name(), "ideas.md");
        assert_eq!(entry.folder(), "notes/deep");
    }

    #[test]
    fn test_root_entry_has_empty_folder() {
        let entry = Entry::new("readme.md", json!({}));
        assert_eq!(entry.folder(), "");
        assert_eq!(entry.name(), "readme.md");
    }

    #[test]
    fn test_no_extension() {
        let entry = Entry::new("notes/Makefile", json!({}));
        assert_eq!(entry.extension, "");
    }

    #[test]
    fn test_meta_lookup() {
        let entry = Entry::new("a.md", json!({"price": 10}));
        assert_eq!(entry.meta("price"), Some(&json!(10)));
        assert_eq!(entry.meta("missing"), None);
    }
}
