//! Per-entry evaluation environment.
//!
//! Exposes `file` (path, ext, name, folder), `note` (the metadata map),
//! `formula` (reserved, empty) and the global function library. If a root
//! directory was stripped from paths at ingestion time it is re-prefixed
//! here so expressions see the path an author would write.

use std::collections::BTreeMap;

use crate::store::Entry;

use super::globals;
use super::value::{Callable, Value};

/// Evaluation environment for one entry
#[derive(Debug, Clone)]
pub struct EvalEnv {
    file: Value,
    note: Value,
    formula: Value,
}

impl EvalEnv {
    pub fn new(entry: &Entry, root_dir: Option<&str>) -> Self {
        let path = match root_dir {
            Some(root) if !root.is_empty() && !entry.path.starts_with(root) => {
                if entry.path.starts_with('/') {
                    format!("{root}{}", entry.path)
                } else {
                    format!("{root}/{}", entry.path)
                }
            }
            _ => entry.path.clone(),
        };

        let name = path.rsplit('/').next().unwrap_or("").to_string();
        let ext = match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx + 1..].to_string(),
            _ => String::new(),
        };
        let folder = match path.rfind('/') {
            Some(idx) => path[..idx].to_string(),
            None => String::new(),
        };

        let mut file = BTreeMap::new();
        file.insert("path".to_string(), Value::Str(path));
        file.insert("ext".to_string(), Value::Str(ext.clone()));
        file.insert("extension".to_string(), Value::Str(ext));
        file.insert("name".to_string(), Value::Str(name));
        file.insert("folder".to_string(), Value::Str(folder));
        file.insert(
            "inFolder".to_string(),
            in_folder(entry.path.clone(), root_dir.map(str::to_string)),
        );
        file.insert("hasProperty".to_string(), has_property(entry.metadata.clone()));

        Self {
            file: Value::Object(file),
            note: Value::from_json(&entry.metadata),
            formula: Value::Object(BTreeMap::new()),
        }
    }

    /// Resolves a bare identifier: the three environment objects first,
    /// then globals, then top-level metadata keys.
    pub fn lookup(&self, name: &str) -> Value {
        match name {
            "file" => self.file.clone(),
            "note" => self.note.clone(),
            "formula" => self.formula.clone(),
            _ => globals::lookup(name).unwrap_or_else(|| self.note_field(name)),
        }
    }

    fn note_field(&self, name: &str) -> Value {
        match &self.note {
            Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }
}

/// `file.inFolder(x)` against the stored (root-stripped) path, mirroring
/// the push-down compiler so the store/residual split stays equivalent.
fn in_folder(stored_path: String, root_dir: Option<String>) -> Value {
    Value::Callable(Callable::new("inFolder", move |args| {
        let mut folder = args.first().map(Value::render_string).unwrap_or_default();

        if let Some(root) = &root_dir {
            if !root.is_empty() && folder.starts_with(root.as_str()) {
                folder = folder[root.len()..].to_string();
                if folder.starts_with('/') {
                    folder.remove(0);
                }
                if folder.is_empty() {
                    // the folder is the effective root
                    return Ok(Value::Bool(true));
                }
            }
        }

        if !folder.ends_with('/') {
            folder.push('/');
        }
        Ok(Value::Bool(stored_path.starts_with(&folder)))
    }))
}

/// `file.hasProperty(name)`: the metadata key is present and not null
fn has_property(metadata: serde_json::Value) -> Value {
    Value::Callable(Callable::new("hasProperty", move |args| {
        let name = args.first().map(Value::render_string).unwrap_or_default();
        Ok(Value::Bool(
            matches!(metadata.get(&name), Some(v) if !v.is_null()),
        ))
    }))
}
