//! Property classification.
//!
//! Decides whether the left side of a comparison is a scalar entry field,
//! a path into the metadata map, or a value computed from the entry path
//! that the store cannot query directly.

use crate::expr::ExprNode;
use crate::store::ScalarField;

/// Entry attributes derived from `path` rather than stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedField {
    Folder,
    Name,
}

/// Classification of a property reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInfo {
    /// A directly stored scalar field
    Scalar(ScalarField),
    /// A path into the freeform metadata map
    MetadataPath(Vec<String>),
    /// Derivable only by splitting the path; forces interpretation
    Computed(ComputedField),
}

/// Classifies a member-access or identifier node.
///
/// Returns `None` for shapes the compiler does not understand; those are
/// routed to the interpreter, never rejected.
pub fn resolve_property(node: &ExprNode) -> Option<FieldInfo> {
    match node {
        // bare identifier: a top-level metadata key
        ExprNode::Identifier(name) => Some(FieldInfo::MetadataPath(vec![name.clone()])),

        ExprNode::Member { object, property } => {
            let ExprNode::Identifier(object_name) = object.as_ref() else {
                return None;
            };
            match object_name.as_str() {
                "note" | "formula" => Some(FieldInfo::MetadataPath(vec![property.clone()])),
                "file" => match property.as_str() {
                    "ext" | "extension" => Some(FieldInfo::Scalar(ScalarField::Extension)),
                    "path" => Some(FieldInfo::Scalar(ScalarField::Path)),
                    "folder" => Some(FieldInfo::Computed(ComputedField::Folder)),
                    "name" => Some(FieldInfo::Computed(ComputedField::Name)),
                    _ => None,
                },
                _ => None,
            }
        }

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expression;

    fn left_of(src: &str) -> ExprNode {
        match parse_expression(src).unwrap() {
            ExprNode::Binary { left, .. } => *left,
            other => other,
        }
    }

    #[test]
    fn test_scalar_fields() {
        assert_eq!(
            resolve_property(&left_of("file.ext == \"md\"")),
            Some(FieldInfo::Scalar(ScalarField::Extension))
        );
        assert_eq!(
            resolve_property(&left_of("file.extension == \"md\"")),
            Some(FieldInfo::Scalar(ScalarField::Extension))
        );
        assert_eq!(
            resolve_property(&left_of("file.path == \"a.md\"")),
            Some(FieldInfo::Scalar(ScalarField::Path))
        );
    }

    #[test]
    fn test_metadata_paths() {
        assert_eq!(
            resolve_property(&left_of("price > 10")),
            Some(FieldInfo::MetadataPath(vec!["price".into()]))
        );
        assert_eq!(
            resolve_property(&left_of("note.title == \"x\"")),
            Some(FieldInfo::MetadataPath(vec!["title".into()]))
        );
        assert_eq!(
            resolve_property(&left_of("formula.total > 5")),
            Some(FieldInfo::MetadataPath(vec!["total".into()]))
        );
    }

    #[test]
    fn test_computed_fields() {
        assert_eq!(
            resolve_property(&left_of("file.folder == \"notes\"")),
            Some(FieldInfo::Computed(ComputedField::Folder))
        );
        assert_eq!(
            resolve_property(&left_of("file.name == \"a.md\"")),
            Some(FieldInfo::Computed(ComputedField::Name))
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        assert_eq!(resolve_property(&left_of("file.size == 3")), None);
        assert_eq!(resolve_property(&left_of("other.thing == 3")), None);
        assert_eq!(resolve_property(&left_of("a.b.c == 3")), None);
        assert_eq!(resolve_property(&left_of("1 + 2")), None);
    }
}
