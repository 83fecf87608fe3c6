//! Dot-separated property path navigation.
//!
//! Paths such as `pulumiConfig.foo` are resolved against an already-fetched
//! tree, one segment at a time. Every step lands on a [`ValueNode`], so the
//! caller still sees `secret`/`trace` on the result and decides itself
//! whether to project it.
//!
//! Segments are split on `.` with no escaping, so keys that contain a literal
//! dot cannot be addressed.

use crate::error::{ValueError, ValueResult};
use crate::node::{Properties, ValueNode};

/// Resolve `path` against a mapping of named nodes.
///
/// # Errors
///
/// - [`ValueError::PathNotFound`] when a segment does not exist in the
///   current mapping.
/// - [`ValueError::PathNotAnObject`] when a non-terminal segment resolves to
///   a node that is not a mapping.
pub fn resolve<'a>(root: &'a Properties, path: &str) -> ValueResult<&'a ValueNode> {
    let mut current = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let node = current
            .get(segment)
            .ok_or_else(|| ValueError::path_not_found(path, segment))?;

        if segments.peek().is_none() {
            return Ok(node);
        }

        current = node
            .as_object()
            .ok_or_else(|| ValueError::path_not_an_object(path, segment))?;
    }

    // `split` always yields at least one segment.
    Err(ValueError::path_not_found(path, path))
}

impl ValueNode {
    /// Resolve `path` below this node, which must be a mapping.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`]; a non-mapping node yields
    /// [`ValueError::PathNotAnObject`] naming the first segment.
    pub fn get_path(&self, path: &str) -> ValueResult<&Self> {
        let Some(children) = self.as_object() else {
            let first = path.split('.').next().unwrap_or(path);
            return Err(ValueError::path_not_an_object(path, first));
        };
        resolve(children, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ValuePayload;
    use crate::projection::project;
    use serde_json::json;

    fn root() -> Properties {
        let mut root = Properties::new();
        root.insert(
            "pulumiConfig".to_string(),
            ValueNode::new(ValuePayload::object([
                ("foo", ValueNode::new("bar")),
                (
                    "db",
                    ValueNode::new(ValuePayload::object([(
                        "password",
                        ValueNode::new("hunter2").with_secret(true),
                    )])),
                ),
            ])),
        );
        root.insert(
            "ports".to_string(),
            ValueNode::new(vec![ValueNode::new(80_i64)]),
        );
        root
    }

    #[test]
    fn test_resolve_nested() {
        let root = root();
        let node = resolve(&root, "pulumiConfig.foo").unwrap();
        assert_eq!(project(node), json!("bar"));
    }

    #[test]
    fn test_resolve_keeps_annotations() {
        let root = root();
        let node = resolve(&root, "pulumiConfig.db.password").unwrap();
        assert!(node.secret);
    }

    #[test]
    fn test_resolve_top_level_container() {
        let root = root();
        let node = resolve(&root, "pulumiConfig").unwrap();
        assert!(node.as_object().is_some());
    }

    #[test]
    fn test_missing_segment() {
        let root = root();
        let err = resolve(&root, "pulumiConfig.missing").unwrap_err();
        assert!(matches!(
            err,
            ValueError::PathNotFound { ref path, ref segment }
                if path == "pulumiConfig.missing" && segment == "missing"
        ));

        let err = resolve(&root, "nope").unwrap_err();
        assert!(matches!(err, ValueError::PathNotFound { ref segment, .. } if segment == "nope"));
    }

    #[test]
    fn test_descend_into_scalar() {
        let root = root();
        let err = resolve(&root, "pulumiConfig.foo.bar").unwrap_err();
        assert!(matches!(
            err,
            ValueError::PathNotAnObject { ref segment, .. } if segment == "foo"
        ));
    }

    #[test]
    fn test_sequences_are_not_navigable() {
        let root = root();
        let err = resolve(&root, "ports.0").unwrap_err();
        assert!(matches!(err, ValueError::PathNotAnObject { ref segment, .. } if segment == "ports"));
    }

    #[test]
    fn test_empty_path_is_not_found() {
        let root = root();
        let err = resolve(&root, "").unwrap_err();
        assert!(matches!(err, ValueError::PathNotFound { ref segment, .. } if segment.is_empty()));
    }

    #[test]
    fn test_get_path_on_node() {
        let root = root();
        let config = &root["pulumiConfig"];
        assert_eq!(project(config.get_path("db.password").unwrap()), json!("hunter2"));

        let err = root["ports"].get_path("x").unwrap_err();
        assert!(matches!(err, ValueError::PathNotAnObject { .. }));
    }
}
