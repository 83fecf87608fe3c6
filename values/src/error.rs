//! Value tree error types using thiserror 2.0.

use thiserror::Error;

/// Errors raised while decoding or navigating a value tree.
#[derive(Error, Debug)]
pub enum ValueError {
    /// The response does not have the shape of an annotated value tree
    #[error("Malformed value tree at {path}: {reason}")]
    MalformedTree {
        /// Location inside the response, e.g. `properties.db[2].trace.base`
        path: String,
        /// What was wrong at that location
        reason: String,
    },

    /// A path segment does not exist in the current mapping
    #[error("Property `{segment}` not found while resolving `{path}`")]
    PathNotFound {
        /// The full dotted path that was requested
        path: String,
        /// The segment that could not be found
        segment: String,
    },

    /// A non-terminal path segment resolved to something other than a mapping
    #[error("Property `{segment}` is not an object while resolving `{path}`")]
    PathNotAnObject {
        /// The full dotted path that was requested
        path: String,
        /// The segment whose value cannot be navigated into
        segment: String,
    },

    /// Response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for value tree operations.
pub type ValueResult<T> = Result<T, ValueError>;

impl ValueError {
    /// Create a malformed tree error.
    #[must_use]
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a path not found error.
    #[must_use]
    pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a path not an object error.
    #[must_use]
    pub fn path_not_an_object(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathNotAnObject {
            path: path.into(),
            segment: segment.into(),
        }
    }
}
