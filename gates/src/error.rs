//! Change gate error types using thiserror 2.0.
//!
//! Decode errors keep the element index they happened at, so a failure deep
//! inside a gate list reads as `Gate 1: Approver 2: Unknown eligibilityType
//! "has_group_membership"`.

use thiserror::Error;

/// Change gate encoding and decoding errors.
#[derive(Error, Debug)]
pub enum GateError {
    /// An eligibility rule has no `eligibilityType` field
    #[error("Eligibility rule has no eligibilityType discriminator")]
    MissingDiscriminator,

    /// An eligibility rule's tag is not one of the supported variants
    #[error("Unknown eligibilityType {tag}")]
    UnknownEligibilityType {
        /// The tag that was seen, JSON-quoted when it was a string
        tag: String,
    },

    /// The tag is known but the variant's fields are missing or mistyped
    #[error("Invalid {tag} eligibility rule: {source}")]
    InvalidEligibility {
        /// The tag that was seen
        tag: String,
        /// Field-level decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Failure at one element of an `eligibleApprovers` array
    #[error("Approver {index}: {source}")]
    Approver {
        /// Zero-based position inside `eligibleApprovers`
        index: usize,
        /// What went wrong with that element
        #[source]
        source: Box<GateError>,
    },

    /// Failure at one element of a gate list
    #[error("Gate {index}: {source}")]
    Gate {
        /// Zero-based position inside `gates`
        index: usize,
        /// What went wrong with that gate
        #[source]
        source: Box<GateError>,
    },

    /// The gate's rule is not an approval rule
    #[error("Unsupported change gate rule type: {0}")]
    UnsupportedRuleType(String),

    /// A gate record is missing fields or has the wrong shape
    #[error("Invalid change gate: {0}")]
    InvalidGate(String),

    /// A gate configuration cannot be turned into a request
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for change gate operations.
pub type GateResult<T> = Result<T, GateError>;

impl GateError {
    /// Create an unknown eligibility type error.
    #[must_use]
    pub fn unknown_eligibility_type(tag: impl Into<String>) -> Self {
        Self::UnknownEligibilityType { tag: tag.into() }
    }

    /// Create an invalid gate error.
    #[must_use]
    pub fn invalid_gate(msg: impl Into<String>) -> Self {
        Self::InvalidGate(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Attach an `eligibleApprovers` index to this error.
    #[must_use]
    pub fn at_approver(self, index: usize) -> Self {
        Self::Approver {
            index,
            source: Box::new(self),
        }
    }

    /// Attach a gate list index to this error.
    #[must_use]
    pub fn at_gate(self, index: usize) -> Self {
        Self::Gate {
            index,
            source: Box::new(self),
        }
    }

    /// Index of the approver that failed, if the error came from one.
    #[must_use]
    pub fn approver_index(&self) -> Option<usize> {
        match self {
            Self::Approver { index, .. } => Some(*index),
            Self::Gate { source, .. } => source.approver_index(),
            _ => None,
        }
    }

    /// Index of the gate that failed, if the error came from a list.
    #[must_use]
    pub const fn gate_index(&self) -> Option<usize> {
        match self {
            Self::Gate { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The `eligibilityType` value that was seen, if the error is about one.
    #[must_use]
    pub fn seen_tag(&self) -> Option<&str> {
        match self {
            Self::UnknownEligibilityType { tag } | Self::InvalidEligibility { tag, .. } => {
                Some(tag)
            }
            Self::Approver { source, .. } | Self::Gate { source, .. } => source.seen_tag(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GateError::unknown_eligibility_type("\"has_group_membership\"")
            .at_approver(2)
            .at_gate(1);
        assert_eq!(
            err.to_string(),
            "Gate 1: Approver 2: Unknown eligibilityType \"has_group_membership\""
        );
    }

    #[test]
    fn test_indices_and_tag() {
        let err = GateError::unknown_eligibility_type("\"x\"").at_approver(2).at_gate(1);
        assert_eq!(err.gate_index(), Some(1));
        assert_eq!(err.approver_index(), Some(2));
        assert_eq!(err.seen_tag(), Some("\"x\""));

        let err = GateError::MissingDiscriminator.at_approver(0);
        assert_eq!(err.approver_index(), Some(0));
        assert_eq!(err.gate_index(), None);
        assert_eq!(err.seen_tag(), None);
    }
}
