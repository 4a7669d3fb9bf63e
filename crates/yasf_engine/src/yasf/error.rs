//! Compile errors
//!
//! Document-level errors abort compilation. Every other variant is recovered
//! by omitting the offending subtree and recording it as a diagnostic.

use thiserror::Error;

/// Errors produced while compiling a scene document
#[derive(Debug, Error)]
pub enum CompileError {
    /// The document is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required field is absent
    #[error("Missing field '{field}' in {section}")]
    MissingField {
        /// Section or record containing the field
        section: String,
        /// Field name
        field: String,
    },

    /// A field is present but has the wrong shape
    #[error("Invalid field '{field}' in {section}: {reason}")]
    InvalidField {
        /// Section or record containing the field
        section: String,
        /// Field name
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// The initial camera id names no camera
    #[error("Initial camera '{0}' is not defined")]
    UnknownCamera(String),

    /// A reference names no node definition
    #[error("Node '{node_id}' references unknown node '{reference}'")]
    UnresolvedReference {
        /// Node holding the reference
        node_id: String,
        /// Missing id
        reference: String,
    },

    /// A reference names a node already being compiled above it
    #[error("Node '{node_id}' references its own ancestor '{reference}'")]
    CyclicReference {
        /// Node holding the reference
        node_id: String,
        /// Ancestor id
        reference: String,
    },

    /// The graph nests deeper than the configured limit
    #[error("Node '{node_id}' exceeds the maximum nesting depth of {max_depth}")]
    DepthExceeded {
        /// First node past the limit
        node_id: String,
        /// Configured limit
        max_depth: usize,
    },

    /// A group definition appears inline among primitive children
    #[error("Node '{node_id}' declares group '{child_id}' inline; groups must be listed in nodesList")]
    NestedGroup {
        /// Parent node
        node_id: String,
        /// Offending child
        child_id: String,
    },

    /// The type tag names no known primitive
    #[error("Node '{node_id}' has unknown type '{kind}'")]
    UnknownPrimitive {
        /// Offending node
        node_id: String,
        /// Declared type tag
        kind: String,
    },

    /// Primitive parameters are missing or out of range
    #[error("Primitive '{node_id}' is invalid: {reason}")]
    InvalidPrimitive {
        /// Offending node
        node_id: String,
        /// What is wrong
        reason: String,
    },

    /// A node definition does not have the expected structure
    #[error("Node '{node_id}' is malformed: {reason}")]
    MalformedNode {
        /// Offending node
        node_id: String,
        /// What is wrong
        reason: String,
    },
}

impl CompileError {
    pub(crate) fn missing(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            section: section.into(),
            field: field.into(),
        }
    }

    pub(crate) fn invalid(section: impl Into<String>, field: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidField {
            section: section.into(),
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(node_id: &str, reason: impl ToString) -> Self {
        Self::MalformedNode {
            node_id: node_id.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_primitive(node_id: &str, reason: impl ToString) -> Self {
        Self::InvalidPrimitive {
            node_id: node_id.to_owned(),
            reason: reason.to_string(),
        }
    }

    /// Node the error is attached to, for graph errors
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::UnresolvedReference { node_id, .. }
            | Self::CyclicReference { node_id, .. }
            | Self::DepthExceeded { node_id, .. }
            | Self::NestedGroup { node_id, .. }
            | Self::UnknownPrimitive { node_id, .. }
            | Self::InvalidPrimitive { node_id, .. }
            | Self::MalformedNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}
