//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the tree and toggle contracts.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found in tree: {0:?}")]
    NodeNotFound(NodeId),

    #[error("the virtual root cannot be toggled")]
    RootNotTogglable,

    #[error("parent node not found in tree: {0:?}")]
    ParentNotFound(NodeId),

    #[error("item name must not be empty")]
    EmptyItemName,

    #[error("invalid item name '{name}': {reason}")]
    InvalidItemName { name: String, reason: &'static str },

    #[error("no node at path: {0}")]
    NodePathNotFound(String),

    #[error("invalid toggle event '{event}': {reason}")]
    InvalidToggleEvent { event: String, reason: String },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
