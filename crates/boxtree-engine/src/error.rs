use thiserror::Error;

/// Failures raised by the box tree, the walker and the transformation library.
///
/// All of them are local and synchronous; nothing is retried or recovered
/// internally. A caller that needs all-or-nothing behaviour keeps the root it
/// started from and discards the walker when one of these comes back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A required structural condition (first child, parent, non-root parent)
    /// does not hold at the walker's position.
    #[error("structural precondition failed: {0}")]
    StructuralPrecondition(String),

    /// A children assignment would break one of the box tree invariants.
    #[error("invalid tree structure: {0}")]
    InvalidTreeStructure(String),

    /// A compound transformation found a document shape it does not handle.
    #[error("transformation precondition failed: {0}")]
    TransformationPrecondition(String),

    /// A subtree walker tried to write after its enclosing walker moved away
    /// from, or rewrote, the subtree anchor.
    #[error("concurrent modification: enclosing walker no longer points at the subtree anchor")]
    ConcurrentModification,
}

impl TreeError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        TreeError::StructuralPrecondition(message.into())
    }

    pub(crate) fn invalid_structure(message: impl Into<String>) -> Self {
        TreeError::InvalidTreeStructure(message.into())
    }

    pub(crate) fn transformation(message: impl Into<String>) -> Self {
        TreeError::TransformationPrecondition(message.into())
    }
}
