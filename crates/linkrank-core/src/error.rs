use crate::graph::NodeId;

/// Errors raised by [`GraphStore`](crate::graph::GraphStore) mutations.
///
/// Neither variant is fatal: callers are expected to drop the rejected edge
/// and carry on with the graph unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// One endpoint of a requested edge does not exist.
    #[error("page {missing} does not exist (link {from} -> {to})")]
    InvalidReference {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },
    /// The `(source, target)` pair is already linked.
    #[error("link {from} -> {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },
}

impl GraphError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } => "E2001",
            Self::DuplicateEdge { .. } => "E2002",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidReference { .. } => Some("Create both pages before linking them."),
            Self::DuplicateEdge { .. } => None,
        }
    }
}
