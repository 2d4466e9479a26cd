//! Error types for network construction and propagation

use thiserror::Error;

/// Result type alias for HBEN operations.
pub type Result<T> = std::result::Result<T, HbenError>;

/// Errors raised by structural operations on the network.
///
/// Every variant is raised before the graph is touched, so a failed call
/// leaves the network exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HbenError {
    /// A node with this name is already in the graph
    #[error("Node {0} already exists in the graph")]
    DuplicateNode(String),

    /// The (parent, child) edge is already in the graph
    #[error("Edge from {parent} to {child} already exists")]
    DuplicateEdge {
        /// Parent node name
        parent: String,
        /// Child node name
        child: String,
    },

    /// A referenced node is not in the graph
    #[error("Node {0} does not exist")]
    MissingNode(String),

    /// Adding the edge would close a loop
    #[error("Adding edge from {parent} to {child} would create a cycle")]
    Cycle {
        /// Parent node name
        parent: String,
        /// Child node name
        child: String,
    },

    /// Invalid argument (non-finite confidence, bad weight, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
