//! Error types for the debug runner and runtime

use thiserror::Error;

/// Result type alias using DebuggerError
pub type Result<T> = std::result::Result<T, DebuggerError>;

/// Errors returned to the session owner
#[derive(Debug, Error)]
pub enum DebuggerError {
    /// The realm rejected the program text
    #[error("Failed to load program: {0}")]
    Load(String),
}

/// A failure raised inside the running program
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A node's code threw
    #[error("Node {node} failed: {message}")]
    Node { node: String, message: String },

    /// A temp slot was read before being written
    #[error("Temp '{0}' read before it was written")]
    MissingTemp(String),

    #[error("{0}")]
    Other(String),
}

impl RuntimeError {
    pub fn node(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Node {
            node: node.into(),
            message: message.into(),
        }
    }
}
