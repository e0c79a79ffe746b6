//! Error types for the graph compiler

use thiserror::Error;

/// Result type alias using CompileError
pub type Result<T> = std::result::Result<T, CompileError>;

/// Error returned by a node's code generator callback
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync>;

/// Numeric error kinds, stable across releases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CompileErrorKind {
    BadParameter = 1,
    NoEntryNode = 2,
    AstBuildFailure = 3,
    IllegalCyclicCall = 4,
    NonSerializable = 5,
}

/// Errors that can occur while compiling a document
#[derive(Debug, Error)]
pub enum CompileError {
    /// Malformed graph or compile settings
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    /// A graph type that needs an entry node has none
    #[error("No entry node: {0}")]
    NoEntryNode(String),

    /// A node's generator failed while building its code
    #[error("Failed to generate node {node}: {source}")]
    AstBuildFailure {
        node: String,
        #[source]
        source: GeneratorError,
    },

    /// A node without context was reached again through a call cycle
    #[error("Attempting to cyclically call a node without context {0}")]
    IllegalCyclicCall(String),

    /// A literal value cannot be embedded in source text
    #[error("Value {0} is not serializable")]
    NonSerializable(String),
}

impl CompileError {
    /// Create a bad parameter error with a message
    pub fn bad_param(msg: impl Into<String>) -> Self {
        Self::BadParameter(msg.into())
    }

    /// Wrap a generator failure with the identity of the node being built
    pub fn ast_build(node: impl Into<String>, source: GeneratorError) -> Self {
        Self::AstBuildFailure {
            node: node.into(),
            source,
        }
    }

    pub fn kind(&self) -> CompileErrorKind {
        match self {
            Self::BadParameter(_) => CompileErrorKind::BadParameter,
            Self::NoEntryNode(_) => CompileErrorKind::NoEntryNode,
            Self::AstBuildFailure { .. } => CompileErrorKind::AstBuildFailure,
            Self::IllegalCyclicCall(_) => CompileErrorKind::IllegalCyclicCall,
            Self::NonSerializable(_) => CompileErrorKind::NonSerializable,
        }
    }

    /// Numeric code of the error kind
    pub fn code(&self) -> u32 {
        self.kind() as u32
    }
}
