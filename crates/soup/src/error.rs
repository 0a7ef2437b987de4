//! Error types

use soup_xpath::XPathError;

/// Errors returned by searches and facade operations
#[derive(Debug, thiserror::Error)]
pub enum SoupError {
    /// The query engine returned a node that has no facade
    #[error("unknown node kind: {kind}")]
    UnknownNodeKind { kind: &'static str },

    #[error("{operation} is not supported on a {node} node")]
    UnsupportedOperation {
        operation: String,
        node: &'static str,
    },

    #[error("invalid filter combination: {0}")]
    InvalidFilterCombination(String),

    #[error("query rejected: {0}")]
    Query(#[from] XPathError),
}

pub type Result<T> = std::result::Result<T, SoupError>;
