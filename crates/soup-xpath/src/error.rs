//! Query errors

/// Errors raised while compiling or evaluating an XPath expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XPathError {
    #[error("syntax error at offset {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("unknown function: {0}()")]
    UnknownFunction(String),

    #[error("{name}() takes {expected} argument(s), {found} given")]
    Arity {
        name: String,
        expected: &'static str,
        found: usize,
    },

    #[error("expression does not evaluate to a node-set")]
    NotANodeSet,

    #[error("unsupported construct: {0}")]
    Unsupported(String),
}

impl XPathError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }
}

pub type Result<T> = std::result::Result<T, XPathError>;
