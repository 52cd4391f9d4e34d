#![forbid(unsafe_code)]

//! Error type shared by every stickit crate.
//!
//! Binding work fails silently wherever the input is merely absent (no
//! matching element, missing path segment, unset `observe`). The variants
//! below cover programmer errors that the engine propagates untouched.

/// Result alias used throughout stickit.
pub type Result<T> = std::result::Result<T, StickitError>;

/// Errors surfaced by binding setup or by event-time callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StickitError {
    /// A configuration value referenced a view method that does not exist.
    MethodNotFound { method: String },
    /// An element was asked to read or write with a strategy it lacks.
    UnsupportedStrategy { strategy: String },
    /// `stickit` ran without an explicit model and the view has none.
    MissingModel { view: String },
    /// A declarative binding document could not be parsed.
    InvalidDeclaration { message: String },
    /// A user callback reported a failure.
    Callback { message: String },
}

impl StickitError {
    /// Shorthand for [`StickitError::MethodNotFound`].
    #[must_use]
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Shorthand for [`StickitError::UnsupportedStrategy`].
    #[must_use]
    pub fn unsupported_strategy(strategy: impl Into<String>) -> Self {
        Self::UnsupportedStrategy {
            strategy: strategy.into(),
        }
    }

    /// Shorthand for [`StickitError::Callback`].
    #[must_use]
    pub fn callback(message: impl Into<String>) -> Self {
        Self::Callback {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StickitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MethodNotFound { method } => write!(f, "view method not found: {method}"),
            Self::UnsupportedStrategy { strategy } => {
                write!(f, "element does not support the '{strategy}' strategy")
            }
            Self::MissingModel { view } => write!(f, "view {view} has no model to bind"),
            Self::InvalidDeclaration { message } => {
                write!(f, "invalid binding declaration: {message}")
            }
            Self::Callback { message } => write!(f, "binding callback failed: {message}"),
        }
    }
}

impl std::error::Error for StickitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_method() {
        let err = StickitError::method_not_found("formatName");
        assert_eq!(err.to_string(), "view method not found: formatName");
    }

    #[test]
    fn display_unsupported_strategy() {
        let err = StickitError::unsupported_strategy("outerHTML");
        assert!(err.to_string().contains("'outerHTML'"));
    }
}
