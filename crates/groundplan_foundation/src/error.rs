//! Error types for the Groundplan system.
//!
//! Uses `thiserror` for ergonomic error definition. Every parse-time
//! violation aborts the parse of the whole file; evaluation-time conditions
//! (fact not found, action not applicable) are reported through return
//! values, not through this type.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Groundplan operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Unbalanced parentheses or a malformed top-level form.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A type, predicate, action, object, or fact declared twice where
    /// uniqueness is required.
    #[error("duplicate declaration of {kind} `{name}`")]
    DuplicateDeclaration {
        /// What kind of declaration collided (`type`, `predicate`, ...).
        kind: &'static str,
        /// The colliding name.
        name: String,
    },

    /// A name used but not found in the current scope or catalogue.
    #[error("unknown {kind} `{name}`")]
    UnknownReference {
        /// What kind of name failed to resolve.
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// Predicate argument count mismatch, including declarations that
    /// accumulate more than the maximum number of argument slots.
    #[error("predicate `{predicate}` expects {expected} arguments, got {actual}")]
    ArityMismatch {
        /// The predicate whose arity was violated.
        predicate: String,
        /// The declared argument count.
        expected: usize,
        /// The argument count actually supplied.
        actual: usize,
    },

    /// An argument's bound type is not a subtype of the declared slot type.
    #[error("argument `{argument}` of type `{actual}` is not within type `{expected}`")]
    TypeMismatch {
        /// The offending argument name.
        argument: String,
        /// The type the predicate slot declares.
        expected: String,
        /// The type the argument actually carries.
        actual: String,
    },

    /// A malformed variable or type token, e.g. `-` glued onto a variable.
    #[error("malformed token `{token}`: {reason}")]
    MalformedToken {
        /// The offending token text.
        token: String,
        /// Why it is malformed.
        reason: String,
    },

    /// A logical keyword other than and/or/not/forall where a proposition
    /// was expected, or a construct the grammar deliberately rejects.
    #[error("proposition `{0}` is not supported")]
    UnsupportedConstruct(String),

    /// A grounded-action invocation is missing a binding for a declared
    /// template parameter, or a symbolic reference has no binding.
    #[error("no binding for parameter `{0}`")]
    MissingBinding(String),

    /// A problem file names a domain other than the one it was parsed
    /// against.
    #[error("problem file names domain `{found}`, expected `{expected}`")]
    DomainMismatch {
        /// The domain the problem was parsed against.
        expected: String,
        /// The domain the problem file names.
        found: String,
    },
}

impl Error {
    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }

    /// Creates a duplicate-declaration error.
    #[must_use]
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        Self::DuplicateDeclaration {
            kind,
            name: name.into(),
        }
    }

    /// Creates an unknown-reference error.
    #[must_use]
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownReference {
            kind,
            name: name.into(),
        }
    }

    /// Creates an arity-mismatch error.
    #[must_use]
    pub fn arity(predicate: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            predicate: predicate.into(),
            expected,
            actual,
        }
    }

    /// Creates a malformed-token error.
    #[must_use]
    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported-construct error.
    #[must_use]
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::UnsupportedConstruct(construct.into())
    }
}
