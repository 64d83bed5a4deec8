//! Unified error type for a full dispatch attempt.
//!
//! Each phase keeps its own typed error; this umbrella lets callers of
//! the [`dispatch`](crate::dispatch) facade match on the failing phase
//! while still drilling into the specific failure.

use thiserror::Error;

use crate::bind::BindError;
use crate::input::TokenizeError;
use crate::router::RouteError;

/// Errors from the tokenize → route → bind pipeline.
///
/// All variants are terminal for a single invocation; nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The raw token stream failed to tokenize.
    #[error("tokenization failed: {0}")]
    Tokenize(#[from] TokenizeError),

    /// No registered command matches the input.
    #[error("routing failed: {0}")]
    Route(#[from] RouteError),

    /// The routed command's members failed to bind.
    #[error("binding failed: {0}")]
    Bind(#[from] BindError),
}

/// Convenience alias for results with [`DispatchError`].
pub type Result<T> = std::result::Result<T, DispatchError>;
