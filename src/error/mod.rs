//! Error types.
//!
//! Only two conditions are recoverable: the input could not be read, or the
//! filter chain matched nothing. Rendering a malformed tree is a programming
//! error and panics instead (see [`crate::serial::encode_html`]).

use std::io;

/// The error type returned by [`crate::parse`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No node satisfied the filter chain.
    #[error("no match")]
    NoMatch,
    /// Reading the input failed. The reader's error is passed through
    /// unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true if this is [`Error::NoMatch`].
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch)
    }
}

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
