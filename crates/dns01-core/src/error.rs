//! Error types for the DNS-01 solver
//!
//! Every fallible step returns one of these variants. Callers add operation
//! context with [`ResultExt::context`]; [`Error::kind`] looks through those
//! layers so the host can still match on the underlying failure.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS-01 solver
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid credentials / configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed challenge request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The provider has no zone matching the search term
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// The provider answered with an HTTP status >= 400
    #[error("Provider error: status {status}: {body}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Connection failure or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed response body
    #[error("Decode error: {0}")]
    Decode(String),

    /// The host signalled shutdown while the call was in flight
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// An error wrapped with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        /// What was being attempted
        context: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Flat classification of [`Error`], ignoring context layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    InvalidInput,
    ZoneNotFound,
    Provider,
    Transport,
    Decode,
    Cancelled,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a provider error from an HTTP status and body
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a cancellation error
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Wrap this error with a description of the failed operation
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Error::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Classify the root cause of this error
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Error::Config(_) => ErrorKind::Config,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::ZoneNotFound(_) => ErrorKind::ZoneNotFound,
            Error::Provider { .. } => ErrorKind::Provider,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Decode(_) => ErrorKind::Decode,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// HTTP status of the provider response, if the root cause carries one
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Error::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether re-invoking the operation later may succeed
    ///
    /// Transport failures, rate limiting (429) and provider 5xx responses are
    /// transient. Everything else needs a change in input or configuration.
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            Error::Transport(_) | Error::Cancelled(_) => true,
            Error::Provider { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

/// Adds operation context to fallible results
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `context`
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
