//! Unified error types for the `tollgate` crate.
//!
//! This module centralizes all failures that can occur while using the SDK and
//! provides a single top-level [`Error`] enum plus the convenient [`Result`] alias.
//! Errors from lower layers (`reqwest`, URL parsing, token signing, and input
//! validation from `tollgate_common`) are mapped into structured variants so
//! callers can handle them precisely.

use thiserror::Error;
use tollgate_common::ValidationError;

// --- Build-Time Error ---

/// Errors that can occur while building a [`TollgateClient`](crate::TollgateClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// No API key was configured and no custom transport was supplied.
    #[error("An API key is required unless a custom transport is supplied")]
    MissingApiKey,

    /// A configured base URL could not be used.
    #[error("Invalid {name} URL `{url}`: {reason}")]
    InvalidUrl {
        /// Which setting held the URL (`api` or `purchase`).
        name: &'static str,
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The signing secret cannot be used to sign tokens.
    #[error("Invalid signing secret: {0}")]
    Signer(#[from] SigningError),

    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// --- The Main Operational Error Enum ---

/// The crate’s top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Validation`]: a permalink or pricing rule was violated
/// - [`Error::Request`]: HTTP transport/server/decoding issues
/// - [`Error::Parse`]: URL parsing failures
/// - [`Error::Signing`]: the purchase token could not be produced or checked
/// - [`Error::Build`]: construction of the client failed
///
/// Most lower-level errors automatically convert into this enum via `From`.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input broke a validation rule. Displayed exactly as the rule's message.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// HTTP request/response failed (transport, server, JSON).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// URL parsing failed while preparing a request or link.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Purchase token signing or verification failed.
    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    /// Building the client failed.
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

// --- Consolidated Request Error ---

/// Transport and server-side HTTP errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned a non-success status. Includes status and body message.
    #[error("Server responded with an error: {status} - {message}")]
    Server {
        /// The HTTP status code returned by the server.
        status: reqwest::StatusCode,
        /// Short description or the server response body captured for context.
        message: String,
    },

    /// Caller supplied an argument the API cannot accept (other than a validation rule).
    #[error("Invalid request: {message}")]
    Validation {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// JSON decoding failed when parsing a server response.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer (with context if available).
        message: String,
    },
}

impl RequestError {
    /// The HTTP status, when the server answered with an error.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            RequestError::Server { status, .. } => Some(*status),
            RequestError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

// --- Signing Error ---

/// Errors from producing or checking a signed purchase token.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The client has neither a signing secret nor a custom signer.
    #[error("No signing secret or signer configured")]
    NotConfigured,

    /// The signing secret is too short for HMAC-SHA256.
    #[error("Signing secret must be at least {min_len} bytes")]
    WeakSecret {
        /// Minimum length in bytes.
        min_len: usize,
    },

    /// The signer rejected the payload.
    #[error("Failed to sign purchase token: {0}")]
    Sign(String),

    /// The token is malformed, forged, or expired.
    #[error("Failed to verify purchase token: {0}")]
    Verify(String),
}

/// A specialized `Result` type for `tollgate` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

// Request Errors
impl_from_for_error!(reqwest::Error, Error::Request);
