use thiserror::Error;

/// The main error type for Cobbler operations.
///
/// This enum represents every failure a public client operation can surface:
/// local input validation, uniqueness conflicts, missing remote records,
/// credential rejection, and transport-level failures. Transport errors are
/// propagated unchanged to the caller; the client never retries.
#[derive(Error, Debug)]
pub enum CobblerError {
    /// A required input was missing or malformed. Checked locally, before
    /// any mutating call is issued.
    #[error("Validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    /// A uniqueness constraint (system name, hostname, or MAC address)
    /// would be violated by the requested operation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The named system (or its mutation handle) does not exist on the
    /// server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the configured credentials.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A network or protocol failure reported by the RPC transport, not
    /// otherwise classified.
    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: TransportError,
    },
}

/// Specialized error type for validation failures.
///
/// Provides detailed context about why a validation failed, including
/// field-specific errors and format violations.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A validation failure for a specific named field.
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// A format/syntax violation.
    #[error("Format error: {0}")]
    Format(String),

    /// A violation of a domain constraint.
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Failures originating in the injected [`RpcTransport`] or in decoding
/// what it returned.
///
/// [`RpcTransport`]: crate::RpcTransport
#[derive(Error, Debug)]
pub enum TransportError {
    /// The transport could not reach the server or the connection broke
    /// mid-call.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with an XML-RPC fault.
    #[error("Server fault {code}: {message}")]
    Fault { code: i32, message: String },

    /// The call succeeded but the response value did not have the shape
    /// the caller required.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Type alias for Results that may fail with a CobblerError.
pub type CobblerResult<T> = Result<T, CobblerError>;
