/// An opaque authentication token returned by the server's `login` call.
///
/// Tokens are not cached: each public client operation logs in again, so a
/// token's lifetime is exactly one operation's RPC sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An opaque handle identifying a system for mutation, returned by
/// `get_system_handle`.
///
/// Distinct from the system's `name`: handles are re-fetched for every
/// mutating operation and never reused across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemHandle(String);

impl SystemHandle {
    pub(crate) fn new(handle: String) -> Self {
        Self(handle)
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
