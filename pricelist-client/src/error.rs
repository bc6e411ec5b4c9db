use thiserror::Error;

/// Why a fetch did not produce data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never got a response
    #[error("Failed to fetch: {0}")]
    Transport(String),
    /// A response arrived with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The body was not the expected JSON
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Map a raw error string to something a user can act on.
/// Unrecognised messages are returned as-is.
pub fn readable_message(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    let readable = if has(&["failed to fetch", "network error", "network request failed"]) {
        "Could not connect to the server. Check your internet connection."
    } else if has(&["404", "not found"]) {
        "The requested resource was not found."
    } else if has(&["500", "internal server error"]) {
        "Internal server error. Please try again later."
    } else if has(&["timeout", "timed out"]) {
        "The server took too long to respond."
    } else if has(&["400", "bad request"]) {
        "Bad request."
    } else if has(&["401", "unauthorized"]) {
        "Authorization error."
    } else if has(&["403", "forbidden"]) {
        "Access denied."
    } else {
        return raw.to_string();
    };

    readable.to_string()
}
