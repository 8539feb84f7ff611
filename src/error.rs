use thiserror::Error;

/// Failure kinds surfaced at the recognition / overlay boundary.
///
/// None of these are allowed to crash the UI loop: they are routed to the
/// log and the run that produced them is abandoned, leaving the surface,
/// variable bindings and overlay queue untouched.
#[derive(Error, Debug)]
pub enum CalcError {
    /// No recognition endpoint configured at submit time.
    #[error("recognition endpoint is not configured (set {})", crate::recognition::API_URL_ENV)]
    Configuration,
    /// The request failed to reach the service or came back non-2xx.
    #[error("recognition request failed: {0}")]
    Network(String),
    /// The payload did not match the wire protocol in either direction.
    #[error("wire protocol mismatch: {0}")]
    Protocol(String),
    /// The display sink could not typeset a markup string.
    #[error("failed to typeset markup: {0}")]
    Render(String),
}
