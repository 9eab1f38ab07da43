use http::StatusCode;

use crate::fault::{ApplicationFault, UnderlyingError};

/// Trait for domain errors that can be raised as request faults
///
/// Implemented by the error types of request handlers. The server layer
/// turns the resulting [`ApplicationFault`] into a response, keeping domain
/// errors decoupled from axum.
pub trait HttpError: std::error::Error + 'static {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Short message for the `Warning` header, `None` to omit the header
    fn warning_message(&self) -> Option<String> {
        Some(self.to_string())
    }

    /// Raise this error as a fault
    ///
    /// The error and its `source()` chain become the fault's underlying
    /// error, so the body describes them even when no warning is emitted.
    fn to_fault(&self) -> ApplicationFault
    where
        Self: Sized,
    {
        let cause = UnderlyingError::from_error(self);
        match self.warning_message() {
            Some(message) => ApplicationFault::with_cause_and_message(self.status_code(), cause, message),
            None => ApplicationFault::with_cause(self.status_code(), cause),
        }
    }
}
