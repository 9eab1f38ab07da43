use axum::extract::State;
use http::{Method, StatusCode, Uri};
use restful_core::{ApplicationFault, HttpError};

use crate::reply::{FaultReply, FaultState};

/// Requests the router itself cannot serve
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No route matches the request path
    #[error("no resource at {path}")]
    NotFound { path: String },

    /// A route matches the path but not the method
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: Method, path: String },
}

impl HttpError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    // Routing failures have no underlying error worth a body
    fn to_fault(&self) -> ApplicationFault {
        match self.warning_message() {
            Some(message) => ApplicationFault::with_message(self.status_code(), message),
            None => ApplicationFault::new(self.status_code()),
        }
    }
}

pub async fn not_found(State(state): State<FaultState>, uri: Uri) -> FaultReply {
    state.reply_error(&ServerError::NotFound {
        path: uri.path().to_owned(),
    })
}

pub async fn method_not_allowed(State(state): State<FaultState>, method: Method, uri: Uri) -> FaultReply {
    state.reply_error(&ServerError::MethodNotAllowed {
        method,
        path: uri.path().to_owned(),
    })
}
