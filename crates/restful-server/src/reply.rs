use axum::Json;
use axum::response::{IntoResponse, Response};
use restful_core::{ApplicationFault, FaultResponse, FaultTranslator, HttpError};

/// Shared state handing out replies rendered with the configured translator
#[derive(Debug, Clone, Copy, Default)]
pub struct FaultState {
    pub translator: FaultTranslator,
}

impl FaultState {
    pub const fn new(translator: FaultTranslator) -> Self {
        Self { translator }
    }

    /// Wrap a fault for returning from a handler
    pub fn reply(&self, fault: ApplicationFault) -> FaultReply {
        FaultReply {
            fault,
            translator: self.translator,
        }
    }

    /// Raise a domain error as a reply
    pub fn reply_error<E: HttpError>(&self, error: &E) -> FaultReply {
        self.reply(error.to_fault())
    }
}

/// A fault returned from a handler
///
/// Renders through [`FaultTranslator`]: status, optional `Warning` header,
/// and a JSON entity only when the fault carries an underlying error.
#[derive(Debug)]
pub struct FaultReply {
    fault: ApplicationFault,
    translator: FaultTranslator,
}

impl From<ApplicationFault> for FaultReply {
    fn from(fault: ApplicationFault) -> Self {
        FaultState::default().reply(fault)
    }
}

impl IntoResponse for FaultReply {
    fn into_response(self) -> Response {
        let FaultResponse { status, headers, body } = self.translator.translate(&self.fault);

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), fault = %self.fault, has_body = body.is_some(), "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), fault = %self.fault, has_body = body.is_some(), "request rejected");
        }

        match body {
            Some(body) => (status, headers, Json(body)).into_response(),
            None => (status, headers).into_response(),
        }
    }
}
