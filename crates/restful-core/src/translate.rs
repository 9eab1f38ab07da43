use http::header::{self, HeaderMap, HeaderValue};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::fault::{ApplicationFault, MAX_CAUSE_DEPTH, UnderlyingError};

/// Warn-code used for the diagnostic header (RFC 7234 "miscellaneous warning")
pub const WARNING_CODE: u16 = 199;

/// Agent token identifying this API in the diagnostic header
pub const PRODUCT_TOKEN: &str = "RestfulObjects";

/// JSON entity describing an underlying error and its causes
///
/// Serializes as `{ "message": ..., "causedBy"?: { ... } }`; `causedBy` is
/// omitted entirely for the innermost error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultBody {
    pub message: String,
    #[serde(rename = "causedBy", default, skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Box<FaultBody>>,
}

impl FaultBody {
    /// Number of nested levels, counting this one
    pub fn depth(&self) -> usize {
        std::iter::successors(Some(self), |body| body.caused_by.as_deref()).count()
    }
}

/// Wire-level rendering of a fault
#[derive(Debug, Clone, PartialEq)]
pub struct FaultResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<FaultBody>,
}

impl FaultResponse {
    /// Value of the diagnostic `Warning` header, if emitted
    ///
    /// Non-ASCII messages are decoded as UTF-8. Returns `None` only when the
    /// header has been replaced with bytes that are not valid UTF-8.
    pub fn warning(&self) -> Option<&str> {
        self.headers
            .get(header::WARNING)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
    }
}

/// Maps faults to responses
///
/// Holds only the rendering cap, so a translator is `Copy` and can be shared
/// freely between request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultTranslator {
    max_cause_depth: usize,
}

impl Default for FaultTranslator {
    fn default() -> Self {
        Self::new(MAX_CAUSE_DEPTH)
    }
}

impl FaultTranslator {
    /// Create a translator rendering at most `max_cause_depth` errors per body
    ///
    /// A cap of zero is treated as one: a supplied underlying error is always
    /// rendered.
    pub const fn new(max_cause_depth: usize) -> Self {
        Self {
            max_cause_depth: if max_cause_depth == 0 { 1 } else { max_cause_depth },
        }
    }

    pub const fn max_cause_depth(&self) -> usize {
        self.max_cause_depth
    }

    /// Translate a fault into its response
    ///
    /// The status is always the fault's status. The `Warning` header comes
    /// only from the override message and the body only from the underlying
    /// error; neither affects whether the other is present.
    pub fn translate(&self, fault: &ApplicationFault) -> FaultResponse {
        let mut headers = HeaderMap::new();

        if let Some(message) = fault.message().filter(|message| !message.is_empty())
            && let Some(value) = warning_value(message)
        {
            headers.insert(header::WARNING, value);
        }

        let body = fault.cause().map(|cause| body_for(cause, self.max_cause_depth));

        FaultResponse {
            status: fault.status(),
            headers,
            body,
        }
    }
}

/// Translate with the default cause-depth cap
pub fn translate(fault: &ApplicationFault) -> FaultResponse {
    FaultTranslator::default().translate(fault)
}

/// Build `"199 RestfulObjects <message>"`
///
/// Control characters cannot appear in a field value, so each one is
/// replaced by a space. Bytes above 0x7f pass through as `obs-text`.
fn warning_value(message: &str) -> Option<HeaderValue> {
    let text = format!("{WARNING_CODE} {PRODUCT_TOKEN} {message}");
    let bytes: Vec<u8> = text
        .bytes()
        .map(|b| if (b < b' ' && b != b'\t') || b == 0x7f { b' ' } else { b })
        .collect();

    HeaderValue::from_bytes(&bytes).ok()
}

/// `remaining` counts the levels still allowed, including this one
fn body_for(error: &UnderlyingError, remaining: usize) -> FaultBody {
    let caused_by = match error.cause() {
        Some(cause) if remaining > 1 => Some(Box::new(body_for(cause, remaining - 1))),
        _ => None,
    };

    FaultBody {
        message: error.message().to_owned(),
        caused_by,
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use serde_json::json;

    use super::*;

    fn chain_of(depth: usize) -> UnderlyingError {
        (1..depth).fold(UnderlyingError::new("level 0"), |cause, level| {
            UnderlyingError::caused_by(format!("level {level}"), cause)
        })
    }

    #[test]
    fn bare_fault_sets_status_only() {
        for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            let response = translate(&ApplicationFault::new(status));

            assert_eq!(response.status, status);
            assert!(response.headers.get(header::WARNING).is_none());
            assert!(response.body.is_none());
        }
    }

    #[test]
    fn message_only_sets_warning_without_body() {
        let fault = ApplicationFault::with_message(StatusCode::BAD_REQUEST, "foobar");
        let response = translate(&fault);

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.warning(), Some("199 RestfulObjects foobar"));
        assert!(response.body.is_none());
    }

    #[test]
    fn empty_message_emits_no_warning() {
        let response = translate(&ApplicationFault::with_message(StatusCode::BAD_REQUEST, ""));

        assert!(response.headers.is_empty());
        assert!(response.body.is_none());
    }

    #[test]
    fn cause_without_nested_cause() {
        let fault =
            ApplicationFault::with_cause_and_message(StatusCode::BAD_REQUEST, UnderlyingError::new("barfoo"), "foobar");
        let response = translate(&fault);

        assert_eq!(response.warning(), Some("199 RestfulObjects foobar"));

        let body = serde_json::to_string(&response.body).unwrap();
        assert_eq!(body, r#"{"message":"barfoo"}"#);
    }

    #[test]
    fn cause_with_nested_cause() {
        let cause = UnderlyingError::caused_by("barfoo", UnderlyingError::new("bozfoz"));
        let fault = ApplicationFault::with_cause_and_message(StatusCode::BAD_REQUEST, cause, "foobar");
        let response = translate(&fault);

        let body = response.body.expect("body present");
        assert_eq!(body.message, "barfoo");

        let caused_by = body.caused_by.as_deref().expect("causedBy present");
        assert_eq!(caused_by.message, "bozfoz");
        assert!(caused_by.caused_by.is_none());

        let rendered = serde_json::to_string_pretty(&body).unwrap();
        assert_eq!(
            rendered,
            indoc! {r#"
                {
                  "message": "barfoo",
                  "causedBy": {
                    "message": "bozfoz"
                  }
                }"#}
        );
    }

    #[test]
    fn cause_without_message_sets_body_only() {
        let fault = ApplicationFault::with_cause(StatusCode::CONFLICT, UnderlyingError::new("version mismatch"));
        let response = translate(&fault);

        assert!(response.warning().is_none());
        assert_eq!(
            serde_json::to_value(&response.body).unwrap(),
            json!({ "message": "version mismatch" })
        );
    }

    #[test]
    fn empty_error_message_is_kept_as_empty_string() {
        let fault = ApplicationFault::with_cause(StatusCode::INTERNAL_SERVER_ERROR, UnderlyingError::new(""));
        let response = translate(&fault);

        assert_eq!(serde_json::to_value(&response.body).unwrap(), json!({ "message": "" }));
    }

    #[test]
    fn header_and_body_draw_from_different_messages() {
        let fault = ApplicationFault::with_cause_and_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            UnderlyingError::new("column 'name' is null"),
            "name is mandatory",
        );
        let response = translate(&fault);

        assert_eq!(response.warning(), Some("199 RestfulObjects name is mandatory"));
        assert_eq!(response.body.map(|body| body.message).as_deref(), Some("column 'name' is null"));
    }

    #[test]
    fn translation_is_repeatable() {
        let fault = ApplicationFault::with_cause_and_message(StatusCode::BAD_REQUEST, chain_of(4), "foobar");

        assert_eq!(translate(&fault), translate(&fault));
    }

    #[test]
    fn chain_depth_is_preserved() {
        for depth in [1, 2, 5, 50, MAX_CAUSE_DEPTH] {
            let fault = ApplicationFault::with_cause(StatusCode::BAD_REQUEST, chain_of(depth));
            let body = translate(&fault).body.unwrap();

            assert_eq!(body.depth(), depth);
            assert_eq!(body.message, format!("level {}", depth - 1));

            let innermost = std::iter::successors(Some(&body), |b| b.caused_by.as_deref()).last().unwrap();
            assert_eq!(innermost.message, "level 0");
        }
    }

    #[test]
    fn chain_beyond_cap_is_truncated() {
        let fault = ApplicationFault::with_cause(StatusCode::BAD_REQUEST, chain_of(MAX_CAUSE_DEPTH + 25));
        assert_eq!(translate(&fault).body.unwrap().depth(), MAX_CAUSE_DEPTH);

        let shallow = FaultTranslator::new(3).translate(&fault);
        assert_eq!(shallow.body.unwrap().depth(), 3);
    }

    #[test]
    fn zero_cap_still_renders_outermost_error() {
        let fault = ApplicationFault::with_cause(StatusCode::BAD_REQUEST, chain_of(3));
        let body = FaultTranslator::new(0).translate(&fault).body.unwrap();

        assert_eq!(body.depth(), 1);
        assert_eq!(body.message, "level 2");
    }

    #[test]
    fn control_characters_in_message_become_spaces() {
        let fault = ApplicationFault::with_message(StatusCode::BAD_REQUEST, "bad\r\nInjected: yes");
        let response = translate(&fault);

        assert_eq!(response.warning(), Some("199 RestfulObjects bad  Injected: yes"));
    }

    #[test]
    fn non_ascii_message_is_carried_as_bytes() {
        let fault = ApplicationFault::with_message(StatusCode::BAD_REQUEST, "ungültig");
        let response = translate(&fault);

        let value = response.headers.get(header::WARNING).unwrap();
        assert_eq!(value.as_bytes(), "199 RestfulObjects ungültig".as_bytes());
        assert!(value.to_str().is_err());
        assert_eq!(response.warning(), Some("199 RestfulObjects ungültig"));
    }

    #[test]
    fn body_round_trips_through_json() {
        let body: FaultBody = serde_json::from_value(json!({
            "message": "barfoo",
            "causedBy": { "message": "bozfoz" }
        }))
        .unwrap();

        assert_eq!(body.depth(), 2);
    }
}
