use std::fmt;

use http::StatusCode;

/// Default cap on the number of chained errors rendered or captured
pub const MAX_CAUSE_DEPTH: usize = 100;

/// A node in the causal chain attached to a fault
///
/// Each node owns its own message and, optionally, the error that caused it.
/// The chain is a plain owned linked list, so it can never be cyclic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnderlyingError {
    message: String,
    cause: Option<Box<UnderlyingError>>,
}

impl UnderlyingError {
    /// Create an error with no cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Create an error caused by another error
    pub fn caused_by(message: impl Into<String>, cause: Self) -> Self {
        Self::new(message).with_cause(cause)
    }

    /// Attach (or replace) the cause of this error
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Capture a Rust error and its `source()` chain
    ///
    /// Each error contributes its `Display` text as the node message. At most
    /// [`MAX_CAUSE_DEPTH`] errors are captured, which also bounds a
    /// `source()` graph that loops back on itself.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let messages: Vec<String> = std::iter::successors(Some(error), |err| err.source())
            .take(MAX_CAUSE_DEPTH)
            .map(ToString::to_string)
            .collect();

        messages
            .into_iter()
            .rev()
            .fold(None, |cause: Option<Self>, message| {
                let node = Self::new(message);
                Some(match cause {
                    Some(cause) => node.with_cause(cause),
                    None => node,
                })
            })
            .unwrap_or_else(|| Self::new(error.to_string()))
    }

    /// The error's own message (may be empty)
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The next error in the chain, if any
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Iterate the chain from this error down to the innermost cause
    pub fn chain(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |err| err.cause())
    }

    /// Number of errors in the chain, counting this one
    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}

// Unlink iteratively so long chains don't recurse through `Box` drops
impl Drop for UnderlyingError {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(mut node) = next {
            next = node.cause.take();
        }
    }
}

impl fmt::Display for UnderlyingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UnderlyingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause().map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// A failed request, ready to be translated into a response
///
/// Built once by the handler that decides to fail and never mutated after.
/// The override message and the underlying error are independent: the
/// former feeds the `Warning` header, the latter feeds the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFault {
    status: StatusCode,
    message: Option<String>,
    cause: Option<UnderlyingError>,
}

impl ApplicationFault {
    /// Fault with a status code only
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            cause: None,
        }
    }

    /// Fault with a status code and an override message
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            cause: None,
        }
    }

    /// Fault with a status code, an underlying error, and an override message
    pub fn with_cause_and_message(status: StatusCode, cause: UnderlyingError, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
            cause: Some(cause),
        }
    }

    /// Fault with a status code and an underlying error but no override message
    pub fn with_cause(status: StatusCode, cause: UnderlyingError) -> Self {
        Self {
            status,
            message: None,
            cause: Some(cause),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Override message supplied by the raising code
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Underlying error chain, if one was supplied
    pub const fn cause(&self) -> Option<&UnderlyingError> {
        self.cause.as_ref()
    }
}

impl fmt::Display for ApplicationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.status),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApplicationFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
