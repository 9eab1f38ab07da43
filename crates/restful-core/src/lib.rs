//! Fault translation for the Restful Objects API
//!
//! Request handlers raise an [`ApplicationFault`]; [`translate`] turns it into
//! the status, `Warning` header, and optional JSON body sent to the client.

#![allow(clippy::must_use_candidate)]

pub mod date;
mod error;
mod fault;
mod translate;

pub use error::HttpError;
pub use fault::{ApplicationFault, MAX_CAUSE_DEPTH, UnderlyingError};
pub use translate::{FaultBody, FaultResponse, FaultTranslator, PRODUCT_TOKEN, WARNING_CODE, translate};
