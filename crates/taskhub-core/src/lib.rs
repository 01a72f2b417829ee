#![allow(clippy::must_use_candidate)]

//! Core types shared across taskhub crates
//!
//! Holds the error taxonomy and the per-request context. Deliberately free
//! of any axum dependency so feature crates stay decoupled from the HTTP
//! framework.

mod context;
mod error;

pub use context::{AuthUser, RequestContext};
pub use error::{AppError, ErrorBody, ErrorKind, ErrorResponse, Violation};
