//! Common types and utilities shared across the promo crates.
//!
//! This crate defines the error taxonomy and the observability helpers used by
//! every other crate in the workspace. It is intentionally lightweight so the
//! HTTP, social, and config crates can depend on it without dragging in the
//! binary's runtime.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PromoError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! Every failure is fatal, but callers can still tell the classes apart:
//!
//! ```rust
//! use promo_common::PromoError;
//!
//! let err = PromoError::Transport { status: Some(503), message: "busy".into() };
//! assert_eq!(err.status(), Some(503));
//! assert_eq!(err.to_string(), "transport error (status 503): busy");
//! ```

pub mod observability;

/// Error types used across the promo workspace.
#[derive(thiserror::Error, Debug)]
pub enum PromoError {
    /// Flags, the comment file, or the token were unusable. Raised before any
    /// network activity.
    #[error("startup error: {0}")]
    Startup(String),

    /// Connection failure or a response whose status was not 200.
    #[error("transport error{}: {message}", fmt_status(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("decode error: {0}")]
    Decode(String),
}

impl PromoError {
    /// HTTP status attached to a transport failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

/// Convenient alias for results that use [`PromoError`].
pub type Result<T> = std::result::Result<T, PromoError>;
