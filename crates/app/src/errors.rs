//! Error taxonomy shared by every service.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;

/// Stable classification of a service failure, independent of which service
/// produced it. Transports map these onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input or a violated business rule.
    BadRequest,

    /// A referenced entity does not exist.
    NotFound,

    /// The caller is known but not allowed to act.
    Forbidden,

    /// The caller could not be identified.
    Unauthorized,

    /// An unexpected collaborator failure.
    InternalServer,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::InternalServer => "internal_server",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Implemented by every service error so callers can react to the kind of
/// failure without matching on each service's variants.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// User-facing rendering of a failure: a stable kind and a readable message,
/// nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorBody {
    pub fn from_error<E: Classify + Display>(error: &E) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}
