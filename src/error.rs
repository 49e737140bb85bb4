// Error taxonomy for the whole crate. Four families matter to callers:
// validation failures (recoverable, re-prompt), remote failures (operation
// aborted, local mirror untouched), structural token failures (login fails
// closed) and invariant failures (index/id bookkeeping bugs, printed at the
// menu loop without killing the session).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A value object or entity constraint was violated. `reason` names the
    /// bound and the offending value.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The server answered with a non-success status.
    #[error("remote call failed ({status}): {detail}")]
    Remote { status: u16, detail: String },

    /// A bearer token did not have the expected compact structure.
    #[error("malformed token: {0}")]
    Token(String),

    /// An index fell outside the aggregate bounds.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// No remote id is recorded for a local index.
    #[error("no remote id recorded for index {0}")]
    UnmappedIndex(usize),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("console write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for failures the user can fix by retyping the input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field_and_reason() {
        let err = Error::validation("points", "must be between 1 and 5, got 9");
        assert_eq!(
            err.to_string(),
            "validation failed for points: must be between 1 and 5, got 9"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn remote_error_carries_status() {
        let err = Error::Remote {
            status: 403,
            detail: "forbidden".into(),
        };
        assert!(err.to_string().contains("403"));
        assert!(!err.is_validation());
    }
}
