use thiserror::Error;

/// Errors returned by the key generation engine.
///
/// Every variant is returned before any output is produced; a failing batch
/// yields no keys at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyGenError {
    /// An option was supplied that the selected method does not use.
    #[error("{option} is not supported for {method} method")]
    ConstraintViolation {
        option: &'static str,
        method: &'static str,
    },

    /// The method tag is unknown or has no strategy behind it.
    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    /// The secure random source could not fill the requested bytes.
    #[error("entropy source failure: {0}")]
    EntropySource(String),
}

pub type Result<T> = std::result::Result<T, KeyGenError>;
