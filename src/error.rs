//! Error types.
//!
//! Errors only ever surface while *building* an iterator (a permutation, a
//! sample configuration). Iteration itself never fails.

use thiserror::Error;

/// Errors returned by the builders in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A runtime condition made the construction impossible.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// A parameter had a forbidden value (size larger than the population,
    /// malformed range, position outside the population, ...).
    #[error("bad parameter value: {0}")]
    BadParameterValue(String),
}

impl Error {
    pub(crate) fn bad_parameter(message: impl Into<String>) -> Self {
        Self::BadParameterValue(message.into())
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_kind() {
        let err = Error::bad_parameter("size 5 > 3");
        assert_eq!(err.to_string(), "bad parameter value: size 5 > 3");
        let err = Error::runtime("weight is NaN");
        assert_eq!(err.to_string(), "runtime error: weight is NaN");
    }
}
