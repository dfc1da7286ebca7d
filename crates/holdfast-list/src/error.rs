//! List decoding errors.

use std::error::Error;
use std::fmt;

/// Failure to decode a list from its textual external form.
///
/// Every other list operation is total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListError {
    /// The text is not valid JSON.
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "malformed list external form: {reason}"),
        }
    }
}

impl Error for ListError {}

impl From<serde_json::Error> for ListError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed {
            reason: error.to_string(),
        }
    }
}
