//! Analysis error reporting.
//!
//! There is no recoverable-error taxonomy here. An `AnalysisError` always
//! means the calling pass handed the analysis something malformed (an
//! ill-typed projection path, a non-prefix subtraction) or the analysis's own
//! bookkeeping broke. Both are internal-consistency failures against
//! well-formed IR, never expected user-facing conditions.
//!
//! An untraceable base is deliberately *not* an error: trace-to-base degrades
//! to an opaque base with an empty path, which downstream consumers must
//! treat as may-aliasing everything sharing that base.

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Keys for structured error metadata, attached to help pass authors pin
/// down which analysis step and inputs produced an inconsistency.
#[derive(Debug, Eq, Hash, PartialEq)]
pub enum ErrorMetaDataKey {
    AnalysisStage,
    PrimarySuggestion,
    ExpectedType,
    FoundType,
}

/// The two ways this analysis can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input from the calling pass: an operation's documented
    /// precondition was violated (e.g. concatenating type-incompatible
    /// paths). Signals a bug in the caller, not in the analyzed program.
    Precondition,

    /// The analysis's own invariants broke (internal bug).
    Internal,
}

#[derive(Debug)]
pub struct AnalysisError {
    pub msg: String,
    pub kind: ErrorKind,

    // Structured detail for more useful failure reports from passes
    pub metadata: HashMap<ErrorMetaDataKey, &'static str>,
}

impl AnalysisError {
    pub fn new(msg: impl Into<String>, kind: ErrorKind) -> AnalysisError {
        AnalysisError {
            msg: msg.into(),
            kind,
            metadata: HashMap::new(),
        }
    }

    /// Create a precondition-violation error (caller bug).
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Precondition)
    }

    /// Create an internal-inconsistency error (analysis bug).
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(msg, ErrorKind::Internal)
    }

    pub fn new_metadata_entry(&mut self, key: ErrorMetaDataKey, value: &'static str) {
        self.metadata.insert(key, value);
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.kind {
            ErrorKind::Precondition => write!(f, "precondition violated: {}", self.msg),
            ErrorKind::Internal => write!(f, "internal analysis error: {}", self.msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Returns a new AnalysisError for a violated caller precondition.
///
/// Usage:
/// `return_precondition_error!("subtract_paths: {:?} is not a prefix", prefix)`;
/// `return_precondition_error!("message" ; { AnalysisStage => "reduce" })`;
#[macro_export]
macro_rules! return_precondition_error {
    // Format string with arguments and metadata (semicolon separator)
    ($fmt:expr, $($arg:expr),+ ; { $( $key:ident => $value:expr ),* $(,)? }) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: format!($fmt, $($arg),+),
            kind: $crate::diagnostics::ErrorKind::Precondition,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::diagnostics::ErrorMetaDataKey::$key, $value); )*
                map
            },
        });
    }};
    // Format string with arguments
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: format!($fmt, $($arg),+),
            kind: $crate::diagnostics::ErrorKind::Precondition,
            metadata: std::collections::HashMap::new(),
        });
    }};
    // Message and metadata (semicolon separator)
    ($msg:expr ; { $( $key:ident => $value:expr ),* $(,)? }) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: $msg.into(),
            kind: $crate::diagnostics::ErrorKind::Precondition,
            metadata: {
                let mut map = std::collections::HashMap::new();
                $( map.insert($crate::diagnostics::ErrorMetaDataKey::$key, $value); )*
                map
            },
        });
    }};
    // Just a message
    ($msg:expr) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: $msg.into(),
            kind: $crate::diagnostics::ErrorKind::Precondition,
            metadata: std::collections::HashMap::new(),
        });
    }};
}

/// Returns a new AnalysisError for a broken internal invariant.
///
/// These indicate bugs in the analysis itself, not in the calling pass.
#[macro_export]
macro_rules! return_internal_error {
    ($fmt:expr, $($arg:expr),+ $(,)?) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: format!($fmt, $($arg),+),
            kind: $crate::diagnostics::ErrorKind::Internal,
            metadata: std::collections::HashMap::new(),
        });
    }};
    ($msg:expr) => {{
        return Err($crate::diagnostics::AnalysisError {
            msg: $msg.into(),
            kind: $crate::diagnostics::ErrorKind::Internal,
            metadata: std::collections::HashMap::new(),
        });
    }};
}
