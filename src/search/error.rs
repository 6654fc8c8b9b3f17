//! Error type for search requests.

use std::fmt;

use crate::evaluation::EvaluationError;

/// Why a search produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The root position has no legal moves; the game is already over.
    NoLegalMoves,
    /// No depth completed before the time budget ran out, the search was
    /// cancelled, or the depth limit was zero.
    Exhausted,
    /// The evaluator failed; the search was abandoned.
    Evaluator(EvaluationError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoLegalMoves => write!(f, "Position has no legal moves"),
            SearchError::Exhausted => {
                write!(f, "Search stopped before completing a single depth")
            }
            SearchError::Evaluator(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Evaluator(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvaluationError> for SearchError {
    fn from(err: EvaluationError) -> Self {
        SearchError::Evaluator(err)
    }
}
