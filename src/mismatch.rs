//! Mismatch diagnostics and the loggers that receive them.
//!
//! Mismatches are only recorded for patterns built with logging enabled. They
//! describe why a pattern failed; they never influence matching itself.

use std::fmt::Debug;

use thiserror::Error;

use crate::match_result::Match;

/// Why a pattern failed to match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("sub pattern failed to match")]
    SubPatternFailed,
    #[error("no alternative matched")]
    NoAlternative,
    #[error("expected minimum of {expected} repetitions, found {found}")]
    TooFewRepetitions { expected: usize, found: usize },
    #[error("excepted pattern matched")]
    ExceptionMatched,
    #[error("expected end of input")]
    NotAtEnd,
}

/// A record of a failed match attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch<T, P> {
    pub id: String,
    pub begin: P,
    pub end: P,
    /// The child attempt that caused the failure (concatenations), or the
    /// match that must not occur (exceptions).
    pub sub_mismatch: Option<Match<T, P>>,
    /// Children that did match before the failure.
    pub sub_matches: Vec<Match<T, P>>,
    pub error: Option<MismatchReason>,
}

impl<T, P> Mismatch<T, P> {
    pub fn new(id: &str, begin: P, end: P, error: MismatchReason) -> Self {
        Self {
            id: id.to_string(),
            begin,
            end,
            sub_mismatch: None,
            sub_matches: Vec::new(),
            error: Some(error),
        }
    }

    pub fn with_sub_mismatch(mut self, sub: Match<T, P>) -> Self {
        self.sub_mismatch = Some(sub);
        self
    }

    pub fn with_sub_matches(mut self, matches: Vec<Match<T, P>>) -> Self {
        self.sub_matches = matches;
        self
    }
}

/// Receives mismatches from patterns that have logging enabled.
pub trait Logger<T, P> {
    fn log_mismatch(&mut self, mismatch: Mismatch<T, P>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidLogger;

impl<T, P> Logger<T, P> for VoidLogger {
    fn log_mismatch(&mut self, _mismatch: Mismatch<T, P>) {}
}

/// Keeps every mismatch, in the order they were reported.
#[derive(Debug, Clone)]
pub struct StackLogger<T, P> {
    pub mismatches: Vec<Mismatch<T, P>>,
}

impl<T, P> Default for StackLogger<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> StackLogger<T, P> {
    pub fn new() -> Self {
        Self {
            mismatches: Vec::new(),
        }
    }

    /// The mismatch that got furthest into the input.
    ///
    /// Usually the most useful one to show a user.
    pub fn furthest(&self) -> Option<&Mismatch<T, P>>
    where
        P: Ord,
    {
        // max_by returns the last of equal maxima, so iterate in reverse
        self.mismatches
            .iter()
            .rev()
            .max_by(|a, b| a.end.cmp(&b.end))
    }
}

impl<T, P> Logger<T, P> for StackLogger<T, P> {
    fn log_mismatch(&mut self, mismatch: Mismatch<T, P>) {
        self.mismatches.push(mismatch);
    }
}

/// Forwards mismatches to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLogger;

impl<T, P: Debug> Logger<T, P> for LogLogger {
    fn log_mismatch(&mut self, mismatch: Mismatch<T, P>) {
        let name = if mismatch.id.is_empty() {
            "<anonymous>"
        } else {
            mismatch.id.as_str()
        };
        match &mismatch.error {
            Some(reason) => log::debug!(
                "mismatch {name} at {:?}..{:?}: {reason}",
                mismatch.begin,
                mismatch.end
            ),
            None => log::debug!(
                "mismatch {name} at {:?}..{:?}",
                mismatch.begin,
                mismatch.end
            ),
        }
    }
}
