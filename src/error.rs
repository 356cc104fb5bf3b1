//! Hard failures that abort matching.
//!
//! An ordinary "did not match" is never an [`Error`]; it is `Ok(None)`.

use thiserror::Error;

use crate::pattern::PatternRef;
use crate::reader::StreamError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error("pattern {0} was declared but never defined")]
    UndefinedPattern(PatternRef),
    #[error("pattern {0} does not belong to this grammar")]
    UnknownPattern(PatternRef),
    #[error("pattern {0} is already defined")]
    AlreadyDefined(PatternRef),
}
