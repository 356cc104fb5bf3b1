//! The token source contract consumed by every pattern.
//!
//! A [`Reader`] is a random-access cursor over a stream of tokens. Patterns
//! read through it, save its position before speculative attempts and restore
//! that position when an attempt fails.

use std::cell::Cell;
use std::fmt::Debug;
use std::rc::Rc;

use thiserror::Error;

/// A failure of the underlying stream.
///
/// Running out of input is *not* a stream error: readers report it through
/// [`Reader::finished`] and by returning `Ok(None)` from [`Reader::read`].
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("position {position} out of bounds (stream length {len})")]
    OutOfBounds { position: String, len: usize },
    #[error("stream I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("matching was cancelled")]
    Cancelled,
}

/// A position-addressable token source.
pub trait Reader {
    type Token: Clone + Debug;
    type Position: Clone + Debug + Ord;

    /// Look at the next token without consuming it.
    fn peek(&self) -> Result<Option<Self::Token>, StreamError>;

    /// Consume the next token. `Ok(None)` at end of input.
    fn read(&mut self) -> Result<Option<Self::Token>, StreamError>;

    /// Append up to `n` upcoming tokens to `buf` without consuming them.
    /// Returns how many were appended.
    fn peek_n(&self, n: usize, buf: &mut Vec<Self::Token>) -> Result<usize, StreamError>;

    /// Consume up to `n` tokens, appending them to `buf`.
    fn read_n(&mut self, n: usize, buf: &mut Vec<Self::Token>) -> Result<usize, StreamError>;

    /// Discard up to `n` tokens. Returns how many were skipped.
    fn skip(&mut self, n: usize) -> Result<usize, StreamError>;

    /// True once every token has been consumed.
    fn finished(&self) -> bool;

    fn position(&self) -> Result<Self::Position, StreamError>;

    fn set_position(&mut self, position: Self::Position) -> Result<(), StreamError>;

    /// The tokens between `begin` (inclusive) and `end` (exclusive).
    fn range(
        &self,
        begin: &Self::Position,
        end: &Self::Position,
    ) -> Result<Vec<Self::Token>, StreamError>;

    /// Number of tokens between two positions.
    fn length(&self, begin: &Self::Position, end: &Self::Position) -> usize;
}

/// Wraps a reader so that matching can be aborted from outside.
///
/// Once the shared flag is raised every operation fails with
/// [`StreamError::Cancelled`], which unwinds the whole match in progress.
pub struct CancellableReader<R> {
    inner: R,
    cancelled: Rc<Cell<bool>>,
}

impl<R: Reader> CancellableReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cancelled: Rc::new(Cell::new(false)),
        }
    }

    /// A handle that cancels this reader when set.
    pub fn cancel_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check(&self) -> Result<(), StreamError> {
        if self.cancelled.get() {
            Err(StreamError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl<R: Reader> Reader for CancellableReader<R> {
    type Token = R::Token;
    type Position = R::Position;

    fn peek(&self) -> Result<Option<Self::Token>, StreamError> {
        self.check()?;
        self.inner.peek()
    }

    fn read(&mut self) -> Result<Option<Self::Token>, StreamError> {
        self.check()?;
        self.inner.read()
    }

    fn peek_n(&self, n: usize, buf: &mut Vec<Self::Token>) -> Result<usize, StreamError> {
        self.check()?;
        self.inner.peek_n(n, buf)
    }

    fn read_n(&mut self, n: usize, buf: &mut Vec<Self::Token>) -> Result<usize, StreamError> {
        self.check()?;
        self.inner.read_n(n, buf)
    }

    fn skip(&mut self, n: usize) -> Result<usize, StreamError> {
        self.check()?;
        self.inner.skip(n)
    }

    fn finished(&self) -> bool {
        self.inner.finished()
    }

    fn position(&self) -> Result<Self::Position, StreamError> {
        self.check()?;
        self.inner.position()
    }

    fn set_position(&mut self, position: Self::Position) -> Result<(), StreamError> {
        self.check()?;
        self.inner.set_position(position)
    }

    fn range(
        &self,
        begin: &Self::Position,
        end: &Self::Position,
    ) -> Result<Vec<Self::Token>, StreamError> {
        self.check()?;
        self.inner.range(begin, end)
    }

    fn length(&self, begin: &Self::Position, end: &Self::Position) -> usize {
        self.inner.length(begin, end)
    }
}

/// A reader over an in-memory sequence of arbitrary tokens.
///
/// Positions are plain indices.
#[derive(Debug, Clone)]
pub struct VecReader<T> {
    tokens: Vec<T>,
    pos: usize,
}

impl<T> VecReader<T> {
    pub fn new(tokens: impl Into<Vec<T>>) -> Self {
        Self {
            tokens: tokens.into(),
            pos: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn out_of_bounds(&self, position: usize) -> StreamError {
        StreamError::OutOfBounds {
            position: position.to_string(),
            len: self.tokens.len(),
        }
    }
}

impl<T: Clone + Debug> Reader for VecReader<T> {
    type Token = T;
    type Position = usize;

    fn peek(&self) -> Result<Option<T>, StreamError> {
        Ok(self.tokens.get(self.pos).cloned())
    }

    fn read(&mut self) -> Result<Option<T>, StreamError> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        Ok(token)
    }

    fn peek_n(&self, n: usize, buf: &mut Vec<T>) -> Result<usize, StreamError> {
        let end = self.pos.saturating_add(n).min(self.tokens.len());
        buf.extend_from_slice(&self.tokens[self.pos..end]);
        Ok(end - self.pos)
    }

    fn read_n(&mut self, n: usize, buf: &mut Vec<T>) -> Result<usize, StreamError> {
        let count = self.peek_n(n, buf)?;
        self.pos += count;
        Ok(count)
    }

    fn skip(&mut self, n: usize) -> Result<usize, StreamError> {
        let count = n.min(self.tokens.len() - self.pos);
        self.pos += count;
        Ok(count)
    }

    fn finished(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn position(&self) -> Result<usize, StreamError> {
        Ok(self.pos)
    }

    fn set_position(&mut self, position: usize) -> Result<(), StreamError> {
        if position > self.tokens.len() {
            return Err(self.out_of_bounds(position));
        }
        self.pos = position;
        Ok(())
    }

    fn range(&self, begin: &usize, end: &usize) -> Result<Vec<T>, StreamError> {
        if *end > self.tokens.len() {
            return Err(self.out_of_bounds(*end));
        }
        if begin > end {
            return Err(self.out_of_bounds(*begin));
        }
        Ok(self.tokens[*begin..*end].to_vec())
    }

    fn length(&self, begin: &usize, end: &usize) -> usize {
        end.saturating_sub(*begin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_reader_reads_and_rewinds() {
        let mut r = VecReader::new(vec![1, 2, 3]);
        assert_eq!(r.read().unwrap(), Some(1));
        let mark = r.position().unwrap();
        let mut buf = Vec::new();
        assert_eq!(r.read_n(5, &mut buf).unwrap(), 2);
        assert_eq!(buf, vec![2, 3]);
        assert!(r.finished());
        assert_eq!(r.read().unwrap(), None);

        r.set_position(mark).unwrap();
        assert_eq!(r.peek().unwrap(), Some(2));
        assert_eq!(r.range(&0, &2).unwrap(), vec![1, 2]);
        assert_eq!(r.length(&1, &3), 2);
    }

    #[test]
    fn vec_reader_clamps_huge_counts() {
        let mut r = VecReader::new(vec![1, 2, 3]);
        r.skip(1).unwrap();
        let mut buf = Vec::new();
        assert_eq!(r.peek_n(usize::MAX, &mut buf).unwrap(), 2);
        assert_eq!(buf, vec![2, 3]);
        buf.clear();
        assert_eq!(r.read_n(usize::MAX, &mut buf).unwrap(), 2);
        assert!(r.finished());
    }

    #[test]
    fn vec_reader_rejects_bad_positions() {
        let mut r = VecReader::new(vec!['x']);
        assert!(matches!(
            r.set_position(4),
            Err(StreamError::OutOfBounds { len: 1, .. })
        ));
        assert!(r.range(&0, &2).is_err());
    }

    #[test]
    fn cancelled_reader_fails_every_read() {
        let mut r = CancellableReader::new(VecReader::new(vec!['a', 'b']));
        assert_eq!(r.read().unwrap(), Some('a'));
        let flag = r.cancel_flag();
        flag.set(true);
        assert!(matches!(r.read(), Err(StreamError::Cancelled)));
        assert!(matches!(r.position(), Err(StreamError::Cancelled)));
        assert!(!r.finished());
        assert_eq!(r.into_inner().position().unwrap(), 1);
    }
}
