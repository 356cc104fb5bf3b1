//! Sinks for generated tokens.

use crate::reader::StreamError;

/// Receives the tokens produced by generation.
pub trait Writer<T> {
    fn write(&mut self, tokens: &[T]) -> Result<(), StreamError>;

    /// Called when generation reaches an end-of-input pattern.
    fn finish(&mut self) -> Result<(), StreamError>;
}

impl<T: Clone> Writer<T> for Vec<T> {
    fn write(&mut self, tokens: &[T]) -> Result<(), StreamError> {
        self.extend_from_slice(tokens);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

impl Writer<char> for String {
    fn write(&mut self, tokens: &[char]) -> Result<(), StreamError> {
        self.extend(tokens);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

/// A writer that ignores everything written after `finish`.
///
/// Generation keeps walking the grammar after an end-of-input pattern; this
/// writer makes sure nothing lands past that point.
#[derive(Debug, Clone, Default)]
pub struct BoundedWriter<T> {
    tokens: Vec<T>,
    finished: bool,
}

impl<T: Clone> BoundedWriter<T> {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            finished: false,
        }
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<T> {
        self.tokens
    }
}

impl<T: Clone> Writer<T> for BoundedWriter<T> {
    fn write(&mut self, tokens: &[T]) -> Result<(), StreamError> {
        if !self.finished {
            self.tokens.extend_from_slice(tokens);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StreamError> {
        self.finished = true;
        Ok(())
    }
}
