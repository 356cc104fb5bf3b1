//! A [`Reader`] over in-memory text.
//!
//! The text is held in a [`Rope`] so that single characters and ranges can be
//! fetched by character index without re-scanning UTF-8.

use std::io::Read;

use ropey::Rope;

use crate::position::TextPos;
use crate::reader::{Reader, StreamError};

/// Character reader with line/column tracking.
///
/// `\r\n` and lone `\r` line breaks are normalised to `\n` on construction.
#[derive(Debug, Clone)]
pub struct TextReader {
    rope: Rope,
    pos: TextPos,
}

impl TextReader {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_breaks(text)),
            pos: TextPos::zero(),
        }
    }

    /// Read all of `input` into a new reader.
    pub fn from_reader(mut input: impl Read) -> Result<Self, StreamError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        Ok(Self::new(&text))
    }

    /// Total number of characters in the stream.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole (normalised) text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        (index < self.rope.len_chars()).then(|| self.rope.char(index))
    }

    fn out_of_bounds(&self, position: &TextPos) -> StreamError {
        StreamError::OutOfBounds {
            position: format!("{position:?}"),
            len: self.len(),
        }
    }
}

impl Reader for TextReader {
    type Token = char;
    type Position = TextPos;

    fn peek(&self) -> Result<Option<char>, StreamError> {
        Ok(self.char_at(self.pos.index))
    }

    fn read(&mut self) -> Result<Option<char>, StreamError> {
        let ch = self.char_at(self.pos.index);
        if let Some(c) = ch {
            self.pos = self.pos.after_char(c);
        }
        Ok(ch)
    }

    fn peek_n(&self, n: usize, buf: &mut Vec<char>) -> Result<usize, StreamError> {
        let end = self.pos.index.saturating_add(n).min(self.len());
        buf.extend(self.rope.slice(self.pos.index..end).chars());
        Ok(end - self.pos.index)
    }

    fn read_n(&mut self, n: usize, buf: &mut Vec<char>) -> Result<usize, StreamError> {
        let mut count = 0;
        while count < n {
            match self.read()? {
                Some(c) => buf.push(c),
                None => break,
            }
            count += 1;
        }
        Ok(count)
    }

    fn skip(&mut self, n: usize) -> Result<usize, StreamError> {
        let mut count = 0;
        while count < n && self.read()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    fn finished(&self) -> bool {
        self.pos.index >= self.len()
    }

    fn position(&self) -> Result<TextPos, StreamError> {
        Ok(self.pos)
    }

    fn set_position(&mut self, position: TextPos) -> Result<(), StreamError> {
        if position.index > self.len() {
            return Err(self.out_of_bounds(&position));
        }
        self.pos = position;
        Ok(())
    }

    fn range(&self, begin: &TextPos, end: &TextPos) -> Result<Vec<char>, StreamError> {
        if begin.index > end.index {
            return Err(self.out_of_bounds(begin));
        }
        if end.index > self.len() {
            return Err(self.out_of_bounds(end));
        }
        Ok(self.rope.slice(begin.index..end.index).chars().collect())
    }

    fn length(&self, begin: &TextPos, end: &TextPos) -> usize {
        end.index.saturating_sub(begin.index)
    }
}

fn normalize_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_tracks_lines_and_columns() {
        let mut r = TextReader::new("ab\ncd");
        let mut buf = Vec::new();
        assert_eq!(r.read_n(4, &mut buf).unwrap(), 4);
        assert_eq!(buf, vec!['a', 'b', '\n', 'c']);
        assert_eq!(r.position().unwrap(), TextPos::new(4, 1, 1));
    }

    #[test]
    fn line_breaks_are_normalised() {
        let r = TextReader::new("a\r\nb\rc\n");
        assert_eq!(r.text(), "a\nb\nc\n");
    }

    #[test]
    fn read_at_end_is_none_not_error() {
        let mut r = TextReader::new("x");
        assert_eq!(r.read().unwrap(), Some('x'));
        assert!(r.finished());
        assert_eq!(r.read().unwrap(), None);
        assert_eq!(r.peek().unwrap(), None);
    }

    #[test]
    fn peek_n_does_not_advance() {
        let r = TextReader::new("hello");
        let mut buf = Vec::new();
        assert_eq!(r.peek_n(10, &mut buf).unwrap(), 5);
        assert_eq!(buf.iter().collect::<String>(), "hello");
        assert_eq!(r.position().unwrap(), TextPos::zero());
    }

    #[test]
    fn peek_n_clamps_huge_counts() {
        let mut r = TextReader::new("abc");
        r.skip(1).unwrap();
        let mut buf = Vec::new();
        assert_eq!(r.peek_n(usize::MAX, &mut buf).unwrap(), 2);
        assert_eq!(buf, vec!['b', 'c']);
    }

    #[test]
    fn skip_stops_at_end() {
        let mut r = TextReader::new("abc");
        assert_eq!(r.skip(5).unwrap(), 3);
        assert!(r.finished());
    }

    #[test]
    fn set_position_out_of_bounds_is_stream_error() {
        let mut r = TextReader::new("abc");
        let err = r.set_position(TextPos::new(9, 0, 9)).unwrap_err();
        assert!(matches!(err, StreamError::OutOfBounds { len: 3, .. }));
    }

    #[test]
    fn range_and_length() {
        let mut r = TextReader::new("hello world");
        let begin = r.position().unwrap();
        r.skip(5).unwrap();
        let end = r.position().unwrap();
        assert_eq!(r.range(&begin, &end).unwrap().iter().collect::<String>(), "hello");
        assert_eq!(r.length(&begin, &end), 5);
        assert_eq!(r.range(&end, &end).unwrap(), Vec::<char>::new());
    }

    #[test]
    fn from_reader_reads_everything() {
        let r = TextReader::from_reader("one\r\ntwo".as_bytes()).unwrap();
        assert_eq!(r.text(), "one\ntwo");
        assert_eq!(r.len(), 7);
    }
}
