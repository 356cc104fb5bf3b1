//! The arena that owns every pattern of a grammar.
//!
//! Patterns refer to their children through [`PatternRef`] handles, so a
//! pattern can be shared by several parents and a rule can refer to itself.
//! Recursive rules are built by reserving a handle with [`Grammar::declare`]
//! and filling it in later with [`Grammar::define`].

use std::fmt;

use crate::error::Error;

use super::ast::Pattern;

/// Handle to a pattern stored in a [`Grammar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternRef(usize);

impl PatternRef {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PatternRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Grammar<T> {
    patterns: Vec<Option<Pattern<T>>>,
}

impl<T> Default for Grammar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grammar<T> {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Store a pattern and return its handle.
    pub fn add(&mut self, pattern: Pattern<T>) -> PatternRef {
        self.patterns.push(Some(pattern));
        PatternRef(self.patterns.len() - 1)
    }

    /// Reserve a handle for a pattern that will be defined later.
    pub fn declare(&mut self) -> PatternRef {
        self.patterns.push(None);
        PatternRef(self.patterns.len() - 1)
    }

    /// Fill in a handle obtained from [`Grammar::declare`].
    pub fn define(&mut self, handle: PatternRef, pattern: Pattern<T>) -> Result<(), Error> {
        let slot = self
            .patterns
            .get_mut(handle.0)
            .ok_or(Error::UnknownPattern(handle))?;
        if slot.is_some() {
            return Err(Error::AlreadyDefined(handle));
        }
        *slot = Some(pattern);
        Ok(())
    }

    pub fn get(&self, handle: PatternRef) -> Result<&Pattern<T>, Error> {
        self.patterns
            .get(handle.0)
            .ok_or(Error::UnknownPattern(handle))?
            .as_ref()
            .ok_or(Error::UndefinedPattern(handle))
    }

    /// The id of a pattern (empty for anonymous patterns).
    pub fn id_of(&self, handle: PatternRef) -> Result<&str, Error> {
        Ok(self.get(handle)?.id())
    }

    /// Find a named pattern by id.
    pub fn find(&self, id: &str) -> Option<PatternRef> {
        self.patterns
            .iter()
            .position(|p| p.as_ref().is_some_and(|p| !id.is_empty() && p.id() == id))
            .map(PatternRef)
    }

    /// Handles of every named pattern, in insertion order.
    pub fn named(&self) -> Vec<PatternRef> {
        self.patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| p.as_ref().is_some_and(|p| !p.is_anonymous()))
            .map(|(i, _)| PatternRef(i))
            .collect()
    }

    /// Handles that were declared but never defined.
    pub fn undefined(&self) -> Vec<PatternRef> {
        self.patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| PatternRef(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_define() {
        let mut g = Grammar::<char>::new();
        let r = g.declare();
        assert!(matches!(g.get(r), Err(Error::UndefinedPattern(_))));
        assert_eq!(g.undefined(), vec![r]);

        g.define(r, Pattern::end().with_id("eof")).unwrap();
        assert_eq!(g.id_of(r).unwrap(), "eof");
        assert!(g.undefined().is_empty());
    }

    #[test]
    fn define_twice_is_error() {
        let mut g = Grammar::<char>::new();
        let r = g.add(Pattern::end());
        assert!(matches!(
            g.define(r, Pattern::end()),
            Err(Error::AlreadyDefined(_))
        ));
    }

    #[test]
    fn unknown_handle() {
        let g = Grammar::<char>::new();
        assert!(matches!(
            g.get(PatternRef::new(3)),
            Err(Error::UnknownPattern(_))
        ));
    }

    #[test]
    fn find_and_named() {
        let mut g = Grammar::<char>::new();
        let a = g.add(Pattern::vector(vec!['a']).with_id("a"));
        g.add(Pattern::vector(vec!['b']));
        let c = g.add(Pattern::vector(vec!['c']).with_id("c"));
        assert_eq!(g.find("c"), Some(c));
        assert_eq!(g.find(""), None);
        assert_eq!(g.named(), vec![a, c]);
    }
}
