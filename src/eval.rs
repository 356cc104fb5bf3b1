//! Turning match trees into domain values.
//!
//! A [`TransformTable`] maps pattern ids to transform functions. Evaluating a
//! match runs the transform registered for its id; a transform usually
//! evaluates some of the match's components through the same table. Matches
//! whose id has no transform evaluate to their raw captured tokens.

use std::collections::HashMap;
use std::fmt;

use anyhow::{Result, bail};

use crate::match_result::Match;
use crate::reader::Reader;

pub type Transform<T, P, V> = Box<
    dyn Fn(
        &Match<T, P>,
        &TransformTable<T, P, V>,
        &dyn Reader<Token = T, Position = P>,
    ) -> Result<V>,
>;

/// The result of evaluating one match.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T, V> {
    /// No transform was registered; the match's captured tokens, if any.
    Raw(Option<Vec<T>>),
    Domain(V),
}

impl<T, V> Value<T, V> {
    pub fn into_domain(self) -> Option<V> {
        match self {
            Value::Domain(v) => Some(v),
            Value::Raw(_) => None,
        }
    }
}

impl<V> Value<char, V> {
    /// Raw characters as a string.
    pub fn text(&self) -> Option<String> {
        match self {
            Value::Raw(Some(chars)) => Some(chars.iter().collect()),
            _ => None,
        }
    }
}

pub struct TransformTable<T, P, V> {
    transforms: HashMap<String, Transform<T, P, V>>,
}

impl<T: Clone + fmt::Debug, P: Clone + fmt::Debug + Ord, V> Default for TransformTable<T, P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, V> fmt::Debug for TransformTable<T, P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.transforms.keys().collect();
        ids.sort();
        f.debug_struct("TransformTable").field("ids", &ids).finish()
    }
}

impl<T: Clone + fmt::Debug, P: Clone + fmt::Debug + Ord, V> TransformTable<T, P, V> {
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// Register the transform for `id`, replacing any earlier one.
    pub fn insert<F>(&mut self, id: impl Into<String>, transform: F)
    where
        F: Fn(&Match<T, P>, &Self, &dyn Reader<Token = T, Position = P>) -> Result<V> + 'static,
    {
        self.transforms.insert(id.into(), Box::new(transform));
    }

    pub fn with<F>(mut self, id: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&Match<T, P>, &Self, &dyn Reader<Token = T, Position = P>) -> Result<V> + 'static,
    {
        self.insert(id, transform);
        self
    }

    pub fn evaluate(
        &self,
        m: &Match<T, P>,
        reader: &dyn Reader<Token = T, Position = P>,
    ) -> Result<Value<T, V>> {
        match self.transforms.get(&m.id) {
            Some(transform) => Ok(Value::Domain(transform(m, self, reader)?)),
            None => Ok(Value::Raw(m.value.clone())),
        }
    }

    /// Evaluate the first named (or leaf) node below any anonymous wrappers.
    pub fn evaluate_unpacked(
        &self,
        m: &Match<T, P>,
        reader: &dyn Reader<Token = T, Position = P>,
    ) -> Result<Value<T, V>> {
        self.evaluate(m.unpack(), reader)
    }

    /// Like [`evaluate_unpacked`](Self::evaluate_unpacked), but a match
    /// without a transform is an error.
    pub fn eval_domain(
        &self,
        m: &Match<T, P>,
        reader: &dyn Reader<Token = T, Position = P>,
    ) -> Result<V> {
        let target = m.unpack();
        match self.evaluate(target, reader)?.into_domain() {
            Some(v) => Ok(v),
            None if target.id.is_empty() => bail!("no transform for anonymous match"),
            None => bail!("no transform registered for '{}'", target.id),
        }
    }
}
