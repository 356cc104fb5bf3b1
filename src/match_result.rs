//! The tree produced by a successful match.

use crate::reader::Reader;

/// The result of a successful pattern match.
///
/// Leaf patterns fill `value` with the captured tokens; composite patterns fill
/// `components`. An alternation always wraps its winning branch as a single
/// component and marks itself `unpackable`; an end-of-input match carries
/// neither.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T, P> {
    /// Id of the pattern that produced this match (empty for anonymous patterns).
    pub id: String,
    pub begin: P,
    /// Position immediately after the last consumed token.
    pub end: P,
    pub value: Option<Vec<T>>,
    pub components: Vec<Match<T, P>>,
    /// Set on alternation matches, whose only component is the winning branch.
    pub unpackable: bool,
}

impl<T, P> Match<T, P> {
    pub fn leaf(id: &str, begin: P, end: P, value: Vec<T>) -> Self {
        Self {
            id: id.to_string(),
            begin,
            end,
            value: Some(value),
            components: Vec::new(),
            unpackable: false,
        }
    }

    pub fn composite(id: &str, begin: P, end: P, components: Vec<Match<T, P>>) -> Self {
        Self {
            id: id.to_string(),
            begin,
            end,
            value: None,
            components,
            unpackable: false,
        }
    }

    /// The match of an alternation around its winning branch.
    pub fn alternative(id: &str, begin: P, end: P, branch: Match<T, P>) -> Self {
        Self {
            unpackable: true,
            ..Self::composite(id, begin, end, vec![branch])
        }
    }

    /// A match with neither value nor components.
    pub fn empty(id: &str, begin: P, end: P) -> Self {
        Self::composite(id, begin, end, Vec::new())
    }

    /// Number of tokens the match spans, measured by the reader that produced it.
    pub fn len<R>(&self, reader: &R) -> usize
    where
        R: Reader<Position = P> + ?Sized,
    {
        reader.length(&self.begin, &self.end)
    }

    pub fn is_empty<R>(&self, reader: &R) -> bool
    where
        R: Reader<Position = P> + ?Sized,
    {
        self.len(reader) == 0
    }

    /// The captured value of each component (concatenations and repetitions).
    pub fn values(&self) -> Vec<Option<&[T]>> {
        self.components
            .iter()
            .map(|c| c.value.as_deref())
            .collect()
    }

    /// The first component, if any.
    ///
    /// Unwraps an alternation, or an optional repetition that matched.
    pub fn optional(&self) -> Option<&Match<T, P>> {
        self.components.first()
    }

    /// Descend through anonymous alternation wrappers to the winning branch.
    ///
    /// Stops at the first node that has an id or was not produced by an
    /// alternation. Repetitions and concatenations are never unpacked, so the
    /// result does not depend on how many items they matched.
    pub fn unpack(&self) -> &Match<T, P> {
        let mut current = self;
        while current.unpackable && current.id.is_empty() && current.components.len() == 1 {
            current = &current.components[0];
        }
        current
    }

    /// Every token captured anywhere in this tree, in stream order.
    pub fn flatten(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens(&self, out: &mut Vec<T>)
    where
        T: Clone,
    {
        if let Some(value) = &self.value {
            out.extend_from_slice(value);
        }
        for component in &self.components {
            component.collect_tokens(out);
        }
    }
}

impl<P> Match<char, P> {
    /// The captured characters of this tree as a string.
    pub fn text(&self) -> String {
        self.flatten().into_iter().collect()
    }
}
