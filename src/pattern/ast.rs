//! Pattern node types.
//!
//! A [`Pattern`] is one node of a grammar: its [`Kind`] says how it matches,
//! its [`PatternConfig`] carries the per-node settings fixed at construction.
//! Children are [`PatternRef`] handles into the owning [`Grammar`](super::Grammar).

use std::fmt;

use rand::RngCore;

use super::grammar::PatternRef;

pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;
pub type Equality<T> = Box<dyn Fn(&T, &T) -> bool>;
pub type Generator<T> = Box<dyn Fn(&mut dyn RngCore) -> T>;

/// Default number of extra repetitions generation may add to an unbounded
/// repetition.
pub const DEFAULT_GENERATION_CEILING: usize = 5;

pub enum Kind<T> {
    /// One token satisfying a predicate.
    Entity {
        predicate: Predicate<T>,
        generator: Option<Generator<T>>,
    },
    /// A literal run of tokens compared with `eq`.
    Vector { tokens: Vec<T>, eq: Equality<T> },
    Concatenation(Vec<PatternRef>),
    /// Longest-match choice. `orthogonal` stops at the first match.
    Alternation {
        children: Vec<PatternRef>,
        orthogonal: bool,
    },
    /// `max == 0` means unbounded.
    Repetition {
        child: PatternRef,
        min: usize,
        max: usize,
        generation_ceiling: usize,
    },
    /// Matches `must` unless `except` matches at the same position.
    Exception {
        must: PatternRef,
        except: PatternRef,
    },
    End,
}

impl<T: fmt::Debug> fmt::Debug for Kind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Entity { generator, .. } => f
                .debug_struct("Entity")
                .field("generator", &generator.is_some())
                .finish_non_exhaustive(),
            Kind::Vector { tokens, .. } => f
                .debug_struct("Vector")
                .field("tokens", tokens)
                .finish_non_exhaustive(),
            Kind::Concatenation(children) => {
                f.debug_tuple("Concatenation").field(children).finish()
            }
            Kind::Alternation {
                children,
                orthogonal,
            } => f
                .debug_struct("Alternation")
                .field("children", children)
                .field("orthogonal", orthogonal)
                .finish(),
            Kind::Repetition { child, min, max, .. } => f
                .debug_struct("Repetition")
                .field("child", child)
                .field("min", min)
                .field("max", max)
                .finish_non_exhaustive(),
            Kind::Exception { must, except } => f
                .debug_struct("Exception")
                .field("must", must)
                .field("except", except)
                .finish(),
            Kind::End => f.write_str("End"),
        }
    }
}

/// Settings shared by every kind of pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternConfig {
    /// Rule name. Empty for anonymous, inline patterns.
    pub id: String,
    /// Report mismatches of this pattern to the logger.
    pub logging: bool,
    /// Text the printer uses for entities, vectors and end patterns.
    pub display: String,
}

#[derive(Debug)]
pub struct Pattern<T> {
    pub kind: Kind<T>,
    pub config: PatternConfig,
}

impl<T: 'static> Pattern<T> {
    fn new(kind: Kind<T>) -> Self {
        Self {
            kind,
            config: PatternConfig::default(),
        }
    }

    pub fn entity(predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self::new(Kind::Entity {
            predicate: Box::new(predicate),
            generator: None,
        })
    }

    /// A literal compared with `PartialEq`.
    pub fn vector(tokens: impl Into<Vec<T>>) -> Self
    where
        T: PartialEq,
    {
        Self::vector_by(|a: &T, b: &T| a == b, tokens)
    }

    /// A literal compared with a custom equality function.
    pub fn vector_by(eq: impl Fn(&T, &T) -> bool + 'static, tokens: impl Into<Vec<T>>) -> Self {
        Self::new(Kind::Vector {
            tokens: tokens.into(),
            eq: Box::new(eq),
        })
    }

    pub fn concatenation(children: impl Into<Vec<PatternRef>>) -> Self {
        Self::new(Kind::Concatenation(children.into()))
    }

    pub fn alternation(children: impl Into<Vec<PatternRef>>) -> Self {
        Self::new(Kind::Alternation {
            children: children.into(),
            orthogonal: false,
        })
    }

    pub fn repetition(child: PatternRef, min: usize, max: usize) -> Self {
        Self::new(Kind::Repetition {
            child,
            min,
            max,
            generation_ceiling: DEFAULT_GENERATION_CEILING,
        })
    }

    /// Zero or one.
    pub fn optional(child: PatternRef) -> Self {
        Self::repetition(child, 0, 1)
    }

    /// Zero or more.
    pub fn any(child: PatternRef) -> Self {
        Self::repetition(child, 0, 0)
    }

    pub fn one_or_more(child: PatternRef) -> Self {
        Self::repetition(child, 1, 0)
    }

    pub fn exactly(child: PatternRef, n: usize) -> Self {
        Self::repetition(child, n, n)
    }

    pub fn exception(must: PatternRef, except: PatternRef) -> Self {
        Self::new(Kind::Exception { must, except })
    }

    pub fn end() -> Self {
        Self::new(Kind::End)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.config.id = id.into();
        self
    }

    pub fn with_logging(mut self, logging: bool) -> Self {
        self.config.logging = logging;
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.config.display = display.into();
        self
    }

    /// Set the token generator of an entity. Other kinds ignore it.
    pub fn with_generator(mut self, generator: impl Fn(&mut dyn RngCore) -> T + 'static) -> Self {
        if let Kind::Entity {
            generator: slot, ..
        } = &mut self.kind
        {
            *slot = Some(Box::new(generator));
        }
        self
    }

    /// Set how many repetitions beyond `min` generation may produce for an
    /// unbounded repetition. Other kinds ignore it.
    pub fn with_generation_ceiling(mut self, ceiling: usize) -> Self {
        if let Kind::Repetition {
            generation_ceiling, ..
        } = &mut self.kind
        {
            *generation_ceiling = ceiling;
        }
        self
    }

    /// Mark an alternation's branches as mutually exclusive so matching stops
    /// at the first branch that matches. Other kinds ignore it.
    pub fn orthogonal(mut self) -> Self {
        if let Kind::Alternation { orthogonal, .. } = &mut self.kind {
            *orthogonal = true;
        }
        self
    }
}

impl<T> Pattern<T> {
    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn is_anonymous(&self) -> bool {
        self.config.id.is_empty()
    }
}
