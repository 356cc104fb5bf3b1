//! Grammar combinators.
//!
//! A [`Grammar`] owns a set of [`Pattern`]s that refer to each other through
//! [`PatternRef`] handles. The same grammar can match a token stream, scan it
//! for every occurrence of a pattern, generate random sentences, and print
//! itself as EBNF.
//!
//! # Pattern kinds
//!
//! | Kind            | Matches                                              |
//! |-----------------|------------------------------------------------------|
//! | `Entity`        | One token accepted by a predicate                     |
//! | `Vector`        | A literal run of tokens                               |
//! | `Concatenation` | Every child, in order                                 |
//! | `Alternation`   | The child with the longest match (earliest on ties)   |
//! | `Repetition`    | The child between `min` and `max` times (0 = no max)  |
//! | `Exception`     | `must`, unless `except` matches at the same position  |
//! | `End`           | Nothing, and only at end of input                     |
//!
//! Left-recursive rules are not supported: a rule that can reach itself
//! without consuming a token recurses until the stack overflows.

pub mod ast;
pub mod generate;
pub mod grammar;
pub mod matcher;
pub mod print;

pub use ast::{DEFAULT_GENERATION_CEILING, Kind, Pattern, PatternConfig};
pub use grammar::{Grammar, PatternRef};
