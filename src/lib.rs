//! Grammar combinators over arbitrary token streams.
//!
//! Build a [`Grammar`] from [`Pattern`]s (or compile one from EBNF text with
//! [`ebnf::compile`]), then match it against any [`Reader`], scan a stream
//! for every occurrence, evaluate the resulting [`Match`] trees through a
//! [`TransformTable`], generate random sentences, or print the grammar back
//! as EBNF.
//!
//! # Example
//!
//! ```rust
//! use exbana::{Grammar, Pattern, TextReader, VoidLogger};
//!
//! let mut g = Grammar::new();
//! let digit = g.add(Pattern::entity(|c: &char| c.is_ascii_digit()).with_display("[0-9]"));
//! let number = g.add(Pattern::one_or_more(digit).with_id("number"));
//!
//! let mut reader = TextReader::new("x 12 y 345");
//! let found = g.scan(number, &mut reader, &mut VoidLogger).unwrap();
//! let texts: Vec<String> = found.iter().map(|m| m.text()).collect();
//! assert_eq!(texts, ["12", "345"]);
//!
//! assert_eq!(g.print_rules(&[number]).unwrap(), "number = [0-9]+\n");
//! ```

pub mod ebnf;
mod error;
pub mod eval;
mod match_result;
mod mismatch;
pub mod pattern;
mod position;
mod reader;
mod text_reader;
mod writer;

pub use error::Error;
pub use eval::{TransformTable, Value};
pub use match_result::Match;
pub use mismatch::{LogLogger, Logger, Mismatch, MismatchReason, StackLogger, VoidLogger};
pub use pattern::{Grammar, Kind, Pattern, PatternConfig, PatternRef};
pub use position::TextPos;
pub use reader::{CancellableReader, Reader, StreamError, VecReader};
pub use text_reader::TextReader;
pub use writer::{BoundedWriter, Writer};
