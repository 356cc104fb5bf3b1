//! Grammars written as EBNF text.
//!
//! The dialect is the one [`Grammar::print_rules`](crate::Grammar::print_rules)
//! emits, plus terminals:
//!
//! | Syntax          | Meaning                                              |
//! |-----------------|------------------------------------------------------|
//! | `name = ...`    | Rule, ended by `;` or a newline outside parentheses  |
//! | `"text"`        | Literal (exact case)                                 |
//! | `'text'`        | Literal (ASCII case-folded)                          |
//! | `[a-z_]`        | Character class; `[^...]` negates                    |
//! | `?digit?`       | Named class: alpha upper lower digit space punct printable any |
//! | `.`             | Any character                                        |
//! | `$`             | End of input                                         |
//! | `A, B`          | Concatenation                                        |
//! | `A \| B`        | Alternation (longest match)                          |
//! | `A - B`         | `A`, unless `B` matches here                         |
//! | `X*` `X+` `X?`  | Zero or more, one or more, optional                  |
//! | `n * X`         | Exactly n                                            |
//! | `(...)`         | Grouping                                             |
//! | `(* ... *)`     | Comment                                              |

pub mod ast;
pub mod char_class;
pub mod lower;
pub mod parser;

pub use lower::{CompiledGrammar, LowerOptions, lower};
pub use parser::{ErrorKind, ParseError, parse};

/// Parse a grammar text and build its patterns.
pub fn compile(text: &str, options: &LowerOptions) -> Result<CompiledGrammar, ParseError> {
    let rules = parse(text)?;
    lower(&rules, options)
}
