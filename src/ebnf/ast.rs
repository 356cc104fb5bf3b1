//! Syntax tree of a grammar text.

/// One `name = body` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub body: Expr,
    /// 1-based line the rule starts on.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Reference to another rule by name.
    Ref { name: String, line: usize },
    /// `"text"`, or `'text'` with `case_fold` set.
    Literal { text: String, case_fold: bool },
    /// `[...]` or `?name?`. `source` is the text as written, used when printing.
    Class { set: CharSet, source: String },
    /// `.`
    AnyChar,
    /// `$`
    End,
    Concat(Vec<Expr>),
    Alt(Vec<Expr>),
    /// `max == 0` means unbounded.
    Repeat {
        expr: Box<Expr>,
        min: usize,
        max: usize,
    },
    Except { must: Box<Expr>, except: Box<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharSet {
    pub negated: bool,
    pub kind: CharSetKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharSetKind {
    Alpha,
    Upper,
    Lower,
    Numeric,
    Space,
    Punct,
    Printable,
    Any,
    Custom(Vec<CharClass>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharClass {
    Single(char),
    /// Inclusive.
    Range(char, char),
}
