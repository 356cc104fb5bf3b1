//! Recursive descent parser for grammar texts.

use std::iter::Peekable;
use std::str::Chars;

use super::ast::*;
use super::char_class::NAMED_CLASSES;

/// What went wrong while parsing a grammar text.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidNumber,
    UnclosedGroup,
    UnclosedString,
    UnclosedClass,
    UnclosedComment,
    UnknownClass(String),
    DuplicateRule(String),
    UndefinedRule(String),
    InvalidRange(char, char),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            Self::UnexpectedEnd => write!(f, "unexpected end of grammar"),
            Self::InvalidNumber => write!(f, "invalid repetition count"),
            Self::UnclosedGroup => write!(f, "unclosed group '('"),
            Self::UnclosedString => write!(f, "unclosed string literal"),
            Self::UnclosedClass => write!(f, "unclosed character class"),
            Self::UnclosedComment => write!(f, "unclosed comment '(*'"),
            Self::UnknownClass(name) => write!(f, "unknown character class ?{name}?"),
            Self::DuplicateRule(name) => write!(f, "rule '{name}' is defined more than once"),
            Self::UndefinedRule(name) => write!(f, "rule '{name}' is not defined"),
            Self::InvalidRange(lo, hi) => write!(f, "invalid range {lo:?}-{hi:?}"),
        }
    }
}

/// A grammar text error and the 1-based line it occurred on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Parse a grammar text into its rules, in source order.
pub fn parse(input: &str) -> Result<Vec<Rule>, ParseError> {
    Parser {
        chars: input.chars().peekable(),
        line: 1,
        depth: 0,
    }
    .parse_grammar()
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    /// Group nesting. Newlines end a rule only at depth 0.
    depth: usize,
}

impl Parser<'_> {
    fn parse_grammar(&mut self) -> Result<Vec<Rule>, ParseError> {
        let mut rules = Vec::new();
        loop {
            self.skip_blank()?;
            match self.peek() {
                None => break,
                Some(';') => {
                    self.bump();
                }
                Some(c) if is_ident_start(c) => rules.push(self.parse_rule()?),
                Some(c) => return Err(self.error(ErrorKind::UnexpectedChar(c))),
            }
        }
        Ok(rules)
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let line = self.line;
        let name = self.parse_ident();

        self.skip_space()?;
        match self.bump() {
            Some('=') => {}
            Some(c) => return Err(ParseError::new(line, ErrorKind::UnexpectedChar(c))),
            None => return Err(self.error(ErrorKind::UnexpectedEnd)),
        }
        self.skip_blank()?;
        let body = self.parse_alt()?;

        self.skip_space()?;
        match self.peek() {
            None => {}
            Some(';') | Some('\n') => {
                self.bump();
            }
            Some(c) => return Err(self.error(ErrorKind::UnexpectedChar(c))),
        }
        Ok(Rule { name, body, line })
    }

    fn parse_alt(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.parse_concat()?];
        loop {
            self.skip_space()?;
            if self.peek() != Some('|') {
                break;
            }
            self.bump();
            self.skip_blank()?;
            items.push(self.parse_concat()?);
        }
        Ok(collapse(items, Expr::Alt))
    }

    fn parse_concat(&mut self) -> Result<Expr, ParseError> {
        let mut items = vec![self.parse_except()?];
        loop {
            self.skip_space()?;
            if self.peek() != Some(',') {
                break;
            }
            self.bump();
            self.skip_blank()?;
            items.push(self.parse_except()?);
        }
        Ok(collapse(items, Expr::Concat))
    }

    fn parse_except(&mut self) -> Result<Expr, ParseError> {
        let must = self.parse_term()?;
        self.skip_space()?;
        if self.peek() != Some('-') {
            return Ok(must);
        }
        self.bump();
        self.skip_blank()?;
        let except = self.parse_term()?;
        Ok(Expr::Except {
            must: Box::new(must),
            except: Box::new(except),
        })
    }

    /// `[n "*"] postfix`
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return self.parse_postfix();
        }

        let count = self.parse_number()?;
        // a repetition with max 0 is unbounded
        if count == 0 {
            return Err(self.error(ErrorKind::InvalidNumber));
        }
        self.skip_space()?;
        match self.bump() {
            Some('*') => {}
            Some(c) => return Err(self.error(ErrorKind::UnexpectedChar(c))),
            None => return Err(self.error(ErrorKind::UnexpectedEnd)),
        }
        self.skip_blank()?;
        let expr = match self.parse_postfix()? {
            // `n * X?` is up to n X
            Expr::Repeat { expr, min: 0, max: 1 } => Expr::Repeat {
                expr,
                min: 0,
                max: count,
            },
            expr => Expr::Repeat {
                expr: Box::new(expr),
                min: count,
                max: count,
            },
        };
        Ok(expr)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let (min, max) = match self.peek() {
                Some('*') => (0, 0),
                Some('+') => (1, 0),
                Some('?') => (0, 1),
                _ => break,
            };
            self.bump();
            expr = Expr::Repeat {
                expr: Box::new(expr),
                min,
                max,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            None => Err(self.error(ErrorKind::UnexpectedEnd)),
            Some('(') => {
                self.bump();
                self.depth += 1;
                self.skip_blank()?;
                let inner = self.parse_alt()?;
                self.skip_blank()?;
                self.depth -= 1;
                match self.bump() {
                    Some(')') => Ok(inner),
                    _ => Err(self.error(ErrorKind::UnclosedGroup)),
                }
            }
            Some('"') | Some('\'') => self.parse_string(),
            Some('[') => self.parse_class(),
            Some('?') => self.parse_named_class(),
            Some('.') => {
                self.bump();
                Ok(Expr::AnyChar)
            }
            Some('$') => {
                self.bump();
                Ok(Expr::End)
            }
            Some(c) if is_ident_start(c) => {
                let line = self.line;
                Ok(Expr::Ref {
                    name: self.parse_ident(),
                    line,
                })
            }
            Some(c) => Err(self.error(ErrorKind::UnexpectedChar(c))),
        }
    }

    fn parse_ident(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn parse_number(&mut self) -> Result<usize, ParseError> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s.parse::<usize>()
            .map_err(|_| self.error(ErrorKind::InvalidNumber))
    }

    /// Parse a `'...'` or `"..."` literal. Single quotes fold ASCII case.
    fn parse_string(&mut self) -> Result<Expr, ParseError> {
        let delim = self
            .bump()
            .ok_or_else(|| self.error(ErrorKind::UnexpectedEnd))?;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == delim => break,
                Some(c) => text.push(c),
                None => return Err(self.error(ErrorKind::UnclosedString)),
            }
        }
        Ok(Expr::Literal {
            text,
            case_fold: delim == '\'',
        })
    }

    /// Parse `[...]`: single characters, `a-z` ranges, escapes, leading `^`.
    fn parse_class(&mut self) -> Result<Expr, ParseError> {
        let mut source = String::new();
        let mut next = |p: &mut Self| {
            let c = p.bump();
            if let Some(c) = c {
                source.push(c);
            }
            c
        };

        next(self); // '['
        let negated = self.peek() == Some('^');
        if negated {
            next(self);
        }

        let mut classes = Vec::new();
        loop {
            let lo = match next(self) {
                None => return Err(self.error(ErrorKind::UnclosedClass)),
                Some(']') => break,
                Some('\\') => {
                    let escaped = next(self).ok_or_else(|| self.error(ErrorKind::UnclosedClass))?;
                    unescape(escaped)
                }
                Some(c) => c,
            };

            let is_range = self.peek() == Some('-') && {
                let mut ahead = self.chars.clone();
                ahead.next();
                !matches!(ahead.peek(), Some(']') | None)
            };
            if !is_range {
                classes.push(CharClass::Single(lo));
                continue;
            }

            next(self); // '-'
            let hi = match next(self) {
                Some('\\') => {
                    let escaped = next(self).ok_or_else(|| self.error(ErrorKind::UnclosedClass))?;
                    unescape(escaped)
                }
                Some(c) => c,
                None => return Err(self.error(ErrorKind::UnclosedClass)),
            };
            if lo > hi {
                return Err(self.error(ErrorKind::InvalidRange(lo, hi)));
            }
            classes.push(CharClass::Range(lo, hi));
        }

        Ok(Expr::Class {
            set: CharSet {
                negated,
                kind: CharSetKind::Custom(classes),
            },
            source,
        })
    }

    /// Parse `? name ?`.
    fn parse_named_class(&mut self) -> Result<Expr, ParseError> {
        self.bump(); // '?'
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('?') => break,
                Some('\n') | None => return Err(self.error(ErrorKind::UnclosedClass)),
                Some(c) => name.push(c),
            }
        }

        let name = name.trim();
        let kind = NAMED_CLASSES
            .get(name)
            .cloned()
            .ok_or_else(|| self.error(ErrorKind::UnknownClass(name.to_string())))?;
        Ok(Expr::Class {
            set: CharSet {
                negated: false,
                kind,
            },
            source: format!("?{name}?"),
        })
    }

    /// Skip spaces, tabs and comments; newlines too when inside a group.
    fn skip_space(&mut self) -> Result<(), ParseError> {
        self.skip(self.depth > 0)
    }

    /// Skip all whitespace and comments, newlines included.
    fn skip_blank(&mut self) -> Result<(), ParseError> {
        self.skip(true)
    }

    fn skip(&mut self, newlines: bool) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('\n') if newlines => {
                    self.bump();
                }
                Some('(') if self.peek_second() == Some('*') => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Skip a `(* ... *)` comment. Comments do not nest.
    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some(')') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(ParseError::new(line, ErrorKind::UnclosedComment)),
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(self.line, kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}

/// A list of one is just its element.
fn collapse(mut items: Vec<Expr>, wrap: fn(Vec<Expr>) -> Expr) -> Expr {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}
