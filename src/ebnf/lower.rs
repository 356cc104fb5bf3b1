//! Lowering parsed rules into a [`Grammar<char>`].

use std::collections::HashMap;

use rand::Rng;

use crate::pattern::{DEFAULT_GENERATION_CEILING, Grammar, Pattern, PatternRef};

use super::ast::{Expr, Rule};
use super::char_class::{charset_matches, sample_pool};
use super::parser::{ErrorKind, ParseError};

/// Settings applied to every pattern built from a grammar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowerOptions {
    /// Enable mismatch logging on every pattern.
    pub log_mismatches: bool,
    pub generation_ceiling: usize,
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            log_mismatches: false,
            generation_ceiling: DEFAULT_GENERATION_CEILING,
        }
    }
}

/// A grammar built from text, with its rules in source order.
#[derive(Debug)]
pub struct CompiledGrammar {
    pub grammar: Grammar<char>,
    pub rules: Vec<PatternRef>,
}

impl CompiledGrammar {
    /// The pattern of the rule called `name`.
    pub fn rule(&self, name: &str) -> Option<PatternRef> {
        self.grammar.find(name)
    }

    /// Every rule rendered back to EBNF.
    pub fn print(&self) -> Result<String, crate::Error> {
        self.grammar.print_rules(&self.rules)
    }
}

pub fn lower(rules: &[Rule], options: &LowerOptions) -> Result<CompiledGrammar, ParseError> {
    let mut lowerer = Lowerer {
        grammar: Grammar::new(),
        names: HashMap::new(),
        options,
    };

    let mut handles = Vec::with_capacity(rules.len());
    for rule in rules {
        if lowerer.names.contains_key(&rule.name) {
            return Err(ParseError::new(
                rule.line,
                ErrorKind::DuplicateRule(rule.name.clone()),
            ));
        }
        let handle = lowerer.grammar.declare();
        lowerer.names.insert(rule.name.clone(), handle);
        handles.push(handle);
    }

    for (rule, &handle) in rules.iter().zip(&handles) {
        let pattern = lowerer
            .make(&rule.body)?
            .with_id(rule.name.as_str())
            .with_logging(options.log_mismatches);
        lowerer
            .grammar
            .define(handle, pattern)
            .map_err(|_| ParseError::new(rule.line, ErrorKind::DuplicateRule(rule.name.clone())))?;
    }

    log::debug!(
        "lowered {} rule(s) into {} pattern(s)",
        handles.len(),
        lowerer.grammar.len()
    );
    Ok(CompiledGrammar {
        grammar: lowerer.grammar,
        rules: handles,
    })
}

struct Lowerer<'o> {
    grammar: Grammar<char>,
    names: HashMap<String, PatternRef>,
    options: &'o LowerOptions,
}

impl Lowerer<'_> {
    /// A handle for `expr`: the rule itself for references, a new anonymous
    /// pattern otherwise.
    fn build(&mut self, expr: &Expr) -> Result<PatternRef, ParseError> {
        if let Expr::Ref { name, line } = expr {
            return self
                .names
                .get(name)
                .copied()
                .ok_or_else(|| ParseError::new(*line, ErrorKind::UndefinedRule(name.clone())));
        }
        let pattern = self.make(expr)?;
        Ok(self
            .grammar
            .add(pattern.with_logging(self.options.log_mismatches)))
    }

    fn build_all(&mut self, exprs: &[Expr]) -> Result<Vec<PatternRef>, ParseError> {
        exprs.iter().map(|e| self.build(e)).collect()
    }

    fn make(&mut self, expr: &Expr) -> Result<Pattern<char>, ParseError> {
        let pattern = match expr {
            // a rule needs a node of its own to carry its id
            Expr::Ref { .. } => Pattern::concatenation(vec![self.build(expr)?]),
            Expr::Literal { text, case_fold } => literal(text, *case_fold),
            Expr::Class { set, source } => {
                let set = set.clone();
                let pool = sample_pool(&set);
                let pattern = Pattern::entity(move |c: &char| charset_matches(&set, *c))
                    .with_display(source.as_str());
                if pool.is_empty() {
                    pattern
                } else {
                    pattern.with_generator(move |rng| pool[rng.gen_range(0..pool.len())])
                }
            }
            Expr::AnyChar => Pattern::entity(|_: &char| true)
                .with_generator(|rng| char::from(rng.gen_range(0x20u8..=0x7e)))
                .with_display("."),
            Expr::End => Pattern::end().with_display("$"),
            Expr::Concat(items) => Pattern::concatenation(self.build_all(items)?),
            Expr::Alt(items) => Pattern::alternation(self.build_all(items)?),
            Expr::Repeat { expr, min, max } => {
                Pattern::repetition(self.build(expr)?, *min, *max)
                    .with_generation_ceiling(self.options.generation_ceiling)
            }
            Expr::Except { must, except } => {
                Pattern::exception(self.build(must)?, self.build(except)?)
            }
        };
        Ok(pattern)
    }
}

fn literal(text: &str, case_fold: bool) -> Pattern<char> {
    let chars: Vec<char> = text.chars().collect();
    if case_fold {
        Pattern::vector_by(|a: &char, b: &char| a.eq_ignore_ascii_case(b), chars)
            .with_display(format!("'{text}'"))
    } else {
        Pattern::vector(chars).with_display(format!("\"{text}\""))
    }
}

#[cfg(test)]
mod tests {
    use crate::ebnf::compile;
    use crate::mismatch::{StackLogger, VoidLogger};
    use crate::text_reader::TextReader;

    use super::*;

    fn compiled(text: &str) -> CompiledGrammar {
        compile(text, &LowerOptions::default()).expect("grammar should compile")
    }

    fn matches(g: &CompiledGrammar, rule: &str, input: &str) -> Option<String> {
        let root = g.rule(rule).expect("rule exists");
        let mut reader = TextReader::new(input);
        g.grammar
            .match_at(root, &mut reader, &mut VoidLogger)
            .unwrap()
            .map(|m| m.text())
    }

    #[test]
    fn forward_and_recursive_references() {
        let g = compiled(
            "list = \"[\", items?, \"]\"\n\
             items = item, (\",\", item)*\n\
             item = ?digit?+ | list\n",
        );
        assert_eq!(matches(&g, "list", "[1,[2,3],[]]!").as_deref(), Some("[1,[2,3],[]]"));
        assert_eq!(matches(&g, "list", "[1,]"), None);
    }

    #[test]
    fn bare_reference_rule_keeps_its_id() {
        let g = compiled("digits = [0-9]+\nnumber = digits\n");
        let root = g.rule("number").unwrap();
        let mut reader = TextReader::new("42");
        let m = g
            .grammar
            .match_at(root, &mut reader, &mut VoidLogger)
            .unwrap()
            .unwrap();
        assert_eq!(m.id, "number");
        assert_eq!(m.components[0].id, "digits");
    }

    #[test]
    fn case_folded_literal() {
        let g = compiled("kw = 'select'");
        assert_eq!(matches(&g, "kw", "SELECT").as_deref(), Some("SELECT"));
        assert_eq!(matches(&g, "kw", "selekt"), None);
    }

    #[test]
    fn exception_and_any_char() {
        let g = compiled("body = (. - \"*/\")*\ncomment = \"/*\", body, \"*/\"");
        assert_eq!(
            matches(&g, "comment", "/* a * b */ rest").as_deref(),
            Some("/* a * b */")
        );
    }

    #[test]
    fn end_anchor() {
        let g = compiled("whole = [a-z]+, $");
        assert_eq!(matches(&g, "whole", "abc").as_deref(), Some("abc"));
        assert_eq!(matches(&g, "whole", "abc1"), None);
    }

    #[test]
    fn duplicate_and_undefined_rules() {
        let err = compile("a = \"x\"\na = \"y\"", &LowerOptions::default()).unwrap_err();
        assert_eq!(err, ParseError::new(2, ErrorKind::DuplicateRule("a".into())));

        let err = compile("a = \"x\", b", &LowerOptions::default()).unwrap_err();
        assert_eq!(err, ParseError::new(1, ErrorKind::UndefinedRule("b".into())));
    }

    #[test]
    fn logging_option_reaches_every_pattern() {
        let options = LowerOptions {
            log_mismatches: true,
            ..LowerOptions::default()
        };
        let g = compile("pair = \"a\", \"b\"", &options).unwrap();
        let root = g.rule("pair").unwrap();
        let mut reader = TextReader::new("ac");
        let mut log = StackLogger::new();
        assert!(g.grammar.match_at(root, &mut reader, &mut log).unwrap().is_none());
        let ids: Vec<_> = log.mismatches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["", "pair"]);
    }

    #[test]
    fn print_round_trip() {
        let text = "\
            number = [0-9]+, (\".\", [0-9]+)?\n\
            sign = \"+\" | \"-\"\n\
            signed = sign?, number\n\
            word = (?alpha? - 'x')*\n\
            pair = 2 * word\n\
            range = (2 * number, 3 * number?)\n\
            eof = $\n\
            alias = signed\n";
        let first = compiled(text).print().unwrap();
        let second = compiled(&first).print().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("sign = (\"+\" | \"-\")\n"));
        assert!(first.contains("word = (?alpha? - 'x')*\n"));
        assert!(first.contains("alias = (signed)\n"));
    }

    #[test]
    fn printed_counted_forms_accept_the_same_inputs() {
        let mut g = Grammar::new();
        let a = g.add(Pattern::vector(vec!['a']).with_display("\"a\""));
        let between = g.add(Pattern::repetition(a, 2, 5).with_id("between"));
        let upto = g.add(Pattern::repetition(a, 0, 3).with_id("upto"));
        let text = g.print_rules(&[between, upto]).unwrap();
        assert_eq!(text, "between = (2 * \"a\", 3 * \"a\"?)\nupto = 3 * \"a\"?\n");

        let again = compiled(&text);
        assert_eq!(again.print().unwrap(), text);
        for (root, name) in [(between, "between"), (upto, "upto")] {
            for input in ["", "a", "aa", "aaa", "aaaaaaa", "b"] {
                let mut reader = TextReader::new(input);
                let direct = g
                    .match_at(root, &mut reader, &mut VoidLogger)
                    .unwrap()
                    .map(|m| m.text());
                assert_eq!(matches(&again, name, input), direct, "{name} on {input:?}");
            }
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = compile("r = 0 * \"a\"", &LowerOptions::default()).unwrap_err();
        assert_eq!(err, ParseError::new(1, ErrorKind::InvalidNumber));
    }
}
