//! Render patterns as EBNF text.
//!
//! | Pattern                       | Rendering                      |
//! |-------------------------------|--------------------------------|
//! | named child                   | its bare id                    |
//! | concatenation                 | `(a, b, c)`                    |
//! | alternation                   | `(a \| b \| c)`                |
//! | repetition `(0, unbounded)`   | `P*`                           |
//! | repetition `(0, 1)`           | `P?`                           |
//! | repetition `(1, unbounded)`   | `P+`                           |
//! | repetition `(n, n)`           | `n * P`                        |
//! | repetition `(n, unbounded)`   | `(n * P, P*)`                  |
//! | repetition `(n, m)`           | `(n * P, (m-n) * P?)`          |
//! | exception                     | `A - B`                        |
//! | entity, vector, end           | the pattern's display string   |

use itertools::Itertools;

use crate::error::Error;

use super::ast::{Kind, Pattern};
use super::grammar::{Grammar, PatternRef};

impl<T> Grammar<T> {
    /// The EBNF body of `root`, without its id.
    pub fn print(&self, root: PatternRef) -> Result<String, Error> {
        self.body(self.get(root)?)
    }

    /// One `id = body` line per rule.
    pub fn print_rules(&self, rules: &[PatternRef]) -> Result<String, Error> {
        let mut out = String::new();
        for &rule in rules {
            let pattern = self.get(rule)?;
            out.push_str(pattern.id());
            out.push_str(" = ");
            out.push_str(&self.body(pattern)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Reference to a child: its id when named, its body otherwise.
    fn fragment(&self, handle: PatternRef) -> Result<String, Error> {
        let pattern = self.get(handle)?;
        if pattern.is_anonymous() {
            self.body(pattern)
        } else {
            Ok(pattern.id().to_string())
        }
    }

    /// Operand of a repetition or exception. Inline forms that would bind
    /// differently are parenthesised.
    fn operand(&self, handle: PatternRef) -> Result<String, Error> {
        let pattern = self.get(handle)?;
        let text = self.fragment(handle)?;
        let needs_group = pattern.is_anonymous()
            && match pattern.kind {
                Kind::Exception { .. } => true,
                // counted forms `n * P` and `n * P?`
                Kind::Repetition { min, max, .. } => {
                    (min == max && min > 0) || (min == 0 && max >= 2)
                }
                _ => false,
            };
        Ok(if needs_group { format!("({text})") } else { text })
    }

    fn join(&self, children: &[PatternRef], sep: &str) -> Result<String, Error> {
        children
            .iter()
            .map(|&c| self.fragment(c))
            .process_results(|mut parts| parts.join(sep))
    }

    fn body(&self, pattern: &Pattern<T>) -> Result<String, Error> {
        let text = match &pattern.kind {
            Kind::Entity { .. } | Kind::Vector { .. } | Kind::End => pattern.config.display.clone(),
            Kind::Concatenation(children) => format!("({})", self.join(children, ", ")?),
            Kind::Alternation { children, .. } => format!("({})", self.join(children, " | ")?),
            Kind::Repetition { child, min, max, .. } => {
                let p = self.operand(*child)?;
                match (*min, *max) {
                    (0, 0) => format!("{p}*"),
                    (0, 1) => format!("{p}?"),
                    (1, 0) => format!("{p}+"),
                    (0, m) => format!("{m} * {p}?"),
                    (n, m) if n == m => format!("{n} * {p}"),
                    (n, 0) => format!("({n} * {p}, {p}*)"),
                    (n, m) => format!("({n} * {p}, {} * {p}?)", m - n),
                }
            }
            Kind::Exception { must, except } => {
                format!("{} - {}", self.operand(*must)?, self.operand(*except)?)
            }
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(g: &mut Grammar<char>, text: &str) -> PatternRef {
        g.add(Pattern::vector(text.chars().collect::<Vec<_>>()).with_display(format!("\"{text}\"")))
    }

    #[test]
    fn named_children_print_as_ids() {
        let mut g = Grammar::new();
        let a = g.add(Pattern::vector(vec!['a']).with_id("a"));
        let b = terminal(&mut g, "b");
        let seq = g.add(Pattern::concatenation(vec![a, b]).with_id("seq"));
        let alt = g.add(Pattern::alternation(vec![seq, a]).with_id("alt"));

        assert_eq!(g.print(seq).unwrap(), "(a, \"b\")");
        assert_eq!(g.print(alt).unwrap(), "(seq | a)");
    }

    #[test]
    fn repetition_forms() {
        let mut g = Grammar::new();
        let x = g.add(Pattern::vector(vec!['x']).with_id("x"));
        let cases = [
            (0, 0, "x*"),
            (0, 1, "x?"),
            (1, 0, "x+"),
            (3, 3, "3 * x"),
            (2, 0, "(2 * x, x*)"),
            (2, 5, "(2 * x, 3 * x?)"),
            (0, 4, "4 * x?"),
        ];
        for (min, max, expected) in cases {
            let rep = g.add(Pattern::repetition(x, min, max));
            assert_eq!(g.print(rep).unwrap(), expected, "({min}, {max})");
        }
    }

    #[test]
    fn exception_and_grouping() {
        let mut g = Grammar::new();
        let letter = g.add(Pattern::entity(|c: &char| c.is_alphabetic()).with_display("?alpha?"));
        let q = terminal(&mut g, "q");
        let not_q = g.add(Pattern::exception(letter, q));
        let many = g.add(Pattern::any(not_q));
        let pair = g.add(Pattern::exactly(q, 2));
        let pairs = g.add(Pattern::one_or_more(pair));

        assert_eq!(g.print(not_q).unwrap(), "?alpha? - \"q\"");
        assert_eq!(g.print(many).unwrap(), "(?alpha? - \"q\")*");
        assert_eq!(g.print(pairs).unwrap(), "(2 * \"q\")+");

        let upto = g.add(Pattern::repetition(q, 0, 3));
        let many_upto = g.add(Pattern::any(upto));
        assert_eq!(g.print(many_upto).unwrap(), "(3 * \"q\"?)*");
    }

    #[test]
    fn print_rules_lines() {
        let mut g = Grammar::new();
        let digit = g.add(
            Pattern::entity(|c: &char| c.is_ascii_digit())
                .with_id("digit")
                .with_display("[0-9]"),
        );
        let number = g.add(Pattern::one_or_more(digit).with_id("number"));
        let eof = g.add(Pattern::end().with_id("eof").with_display("$"));
        let file = g.add(Pattern::concatenation(vec![number, eof]).with_id("file"));

        assert_eq!(
            g.print_rules(&[digit, number, file, eof]).unwrap(),
            "digit = [0-9]\nnumber = digit+\nfile = (number, eof)\neof = $\n"
        );
    }

    #[test]
    fn end_without_display_is_empty() {
        let mut g = Grammar::<char>::new();
        let end = g.add(Pattern::end());
        assert_eq!(g.print(end).unwrap(), "");
    }

    #[test]
    fn undefined_child_is_error() {
        let mut g = Grammar::<char>::new();
        let missing = g.declare();
        let seq = g.add(Pattern::concatenation(vec![missing]));
        assert!(matches!(g.print(seq), Err(Error::UndefinedPattern(_))));
    }
}
