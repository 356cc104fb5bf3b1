//! Random sentence generation: the inverse of matching.
//!
//! Generation walks a pattern and writes tokens that the same pattern would
//! match. All randomness comes from the caller's RNG, so a seeded RNG gives a
//! reproducible sentence.

use rand::{Rng, RngCore};

use crate::error::Error;
use crate::writer::Writer;

use super::ast::Kind;
use super::grammar::{Grammar, PatternRef};

impl<T: Clone> Grammar<T> {
    /// Write a random sentence of `root` to `writer`.
    ///
    /// Entities without a generator write nothing. An alternation picks one
    /// branch uniformly; a repetition picks its count uniformly from
    /// `min..=max`, or `min..=min + generation_ceiling` when unbounded.
    pub fn generate<W>(
        &self,
        root: PatternRef,
        writer: &mut W,
        rng: &mut dyn RngCore,
    ) -> Result<(), Error>
    where
        W: Writer<T> + ?Sized,
    {
        let pattern = self.get(root)?;
        match &pattern.kind {
            Kind::Entity { generator, .. } => {
                if let Some(make_token) = generator {
                    let token = make_token(&mut *rng);
                    writer.write(&[token])?;
                }
            }
            Kind::Vector { tokens, .. } => writer.write(tokens)?,
            Kind::Concatenation(children) => {
                for &child in children {
                    self.generate(child, writer, rng)?;
                }
            }
            Kind::Alternation { children, .. } => {
                if !children.is_empty() {
                    let pick = rng.gen_range(0..children.len());
                    self.generate(children[pick], writer, rng)?;
                }
            }
            Kind::Repetition {
                child,
                min,
                max,
                generation_ceiling,
            } => {
                let upper = repeat_upper(*min, *max, *generation_ceiling);
                let count = rng.gen_range(*min..=upper);
                for _ in 0..count {
                    self.generate(*child, writer, rng)?;
                }
            }
            Kind::Exception { must, .. } => self.generate(*must, writer, rng)?,
            Kind::End => writer.finish()?,
        }
        Ok(())
    }
}

/// Largest repeat count generation may pick.
fn repeat_upper(min: usize, max: usize, ceiling: usize) -> usize {
    if max == 0 {
        min.saturating_add(ceiling)
    } else {
        max.max(min)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::mismatch::VoidLogger;
    use crate::pattern::Pattern;
    use crate::text_reader::TextReader;
    use crate::writer::BoundedWriter;

    use super::*;

    fn digit(g: &mut Grammar<char>) -> PatternRef {
        g.add(
            Pattern::entity(|c: &char| c.is_ascii_digit())
                .with_generator(|rng| char::from(b'0' + rng.gen_range(0..10u8))),
        )
    }

    #[test]
    fn generated_entity_matches_again() {
        let mut g = Grammar::new();
        let d = digit(&mut g);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut out = String::new();
            g.generate(d, &mut out, &mut rng).unwrap();
            assert_eq!(out.chars().count(), 1);

            let mut reader = TextReader::new(&out);
            let m = g.match_at(d, &mut reader, &mut VoidLogger).unwrap().unwrap();
            assert_eq!(m.text(), out);
        }
    }

    #[test]
    fn generated_sentences_match_their_grammar() {
        let mut g = Grammar::new();
        let d = digit(&mut g);
        let digits = g.add(Pattern::one_or_more(d));
        let dot = g.add(Pattern::vector(vec!['.']));
        let frac = g.add(Pattern::concatenation(vec![dot, digits]));
        let maybe_frac = g.add(Pattern::optional(frac));
        let plus = g.add(Pattern::vector(vec!['+']));
        let minus = g.add(Pattern::vector(vec!['-']));
        let sign = g.add(Pattern::alternation(vec![plus, minus]));
        let number = g.add(Pattern::concatenation(vec![sign, digits, maybe_frac]));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut out = Vec::new();
            g.generate(number, &mut out, &mut rng).unwrap();
            let text: String = out.iter().collect();

            let mut reader = TextReader::new(&text);
            let m = g.match_at(number, &mut reader, &mut VoidLogger).unwrap();
            assert_eq!(m.map(|m| m.text()), Some(text));
        }
    }

    #[test]
    fn repetition_count_stays_in_bounds() {
        let mut g = Grammar::new();
        let x = g.add(Pattern::vector(vec!['x']));
        let bounded = g.add(Pattern::repetition(x, 2, 4));
        let open = g.add(Pattern::repetition(x, 1, 0).with_generation_ceiling(3));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            let mut out = String::new();
            g.generate(bounded, &mut out, &mut rng).unwrap();
            assert!((2..=4).contains(&out.len()));

            let mut out = String::new();
            g.generate(open, &mut out, &mut rng).unwrap();
            assert!((1..=4).contains(&out.len()));
        }
    }

    #[test]
    fn unbounded_upper_saturates() {
        assert_eq!(repeat_upper(2, 0, 3), 5);
        assert_eq!(repeat_upper(2, 0, usize::MAX), usize::MAX);
        assert_eq!(repeat_upper(2, 4, usize::MAX), 4);
    }

    #[test]
    fn same_seed_same_sentence() {
        let mut g = Grammar::new();
        let d = digit(&mut g);
        let many = g.add(Pattern::any(d));

        let sample = |seed| {
            let mut out = String::new();
            g.generate(many, &mut out, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            out
        };
        assert_eq!(sample(9), sample(9));
    }

    #[test]
    fn exception_generates_must_and_end_finishes() {
        let mut g = Grammar::new();
        let a = g.add(Pattern::vector(vec!['a']));
        let b = g.add(Pattern::vector(vec!['b']));
        let not_b = g.add(Pattern::exception(a, b));
        let end = g.add(Pattern::end());
        let tail = g.add(Pattern::vector(vec!['z']));
        let root = g.add(Pattern::concatenation(vec![not_b, end, tail]));

        let mut out = BoundedWriter::new();
        g.generate(root, &mut out, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert!(out.finished());
        assert_eq!(out.tokens(), &['a']);
    }
}
