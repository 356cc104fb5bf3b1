//! Pattern matcher: recursive descent with backtracking over a [`Reader`].
//!
//! Each pattern kind decides for itself how to recover the reader position
//! after a failed child:
//!
//! - alternations reset to their own start before every branch,
//! - repetitions undo the failed attempt that ended the loop,
//! - exceptions reset before trying the `must` pattern,
//! - concatenations, entities and vectors leave the reader where it stopped;
//!   their caller recovers.
//!
//! Stream errors are returned as `Err` and abort the whole match. An ordinary
//! failure to match is `Ok(None)`.

use crate::error::Error;
use crate::match_result::Match;
use crate::mismatch::{Logger, Mismatch, MismatchReason};
use crate::reader::Reader;

use super::ast::{Equality, Kind, Pattern, Predicate};
use super::grammar::{Grammar, PatternRef};

type Outcome<T, P> = Result<Option<Match<T, P>>, Error>;

// ─── Public API ─────────────────────────────────────────────────────────────

impl<T> Grammar<T> {
    /// Match `root` at the reader's current position.
    ///
    /// On success the reader is left at the end of the match. On an ordinary
    /// mismatch the reader position is unspecified; callers that want to try
    /// something else should save and restore it.
    pub fn match_at<R>(
        &self,
        root: PatternRef,
        reader: &mut R,
        logger: &mut dyn Logger<T, R::Position>,
    ) -> Outcome<T, R::Position>
    where
        R: Reader<Token = T> + ?Sized,
    {
        Matcher {
            grammar: self,
            reader,
            logger,
        }
        .match_pattern(root)
    }

    /// Find every non-overlapping match of `root` in the rest of the stream.
    ///
    /// Tokens where `root` does not match are skipped one at a time. A
    /// zero-width match also skips one token so the scan always advances.
    pub fn scan<R>(
        &self,
        root: PatternRef,
        reader: &mut R,
        logger: &mut dyn Logger<T, R::Position>,
    ) -> Result<Vec<Match<T, R::Position>>, Error>
    where
        R: Reader<Token = T> + ?Sized,
    {
        let mut results = Vec::new();
        let mut skipped = 0usize;

        while !reader.finished() {
            let start = reader.position()?;
            match self.match_at(root, reader, logger)? {
                Some(m) => {
                    log::trace!("scan: match {:?}..{:?}", m.begin, m.end);
                    let zero_width = reader.length(&m.begin, &m.end) == 0;
                    results.push(m);
                    if zero_width {
                        reader.skip(1)?;
                    }
                }
                None => {
                    reader.set_position(start)?;
                    reader.skip(1)?;
                    skipped += 1;
                }
            }
        }

        log::debug!(
            "scan: {} match(es), {} token(s) skipped",
            results.len(),
            skipped
        );
        Ok(results)
    }
}

// ─── Core matching functions ─────────────────────────────────────────────────

struct Matcher<'g, 'r, T, R: Reader<Token = T> + ?Sized> {
    grammar: &'g Grammar<T>,
    reader: &'r mut R,
    logger: &'r mut dyn Logger<T, R::Position>,
}

impl<'g, T, R: Reader<Token = T> + ?Sized> Matcher<'g, '_, T, R> {
    fn match_pattern(&mut self, handle: PatternRef) -> Outcome<T, R::Position> {
        let grammar: &'g Grammar<T> = self.grammar;
        let pattern = grammar.get(handle)?;
        match &pattern.kind {
            Kind::Entity { predicate, .. } => self.match_entity(pattern, predicate),
            Kind::Vector { tokens, eq } => self.match_vector(pattern, tokens, eq),
            Kind::Concatenation(children) => self.match_concatenation(pattern, children),
            Kind::Alternation {
                children,
                orthogonal,
            } => self.match_alternation(pattern, children, *orthogonal),
            Kind::Repetition { child, min, max, .. } => {
                self.match_repetition(pattern, *child, *min, *max)
            }
            Kind::Exception { must, except } => self.match_exception(pattern, *must, *except),
            Kind::End => self.match_end(pattern),
        }
    }

    /// Report a mismatch if `pattern` has logging enabled.
    ///
    /// The record is only built when it will actually be logged.
    fn log(
        &mut self,
        pattern: &Pattern<T>,
        mismatch: impl FnOnce() -> Mismatch<T, R::Position>,
    ) {
        if pattern.config.logging {
            self.logger.log_mismatch(mismatch());
        }
    }

    fn match_entity(
        &mut self,
        pattern: &Pattern<T>,
        predicate: &Predicate<T>,
    ) -> Outcome<T, R::Position> {
        let begin = self.reader.position()?;
        let token = self.reader.read()?;
        let end = self.reader.position()?;

        let reason = match token {
            Some(t) if predicate(&t) => {
                let value = self.reader.range(&begin, &end)?;
                return Ok(Some(Match::leaf(pattern.id(), begin, end, value)));
            }
            Some(_) => MismatchReason::UnexpectedToken,
            None => MismatchReason::EndOfInput,
        };

        self.log(pattern, || Mismatch::new(pattern.id(), begin, end, reason));
        Ok(None)
    }

    fn match_vector(
        &mut self,
        pattern: &Pattern<T>,
        tokens: &[T],
        eq: &Equality<T>,
    ) -> Outcome<T, R::Position> {
        let begin = self.reader.position()?;

        for expected in tokens {
            let reason = match self.reader.read()? {
                Some(actual) if eq(expected, &actual) => continue,
                Some(_) => MismatchReason::UnexpectedToken,
                None => MismatchReason::EndOfInput,
            };
            let end = self.reader.position()?;
            self.log(pattern, || Mismatch::new(pattern.id(), begin, end, reason));
            return Ok(None);
        }

        let end = self.reader.position()?;
        let value = self.reader.range(&begin, &end)?;
        Ok(Some(Match::leaf(pattern.id(), begin, end, value)))
    }

    fn match_concatenation(
        &mut self,
        pattern: &Pattern<T>,
        children: &[PatternRef],
    ) -> Outcome<T, R::Position> {
        let grammar: &'g Grammar<T> = self.grammar;
        let begin = self.reader.position()?;
        let mut matches = Vec::with_capacity(children.len());

        for &child in children {
            let sub_begin = self.reader.position()?;
            match self.match_pattern(child)? {
                Some(m) => matches.push(m),
                None => {
                    let sub_end = self.reader.position()?;
                    let child_id = grammar.id_of(child)?;
                    self.log(pattern, || {
                        Mismatch::new(
                            pattern.id(),
                            begin,
                            sub_end.clone(),
                            MismatchReason::SubPatternFailed,
                        )
                        .with_sub_mismatch(Match::empty(child_id, sub_begin, sub_end))
                        .with_sub_matches(matches)
                    });
                    return Ok(None);
                }
            }
        }

        let end = self.reader.position()?;
        Ok(Some(Match::composite(pattern.id(), begin, end, matches)))
    }

    /// Longest match wins; among equally long matches the earliest branch wins.
    fn match_alternation(
        &mut self,
        pattern: &Pattern<T>,
        children: &[PatternRef],
        orthogonal: bool,
    ) -> Outcome<T, R::Position> {
        let begin = self.reader.position()?;
        let mut best: Option<(usize, Match<T, R::Position>)> = None;
        let mut furthest = begin.clone();

        for &child in children {
            self.reader.set_position(begin.clone())?;

            let Some(m) = self.match_pattern(child)? else {
                let reached = self.reader.position()?;
                if reached > furthest {
                    furthest = reached;
                }
                continue;
            };

            let end = self.reader.position()?;
            let len = self.reader.length(&begin, &end);
            let candidate = Match::alternative(pattern.id(), begin.clone(), end, m);

            if orthogonal {
                return Ok(Some(candidate));
            }
            if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
                best = Some((len, candidate));
            }
        }

        match best {
            Some((_, m)) => {
                self.reader.set_position(m.end.clone())?;
                Ok(Some(m))
            }
            None => {
                self.log(pattern, || {
                    Mismatch::new(
                        pattern.id(),
                        begin.clone(),
                        furthest,
                        MismatchReason::NoAlternative,
                    )
                });
                self.reader.set_position(begin)?;
                Ok(None)
            }
        }
    }

    fn match_repetition(
        &mut self,
        pattern: &Pattern<T>,
        child: PatternRef,
        min: usize,
        max: usize,
    ) -> Outcome<T, R::Position> {
        let begin = self.reader.position()?;
        let mut matches = Vec::new();

        while max == 0 || matches.len() < max {
            if self.reader.finished() {
                break;
            }

            let reset = self.reader.position()?;
            match self.match_pattern(child)? {
                Some(m) => {
                    let progressed = self.reader.length(&m.begin, &m.end) > 0;
                    matches.push(m);
                    // an unbounded loop over a zero-width match would never end
                    if max == 0 && !progressed {
                        break;
                    }
                }
                None => {
                    self.reader.set_position(reset)?;
                    break;
                }
            }
        }

        if matches.len() < min {
            let end = self.reader.position()?;
            let found = matches.len();
            self.log(pattern, || {
                Mismatch::new(
                    pattern.id(),
                    begin.clone(),
                    end,
                    MismatchReason::TooFewRepetitions {
                        expected: min,
                        found,
                    },
                )
                .with_sub_matches(matches)
            });
            self.reader.set_position(begin)?;
            return Ok(None);
        }

        let end = self.reader.position()?;
        Ok(Some(Match::composite(pattern.id(), begin, end, matches)))
    }

    fn match_exception(
        &mut self,
        pattern: &Pattern<T>,
        must: PatternRef,
        except: PatternRef,
    ) -> Outcome<T, R::Position> {
        let begin = self.reader.position()?;

        if let Some(evidence) = self.match_pattern(except)? {
            let end = self.reader.position()?;
            self.log(pattern, || {
                Mismatch::new(pattern.id(), begin, end, MismatchReason::ExceptionMatched)
                    .with_sub_mismatch(evidence)
            });
            return Ok(None);
        }

        self.reader.set_position(begin)?;
        self.match_pattern(must)
    }

    fn match_end(&mut self, pattern: &Pattern<T>) -> Outcome<T, R::Position> {
        let pos = self.reader.position()?;
        if self.reader.finished() {
            return Ok(Some(Match::empty(pattern.id(), pos.clone(), pos)));
        }
        self.log(pattern, || {
            Mismatch::new(pattern.id(), pos.clone(), pos, MismatchReason::NotAtEnd)
        });
        Ok(None)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
