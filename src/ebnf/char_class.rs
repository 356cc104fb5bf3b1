//! Character class membership and sampling.

use phf::{Map, phf_map};

use super::ast::{CharClass, CharSet, CharSetKind};

/// Classes available as `? name ?`.
pub const NAMED_CLASSES: Map<&'static str, CharSetKind> = phf_map! {
    "alpha" => CharSetKind::Alpha,
    "upper" => CharSetKind::Upper,
    "lower" => CharSetKind::Lower,
    "digit" => CharSetKind::Numeric,
    "space" => CharSetKind::Space,
    "punct" => CharSetKind::Punct,
    "printable" => CharSetKind::Printable,
    "any" => CharSetKind::Any,
};

/// Upper bound on how many characters of one range a sample pool takes when
/// the set has no printable ASCII member.
const RANGE_POOL_LIMIT: u32 = 256;

/// Test whether `ch` is a member of `cs`.
pub fn charset_matches(cs: &CharSet, ch: char) -> bool {
    let base = kind_matches(&cs.kind, ch);
    if cs.negated { !base } else { base }
}

fn kind_matches(kind: &CharSetKind, ch: char) -> bool {
    match kind {
        CharSetKind::Alpha => ch.is_alphabetic(),
        CharSetKind::Upper => ch.is_uppercase(),
        CharSetKind::Lower => ch.is_lowercase(),
        CharSetKind::Numeric => ch.is_ascii_digit(),
        CharSetKind::Space => ch.is_whitespace(),
        CharSetKind::Punct => ch.is_ascii_punctuation(),
        CharSetKind::Printable => ('\x20'..='\x7e').contains(&ch),
        CharSetKind::Any => true,
        CharSetKind::Custom(classes) => classes.iter().any(|c| char_in_class(c, ch)),
    }
}

/// Test whether `ch` falls within a single `CharClass`.
pub fn char_in_class(class: &CharClass, ch: char) -> bool {
    match class {
        CharClass::Single(c) => *c == ch,
        CharClass::Range(lo, hi) => *lo <= ch && ch <= *hi,
    }
}

/// The characters generation draws from for `cs`.
///
/// Printable ASCII members when there are any. Otherwise the listed members
/// of a non-negated custom set, taking at most a bounded prefix of each range.
pub fn sample_pool(cs: &CharSet) -> Vec<char> {
    let printable: Vec<char> = ('\x20'..='\x7e')
        .filter(|&c| charset_matches(cs, c))
        .collect();
    if !printable.is_empty() || cs.negated {
        return printable;
    }

    let CharSetKind::Custom(classes) = &cs.kind else {
        return printable;
    };
    classes
        .iter()
        .flat_map(|class| match *class {
            CharClass::Single(c) => vec![c],
            CharClass::Range(lo, hi) => (lo..=hi).take(RANGE_POOL_LIMIT as usize).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(kind: CharSetKind) -> CharSet {
        CharSet {
            negated: false,
            kind,
        }
    }
    fn neg(kind: CharSetKind) -> CharSet {
        CharSet {
            negated: true,
            kind,
        }
    }

    #[test]
    fn alpha_matches_letters() {
        assert!(charset_matches(&cs(CharSetKind::Alpha), 'a'));
        assert!(charset_matches(&cs(CharSetKind::Alpha), 'Z'));
        assert!(!charset_matches(&cs(CharSetKind::Alpha), '5'));
    }

    #[test]
    fn negated_alpha_matches_non_letters() {
        assert!(charset_matches(&neg(CharSetKind::Alpha), '5'));
        assert!(!charset_matches(&neg(CharSetKind::Alpha), 'a'));
    }

    #[test]
    fn space_includes_tabs_and_newlines() {
        for ch in [' ', '\t', '\n'] {
            assert!(charset_matches(&cs(CharSetKind::Space), ch));
        }
        assert!(!charset_matches(&cs(CharSetKind::Space), '_'));
    }

    #[test]
    fn printable_range() {
        assert!(charset_matches(&cs(CharSetKind::Printable), ' '));
        assert!(charset_matches(&cs(CharSetKind::Printable), '~'));
        assert!(!charset_matches(&cs(CharSetKind::Printable), '\x01'));
        assert!(!charset_matches(&cs(CharSetKind::Printable), '\x7f'));
    }

    #[test]
    fn custom_range_and_single() {
        let set = cs(CharSetKind::Custom(vec![
            CharClass::Range('a', 'c'),
            CharClass::Single('_'),
        ]));
        assert!(charset_matches(&set, 'b'));
        assert!(charset_matches(&set, '_'));
        assert!(!charset_matches(&set, 'd'));
    }

    #[test]
    fn named_classes_resolve() {
        assert_eq!(NAMED_CLASSES.get("digit"), Some(&CharSetKind::Numeric));
        assert!(NAMED_CLASSES.get("vowel").is_none());
    }

    #[test]
    fn pools_hold_only_members() {
        let sets = [
            cs(CharSetKind::Upper),
            neg(CharSetKind::Numeric),
            cs(CharSetKind::Custom(vec![CharClass::Range('x', 'z')])),
        ];
        for set in &sets {
            let pool = sample_pool(set);
            assert!(!pool.is_empty());
            for &ch in &pool {
                assert!(charset_matches(set, ch), "{ch:?} not in {set:?}");
            }
        }
        assert_eq!(sample_pool(&cs(CharSetKind::Upper)).len(), 26);
    }

    #[test]
    fn non_ascii_custom_set_samples_its_members() {
        let set = cs(CharSetKind::Custom(vec![CharClass::Range('α', 'γ')]));
        assert_eq!(sample_pool(&set), vec!['α', 'β', 'γ']);
    }

    #[test]
    fn empty_sets_have_nothing_to_sample() {
        assert!(sample_pool(&neg(CharSetKind::Any)).is_empty());
        assert!(sample_pool(&cs(CharSetKind::Custom(vec![]))).is_empty());
    }
}
