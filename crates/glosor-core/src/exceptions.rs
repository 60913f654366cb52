//! Literal corrections for known-bad lines of the source documents.
//!
//! Every entry here is a documented exception to the general heuristics.
//! New layout quirks are fixed by adding rows, not by loosening the rules.

use crate::model::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl TextMatch {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            TextMatch::Exact(s) => text == *s,
            TextMatch::Prefix(s) => text.starts_with(s),
            TextMatch::Contains(s) => text.contains(s),
        }
    }
}

/// A line shape matched by token count and the text of selected tokens.
#[derive(Debug, Clone, Copy)]
pub struct LineMatch {
    /// Exact token count, if constrained.
    pub len: Option<usize>,
    /// (token index, expected text); separators never match.
    pub tokens: &'static [(usize, TextMatch)],
}

impl LineMatch {
    pub fn matches(&self, line: &[Token]) -> bool {
        if let Some(len) = self.len {
            if line.len() != len {
                return false;
            }
        }
        self.tokens.iter().all(|(index, m)| {
            line.get(*index)
                .and_then(Token::text)
                .is_some_and(|text| m.matches(text))
        })
    }
}

/// Multi-token word-list lines that are nevertheless wrapped tails of the
/// previous entry.
pub const FORCED_CONTINUATIONS: &[LineMatch] = &[
    LineMatch {
        len: Some(5),
        tokens: &[(4, TextMatch::Prefix("actress"))],
    },
    LineMatch {
        len: None,
        tokens: &[(0, TextMatch::Prefix("have you/has ("))],
    },
    LineMatch {
        len: Some(5),
        tokens: &[(0, TextMatch::Exact("nen"))],
    },
    LineMatch {
        len: Some(6),
        tokens: &[(0, TextMatch::Exact("massmediet, massmedier, massmedierna"))],
    },
    LineMatch {
        len: Some(5),
        tokens: &[
            (0, TextMatch::Exact("na")),
            (4, TextMatch::Exact("art museum")),
        ],
    },
    LineMatch {
        len: Some(5),
        tokens: &[(0, TextMatch::Exact("na")), (4, TextMatch::Prefix("path,"))],
    },
    LineMatch {
        len: Some(5),
        tokens: &[
            (0, TextMatch::Exact("stämt")),
            (4, TextMatch::Prefix("conform,")),
        ],
    },
    LineMatch {
        len: Some(5),
        tokens: &[
            (0, TextMatch::Exact("na")),
            (4, TextMatch::Contains("grandmother, step grandmother")),
        ],
    },
];

pub fn is_forced_continuation(line: &[Token]) -> bool {
    FORCED_CONTINUATIONS.iter().any(|m| m.matches(line))
}

/// A malformed word-list line replaced by explicit (Swedish, English) pairs.
#[derive(Debug, Clone, Copy)]
pub struct Substitution {
    pub first: TextMatch,
    /// Extra condition: at least this many tokens and a token matching at an index.
    pub guard: Option<(usize, usize, TextMatch)>,
    pub entries: &'static [(&'static str, &'static str)],
}

impl Substitution {
    pub fn matches(&self, line: &[Token]) -> bool {
        let first = line
            .first()
            .and_then(Token::text)
            .is_some_and(|text| self.first.matches(text));
        if !first {
            return false;
        }
        match self.guard {
            None => true,
            Some((min_len, index, m)) => {
                line.len() >= min_len
                    && line
                        .get(index)
                        .and_then(Token::text)
                        .is_some_and(|text| m.matches(text))
            }
        }
    }
}

pub const SUBSTITUTIONS: &[Substitution] = &[
    Substitution {
        first: TextMatch::Prefix("köra ("),
        guard: Some((8, 6, TextMatch::Prefix("in running, i.e"))),
        entries: &[(
            "köra (kör, körde, kört)",
            "to cover (in running, i.e ”to cover a mile”)",
        )],
    },
    Substitution {
        first: TextMatch::Prefix("Jag skriver till er f"),
        guard: None,
        entries: &[
            (
                "Jag skriver till er för att...",
                "I am writing to you in order to...",
            ),
            (
                "Anledningen till att jag skriver är...",
                "The reason I’m writing/write is...",
            ),
        ],
    },
    Substitution {
        first: TextMatch::Prefix("jag har alltid varit intresserad"),
        guard: None,
        entries: &[
            (
                "jag har alltid varit intresserad av...",
                "I have always been interested in...",
            ),
            ("jag är mycket intresserad av...", "I am very interested in..."),
        ],
    },
];

pub fn substitution_for(line: &[Token]) -> Option<&'static Substitution> {
    SUBSTITUTIONS.iter().find(|s| s.matches(line))
}

/// A word card before which the source document lost its chapter heading.
#[derive(Debug, Clone, Copy)]
pub struct ChapterInsertion {
    pub before_word: &'static str,
    pub chapter: u32,
    /// Skip the insertion when the preceding item is this word.
    pub unless_after: Option<&'static str>,
}

pub const CHAPTER_INSERTIONS: &[ChapterInsertion] = &[
    ChapterInsertion {
        before_word: "en aktie",
        chapter: 2,
        unless_after: None,
    },
    ChapterInsertion {
        before_word: "allergisk",
        chapter: 4,
        unless_after: None,
    },
    ChapterInsertion {
        before_word: "beredd",
        chapter: 7,
        unless_after: Some("behåller"),
    },
    ChapterInsertion {
        before_word: "alldeles",
        chapter: 9,
        unless_after: None,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixJoin {
    /// Drop the previous word's last character (a wrap hyphen), then append.
    ReplaceLast,
    Append,
}

/// Word cards that are wrapped tails of the previous card.
pub const SUFFIX_JOINS: &[(&str, SuffixJoin)] = &[
    ("anställningsintervju", SuffixJoin::ReplaceLast),
    ("arbetslivserfarenhet", SuffixJoin::Append),
    ("nämnare", SuffixJoin::Append),
];

pub fn suffix_join_for(word: &str) -> Option<SuffixJoin> {
    let word = word.trim();
    SUFFIX_JOINS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, join)| *join)
}

/// Chapter numbers the word-card extraction reads wrongly.
pub const CHAPTER_REMAP: &[(u32, u32)] = &[(44, 4), (45, 5), (46, 6)];

/// Chapter numbers printed with this leading noise lose it.
pub const CHAPTER_NOISE_PREFIX: &str = "144";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Separator, Token};

    fn run(text: &str) -> Token {
        Token::run(text, "F", 9.0)
    }

    fn sep() -> Token {
        Token::Sep(Separator::Space)
    }

    #[test]
    fn test_forced_continuation_needs_exact_length() {
        let line = vec![run("na"), sep(), run("x"), sep(), run("art museum")];
        assert!(is_forced_continuation(&line));

        let mut longer = line.clone();
        longer.push(run("more"));
        assert!(!is_forced_continuation(&longer));
    }

    #[test]
    fn test_forced_continuation_prefix_without_length() {
        let line = vec![run("have you/has (got)"), sep(), run("har du")];
        assert!(is_forced_continuation(&line));
    }

    #[test]
    fn test_separator_never_matches_text() {
        let line = vec![run("na"), sep(), run("x"), sep(), sep()];
        assert!(!is_forced_continuation(&line));
    }

    #[test]
    fn test_kora_substitution_guard() {
        let mut line = vec![
            run("köra (kör,"),
            sep(),
            run("körde"),
            sep(),
            run("kört)"),
            sep(),
            run("in running, i.e"),
        ];
        assert!(substitution_for(&line).is_none());

        line.push(run("to cover"));
        let sub = substitution_for(&line).unwrap();
        assert_eq!(sub.entries[0].0, "köra (kör, körde, kört)");
    }

    #[test]
    fn test_letter_phrases_substitution() {
        let line = vec![run("Jag skriver till er fö"), sep(), run("I am writing")];
        let sub = substitution_for(&line).unwrap();
        assert_eq!(sub.entries.len(), 2);
    }

    #[test]
    fn test_suffix_join_lookup_trims() {
        assert_eq!(
            suffix_join_for(" anställningsintervju "),
            Some(SuffixJoin::ReplaceLast)
        );
        assert_eq!(suffix_join_for("nämnare"), Some(SuffixJoin::Append));
        assert_eq!(suffix_join_for("täljare"), None);
    }

    #[test]
    fn test_chapter_tables_are_consistent() {
        for (from, to) in CHAPTER_REMAP {
            assert!(from > to);
        }
        for insertion in CHAPTER_INSERTIONS {
            assert!(insertion.chapter <= 18);
        }
    }
}
