//! Line reconstruction for the word lists.
//!
//! Physical lines are cleaned, wrapped entries are condensed back into a
//! single line, and every logical line is split into its Swedish and
//! English halves.

use crate::error::GlosorError;
use crate::exceptions;
use crate::model::{describe_line, Element, Line, LogicalEntry, Separator, TextRun, Token};

/// Drop trailing newline and empty separators.
fn trim_trailing(mut line: Line) -> Line {
    while matches!(
        line.last(),
        Some(Token::Sep(Separator::Newline | Separator::Empty))
    ) {
        line.pop();
    }
    line
}

fn count_separators(line: &[Token], kind: Separator) -> usize {
    line.iter().filter(|t| **t == Token::Sep(kind)).count()
}

/// Merge runs of the same font and size, even across separators.
///
/// `glue` inserts a space between merged texts. When the line carries no
/// space annotations, the last interior separator may end up trailing after
/// the merge; if the final two runs differ in font it is put back in front
/// of the last run so the language boundary survives.
fn join_similar(line: Line, has_space_sep: bool, glue: bool) -> Result<Line, GlosorError> {
    let last_sep = line
        .iter()
        .enumerate()
        .filter(|(i, t)| t.is_separator() && i + 1 < line.len())
        .map(|(i, _)| i)
        .last()
        .ok_or_else(|| GlosorError::MissingSeparator {
            line: describe_line(&line),
        })?;
    let last_sep_token = line[last_sep].clone();

    let mut joined: Line = Vec::with_capacity(line.len());
    let mut prev_run: Option<usize> = None;
    let mut last_sep_pos = 0;

    for (i, token) in line.into_iter().enumerate() {
        let run = match token {
            Token::Run(run) => run,
            sep => {
                if i == last_sep {
                    last_sep_pos = joined.len();
                }
                joined.push(sep);
                continue;
            }
        };

        if let Some(Token::Run(prev)) = prev_run.and_then(|p| joined.get_mut(p)) {
            if prev.same_style(&run.font, run.size) {
                if glue {
                    prev.text.push(' ');
                }
                prev.text.push_str(&run.text);
                continue;
            }
        }

        prev_run = Some(joined.len());
        joined.push(Token::Run(run));
    }

    if !has_space_sep && last_sep_pos + 1 == joined.len() {
        let runs: Vec<&TextRun> = joined.iter().filter_map(Token::as_run).collect();
        let last = match runs.as_slice() {
            [.., before, last] if before.font != last.font => Some(Token::Run((*last).clone())),
            _ => None,
        };
        if let Some(last) = last {
            if let Some(at) = joined.iter().position(|t| *t == last) {
                joined.insert(at, last_sep_token);
            }
        }
    }

    Ok(trim_trailing(joined))
}

/// A lone symbol or number, typically a page number.
fn is_page_artifact(run: &TextRun) -> bool {
    run.text
        .chars()
        .all(|c| !c.is_alphanumeric() || c.is_numeric())
}

/// Per-line cleanup.
///
/// Lines with separators get their same-style runs merged and consecutive
/// duplicates collapsed. Lines without separators are kept as they are,
/// except page number artifacts (dropped) and lines opening with a blank
/// run, which hold an English half printed before its Swedish half: those
/// are held back and emitted after the next line with separators.
pub fn cleanup_lines(elements: Vec<Element>) -> Result<Vec<Element>, GlosorError> {
    let mut cleaned = Vec::with_capacity(elements.len());
    let mut stashed: Option<Line> = None;

    for element in elements {
        let line = match element {
            Element::Line(line) => trim_trailing(line),
            other => {
                cleaned.push(other);
                continue;
            }
        };

        let spaces = count_separators(&line, Separator::Space);
        let empties = count_separators(&line, Separator::Empty);

        if spaces > 0 || empties > 0 {
            let mut joined = join_similar(line, spaces > 0, true)?;
            joined.dedup();
            cleaned.push(Element::Line(trim_trailing(joined)));

            if let Some(held) = stashed.take() {
                cleaned.push(Element::Line(held));
            }
            continue;
        }

        if let [Token::Run(only)] = line.as_slice() {
            if is_page_artifact(only) {
                log::debug!("dropping page artifact '{}'", only.text);
                continue;
            }
        }

        let starts_blank = line
            .first()
            .and_then(Token::as_run)
            .is_some_and(TextRun::is_blank);
        if starts_blank && line.len() > 1 {
            log::debug!("holding back swapped line: {}", describe_line(&line));
            stashed = Some(
                line.into_iter()
                    .filter(|t| t.as_run().is_some_and(|r| !r.is_blank()))
                    .collect(),
            );
            continue;
        }

        cleaned.push(Element::Line(line));
    }

    Ok(cleaned)
}

/// Fold wrapped lines back into the entry they belong to.
///
/// A line with a single token, a lone closing parenthesis after one token,
/// or a line listed in the forced-continuation table continues the
/// previous entry. A trailing hyphen on the previous entry is treated as
/// a wrap and removed; this may also hit real hyphenated compounds.
pub fn condense_two_liners(elements: Vec<Element>) -> Result<Vec<Element>, GlosorError> {
    let mut condensed: Vec<Element> = Vec::with_capacity(elements.len());

    for element in elements {
        let line = match element {
            Element::Line(line) => line,
            other => {
                condensed.push(other);
                continue;
            }
        };

        let closes_parenthesis = line.len() == 2 && line[1].text() == Some(")");
        if line.len() > 1 && !closes_parenthesis && !exceptions::is_forced_continuation(&line) {
            condensed.push(Element::Line(line));
            continue;
        }

        let prev = match condensed.last_mut() {
            Some(Element::Line(prev)) => prev,
            _ => {
                return Err(GlosorError::OrphanContinuation {
                    line: describe_line(&line),
                })
            }
        };

        let hyphenated = match prev.last_mut() {
            Some(Token::Run(run)) => {
                if run.text.ends_with('-') {
                    run.text.pop();
                    true
                } else {
                    false
                }
            }
            _ => {
                return Err(GlosorError::OrphanContinuation {
                    line: describe_line(&line),
                })
            }
        };

        let mut merged = std::mem::take(prev);
        if !hyphenated {
            merged.push(Token::Sep(Separator::Empty));
        }
        merged.extend(line);
        *prev = join_similar(merged, true, !hyphenated)?;
    }

    Ok(condensed)
}

/// Join run texts with single spaces, except right after `(` or before `)`.
fn join_runs<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut joined = String::new();
    for run in tokens.into_iter().filter_map(Token::as_run) {
        if !joined.is_empty() && !(joined.ends_with('(') || run.text.starts_with(')')) {
            joined.push(' ');
        }
        joined.push_str(&run.text);
    }
    joined.trim().to_string()
}

/// Split every logical line into a (Swedish, English) entry.
///
/// The language boundary is the first space annotation, or failing that
/// the last separator of any kind. Lines listed in the substitution table
/// are replaced by their literal entries.
pub fn split_entries(elements: Vec<Element>) -> Result<Vec<Element>, GlosorError> {
    let mut entries = Vec::with_capacity(elements.len());

    for element in elements {
        let line = match element {
            Element::Line(line) => line,
            other => {
                entries.push(other);
                continue;
            }
        };

        if let Some(substitution) = exceptions::substitution_for(&line) {
            for (swedish, english) in substitution.entries {
                entries.push(Element::Entry(LogicalEntry::new(*swedish, *english)));
            }
            continue;
        }

        let boundary = line
            .iter()
            .position(|t| *t == Token::Sep(Separator::Space))
            .or_else(|| line.iter().rposition(Token::is_separator))
            .ok_or_else(|| GlosorError::MissingSeparator {
                line: describe_line(&line),
            })?;

        let swedish = join_runs(&line[..boundary]);
        let english = join_runs(&line[boundary + 1..]);
        entries.push(Element::Entry(LogicalEntry { swedish, english }));
    }

    Ok(entries)
}

/// Move a closing parenthesis that spilled into the English half back.
pub fn reattach_parentheses(elements: Vec<Element>) -> Vec<Element> {
    elements
        .into_iter()
        .map(|element| match element {
            Element::Entry(entry) => match entry.english.trim().strip_prefix(')') {
                Some(rest) => Element::Entry(LogicalEntry {
                    swedish: format!("{})", entry.swedish),
                    english: rest.trim().to_string(),
                }),
                None => Element::Entry(entry),
            },
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Marker;

    const SV: &str = "MyriadPro-Bold";
    const EN: &str = "MyriadPro-Regular";

    fn sv(text: &str) -> Token {
        Token::run(text, SV, 9.0)
    }

    fn en(text: &str) -> Token {
        Token::run(text, EN, 9.0)
    }

    fn space() -> Token {
        Token::Sep(Separator::Space)
    }

    fn empty() -> Token {
        Token::Sep(Separator::Empty)
    }

    fn newline() -> Token {
        Token::Sep(Separator::Newline)
    }

    fn lines(elements: &[Element]) -> Vec<&Line> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::Line(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_trim_trailing_keeps_space() {
        let line = vec![sv("a"), space(), empty(), newline()];
        assert_eq!(trim_trailing(line), vec![sv("a"), space()]);
    }

    #[test]
    fn test_join_similar_merges_across_separators() {
        let line = vec![sv("en"), empty(), sv("bil"), space(), en("a car")];
        let joined = join_similar(line, true, true).unwrap();
        assert_eq!(joined, vec![sv("en bil"), empty(), space(), en("a car")]);
    }

    #[test]
    fn test_join_similar_without_interior_separator_is_fatal() {
        let line = vec![sv("a"), en("b"), space()];
        assert!(matches!(
            join_similar(line, true, true),
            Err(GlosorError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn test_join_similar_restores_language_boundary() {
        let line = vec![en("to be"), sv("vara"), empty(), sv("(är)")];
        let joined = join_similar(line, false, true).unwrap();
        assert_eq!(joined, vec![en("to be"), empty(), sv("vara (är)")]);

        let line = vec![sv("ett"), empty(), en("a"), empty(), en("house")];
        let joined = join_similar(line, false, true).unwrap();
        assert_eq!(joined, vec![sv("ett"), empty(), empty(), en("a house")]);
    }

    #[test]
    fn test_cleanup_merges_and_dedups() {
        let elements = vec![Element::Line(vec![
            sv("springa"),
            empty(),
            empty(),
            sv("(spring,"),
            space(),
            en("to run"),
            newline(),
        ])];
        let cleaned = cleanup_lines(elements).unwrap();
        assert_eq!(
            lines(&cleaned),
            vec![&vec![sv("springa (spring,"), empty(), space(), en("to run")]]
        );
    }

    #[test]
    fn test_cleanup_drops_page_artifacts() {
        let elements = vec![
            Element::Line(vec![sv("112"), newline()]),
            Element::Line(vec![sv("–")]),
            Element::Line(vec![sv("ord")]),
        ];
        let cleaned = cleanup_lines(elements).unwrap();
        assert_eq!(lines(&cleaned), vec![&vec![sv("ord")]]);
    }

    #[test]
    fn test_cleanup_emits_swapped_line_after_next_spaced_line() {
        let elements = vec![
            Element::Line(vec![Token::run(" ", EN, 9.0), en("a dog"), sv("en hund")]),
            Element::Marker(Marker::Page(3)),
            Element::Line(vec![sv("en katt"), space(), en("a cat")]),
        ];
        let cleaned = cleanup_lines(elements).unwrap();
        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0], Element::Marker(Marker::Page(3)));
        assert_eq!(
            cleaned[1],
            Element::Line(vec![sv("en katt"), space(), en("a cat")])
        );
        assert_eq!(cleaned[2], Element::Line(vec![en("a dog"), sv("en hund")]));
    }

    #[test]
    fn test_condense_hyphenated_wrap() {
        let elements = vec![
            Element::Line(vec![en("long-term"), space(), sv("lång-")]),
            Element::Line(vec![sv("siktig")]),
        ];
        let condensed = condense_two_liners(elements).unwrap();
        assert_eq!(
            condensed,
            vec![Element::Line(vec![en("long-term"), space(), sv("långsiktig")])]
        );
    }

    #[test]
    fn test_condense_plain_wrap_joins_with_space() {
        let elements = vec![
            Element::Line(vec![sv("boka"), space(), en("to book a")]),
            Element::Line(vec![en("table")]),
        ];
        let condensed = condense_two_liners(elements).unwrap();
        assert_eq!(
            condensed,
            vec![Element::Line(vec![sv("boka"), space(), en("to book a table")])]
        );
    }

    #[test]
    fn test_condense_closing_parenthesis_line() {
        let elements = vec![
            Element::Line(vec![sv("ge (ger,"), space(), en("to give")]),
            Element::Line(vec![sv("gav, gett"), sv(")")]),
        ];
        let condensed = condense_two_liners(elements).unwrap();
        assert_eq!(condensed.len(), 1);
    }

    #[test]
    fn test_condense_forced_continuation() {
        let elements = vec![
            Element::Line(vec![sv("konstmusé-"), space(), en("art")]),
            Element::Line(vec![sv("na"), space(), sv("x"), space(), en("art museum")]),
        ];
        let condensed = condense_two_liners(elements).unwrap();
        assert_eq!(condensed.len(), 1);
    }

    #[test]
    fn test_condense_after_marker_is_fatal() {
        let elements = vec![
            Element::Marker(Marker::Chapter(1)),
            Element::Line(vec![sv("siktig")]),
        ];
        assert!(matches!(
            condense_two_liners(elements),
            Err(GlosorError::OrphanContinuation { .. })
        ));
    }

    #[test]
    fn test_split_prefers_first_space_annotation() {
        let elements = vec![Element::Line(vec![
            sv("en bil"),
            empty(),
            space(),
            en("a car"),
            empty(),
            en("(vehicle)"),
        ])];
        let entries = split_entries(elements).unwrap();
        assert_eq!(
            entries,
            vec![Element::Entry(LogicalEntry::new("en bil", "a car (vehicle)"))]
        );
    }

    #[test]
    fn test_split_falls_back_to_last_separator() {
        let elements = vec![Element::Line(vec![
            sv("springa ("),
            empty(),
            sv("spring)"),
            empty(),
            en("to run"),
        ])];
        let entries = split_entries(elements).unwrap();
        assert_eq!(
            entries,
            vec![Element::Entry(LogicalEntry::new("springa (spring)", "to run"))]
        );
    }

    #[test]
    fn test_split_without_separator_is_fatal() {
        let elements = vec![Element::Line(vec![sv("ensam")])];
        assert!(split_entries(elements).is_err());
    }

    #[test]
    fn test_split_uses_substitution_table() {
        let elements = vec![Element::Line(vec![
            sv("jag har alltid varit intresserad av"),
            space(),
            en("I have always"),
        ])];
        let entries = split_entries(elements).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1],
            Element::Entry(LogicalEntry::new(
                "jag är mycket intresserad av...",
                "I am very interested in..."
            ))
        );
    }

    #[test]
    fn test_reattach_parentheses() {
        let elements = vec![Element::Entry(LogicalEntry::new(
            "ge (ger, gav, gett",
            " ) to give",
        ))];
        assert_eq!(
            reattach_parentheses(elements),
            vec![Element::Entry(LogicalEntry::new(
                "ge (ger, gav, gett)",
                "to give"
            ))]
        );
    }
}
