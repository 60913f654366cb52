use crate::error::GlosorError;
use crate::exceptions::{self, SuffixJoin};
use crate::model::{Element, Marker, Pair};
use crate::parsing::markers::CardItem;
use crate::translate::{translate_with_retry, RetryPolicy, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Chapter(u32),
    Classroom,
}

/// Markers seen so far in the stream.
///
/// Nothing is reset at chapter boundaries: the page and heading of the
/// previous chapter stay in effect until a new marker replaces them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerContext {
    pub section: Option<Section>,
    pub page: Option<u32>,
    pub heading: Option<String>,
}

impl MarkerContext {
    pub fn apply(&mut self, marker: &Marker) {
        match marker {
            Marker::Chapter(n) => self.section = Some(Section::Chapter(*n)),
            Marker::Classroom => self.section = Some(Section::Classroom),
            Marker::Page(n) => self.page = Some(*n),
            Marker::Heading(text) => self.heading = Some(text.clone()),
        }
    }
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `springa (spring, sprang, sprungit)` into the headword and its
/// conjugation. Text without both parentheses is returned unchanged.
pub fn split_conjugation(swedish: &str) -> Result<(String, Option<String>), GlosorError> {
    if !(swedish.contains('(') && swedish.contains(')')) {
        return Ok((swedish.to_string(), None));
    }

    let close = swedish
        .rfind(')')
        .ok_or_else(|| GlosorError::MalformedConjugation(swedish.to_string()))?;
    let open = swedish[..close]
        .rfind('(')
        .ok_or_else(|| GlosorError::MalformedConjugation(swedish.to_string()))?;

    let headword = format!("{} {}", &swedish[..open], &swedish[close + 1..]);
    let conjugation = &swedish[open + 1..close];
    Ok((squash_whitespace(&headword), Some(squash_whitespace(conjugation))))
}

fn has_unbalanced_parenthesis(text: &str) -> bool {
    text.contains('(') != text.contains(')')
}

/// Resolve word-list entries against the markers preceding them.
pub fn create_pairs(elements: Vec<Element>) -> Result<Vec<Pair>, GlosorError> {
    let mut context = MarkerContext::default();
    let mut pairs = Vec::new();

    for element in elements {
        let entry = match element {
            Element::Marker(marker) => {
                context.apply(&marker);
                continue;
            }
            Element::Entry(entry) => entry,
            Element::Line(line) => {
                return Err(GlosorError::MissingSeparator {
                    line: crate::model::describe_line(&line),
                })
            }
        };

        let (swedish, swedish_conjugation) = split_conjugation(&entry.swedish)?;
        if has_unbalanced_parenthesis(&swedish) || has_unbalanced_parenthesis(&entry.english) {
            return Err(GlosorError::UnbalancedParentheses {
                swedish: entry.swedish,
                english: entry.english,
            });
        }

        let (chapter, page) = match context.section {
            Some(Section::Chapter(n)) => (Some(n.to_string()), context.page.map(|p| p.to_string())),
            Some(Section::Classroom) => (None, None),
            None => return Err(GlosorError::NoChapter { swedish }),
        };

        pairs.push(Pair {
            chapter,
            page,
            text: None,
            swedish,
            swedish_conjugation,
            english: entry.english,
        });
    }

    Ok(pairs)
}

/// Chapter number after the known misreadings are corrected.
///
/// Stricter than a plain prefix strip: a bare `144`, or a `144` prefix
/// leaving a value above `max_chapter`, is an error rather than passed on.
fn correct_chapter(chapter: u32, max_chapter: u32) -> Result<u32, GlosorError> {
    if let Some((_, to)) = exceptions::CHAPTER_REMAP.iter().find(|(from, _)| *from == chapter) {
        return Ok(*to);
    }

    let digits = chapter.to_string();
    let chapter = match digits.strip_prefix(exceptions::CHAPTER_NOISE_PREFIX) {
        Some(rest) => rest
            .parse()
            .map_err(|_| GlosorError::ChapterOutOfRange(digits.clone()))?,
        None => chapter,
    };

    if chapter > max_chapter {
        return Err(GlosorError::ChapterOutOfRange(digits));
    }
    Ok(chapter)
}

/// Apply the word-card exception table: lost chapter headings, words
/// wrapped onto their own card, and misread chapter numbers.
pub fn apply_card_exceptions(
    items: Vec<CardItem>,
    max_chapter: u32,
) -> Result<Vec<CardItem>, GlosorError> {
    let mut cleaned: Vec<CardItem> = Vec::with_capacity(items.len());
    let mut previous_word: Option<String> = None;

    for item in items {
        match item {
            CardItem::Word(word) => {
                let insertion = exceptions::CHAPTER_INSERTIONS.iter().find(|ins| {
                    ins.before_word == word.text
                        && ins
                            .unless_after
                            .map_or(true, |after| previous_word.as_deref() != Some(after))
                });
                if let Some(insertion) = insertion {
                    log::debug!(
                        "inserting chapter {} before '{}'",
                        insertion.chapter,
                        word.text
                    );
                    cleaned.push(CardItem::Marker(Marker::Chapter(insertion.chapter)));
                }

                previous_word = Some(word.text.clone());

                if let Some(join) = exceptions::suffix_join_for(&word.text) {
                    match cleaned.last_mut() {
                        Some(CardItem::Word(prev)) => {
                            if join == SuffixJoin::ReplaceLast {
                                prev.text.pop();
                            }
                            prev.text.push_str(&word.text);
                        }
                        _ => return Err(GlosorError::OrphanSuffix { word: word.text }),
                    }
                    continue;
                }

                cleaned.push(CardItem::Word(word));
            }
            CardItem::Marker(Marker::Chapter(n)) => {
                previous_word = None;
                cleaned.push(CardItem::Marker(Marker::Chapter(correct_chapter(
                    n,
                    max_chapter,
                )?)));
            }
            CardItem::Marker(marker) => {
                previous_word = None;
                cleaned.push(CardItem::Marker(marker));
            }
        }
    }

    Ok(cleaned)
}

/// Resolve word cards against their chapter and heading, translating each
/// Swedish text when a translator is given.
pub fn create_cards(
    items: Vec<CardItem>,
    translator: Option<&dyn Translator>,
    retry: &RetryPolicy,
) -> Result<Vec<Pair>, GlosorError> {
    let mut context = MarkerContext::default();
    let mut pairs = Vec::new();

    for item in items {
        let word = match item {
            CardItem::Marker(marker) => {
                context.apply(&marker);
                continue;
            }
            CardItem::Word(word) => word,
        };

        let chapter = match context.section {
            Some(Section::Chapter(n)) => n.to_string(),
            _ => return Err(GlosorError::NoChapter { swedish: word.text }),
        };

        let english = match translator {
            Some(translator) => translate_with_retry(translator, &word.text, retry)?,
            None => String::new(),
        };

        pairs.push(Pair {
            chapter: Some(chapter),
            page: None,
            text: context.heading.clone(),
            swedish: word.text,
            swedish_conjugation: None,
            english,
        });
    }

    Ok(pairs)
}
