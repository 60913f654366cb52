pub mod apkg;
pub mod guid;
pub mod model;

use crate::model::Pair;
use crate::profile::schema::Variant;
use model::{NoteModel, ORDKORT_MODEL, ORDLISTA_MODEL};

const ORDLISTA_DECK_MULTIPLIER: i64 = 98293;
const ORDKORT_DECK_MULTIPLIER: i64 = 98294;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub guid: String,
    pub fields: Vec<String>,
    pub tags: Vec<String>,
}

/// A named deck of notes sharing one note model.
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub model: &'static NoteModel,
    pub notes: Vec<Note>,
}

impl Deck {
    pub fn new(name: &str, variant: Variant) -> Self {
        let (model, multiplier) = match variant {
            Variant::Ordlista => (&ORDLISTA_MODEL, ORDLISTA_DECK_MULTIPLIER),
            Variant::Ordkort => (&ORDKORT_MODEL, ORDKORT_DECK_MULTIPLIER),
        };
        Deck {
            id: guid::deck_id(name, multiplier),
            name: name.to_string(),
            model,
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, fields: Vec<String>, tags: Vec<String>) {
        let keys: Vec<&str> = self
            .model
            .guid_fields
            .iter()
            .filter_map(|i| fields.get(*i).map(String::as_str))
            .chain(std::iter::once(self.model.guid_salt))
            .collect();
        let guid = guid::guid_for(&keys);
        self.notes.push(Note { guid, fields, tags });
    }
}

/// Build a deck from extracted pairs.
pub fn build_deck(name: &str, variant: Variant, pairs: &[Pair]) -> Deck {
    let mut deck = Deck::new(name, variant);
    for pair in pairs {
        let (fields, tags) = match variant {
            Variant::Ordlista => ordlista_note(pair),
            Variant::Ordkort => ordkort_note(pair),
        };
        deck.add_note(fields, tags);
    }
    log::info!("built deck '{}' with {} notes", deck.name, deck.notes.len());
    deck
}

fn chapter_tag(pair: &Pair) -> Option<String> {
    pair.chapter.as_ref().map(|c| format!("Kapitel{c}"))
}

fn ordlista_note(pair: &Pair) -> (Vec<String>, Vec<String>) {
    let fields = vec![
        html_escape(&pair.swedish),
        pair.swedish_conjugation
            .as_deref()
            .map(html_escape)
            .unwrap_or_default(),
        html_escape(&pair.english),
        pair.chapter.clone().unwrap_or_default(),
        pair.page.clone().unwrap_or_default(),
    ];
    let tag = chapter_tag(pair).unwrap_or_else(|| "Klassrumfraser".to_string());
    (fields, vec![tag])
}

fn ordkort_note(pair: &Pair) -> (Vec<String>, Vec<String>) {
    let fields = vec![
        html_escape(&pair.swedish),
        html_escape(&pair.english),
        pair.chapter.clone().unwrap_or_default(),
        pair.text.clone().unwrap_or_default(),
    ];
    let mut tags: Vec<String> = chapter_tag(pair).into_iter().collect();
    if let Some(text) = pair.text.as_deref().filter(|t| !t.is_empty()) {
        tags.push(title_case(text).replace(' ', ""));
    }
    (fields, tags)
}

/// Escape `& < > " '` for HTML field content.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Upper-case the first letter of every word and lower-case the rest,
/// where a word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if previous_alpha {
            titled.extend(c.to_lowercase());
        } else {
            titled.extend(c.to_uppercase());
        }
        previous_alpha = c.is_alphabetic();
    }
    titled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(chapter: Option<&str>, page: Option<&str>, text: Option<&str>) -> Pair {
        Pair {
            chapter: chapter.map(String::from),
            page: page.map(String::from),
            text: text.map(String::from),
            swedish: "springa".into(),
            swedish_conjugation: Some("spring, sprang, sprungit".into()),
            english: "to run".into(),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b> & "it's""#),
            "&lt;b&gt; &amp; &quot;it&#x27;s&quot;"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ett nytt JOBB"), "Ett Nytt Jobb");
        assert_eq!(title_case("hem-ifrån 2x"), "Hem-Ifrån 2X");
        assert_eq!(title_case("ÅRETS bästa"), "Årets Bästa");
    }

    #[test]
    fn test_ordlista_note_fields_and_tags() {
        let (fields, tags) = ordlista_note(&pair(Some("4"), Some("37"), None));
        assert_eq!(
            fields,
            vec!["springa", "spring, sprang, sprungit", "to run", "4", "37"]
        );
        assert_eq!(tags, vec!["Kapitel4"]);

        let (fields, tags) = ordlista_note(&pair(None, None, None));
        assert_eq!(fields[3], "");
        assert_eq!(tags, vec!["Klassrumfraser"]);
    }

    #[test]
    fn test_ordkort_note_tags() {
        let (fields, tags) = ordkort_note(&pair(Some("2"), None, Some("ett nytt jobb")));
        assert_eq!(fields, vec!["springa", "to run", "2", "ett nytt jobb"]);
        assert_eq!(tags, vec!["Kapitel2", "EttNyttJobb"]);
    }

    #[test]
    fn test_ordkort_guid_ignores_english() {
        let mut deck = Deck::new("Cards", Variant::Ordkort);
        deck.add_note(
            vec!["hund".into(), "dog".into(), "3".into(), "".into()],
            vec![],
        );
        deck.add_note(
            vec!["hund".into(), "hound".into(), "3".into(), "".into()],
            vec![],
        );
        assert_eq!(deck.notes[0].guid, deck.notes[1].guid);
        assert_eq!(deck.notes[0].guid, guid::guid_for(&["hund", "3", "24752456"]));
    }

    #[test]
    fn test_deck_ids_differ_by_variant() {
        let a = Deck::new("Rivstart", Variant::Ordlista);
        let b = Deck::new("Rivstart", Variant::Ordkort);
        assert_eq!(a.id / 98293, b.id / 98294);
        assert_ne!(a.id, b.id);
    }
}
