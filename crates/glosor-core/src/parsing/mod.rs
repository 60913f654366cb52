pub mod markers;
pub mod normalize;
pub mod pairs;
pub mod reconstruct;

use crate::error::GlosorError;
use crate::extraction::{text_lines, LayoutNode};
use crate::model::Pair;
use crate::profile::schema::{OrdkortGrammar, OrdlistaGrammar};
use crate::translate::{RetryPolicy, Translator};
use normalize::{normalize_lines, GlyphMode};

/// Parse a word-list layout into pairs.
///
/// Lines are normalized with separators, markers detected, wrapped entries
/// condensed and split, then resolved against the chapter and page markers.
pub fn parse_ordlista(
    root: &LayoutNode,
    grammar: &OrdlistaGrammar,
) -> Result<Vec<Pair>, GlosorError> {
    let lines = normalize_lines(&text_lines(root), GlyphMode::Spaced)?;
    if lines.is_empty() {
        return Err(GlosorError::Extraction("no text lines found in layout".into()));
    }
    log::info!("normalized {} lines", lines.len());

    let elements = markers::detect_ordlista_markers(lines, grammar)?;
    let elements = reconstruct::cleanup_lines(elements)?;
    let elements = reconstruct::condense_two_liners(elements)?;
    let elements = reconstruct::split_entries(elements)?;
    let elements = reconstruct::reattach_parentheses(elements);

    let pairs = pairs::create_pairs(elements)?;
    log::info!("extracted {} word-list pairs", pairs.len());
    Ok(pairs)
}

/// Parse a word-card layout into pairs.
///
/// Without a translator every English field is left empty.
pub fn parse_ordkort(
    root: &LayoutNode,
    grammar: &OrdkortGrammar,
    translator: Option<&dyn Translator>,
    retry: &RetryPolicy,
) -> Result<Vec<Pair>, GlosorError> {
    let lines = normalize_lines(&text_lines(root), GlyphMode::Flat)?;
    if lines.is_empty() {
        return Err(GlosorError::Extraction("no text lines found in layout".into()));
    }
    log::info!("normalized {} lines", lines.len());

    let items = markers::detect_ordkort_markers(lines, grammar)?;
    let items = pairs::apply_card_exceptions(items, grammar.max_chapter)?;

    let words = items
        .iter()
        .filter(|i| matches!(i, markers::CardItem::Word(_)))
        .count();
    if translator.is_some() {
        log::info!("translating {} word cards", words);
    }

    let pairs = pairs::create_cards(items, translator, retry)?;
    log::info!("extracted {} word-card pairs", pairs.len());
    Ok(pairs)
}
