pub mod deck;
pub mod error;
pub mod exceptions;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profile;
pub mod translate;

use error::GlosorError;
use extraction::LayoutSource;
use model::Pair;
use profile::schema::{Grammar, Profile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use translate::{RetryPolicy, Translator};

/// Result of one profile conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub profile: String,
    pub deck_name: String,
    pub output: PathBuf,
    pub pairs: usize,
}

/// Extract flashcard pairs from one input document.
///
/// The translator is only consulted for word-card grammars that have
/// translation enabled.
pub fn extract_pairs(
    input: &[u8],
    source: &dyn LayoutSource,
    grammar: &Grammar,
    translator: Option<&dyn Translator>,
    retry: &RetryPolicy,
) -> Result<Vec<Pair>, GlosorError> {
    let layout = source.extract_layout(input)?;
    log::debug!("layout read with backend '{}'", source.backend_name());

    match grammar {
        Grammar::Ordlista(g) => parsing::parse_ordlista(&layout, g),
        Grammar::Ordkort(g) => {
            let translator = if g.translate { translator } else { None };
            parsing::parse_ordkort(&layout, g, translator, retry)
        }
    }
}

/// Run one profile end to end: read its input, extract pairs and write
/// the deck package. Nothing is written if any stage fails.
pub fn convert(
    profile: &Profile,
    source: &dyn LayoutSource,
    translator: Option<&dyn Translator>,
    retry: &RetryPolicy,
) -> Result<ConversionSummary, GlosorError> {
    convert_to(profile, &profile.input, &profile.output, source, translator, retry)
}

/// Like [`convert`], with explicit input and output paths.
pub fn convert_to(
    profile: &Profile,
    input: &Path,
    output: &Path,
    source: &dyn LayoutSource,
    translator: Option<&dyn Translator>,
    retry: &RetryPolicy,
) -> Result<ConversionSummary, GlosorError> {
    log::info!("converting {} ({})", input.display(), profile.name);
    let bytes = std::fs::read(input)?;
    let pairs = extract_pairs(&bytes, source, &profile.grammar, translator, retry)?;

    let deck = deck::build_deck(&profile.deck_name, profile.grammar.variant(), &pairs);
    deck::apkg::write_package(&deck, output)?;

    Ok(ConversionSummary {
        profile: profile.name.clone(),
        deck_name: profile.deck_name.clone(),
        output: output.to_path_buf(),
        pairs: pairs.len(),
    })
}
