use glosor_core::error::GlosorError;
use glosor_core::extraction::pdftohtml::PdftohtmlExtractor;
use glosor_core::profile::builtin;
use glosor_core::translate::{GoogleTranslator, RetryPolicy, Translator};

/// The word-list conversions, without translation.
pub fn ordlista() -> Result<(), GlosorError> {
    convert_presets(builtin::ORDLISTA_RUN, None)
}

/// The word-card conversions, translating every card.
pub fn ordkort() -> Result<(), GlosorError> {
    let translator = GoogleTranslator::new()?;
    convert_presets(builtin::ORDKORT_RUN, Some(&translator))
}

fn convert_presets(
    presets: &[&str],
    translator: Option<&dyn Translator>,
) -> Result<(), GlosorError> {
    if !PdftohtmlExtractor::is_available() {
        return Err(GlosorError::PdftohtmlNotFound);
    }
    let retry = RetryPolicy::default();

    for name in presets {
        let profile = builtin::load_preset(name)?;
        let source = PdftohtmlExtractor::from_settings(profile.layout);
        let summary = glosor_core::convert(&profile, &source, translator, &retry)?;
        eprintln!(
            "{}: {} pairs written to {}",
            summary.deck_name,
            summary.pairs,
            summary.output.display()
        );
    }
    Ok(())
}
