use glosor_core::error::GlosorError;
use glosor_core::profile::resolve_profile;
use glosor_core::translate::{GoogleTranslator, RetryPolicy, Translator};
use std::path::PathBuf;

use super::layout_source_for;

pub fn run(
    profile: &str,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
    no_translate: bool,
) -> Result<(), GlosorError> {
    let profile = resolve_profile(profile)?;
    let input = input.unwrap_or_else(|| profile.input.clone());
    let out = out.unwrap_or_else(|| profile.output.clone());

    let translator = if no_translate {
        None
    } else {
        Some(GoogleTranslator::new()?)
    };
    let source = layout_source_for(&input, profile.layout);

    let summary = glosor_core::convert_to(
        &profile,
        &input,
        &out,
        source.as_ref(),
        translator.as_ref().map(|t| t as &dyn Translator),
        &RetryPolicy::default(),
    )?;

    eprintln!(
        "{}: {} pairs written to {}",
        summary.deck_name,
        summary.pairs,
        summary.output.display()
    );
    Ok(())
}
