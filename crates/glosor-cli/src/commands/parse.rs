use glosor_core::error::GlosorError;
use glosor_core::profile::resolve_profile;
use glosor_core::translate::{GoogleTranslator, RetryPolicy, Translator};
use std::path::PathBuf;

use super::layout_source_for;
use crate::output;

pub fn run(
    profile: &str,
    input_file: PathBuf,
    output_format: &str,
    no_translate: bool,
) -> Result<(), GlosorError> {
    let profile = resolve_profile(profile)?;
    let bytes = std::fs::read(&input_file)?;
    let source = layout_source_for(&input_file, profile.layout);

    let translator = if no_translate {
        None
    } else {
        Some(GoogleTranslator::new()?)
    };

    let pairs = glosor_core::extract_pairs(
        &bytes,
        source.as_ref(),
        &profile.grammar,
        translator.as_ref().map(|t| t as &dyn Translator),
        &RetryPolicy::default(),
    )?;

    match output_format {
        "json" => output::json::print(&pairs)?,
        _ => output::table::print_pairs(&pairs),
    }
    Ok(())
}
