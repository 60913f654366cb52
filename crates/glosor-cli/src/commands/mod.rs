pub mod batch;
pub mod inspect;
pub mod parse;
pub mod profiles;
pub mod run;

use glosor_core::extraction::json_layout::JsonLayoutSource;
use glosor_core::extraction::pdftohtml::PdftohtmlExtractor;
use glosor_core::extraction::LayoutSource;
use glosor_core::profile::schema::LayoutSettings;
use std::path::Path;

/// Pick the layout backend by file extension: `.json` is a layout dump,
/// anything else goes through pdftohtml with the profile's line grouping.
pub fn layout_source_for(path: &Path, settings: LayoutSettings) -> Box<dyn LayoutSource> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let source: Box<dyn LayoutSource> = if is_json {
        Box::new(JsonLayoutSource::new())
    } else {
        Box::new(PdftohtmlExtractor::from_settings(settings))
    };
    log::debug!(
        "reading {} with the {} backend",
        path.display(),
        source.backend_name()
    );
    source
}
