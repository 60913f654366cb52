use glosor_core::deck::apkg::read_package;
use glosor_core::error::GlosorError;
use std::path::Path;

use crate::output;

pub fn run(package: &Path, output_format: &str) -> Result<(), GlosorError> {
    let contents = read_package(package)?;

    match output_format {
        "json" => output::json::print(&contents)?,
        _ => output::table::print_package(&contents),
    }
    Ok(())
}
