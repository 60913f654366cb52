pub mod builtin;
pub mod schema;

use crate::error::GlosorError;
use schema::{Grammar, Profile};
use std::path::Path;

/// Load a profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<Profile, GlosorError> {
    let content = std::fs::read_to_string(path).map_err(|e| GlosorError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a profile from a JSON string.
pub fn parse_profile(json: &str, source: &Path) -> Result<Profile, GlosorError> {
    let profile: Profile = serde_json::from_str(json).map_err(|e| GlosorError::ProfileLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<Profile, GlosorError> {
    let profile: Profile = serde_json::from_str(json).map_err(GlosorError::Json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Resolve a profile argument: a preset name, or a path to a JSON file.
pub fn resolve_profile(name_or_path: &str) -> Result<Profile, GlosorError> {
    if builtin::PRESETS.contains(&name_or_path) {
        builtin::load_preset(name_or_path)
    } else {
        load_profile(Path::new(name_or_path))
    }
}

/// Validate that a profile is well-formed.
pub fn validate_profile(profile: &Profile) -> Result<(), GlosorError> {
    if profile.name.trim().is_empty() {
        return Err(GlosorError::ProfileInvalid(
            "name must not be empty".into(),
        ));
    }

    if profile.deck_name.trim().is_empty() {
        return Err(GlosorError::ProfileInvalid(format!(
            "profile '{}' has an empty deck_name",
            profile.name
        )));
    }

    if profile.output.extension().and_then(|e| e.to_str()) != Some("apkg") {
        return Err(GlosorError::ProfileInvalid(format!(
            "profile '{}' must write an .apkg file, got '{}'",
            profile.name,
            profile.output.display()
        )));
    }

    if profile.layout.line_tolerance < 0.0 || profile.layout.column_gap <= 0.0 {
        return Err(GlosorError::ProfileInvalid(format!(
            "profile '{}' needs a non-negative line_tolerance and a positive column_gap",
            profile.name
        )));
    }

    match &profile.grammar {
        Grammar::Ordlista(g) => {
            for (field, value) in [
                ("chapter_keyword", &g.chapter_keyword),
                ("page_keyword", &g.page_keyword),
                ("classroom_keyword", &g.classroom_keyword),
            ] {
                if value.is_empty() {
                    return Err(GlosorError::ProfileInvalid(format!(
                        "profile '{}' has an empty {}",
                        profile.name, field
                    )));
                }
            }
            if g.ignore_prefixes.iter().any(|p| p.is_empty()) {
                return Err(GlosorError::ProfileInvalid(format!(
                    "profile '{}' has an empty ignore prefix",
                    profile.name
                )));
            }
        }
        Grammar::Ordkort(g) => {
            if g.entry_font.is_empty() {
                return Err(GlosorError::ProfileInvalid(format!(
                    "profile '{}' has an empty entry_font",
                    profile.name
                )));
            }
            if g.marker_size <= 0.0 || g.entry_size <= 0.0 {
                return Err(GlosorError::ProfileInvalid(format!(
                    "profile '{}' has a non-positive font size",
                    profile.name
                )));
            }
            if g.max_chapter == 0 {
                return Err(GlosorError::ProfileInvalid(format!(
                    "profile '{}' has max_chapter 0",
                    profile.name
                )));
            }
        }
    }

    Ok(())
}
