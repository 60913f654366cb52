use crate::error::GlosorError;
use crate::profile::schema::Profile;
use crate::profile::validate_profile;

const A1A2_JSON: &str = include_str!("../../../../profiles/a1a2.json");
const B1B2_JSON: &str = include_str!("../../../../profiles/b1b2.json");
const ORDKORT_B1B2_JSON: &str = include_str!("../../../../profiles/ordkort-b1b2.json");
const ORDKORT_B2C1_JSON: &str = include_str!("../../../../profiles/ordkort-b2c1.json");

/// Available predefined profiles.
pub const PRESETS: &[&str] = &["a1a2", "b1b2", "ordkort-b1b2", "ordkort-b2c1"];

/// The word-list conversions run by `glosor ordlista`.
pub const ORDLISTA_RUN: &[&str] = &["a1a2", "b1b2"];

/// The word-card conversions run by `glosor ordkort`.
pub const ORDKORT_RUN: &[&str] = &["ordkort-b1b2", "ordkort-b2c1"];

/// Load a predefined profile by name.
pub fn load_preset(name: &str) -> Result<Profile, GlosorError> {
    let json = match name {
        "a1a2" => A1A2_JSON,
        "b1b2" => B1B2_JSON,
        "ordkort-b1b2" => ORDKORT_B1B2_JSON,
        "ordkort-b2c1" => ORDKORT_B2C1_JSON,
        _ => {
            return Err(GlosorError::ProfileInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let profile: Profile = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}
