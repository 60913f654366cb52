use glosor_core::error::GlosorError;
use glosor_core::profile::builtin;
use glosor_core::profile::schema::Variant;
use std::path::Path;

pub fn list() -> Result<(), GlosorError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        let variant = match profile.grammar.variant() {
            Variant::Ordlista => "ordlista",
            Variant::Ordkort => "ordkort",
        };
        println!("  {:<14} {} [{}]", name, profile.deck_name, variant);
        println!(
            "                 {} -> {}",
            profile.input.display(),
            profile.output.display()
        );
        if let Some(ref desc) = profile.description {
            println!("                 {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(preset: &str) -> Result<(), GlosorError> {
    let profile = builtin::load_preset(preset)?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub fn validate(path: &Path) -> Result<(), GlosorError> {
    let profile = glosor_core::profile::load_profile(path)?;
    println!(
        "Valid profile: {} ({} -> {})",
        profile.name,
        profile.input.display(),
        profile.output.display()
    );
    Ok(())
}
