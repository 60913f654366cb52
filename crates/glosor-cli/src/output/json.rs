use glosor_core::error::GlosorError;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), GlosorError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
