use sha2::{Digest, Sha256};

const BASE91_TABLE: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

fn sha256_prefix(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Stable note guid: the first 8 bytes of SHA-256 over the values joined
/// with `__`, written in Anki's base91 alphabet.
pub fn guid_for(values: &[&str]) -> String {
    let mut n = sha256_prefix(&values.join("__"));
    let base = BASE91_TABLE.len() as u64;

    let mut reversed = Vec::new();
    while n > 0 {
        reversed.push(BASE91_TABLE[(n % base) as usize] as char);
        n /= base;
    }
    reversed.iter().rev().collect()
}

/// Deck id derived from the deck name, so rebuilding a deck updates it in
/// place instead of creating a sibling.
pub fn deck_id(name: &str, multiplier: i64) -> i64 {
    (sha256_prefix(name) % 100_000_000) as i64 * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base91_table() {
        assert_eq!(BASE91_TABLE.len(), 91);
    }

    #[test]
    fn test_guid_is_stable_and_order_sensitive() {
        let a = guid_for(&["hund", "dog", "24752456"]);
        assert_eq!(a, guid_for(&["hund", "dog", "24752456"]));
        assert_ne!(a, guid_for(&["dog", "hund", "24752456"]));
        assert!(!a.is_empty() && a.len() <= 10);
        assert!(a.bytes().all(|b| BASE91_TABLE.contains(&b)));
    }

    #[test]
    fn test_deck_id_range() {
        let id = deck_id("Rivstart A1+A2", 98293);
        assert_eq!(id, deck_id("Rivstart A1+A2", 98293));
        assert_eq!(id % 98293, 0);
        assert!(id >= 0 && id < 100_000_000 * 98293);
        assert_ne!(id, deck_id("Rivstart B1+B2", 98293));
    }
}
