use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::domain::ports::IdGenerator;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 7;

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `ORD-<base36 millis>-<7 random base36 chars>`, uppercased.
///
/// Good enough to tell demo orders apart; not collision-proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_SUFFIX_LEN)
            .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
            .collect();
        format!("ORD-{}-{}", to_base36(millis), suffix).to_uppercase()
    }
}

/// `ORD-<uuid v4>`, uppercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        format!("ORD-{}", Uuid::new_v4()).to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_encoding() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn timestamp_ids_have_expected_shape() {
        let id = TimestampIdGenerator.next_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3, "unexpected id {id}");
        assert_eq!(parts[0], "ORD");
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), RANDOM_SUFFIX_LEN);
        assert!(id
            .chars()
            .all(|c| c == '-' || c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn timestamp_ids_differ_between_calls() {
        let generator = TimestampIdGenerator;
        assert_ne!(generator.next_id(), generator.next_id());
    }

    #[test]
    fn uuid_ids_are_prefixed_and_uppercase() {
        let id = UuidIdGenerator.next_id();
        assert!(id.starts_with("ORD-"));
        assert_eq!(id, id.to_uppercase());
        assert!(Uuid::parse_str(&id["ORD-".len()..]).is_ok());
    }
}
