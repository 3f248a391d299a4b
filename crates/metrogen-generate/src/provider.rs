use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::lorem::en::Word;
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of every random scalar, string, date and identifier in a report.
///
/// Samplers receive the provider explicitly; nothing in the crate reaches for
/// global randomness, so a seeded provider reproduces a document exactly.
pub trait FieldProvider {
    /// Uniform float in `[min, max]`, rounded to `precision` decimals.
    fn next_float(&mut self, min: f64, max: f64, precision: u32) -> f64;
    /// Uniform integer in `[min, max]`.
    fn next_int(&mut self, min: i64, max: i64) -> i64;
    /// Uniform instant in `[min, max]` with millisecond resolution.
    fn next_date(&mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc>;
    /// Random UUID v4 text.
    fn next_identifier(&mut self) -> String;
    /// Uniform index in `[0, len)`; `0` when `len` is zero.
    fn next_index(&mut self, len: usize) -> usize;
    fn next_word(&mut self) -> String;
    fn next_full_name(&mut self) -> String;
    /// Vehicle-registration-style key, e.g. `AB12 CDE`.
    fn next_registration(&mut self) -> String;
}

/// Picks one member of `set`, `None` when it is empty.
pub fn next_enum<T: Copy>(provider: &mut dyn FieldProvider, set: &[T]) -> Option<T> {
    set.get(provider.next_index(set.len())).copied()
}

/// [`FieldProvider`] backed by ChaCha8 and `fake`.
#[derive(Debug, Clone)]
pub struct SeededFieldProvider {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededFieldProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl FieldProvider for SeededFieldProvider {
    fn next_float(&mut self, min: f64, max: f64, precision: u32) -> f64 {
        let (low, high) = ordered(min, max);
        let value = if low == high {
            low
        } else {
            self.rng.random_range(low..=high)
        };
        round_to(value, precision).clamp(low, high)
    }

    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(low..=high)
    }

    fn next_date(&mut self, min: DateTime<Utc>, max: DateTime<Utc>) -> DateTime<Utc> {
        let millis = self.next_int(min.timestamp_millis(), max.timestamp_millis());
        DateTime::from_timestamp_millis(millis).unwrap_or(min)
    }

    fn next_identifier(&mut self) -> String {
        let bytes: [u8; 16] = self.rng.random();
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .to_string()
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn next_word(&mut self) -> String {
        Word().fake_with_rng(&mut self.rng)
    }

    fn next_full_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn next_registration(&mut self) -> String {
        let mut key = String::with_capacity(8);
        for _ in 0..2 {
            key.push(self.letter());
        }
        for _ in 0..2 {
            key.push(char::from(b'0' + self.rng.random_range(0..10u8)));
        }
        key.push(' ');
        for _ in 0..3 {
            key.push(self.letter());
        }
        key
    }
}

impl SeededFieldProvider {
    fn letter(&mut self) -> char {
        char::from(b'A' + self.rng.random_range(0..26u8))
    }
}

fn ordered(min: f64, max: f64) -> (f64, f64) {
    if min <= max { (min, max) } else { (max, min) }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn same_seed_replays_the_same_fields() {
        let mut a = SeededFieldProvider::new(7);
        let mut b = SeededFieldProvider::new(7);
        for _ in 0..20 {
            assert_eq!(a.next_float(-5.0, 5.0, 3), b.next_float(-5.0, 5.0, 3));
            assert_eq!(a.next_identifier(), b.next_identifier());
            assert_eq!(a.next_word(), b.next_word());
            assert_eq!(a.next_registration(), b.next_registration());
        }
    }

    #[test]
    fn floats_stay_in_range_at_requested_precision() {
        let mut provider = SeededFieldProvider::new(11);
        for _ in 0..500 {
            let value = provider.next_float(-1.0, 1.0, 2);
            assert!((-1.0..=1.0).contains(&value));
            assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-6);
        }
        assert_eq!(provider.next_float(3.5, 3.5, 1), 3.5);
    }

    #[test]
    fn ints_and_dates_are_inclusive() {
        let mut provider = SeededFieldProvider::new(3);
        for _ in 0..200 {
            let value = provider.next_int(4, 6);
            assert!((4..=6).contains(&value));
        }
        assert_eq!(provider.next_int(9, 9), 9);

        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid start");
        let end = start + chrono::Duration::minutes(5);
        for _ in 0..200 {
            let value = provider.next_date(start, end);
            assert!(value >= start && value <= end);
        }
    }

    #[test]
    fn identifiers_are_v4_uuids() {
        let mut provider = SeededFieldProvider::new(5);
        let id = provider.next_identifier();
        let parsed = uuid::Uuid::parse_str(&id).expect("uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn registrations_follow_plate_layout() {
        let mut provider = SeededFieldProvider::new(9);
        for _ in 0..50 {
            let key = provider.next_registration();
            let chars: Vec<char> = key.chars().collect();
            assert_eq!(chars.len(), 8, "{key}");
            assert!(chars[..2].iter().all(|c| c.is_ascii_uppercase()));
            assert!(chars[2..4].iter().all(|c| c.is_ascii_digit()));
            assert_eq!(chars[4], ' ');
            assert!(chars[5..].iter().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn next_enum_handles_empty_sets() {
        let mut provider = SeededFieldProvider::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(next_enum(&mut provider, &empty), None);
        let picked = next_enum(&mut provider, &[1, 2, 3]).expect("non-empty");
        assert!((1..=3).contains(&picked));
    }
}
