use rand::Rng;
use uuid::Uuid;

const SKU_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const RANDOM_PART_LEN: usize = 6;

fn timestamp_part(now_ms: i64) -> String {
    format!("{:06}", now_ms.rem_euclid(1_000_000))
}

fn random_part<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..RANDOM_PART_LEN)
        .map(|_| SKU_ALPHABET[rng.gen_range(0..SKU_ALPHABET.len())] as char)
        .collect()
}

/// Сгенерировать SKU вида `SKU-{6 цифр времени}-{6 символов A-Z0-9}`.
///
/// `is_taken` проверяет коллизию (снимок БД + SKU текущего файла). После
/// `max_attempts` неудачных попыток используется суффикс из UUID.
pub fn generate_sku<R, F>(rng: &mut R, now_ms: i64, max_attempts: u32, is_taken: F) -> String
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    let ts = timestamp_part(now_ms);
    for _ in 0..max_attempts.max(1) {
        let candidate = format!("SKU-{}-{}", ts, random_part(rng));
        if !is_taken(&candidate) {
            return candidate;
        }
    }

    tracing::warn!(
        "SKU generation exhausted {} attempts, falling back to UUID suffix",
        max_attempts
    );
    format!("SKU-{}-{}", ts, Uuid::new_v4().simple().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;
    use std::cell::Cell;

    #[test]
    fn test_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let sku = generate_sku(&mut rng, 1_700_000_123_456, 5, |_| false);
        let re = Regex::new(r"^SKU-\d{6}-[A-Z0-9]{6}$").unwrap();
        assert!(re.is_match(&sku), "unexpected sku {}", sku);
        assert!(sku.starts_with("SKU-123456-"));
    }

    #[test]
    fn test_retries_on_collision() {
        let mut rng = StdRng::seed_from_u64(1);
        let calls = Cell::new(0);
        let sku = generate_sku(&mut rng, 42, 5, |_| {
            calls.set(calls.get() + 1);
            calls.get() < 3
        });
        assert_eq!(calls.get(), 3);
        assert!(sku.starts_with("SKU-000042-"));
        assert_eq!(sku.len(), "SKU-000042-ABCDEF".len());
    }

    #[test]
    fn test_uuid_fallback_when_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let sku = generate_sku(&mut rng, 42, 5, |_| true);
        let re = Regex::new(r"^SKU-000042-[0-9A-F]{32}$").unwrap();
        assert!(re.is_match(&sku), "unexpected sku {}", sku);
    }
}
