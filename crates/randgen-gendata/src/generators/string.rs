//! String value generators.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

const ENGLISH_WORDS: &[&str] = &[
    "about", "after", "again", "also", "because", "been", "before", "being", "between", "both",
    "could", "does", "down", "each", "even", "first", "from", "good", "have", "here", "into",
    "just", "know", "like", "look", "make", "many", "more", "most", "much", "must", "never",
    "only", "other", "over", "right", "said", "some", "such", "take", "than", "that", "their",
    "then", "there", "these", "they", "think", "this", "through", "time", "under", "very",
    "want", "well", "were", "what", "when", "where", "which", "while", "with", "would", "your",
];

/// Quote `value` as a single-quoted SQL string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

/// A single quoted lowercase letter.
pub fn generate_letter<R: Rng + ?Sized>(rng: &mut R) -> String {
    let c = ALPHABET[rng.random_range(0..ALPHABET.len())] as char;
    quote(&c.to_string())
}

/// A single quoted English word.
pub fn generate_english<R: Rng + ?Sized>(rng: &mut R) -> String {
    quote(ENGLISH_WORDS[rng.random_range(0..ENGLISH_WORDS.len())])
}

/// A quoted alphanumeric string whose length is drawn from `min_len..=max_len`.
pub fn generate_chars<R: Rng + ?Sized>(rng: &mut R, min_len: usize, max_len: usize) -> String {
    let len = rng.random_range(min_len..=max_len.max(min_len));
    let s: String = (0..len)
        .map(|_| ALPHANUMERIC[rng.random_range(0..ALPHANUMERIC.len())] as char)
        .collect();
    quote(&s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote("it's"), "'it''s'");
        assert_eq!(quote(r"a\b"), r"'a\\b'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_generate_letter() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_letter(&mut rng);

        assert_eq!(value.len(), 3);
        assert!(value.chars().nth(1).unwrap().is_ascii_lowercase());
    }

    #[test]
    fn test_generate_english() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_english(&mut rng);

        let word = value.trim_matches('\'');
        assert!(ENGLISH_WORDS.contains(&word));
    }

    #[test]
    fn test_generate_chars_length() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_chars(&mut rng, 2, 5);
            let inner = &value[1..value.len() - 1];
            assert!((2..=5).contains(&inner.len()));
            assert!(inner.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
