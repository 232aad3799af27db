//! Order-insensitive title similarity.

/// Lowercases, splits on anything that is not alphanumeric, sorts the
/// tokens and joins them with single spaces.
#[must_use]
pub fn token_sort_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Scores two titles on a 0-100 scale, ignoring case, punctuation and word
/// order. Returns 0 when either side has no words.
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = token_sort_key(a);
    let b = token_sort_key(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let similarity = strsim::normalized_levenshtein(&a, &b).clamp(0.0, 1.0);
    // Bounded to 0..=100 by the clamp above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = (similarity * 100.0).round() as u8;
    score
}
