//! Text normalization applied before embedding.
//!
//! Stored content is never altered; only the string handed to the embedding
//! model goes through here, so identical content always yields the same vector.

/// Normalize free text for embedding.
///
/// - Trims trailing whitespace on each line.
/// - Collapses runs of blank lines into a single one.
/// - Trims the result.
/// - Stops at `max_chars` characters (counted as `char`s, never splitting one).
pub fn normalize_for_embedding(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars * 4));
    let mut used = 0usize;
    let mut blank_run = 0usize;

    for line in s.lines() {
        let line = line.trim_end();

        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }

        for ch in line.chars().chain(std::iter::once('\n')) {
            if used == max_chars {
                return out.trim().to_string();
            }
            out.push(ch);
            used += 1;
        }
    }

    out.trim().to_string()
}
