//! Comparison and cleanup of ID strings.

/// Compares two IDs in time that depends only on their length.
pub fn secure_compare(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y));
    std::hint::black_box(diff) == 0
}

/// Drops every character of `id` not present in `allowed`.
pub fn sanitize_id(id: &str, allowed: &str) -> String {
    id.chars().filter(|&c| allowed.contains(c)).collect()
}
