//! Character-count partitioning of document text.
//!
//! Long documents are split into contiguous fragments of at most `max_chars`
//! characters so each fragment fits comfortably into a single completion
//! request. Boundaries fall at exact character counts rather than sentence or
//! word breaks; joining the fragments in order reproduces the input exactly.

/// Split `text` into fragments of at most `max_chars` characters.
///
/// Counts are in `char`s, not bytes, so multi-byte input never splits inside
/// a character. Empty input yields no fragments.
///
/// # Panics
///
/// Panics if `max_chars` is zero.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    assert!(max_chars > 0, "max_chars must be greater than zero");

    let mut fragments = Vec::with_capacity(text.len().div_ceil(max_chars));
    let mut rest = text;
    while !rest.is_empty() {
        let end = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(offset, _)| offset);
        let (fragment, tail) = rest.split_at(end);
        fragments.push(fragment);
        rest = tail;
    }
    fragments
}
