//! Flashcards cut from a document by splitting on periods

/// Maximum number of flashcards derived from one document
pub const MAX_FLASHCARDS: usize = 5;

/// Split `text` on `.`, trim each segment, drop empty ones and keep the first
/// [`MAX_FLASHCARDS`] in document order.
pub fn derive_flashcards(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .take(MAX_FLASHCARDS)
        .map(String::from)
        .collect()
}
