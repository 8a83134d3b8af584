//! Fixed stop-word set excluded from the inverted word index.

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Common English function words; tokens cleaning to one of these are never
/// indexed.
pub const STOP_WORDS_LIST: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "this", "but", "they",
    "have", "had", "what", "said", "each", "which", "she", "do", "how", "their", "if", "up", "out",
    "many", "then", "them", "these", "so", "some", "her", "would", "make", "like", "into", "him",
    "time", "two", "more", "go", "no", "way", "could", "my", "than", "first", "been", "call",
    "who", "oil", "sit", "now", "find", "down", "day", "did", "get", "come", "made", "may",
    "part", "over", "new", "sound", "take", "only", "little", "work", "know", "place", "year",
    "live", "me", "back", "give", "most", "very", "after", "thing", "our", "just", "name", "good",
    "sentence", "man", "think", "say", "great", "where", "help", "through", "much", "before",
    "line", "right", "too", "mean", "old", "any", "same", "tell", "boy", "follow", "came", "want",
    "show", "also", "around", "form", "three", "small", "set", "put", "end", "why", "again",
    "turn", "here", "off", "went", "see", "own", "under", "last", "might", "us", "left", "big",
    "try", "kind", "hand", "picture", "move", "play", "spell", "air", "away", "animal", "house",
    "point", "page", "letter", "mother", "answer", "found", "study", "still", "learn", "should",
    "america", "world",
];

lazy_static! {
    /// Stop words as a set for membership tests during indexing.
    pub static ref STOP_WORDS: HashSet<&'static str> =
        STOP_WORDS_LIST.iter().copied().collect();
}
