//! Stop-word and punctuation removal
//!
//! Lowercases text, splits on whitespace and drops English stop words and
//! punctuation. Independent of the graph; used to shrink input text before it
//! is sent to a language model.

/// English stop words
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "d", "did", "didn't", "do", "does", "doesn't", "doing", "don",
    "down", "during", "each", "few", "for", "from", "further", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "i", "if", "in", "into", "is", "isn't", "it", "its", "itself", "just", "ll", "m", "ma",
    "me", "might", "more", "most", "must", "my", "myself", "need", "no", "nor", "not", "now", "o",
    "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "re", "s", "same", "shan't", "she", "she's", "should", "shouldn't", "so", "some",
    "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve",
    "very", "was", "wasn't", "we", "were", "weren't", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won't", "would", "y", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Punctuation stripped from the edges of words
const PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '(', ')', '"'];

/// Removes punctuation and stop words, and lowercases text
pub struct TextNormalizer;

impl TextNormalizer {
    /// Normalize `text`, joining the kept words with single spaces
    pub fn process(text: &str) -> String {
        Self::tokens(text).join(" ")
    }

    /// Normalized words in their original order
    pub fn tokens(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|word| word.trim_matches(PUNCTUATION))
            .filter(|word| !word.is_empty() && !Self::is_stop_word(word))
            .map(String::from)
            .collect()
    }

    /// Check a lowercase word against the stop-word list
    pub fn is_stop_word(word: &str) -> bool {
        STOP_WORDS.contains(&word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_stop_words_and_lowercases() {
        assert_eq!(
            TextNormalizer::process("The Sun is the source of ALL energy"),
            "sun source energy"
        );
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            TextNormalizer::process("Plants need light, water; and CO2!"),
            "plants light water co2"
        );
        // Standalone punctuation disappears entirely
        assert_eq!(TextNormalizer::process("leaf , root . stem"), "leaf root stem");
    }

    #[test]
    fn test_keeps_inner_punctuation() {
        assert_eq!(TextNormalizer::process("state-of-the-art"), "state-of-the-art");
        assert_eq!(TextNormalizer::process("It's done"), "it's done");
    }

    #[test]
    fn test_contractions_in_list_are_removed() {
        assert_eq!(TextNormalizer::process("They weren't ready"), "ready");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            TextNormalizer::process("  chlorophyll\t\tabsorbs\n\nlight  "),
            "chlorophyll absorbs light"
        );
    }

    #[test]
    fn test_empty_and_stop_word_only_input() {
        assert_eq!(TextNormalizer::process(""), "");
        assert_eq!(TextNormalizer::process("the of and"), "");
        assert!(TextNormalizer::tokens("is it?").is_empty());
    }
}
