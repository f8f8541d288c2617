//! Tokenizer producing index-ready word sequences
//!
//! # Algorithm
//!
//! 1. Remove every punctuation character from the text
//! 2. Split on whitespace, dropping empty pieces
//! 3. Classify each token against the native script range
//! 4. Number tokens 0, 1, 2, ... in output order
//!
//! Tokens are kept verbatim: no case folding, stemming or other normalization.

use crate::text::script::ScriptRange;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Unicode punctuation plus ASCII symbols such as `$`, `+` and `|`
    static ref PUNCTUATION: Regex = Regex::new(r"[\p{P}[:punct:]]").expect("valid regex");
}

/// Tokenized text as three parallel sequences of equal length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// The tokens, in text order
    pub words: Vec<String>,

    /// Native-script classification of each token
    pub analytics: Vec<bool>,

    /// Zero-based token index of each token
    pub positions: Vec<u32>,
}

/// A single classified token borrowed from [`Tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub word: &'a str,
    pub native: bool,
    pub position: u32,
}

impl Tokens {
    /// Number of tokens
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the text produced no tokens
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the tokens with their classification and position
    pub fn iter(&self) -> impl Iterator<Item = Token<'_>> + '_ {
        self.words
            .iter()
            .zip(&self.analytics)
            .zip(&self.positions)
            .map(|((word, &native), &position)| Token {
                word: word.as_str(),
                native,
                position,
            })
    }
}

/// Returns true for characters stripped before splitting
pub fn is_punctuation(c: char) -> bool {
    PUNCTUATION.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Tokenizes text using the default (basic Cyrillic) script policy
///
/// # Example
///
/// ```
/// use sumi_index::text::tokenize;
///
/// let tokens = tokenize("hello, мир!");
/// assert_eq!(tokens.words, vec!["hello", "мир"]);
/// assert_eq!(tokens.analytics, vec![false, true]);
/// assert_eq!(tokens.positions, vec![0, 1]);
/// ```
pub fn tokenize(text: &str) -> Tokens {
    tokenize_with(text, &ScriptRange::default())
}

/// Tokenizes text, classifying tokens against the given script range
pub fn tokenize_with(text: &str, script: &ScriptRange) -> Tokens {
    let stripped = PUNCTUATION.replace_all(text, "");

    let words: Vec<String> = stripped.split_whitespace().map(str::to_string).collect();
    let analytics = words.iter().map(|word| script.classify(word)).collect();
    let positions = (0..words.len() as u32).collect();

    Tokens {
        words,
        analytics,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_have_equal_length() {
        for text in ["", "one", "one two three", "a, b; c!", "  spaced\tout\nlines  "] {
            let tokens = tokenize(text);
            assert_eq!(tokens.words.len(), tokens.analytics.len());
            assert_eq!(tokens.words.len(), tokens.positions.len());
        }
    }

    #[test]
    fn test_positions_are_token_indices() {
        let tokens = tokenize("The   quick\nbrown fox");
        assert_eq!(tokens.positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_punctuation_is_stripped() {
        let tokens = tokenize("Hello, world! It's a test-case.");
        assert_eq!(tokens.words, vec!["Hello", "world", "Its", "a", "testcase"]);
    }

    #[test]
    fn test_punctuation_only_yields_nothing() {
        assert!(tokenize("!!! ... ,,, ?!").is_empty());
        assert!(tokenize("«—»").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_classification() {
        let tokens = tokenize("привет hello 123");
        assert_eq!(tokens.words, vec!["привет", "hello", "123"]);
        assert_eq!(tokens.analytics, vec![true, false, false]);
    }

    #[test]
    fn test_no_case_folding() {
        let tokens = tokenize("Мир мир МИР");
        assert_eq!(tokens.words, vec!["Мир", "мир", "МИР"]);
    }

    #[test]
    fn test_repeated_words_keep_every_position() {
        let tokens = tokenize("мир hello мир");
        let occurrences: Vec<_> = tokens
            .iter()
            .filter(|t| t.word == "мир")
            .map(|t| t.position)
            .collect();
        assert_eq!(occurrences, vec![0, 2]);
    }

    #[test]
    fn test_unicode_punctuation() {
        let tokens = tokenize("«Война и мир» — роман…");
        assert_eq!(tokens.words, vec!["Война", "и", "мир", "роман"]);
        assert!(tokens.analytics.iter().all(|&native| native));
    }

    #[test]
    fn test_punctuation_outside_latin_and_cyrillic() {
        assert!(tokenize("「」‼。、").is_empty());
        assert!(tokenize("！？，").is_empty());

        assert_eq!(tokenize("кто\u{2011}то").words, vec!["ктото"]);
        assert_eq!(tokenize("мир。").words, vec!["мир"]);
        assert_eq!(tokenize("привет、мир").words, vec!["приветмир"]);
        assert_eq!(tokenize("стоп‼").words, vec!["стоп"]);

        let tokens = tokenize("「мир」 hello！");
        assert_eq!(tokens.words, vec!["мир", "hello"]);
        assert_eq!(tokens.analytics, vec![true, false]);
    }

    #[test]
    fn test_ascii_symbols_are_punctuation() {
        for c in ['$', '+', '<', '=', '>', '^', '`', '|', '~', '-', '_'] {
            assert!(is_punctuation(c), "{:?} should be stripped", c);
        }
        assert!(is_punctuation('\u{2011}'));
        assert!(!is_punctuation('я'));
        assert!(!is_punctuation('7'));
        assert!(!is_punctuation('№'));
    }

    #[test]
    fn test_custom_script() {
        let tokens = tokenize_with("hello мир", &ScriptRange::new('a', 'z'));
        assert_eq!(tokens.analytics, vec![true, false]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Один, два; three — четыре!";
        assert_eq!(tokenize(text), tokenize(text));
    }
}
