//! Scientific-writing metrics.
//!
//! The definitions are deliberately literal:
//! - lexical density divides a tagger token count by a whitespace word count,
//!   so it is not bounded by 1;
//! - a sentence counts as passive when it contains both "by" and "was" as
//!   substrings anywhere.

use super::readability::difficult_words;
use super::tagger::PosTagger;
use super::text::{sentences, tokens, whitespace_word_count};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScientificScores {
    pub avg_sentence_length: f64,
    pub complex_word_percentage: f64,
    pub lexical_density: f64,
    pub passive_voice_percentage: f64,
}

pub fn scientific(text: &str, tagger: &dyn PosTagger) -> ScientificScores {
    let sents = sentences(text);
    let total_words = whitespace_word_count(text);

    let avg_sentence_length = if sents.is_empty() {
        0.0
    } else {
        let words: usize = sents.iter().map(|s| whitespace_word_count(s)).sum();
        words as f64 / sents.len() as f64
    };

    let (complex_word_percentage, lexical_density) = if total_words == 0 {
        (0.0, 0.0)
    } else {
        let complex = difficult_words(text) as f64 / total_words as f64 * 100.0;

        let toks = tokens(text);
        let content = tagger
            .tag(&toks)
            .into_iter()
            .filter(|tag| tag.is_content())
            .count();

        (complex, content as f64 / total_words as f64)
    };

    let passive_voice_percentage = if sents.is_empty() {
        0.0
    } else {
        let passive = sents
            .iter()
            .filter(|s| s.contains("by") && s.contains("was"))
            .count();
        passive as f64 / sents.len() as f64 * 100.0
    };

    ScientificScores {
        avg_sentence_length,
        complex_word_percentage,
        lexical_density,
        passive_voice_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::tagger::{LexiconTagger, PartOfSpeech};

    /// Tags every token as a noun
    struct AllNouns;

    impl PosTagger for AllNouns {
        fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
            vec![PartOfSpeech::Noun; tokens.len()]
        }
    }

    #[test]
    fn test_empty_text_is_all_zero() {
        assert_eq!(scientific("", &LexiconTagger), ScientificScores::default());
        assert_eq!(scientific("   ", &LexiconTagger), ScientificScores::default());
    }

    #[test]
    fn test_avg_sentence_length() {
        let s = scientific("One two three. Four five six seven eight.", &LexiconTagger);
        assert_eq!(s.avg_sentence_length, 4.0);
    }

    #[test]
    fn test_passive_heuristic_is_substring_based() {
        // "baby" contains "by" but no "was"; "It was fine." has no "by"
        let s = scientific(
            "Stay by the wayside, it was decided. The baby slept. It was fine.",
            &LexiconTagger,
        );
        let expected = 1.0 / 3.0 * 100.0;
        assert!((s.passive_voice_percentage - expected).abs() < 1e-9);
    }

    #[test]
    fn test_lexical_density_can_exceed_one() {
        // 2 whitespace words, 4 tokens ("word", ",", "word", ".")
        let s = scientific("word, word.", &AllNouns);
        assert_eq!(s.lexical_density, 2.0);
    }

    #[test]
    fn test_complex_word_percentage() {
        let s = scientific("Dermatology is fascinating.", &LexiconTagger);
        // dermatology, fascinating are difficult; 3 words
        assert!((s.complex_word_percentage - 2.0 / 3.0 * 100.0).abs() < 1e-9);
    }
}
