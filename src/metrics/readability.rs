//! Classic readability formulas.

use super::familiar::is_familiar;
use super::text::{lexicon_words, sentences, syllables};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The five formula scores, rounded to two decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityScores {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub smog_index: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
}

/// Raw counts the formulas are built from
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextCounts {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub polysyllables: usize,
    pub characters: usize,
    pub letters: usize,
}

impl TextCounts {
    pub fn of(text: &str) -> Self {
        let words = lexicon_words(text);
        if words.is_empty() {
            return Self::default();
        }

        let syllable_counts: Vec<usize> = words.iter().map(|w| syllables(w)).collect();

        Self {
            words: words.len(),
            sentences: sentences(text).len().max(1),
            syllables: syllable_counts.iter().sum(),
            polysyllables: syllable_counts.iter().filter(|&&n| n >= 3).count(),
            characters: text.chars().filter(|c| c.is_alphanumeric()).count(),
            letters: text.chars().filter(|c| c.is_alphabetic()).count(),
        }
    }

    fn words_per_sentence(&self) -> f64 {
        self.words as f64 / self.sentences as f64
    }

    fn syllables_per_word(&self) -> f64 {
        self.syllables as f64 / self.words as f64
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute all five readability scores. Text without words scores zero everywhere.
pub fn readability(text: &str) -> ReadabilityScores {
    let c = TextCounts::of(text);
    if c.words == 0 {
        return ReadabilityScores::default();
    }

    let wps = c.words_per_sentence();
    let spw = c.syllables_per_word();

    let flesch_reading_ease = 206.835 - 1.015 * wps - 84.6 * spw;
    let flesch_kincaid_grade = 0.39 * wps + 11.8 * spw - 15.59;

    // SMOG needs at least three sentences
    let smog_index = if c.sentences < 3 {
        0.0
    } else {
        1.043 * (c.polysyllables as f64 * 30.0 / c.sentences as f64).sqrt() + 3.1291
    };

    let automated_readability_index =
        4.71 * (c.characters as f64 / c.words as f64) + 0.5 * wps - 21.43;

    let letters_per_100 = c.letters as f64 / c.words as f64 * 100.0;
    let sentences_per_100 = c.sentences as f64 / c.words as f64 * 100.0;
    let coleman_liau_index = 0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8;

    ReadabilityScores {
        flesch_reading_ease: round2(flesch_reading_ease),
        flesch_kincaid_grade: round2(flesch_kincaid_grade),
        smog_index: round2(smog_index),
        automated_readability_index: round2(automated_readability_index),
        coleman_liau_index: round2(coleman_liau_index),
    }
}

/// Number of distinct difficult words: two or more syllables and not familiar.
pub fn difficult_words(text: &str) -> usize {
    lexicon_words(text)
        .into_iter()
        .map(|w| w.to_lowercase())
        .filter(|w| syllables(w) >= 2 && !is_familiar(w))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(readability(""), ReadabilityScores::default());
        assert_eq!(readability("  ...  "), ReadabilityScores::default());
    }

    #[test]
    fn test_simple_text_reads_easier_than_technical() {
        let simple = readability("The cat sat on the mat. The dog ran to the cat.");
        let technical = readability(
            "Immunohistochemical characterization demonstrated considerable heterogeneity. \
             Subsequent dermatological evaluation necessitated comprehensive investigation.",
        );
        assert!(simple.flesch_reading_ease > technical.flesch_reading_ease);
        assert!(simple.flesch_kincaid_grade < technical.flesch_kincaid_grade);
        assert!(simple.coleman_liau_index < technical.coleman_liau_index);
    }

    #[test]
    fn test_flesch_known_values() {
        // 6 words, 1 sentence, 6 syllables
        let s = readability("The cat sat on the mat.");
        assert!((s.flesch_reading_ease - 116.15).abs() < 0.011);
        assert!((s.flesch_kincaid_grade + 1.45).abs() < 0.011);
    }

    #[test]
    fn test_smog_needs_three_sentences() {
        assert_eq!(readability("One sentence only here.").smog_index, 0.0);
        let three = readability("Dermatology matters. Everybody agrees. Investigation continues.");
        assert!(three.smog_index > 3.1291);
    }

    #[test]
    fn test_difficult_words_are_distinct_and_unfamiliar() {
        assert_eq!(difficult_words("Dermatology, dermatology and DERMATOLOGY."), 1);
        assert_eq!(difficult_words("The children were happy."), 0);
        assert_eq!(difficult_words(""), 0);
    }
}
