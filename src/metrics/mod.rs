//! Readability and scientific-writing metrics.
//!
//! [`MetricsCalculator`] is built once and shared by reference; it owns the
//! part-of-speech tagger and caches nothing between texts.

pub mod familiar;
pub mod readability;
pub mod scientific;
pub mod tagger;
pub mod text;

pub use readability::{difficult_words, readability, ReadabilityScores};
pub use scientific::{scientific, ScientificScores};
pub use tagger::{LexiconTagger, PartOfSpeech, PosTagger};

use serde::{Deserialize, Serialize};

/// All metrics of one text
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub smog_index: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub avg_sentence_length: f64,
    pub complex_word_percentage: f64,
    pub lexical_density: f64,
    pub passive_voice_percentage: f64,
    pub letter_count: usize,
}

impl MetricsRecord {
    pub fn new(r: ReadabilityScores, s: ScientificScores, letter_count: usize) -> Self {
        Self {
            flesch_reading_ease: r.flesch_reading_ease,
            flesch_kincaid_grade: r.flesch_kincaid_grade,
            smog_index: r.smog_index,
            automated_readability_index: r.automated_readability_index,
            coleman_liau_index: r.coleman_liau_index,
            avg_sentence_length: s.avg_sentence_length,
            complex_word_percentage: s.complex_word_percentage,
            lexical_density: s.lexical_density,
            passive_voice_percentage: s.passive_voice_percentage,
            letter_count,
        }
    }
}

pub struct MetricsCalculator {
    tagger: Box<dyn PosTagger>,
}

impl MetricsCalculator {
    /// Calculator with the built-in [`LexiconTagger`]
    pub fn new() -> Self {
        Self::with_tagger(Box::new(LexiconTagger))
    }

    pub fn with_tagger(tagger: Box<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn readability(&self, text: &str) -> ReadabilityScores {
        readability(text)
    }

    pub fn scientific(&self, text: &str) -> ScientificScores {
        scientific(text, self.tagger.as_ref())
    }

    /// Readability, scientific scores and letter count in one record
    pub fn measure(&self, text: &str) -> MetricsRecord {
        MetricsRecord::new(
            self.readability(text),
            self.scientific(text),
            text::letter_length(text),
        )
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
