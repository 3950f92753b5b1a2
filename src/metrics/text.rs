//! Text segmentation primitives shared by the metric formulas.

use unicode_segmentation::UnicodeSegmentation;

/// Sentences by Unicode sentence boundaries, trimmed, whitespace-only segments dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Tokens by Unicode word boundaries (punctuation kept as tokens, whitespace dropped).
pub fn tokens(text: &str) -> Vec<&str> {
    text.split_word_bounds()
        .filter(|t| !t.trim().is_empty())
        .collect()
}

/// Number of whitespace-separated words
pub fn whitespace_word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whitespace words with punctuation removed (apostrophes kept), empties dropped.
pub fn lexicon_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .collect::<String>()
        })
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect()
}

/// Characters excluding ASCII spaces
pub fn letter_length(text: &str) -> usize {
    text.chars().filter(|c| *c != ' ').count()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Estimate the syllable count of an English word.
pub fn syllables(word: &str) -> usize {
    let w: String = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    if w.is_empty() {
        return 0;
    }
    if w.chars().count() <= 3 {
        return 1;
    }

    let mut stem = w.as_str();
    if stem.ends_with("es")
        && !["ses", "zes", "ces", "ges", "xes", "shes", "ches"]
            .iter()
            .any(|s| stem.ends_with(s))
    {
        stem = &stem[..stem.len() - 2];
    } else if stem.ends_with("ed") && !stem.ends_with("ted") && !stem.ends_with("ded") {
        stem = &stem[..stem.len() - 2];
    } else if stem.ends_with('e') && !consonant_le(stem) {
        stem = &stem[..stem.len() - 1];
    }

    let mut count = 0;
    let mut prev_vowel = false;
    for (i, c) in stem.chars().enumerate() {
        // A leading "y" is a consonant ("year", "young")
        let vowel = is_vowel(c) && !(i == 0 && c == 'y');
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    count.max(1)
}

/// "table", "simple": the final "le" is its own syllable
fn consonant_le(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    n >= 3 && chars[n - 2] == 'l' && chars[n - 1] == 'e' && !is_vowel(chars[n - 3])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentences_keep_abbreviations_together() {
        let s = sentences("Smith et al. found this. It was clear!  ");
        assert_eq!(s, vec!["Smith et al. found this.", "It was clear!"]);
    }

    #[test]
    fn test_sentences_empty() {
        assert!(sentences("").is_empty());
        assert!(sentences(" \n ").is_empty());
    }

    #[test]
    fn test_tokens_split_punctuation() {
        assert_eq!(tokens("Skin, mostly."), vec!["Skin", ",", "mostly", "."]);
    }

    #[test]
    fn test_lexicon_words_strip_punctuation() {
        assert_eq!(
            lexicon_words("It's fine -- really, (see 2)."),
            vec!["It's", "fine", "really", "see", "2"]
        );
    }

    #[test]
    fn test_letter_length_ignores_spaces_only() {
        assert_eq!(letter_length("a b\nc"), 4);
    }

    #[test]
    fn test_syllables() {
        assert_eq!(syllables("cat"), 1);
        assert_eq!(syllables("make"), 1);
        assert_eq!(syllables("table"), 2);
        assert_eq!(syllables("jumped"), 1);
        assert_eq!(syllables("wanted"), 2);
        assert_eq!(syllables("boxes"), 2);
        assert_eq!(syllables("dermatology"), 5);
        assert_eq!(syllables("readability"), 5);
        assert_eq!(syllables("year"), 1);
        assert_eq!(syllables("42"), 0);
    }
}
