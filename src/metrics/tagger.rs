//! Part-of-speech tagging for lexical density.
//!
//! Only the content / non-content split feeds the metrics, so the shipped
//! tagger is a lexicon-and-suffix tagger: closed-class words come from fixed
//! lists, open-class words are guessed from their endings.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Coarse part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Auxiliary,
    Adjective,
    Adverb,
    Function,
    Numeral,
    Punctuation,
    Symbol,
}

impl PartOfSpeech {
    /// Nouns, verbs, adjectives and adverbs carry lexical content.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun | PartOfSpeech::Verb | PartOfSpeech::Adjective | PartOfSpeech::Adverb
        )
    }
}

/// Tags a token sequence
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech>;
}

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
];

const FUNCTION_WORDS: &[&str] = &[
    // determiners
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "either",
    "neither", "some", "any", "no", "all", "both", "few", "several", "such", "much",
    "many", "more", "most", "other", "another",
    // pronouns
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him",
    "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us",
    "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves", "who",
    "whom", "whose", "which", "what", "whatever", "whoever", "one", "someone", "anyone",
    "everyone", "something", "anything", "everything", "nothing",
    // prepositions
    "about", "above", "across", "after", "against", "along", "among", "around", "at",
    "before", "behind", "below", "beneath", "beside", "between", "beyond", "by",
    "despite", "down", "during", "except", "for", "from", "in", "inside", "into", "like",
    "near", "of", "off", "on", "onto", "out", "outside", "over", "per", "since",
    "through", "throughout", "to", "toward", "towards", "under", "until", "up", "upon",
    "via", "with", "within", "without",
    // conjunctions
    "and", "or", "but", "nor", "yet", "so", "if", "because", "although", "though",
    "while", "whereas", "unless", "whether", "than", "as", "once", "when", "where",
    // particles
    "not", "n't", "'s", "s",
];

const COMMON_ADVERBS: &[&str] = &[
    "also", "very", "often", "still", "never", "always", "here", "there", "now", "then",
    "soon", "quite", "rather", "however", "thus", "therefore", "hence", "moreover",
    "furthermore", "too", "again", "already", "almost", "even", "just", "only", "well",
    "yet", "perhaps", "indeed", "instead", "otherwise", "seldom", "sometimes", "today",
];

/// Words ending in "-ly" that are not adverbs
const LY_EXCEPTIONS: &[&str] = &[
    "family", "supply", "reply", "apply", "rely", "ally", "assembly", "anomaly", "monopoly",
    "italy", "july", "butterfly", "early", "likely", "friendly", "daily", "elderly",
];

fn lookup(
    cell: &'static OnceLock<HashSet<&'static str>>,
    words: &'static [&'static str],
) -> &'static HashSet<&'static str> {
    cell.get_or_init(|| words.iter().copied().collect())
}

fn auxiliaries() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lookup(&SET, AUXILIARIES)
}

fn function_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lookup(&SET, FUNCTION_WORDS)
}

fn common_adverbs() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lookup(&SET, COMMON_ADVERBS)
}

fn ly_exceptions() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lookup(&SET, LY_EXCEPTIONS)
}

/// Lexicon and suffix based tagger
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    fn tag_word(&self, token: &str, sentence_start: bool) -> PartOfSpeech {
        if !token.chars().any(char::is_alphabetic) {
            if token.chars().any(|c| c.is_ascii_digit() || c.is_numeric()) {
                return PartOfSpeech::Numeral;
            }
            if token.chars().all(|c| c.is_ascii_punctuation() || is_unicode_punctuation(c)) {
                return PartOfSpeech::Punctuation;
            }
            return PartOfSpeech::Symbol;
        }

        let lower = token.to_lowercase();
        // "it's" -> "it", "don't" -> "don"
        let head = lower
            .split(&['\'', '\u{2019}'][..])
            .next()
            .unwrap_or(lower.as_str());

        if auxiliaries().contains(head) {
            return PartOfSpeech::Auxiliary;
        }
        if function_words().contains(head) {
            return PartOfSpeech::Function;
        }

        let capitalised = token.chars().next().is_some_and(char::is_uppercase);
        if capitalised && !sentence_start {
            return PartOfSpeech::ProperNoun;
        }

        if common_adverbs().contains(head) {
            return PartOfSpeech::Adverb;
        }
        if head.ends_with("ly") && head.chars().count() > 4 && !ly_exceptions().contains(head) {
            return PartOfSpeech::Adverb;
        }

        const ADJECTIVE_SUFFIXES: &[&str] =
            &["ous", "ful", "ive", "able", "ible", "ical", "less", "ary", "ic"];
        const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify", "ate", "ed", "ing"];

        if ADJECTIVE_SUFFIXES.iter().any(|s| head.ends_with(s)) {
            PartOfSpeech::Adjective
        } else if VERB_SUFFIXES.iter().any(|s| head.ends_with(s)) {
            PartOfSpeech::Verb
        } else {
            PartOfSpeech::Noun
        }
    }
}

fn is_unicode_punctuation(c: char) -> bool {
    matches!(
        c,
        '\u{2010}'..='\u{2027}' | '\u{2030}'..='\u{205E}' | '\u{00A1}' | '\u{00AB}' | '\u{00BB}' | '\u{00BF}'
    )
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
        let mut tags = Vec::with_capacity(tokens.len());
        let mut sentence_start = true;

        for token in tokens {
            let tag = self.tag_word(token, sentence_start);
            sentence_start = matches!(*token, "." | "!" | "?")
                || (sentence_start && tag == PartOfSpeech::Punctuation);
            tags.push(tag);
        }

        tags
    }
}
