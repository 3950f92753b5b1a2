//! Familiar multi-syllable words that are never counted as difficult.
//!
//! Drawn from the Dale-Chall list of words known to most fourth-grade readers;
//! only entries of two or more syllables matter, since shorter words are never
//! difficult.

use std::collections::HashSet;
use std::sync::OnceLock;

const FAMILIAR_WORDS: &[&str] = &[
    "able", "about", "above", "across", "afraid", "after", "afternoon", "again", "against",
    "ago", "ahead", "alive", "alone", "along", "already", "also", "always", "among", "angry",
    "animal", "another", "answer", "any", "anybody", "anyone", "anything", "anyway",
    "anywhere", "apple", "april", "apron", "around", "arrive", "asleep", "attention",
    "august", "autumn", "awake", "away", "baby", "backward", "balloon", "banana", "basket",
    "beautiful", "became", "because", "become", "before", "began", "begin", "beginning",
    "behind", "being", "believe", "below", "beneath", "beside", "better", "between",
    "beyond", "bicycle", "birthday", "blanket", "body", "bottle", "bottom", "branches",
    "brother", "bucket", "builder", "building", "bundle", "butter", "button", "cabin",
    "candy", "careful", "carry", "center", "certain", "chicken", "children", "chocolate",
    "circle", "city", "clever", "closer", "coming", "common", "company", "contest",
    "corner", "cotton", "country", "cousin", "cover", "crazy", "curtain", "daily",
    "danger", "dinner", "doctor", "dollar", "done", "during", "early", "easy", "eleven",
    "empty", "enemy", "enjoy", "enough", "even", "evening", "ever", "every", "everybody",
    "everyone", "everything", "everywhere", "except", "family", "famous", "farmer",
    "father", "favorite", "feather", "fellow", "finger", "finish", "flower", "follow",
    "forever", "forget", "forgot", "forward", "friendly", "garden", "gather", "gentle",
    "giant", "glasses", "going", "golden", "government", "happen", "happy", "hello",
    "helpful", "hidden", "himself", "holiday", "honey", "hospital", "however", "hundred",
    "hungry", "idea", "important", "inside", "instead", "into", "island", "itself",
    "jacket", "journey", "kitchen", "later", "lady", "lesson", "letter", "library",
    "little", "lonely", "lovely", "lucky", "many", "market", "matter", "maybe", "measure",
    "medicine", "member", "middle", "minute", "money", "morning", "mother", "mountain",
    "music", "myself", "nature", "nearly", "never", "number", "nobody", "nothing",
    "notice", "number", "ocean", "office", "often", "only", "open", "orange", "order",
    "other", "over", "paper", "parent", "party", "people", "perhaps", "person", "picture",
    "pocket", "police", "pony", "possible", "power", "pretty", "problem", "promise",
    "quiet", "quickly", "rabbit", "rather", "ready", "really", "reason", "remember",
    "report", "river", "rocket", "sadly", "second", "seven", "shoulder", "sickness",
    "silver", "simple", "sister", "something", "sometimes", "somewhere", "sorry",
    "special", "spider", "story", "student", "study", "sudden", "suddenly", "summer",
    "supper", "surprise", "table", "teacher", "telephone", "today", "together",
    "tomorrow", "tonight", "toward", "travel", "under", "until", "upon", "useful",
    "usual", "usually", "very", "village", "visit", "water", "weather", "whatever",
    "whenever", "whether", "window", "winter", "without", "woman", "women", "wonder",
    "wonderful", "yellow", "yesterday", "younger", "yourself", "zero",
];

fn familiar_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| FAMILIAR_WORDS.iter().copied().collect())
}

/// Is `word` (already lower-cased) on the familiar list?
pub fn is_familiar(word: &str) -> bool {
    familiar_set().contains(word)
}
