//! Lexical detectors shared by the category scorers.
//!
//! Every detector is a pure function of the answer text. Regexes are compiled
//! once per process and reused.

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| compile(r"\d+"));
static URL: LazyLock<Regex> = LazyLock::new(|| compile(r"http|www\."));
static SPECIFIC_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[A-Z][a-z]+\s+[A-Z][a-z]+"));
static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| compile(r"\d+\."));
static STEP_PHRASE: LazyLock<Regex> = LazyLock::new(|| compile(r"step \d+"));
static SEQUENCE_WORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"first|second|third|then|next|finally"));
static STRUCTURE: LazyLock<Regex> = LazyLock::new(|| compile(r"\n\s*[-•*]|\d+\."));
static RECOMMENDATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"recommend|suggest|should|could try"));
static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\d+\)|option \d+|alternatively"));

const VAGUE_TERMS: &[&str] = &["maybe", "might", "possibly", "unclear", "i don't know"];
const CONNECTORS: &[&str] = &["first", "then", "next", "after", "finally", "before"];
const ACTION_VERBS: &[&str] = &[
    "click", "go", "visit", "submit", "fill", "select", "open", "enter",
];
const COMPARISON_WORDS: &[&str] = &[
    "compare",
    "difference",
    "similar",
    "both",
    "while",
    "whereas",
    "however",
    "in contrast",
    "on the other hand",
];
const DIMENSIONS: &[&str] = &[
    "cost", "location", "facility", "time", "quality", "size", "distance",
];
const REASONING_WORDS: &[&str] = &[
    "because", "since", "as", "due to", "offers", "provides", "has",
];
const CONSTRAINT_WORDS: &[&str] = &[
    "budget",
    "time",
    "location",
    "prefer",
    "near",
    "available",
    "suitable",
];

// Patterns are literals; a failure here is a programming error caught by the tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

/// An answer in both its original and lower-cased form.
///
/// Case-sensitive detectors read `original`; everything else reads `lower`.
#[derive(Debug, Clone)]
pub struct AnswerText<'a> {
    pub original: &'a str,
    pub lower: String,
}

impl<'a> AnswerText<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lower: original.to_lowercase(),
        }
    }

    /// Length in characters of the untrimmed answer.
    pub fn char_len(&self) -> usize {
        self.original.chars().count()
    }
}

/// Number of listed terms that occur at least once (substring membership).
fn distinct_terms(lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| lower.contains(*term)).count()
}

pub fn has_number(text: &AnswerText<'_>) -> bool {
    NUMBER.is_match(text.original)
}

pub fn has_url(text: &AnswerText<'_>) -> bool {
    URL.is_match(&text.lower)
}

/// Two adjacent Title-case words, a rough stand-in for a proper noun.
pub fn has_specific_name(text: &AnswerText<'_>) -> bool {
    SPECIFIC_NAME.is_match(text.original)
}

pub fn has_vague_language(text: &AnswerText<'_>) -> bool {
    VAGUE_TERMS.iter().any(|term| text.lower.contains(term))
}

/// Numbered items, "step N" phrases and sequence words, each occurrence counted.
pub fn step_marker_count(text: &AnswerText<'_>) -> usize {
    [&*NUMBERED_ITEM, &*STEP_PHRASE, &*SEQUENCE_WORD]
        .iter()
        .map(|re| re.find_iter(&text.lower).count())
        .sum()
}

pub fn connector_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, CONNECTORS)
}

pub fn action_verb_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, ACTION_VERBS)
}

pub fn comparison_word_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, COMPARISON_WORDS)
}

pub fn dimension_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, DIMENSIONS)
}

/// A bulleted line or a numbered item anywhere in the answer.
pub fn has_structure(text: &AnswerText<'_>) -> bool {
    STRUCTURE.is_match(text.original)
}

pub fn has_recommendation_language(text: &AnswerText<'_>) -> bool {
    RECOMMENDATION.is_match(&text.lower)
}

pub fn reasoning_word_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, REASONING_WORDS)
}

pub fn constraint_word_count(text: &AnswerText<'_>) -> usize {
    distinct_terms(&text.lower, CONSTRAINT_WORDS)
}

pub fn option_marker_count(text: &AnswerText<'_>) -> usize {
    OPTION_MARKER.find_iter(&text.lower).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> AnswerText<'_> {
        AnswerText::new(s)
    }

    #[test]
    fn test_builtin_patterns_compile() {
        for re in [
            &*NUMBER,
            &*URL,
            &*SPECIFIC_NAME,
            &*NUMBERED_ITEM,
            &*STEP_PHRASE,
            &*SEQUENCE_WORD,
            &*STRUCTURE,
            &*RECOMMENDATION,
            &*OPTION_MARKER,
        ] {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_specificity_signals() {
        assert!(has_number(&text("Open until 10pm")));
        assert!(!has_number(&text("Open late")));
        assert!(has_url(&text("See WWW.nus.edu.sg")));
        assert!(has_url(&text("https://nus.edu.sg")));
        assert!(!has_url(&text("See the website")));
    }

    #[test]
    fn test_specific_name_is_case_sensitive() {
        assert!(has_specific_name(&text("It is at Central Library.")));
        // Any two capitalised words match, including sentence openers.
        assert!(has_specific_name(&text("The Quick fox")));
        assert!(!has_specific_name(&text("central library")));
        assert!(!has_specific_name(&text("Library")));
        assert!(!has_specific_name(&text("NUS Library")));
    }

    #[test]
    fn test_vague_language() {
        assert!(has_vague_language(&text("It MIGHT be open")));
        assert!(has_vague_language(&text("I don't know.")));
        assert!(!has_vague_language(&text("It is open.")));
    }

    #[test]
    fn test_step_markers_count_every_occurrence() {
        // "1." "2." + "step 1" "step 2" + "then" "then"
        let t = text("Step 1. Apply, then wait. Step 2. Pay, then move in.");
        assert_eq!(step_marker_count(&t), 6);
        assert_eq!(step_marker_count(&text("")), 0);
    }

    #[test]
    fn test_membership_counts_are_distinct() {
        let t = text("then then then after");
        assert_eq!(connector_count(&t), 2);
        // "go" also matches inside "good"
        assert_eq!(action_verb_count(&text("a good idea")), 1);
        assert_eq!(comparison_word_count(&text("In contrast, both are similar")), 3);
        assert_eq!(dimension_count(&text("cost cost distance")), 2);
    }

    #[test]
    fn test_reasoning_words_match_substrings() {
        // "has" contains "as", so one word counts twice.
        assert_eq!(reasoning_word_count(&text("it has a gym")), 2);
        assert_eq!(constraint_word_count(&text("near campus, within budget")), 2);
    }

    #[test]
    fn test_structure_detection() {
        assert!(has_structure(&text("Options:\n - Hall A\n - Hall B")));
        assert!(has_structure(&text("Options:\n• Hall A")));
        assert!(has_structure(&text("1. Hall A")));
        assert!(!has_structure(&text("Hall A - cheaper")));
    }

    #[test]
    fn test_recommendation_language() {
        assert!(has_recommendation_language(&text("I Recommend Hall A")));
        assert!(has_recommendation_language(&text("You could try PGPR")));
        assert!(!has_recommendation_language(&text("Hall A is cheap")));
    }

    #[test]
    fn test_option_markers_do_not_overlap() {
        // "option 1" consumes the digit, so the trailing ")" is not counted again.
        let t = text("Option 1) Hall A. Option 2) alternatively Hall B.");
        assert_eq!(option_marker_count(&t), 3);
        assert_eq!(option_marker_count(&text("1) A 2) B")), 2);
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(AnswerText::new("café").char_len(), 4);
        assert_eq!(AnswerText::new("  padded  ").char_len(), 10);
    }
}
