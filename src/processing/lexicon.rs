//! Whole-word, case-insensitive term matching
//!
//! One generic matcher covers every lexicon used by entity extraction (skills,
//! institutions, companies, titles, languages) instead of repeating per-list
//! regex construction.

use crate::error::{Result, ScreenerError};
use aho_corasick::AhoCorasick;
use std::collections::HashSet;

/// A fixed set of terms matched against free text with whole-word semantics.
pub struct Lexicon {
    matcher: AhoCorasick,
    terms: Vec<String>,
}

impl Lexicon {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        let terms: Vec<String> = terms.iter().map(|s| s.as_ref().to_lowercase()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| ScreenerError::InvalidInput(format!("Failed to build lexicon: {}", e)))?;

        Ok(Self { matcher, terms })
    }

    /// Return the subset of terms present in `text` as whole words, in lexicon
    /// order. Set semantics: each term is reported at most once.
    pub fn matches(&self, text: &str) -> Vec<String> {
        let mut found = HashSet::new();

        for mat in self.matcher.find_iter(text) {
            if word_bounded(text, mat.start(), mat.end()) {
                found.insert(mat.pattern().as_usize());
            }
        }

        self.terms
            .iter()
            .enumerate()
            .filter(|(i, _)| found.contains(i))
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// True if any term in the lexicon appears in `text` as a whole word.
    pub fn any_match(&self, text: &str) -> bool {
        self.matcher
            .find_iter(text)
            .any(|mat| word_bounded(text, mat.start(), mat.end()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Case-insensitive whole-word containment test for a single term.
pub fn contains_whole_word(text: &str, term: &str) -> bool {
    contains_whole_word_lower(&text.to_lowercase(), &term.to_lowercase())
}

/// Whole-word containment over inputs the caller has already lowercased.
/// Used by the scorer, which lowercases the resume once and tests many terms.
pub(crate) fn contains_whole_word_lower(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }

    let mut search_from = 0;
    while let Some(pos) = text[search_from..].find(term) {
        let start = search_from + pos;
        let end = start + term.len();
        if word_bounded(text, start, end) {
            return true;
        }
        // Advance past the first character of this occurrence
        let step = text[start..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
        search_from = start + step;
    }
    false
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whole-word check for the match at `text[start..end]`: an edge whose term
/// character is a word character must not touch another word character. Edges
/// that are themselves non-word characters (the '+' in "c++", the '/' in
/// "ci/cd") impose no constraint.
fn word_bounded(text: &str, start: usize, end: usize) -> bool {
    let term = &text[start..end];

    let first_is_word = term.chars().next().map(is_word_char).unwrap_or(false);
    let last_is_word = term.chars().next_back().map(is_word_char).unwrap_or(false);

    let before_ok = !first_is_word
        || text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
    let after_ok = !last_is_word
        || text[end..].chars().next().map_or(true, |c| !is_word_char(c));

    before_ok && after_ok
}
