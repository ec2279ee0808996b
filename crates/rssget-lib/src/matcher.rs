//! Show/quality matching against feed item titles.
//!
//! A title matches when it contains the show name as a whole word, followed
//! (after any characters) by the quality as a whole word. Both are matched as
//! literals; regex metacharacters in configured names carry no meaning.

use regex::{Regex, RegexBuilder};
use tracing::warn;

const PATTERN_SIZE_LIMIT: usize = 1024 * 1024;

/// Builds the title pattern for a single show name and quality.
///
/// An empty `quality` matches any quality, so only the show name is required.
pub fn build_pattern(show: &str, quality: &str, ignore_case: bool) -> Result<Regex, regex::Error> {
    let pattern = if quality.is_empty() {
        literal(show)
    } else {
        format!("{}.*{}", literal(show), literal(quality))
    };

    RegexBuilder::new(&pattern)
        .case_insensitive(ignore_case)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
}

/// Returns whether `title` mentions `show` followed by `quality`.
///
/// Fails closed: a pattern that cannot be compiled is logged and never matches.
pub fn matches(title: &str, show: &str, quality: &str, ignore_case: bool) -> bool {
    match build_pattern(show, quality, ignore_case) {
        Ok(re) => re.is_match(title),
        Err(e) => {
            warn!(show = %show, quality = %quality, "Could not compile show pattern: {}", e);
            false
        }
    }
}

/// Escaped literal with a word boundary on each side that starts or ends with
/// a word character. A boundary next to punctuation could never match.
fn literal(text: &str) -> String {
    let starts_with_word = text.chars().next().is_some_and(is_word_char);
    let ends_with_word = text.chars().next_back().is_some_and(is_word_char);

    format!(
        "{}{}{}",
        if starts_with_word { r"\b" } else { "" },
        regex::escape(text),
        if ends_with_word { r"\b" } else { "" },
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Compiled patterns for every show name of a task, in configured order.
#[derive(Debug, Clone)]
pub struct ShowMatcher {
    patterns: Vec<(String, Regex)>,
}

impl ShowMatcher {
    pub fn new(shows: &[String], quality: &str, ignore_case: bool) -> Self {
        let patterns = shows
            .iter()
            .filter_map(|show| match build_pattern(show, quality, ignore_case) {
                Ok(re) => Some((show.clone(), re)),
                Err(e) => {
                    warn!(show = %show, quality = %quality, "Could not compile show pattern, show will never match: {}", e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// First configured show whose pattern matches `title`.
    pub fn find(&self, title: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(title))
            .map(|(show, _)| show.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
