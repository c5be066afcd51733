//! Keyword coverage: which profile skills appear anywhere in the resume text.

use regex::{Regex, RegexBuilder};

/// Case-insensitive literal matchers, one per distinct keyword, in profile order.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<(String, Regex)>,
}

/// Partition of the keyword list. Both halves keep the profile's order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

impl KeywordMatcher {
    /// Keywords are matched literally; regex metacharacters are escaped.
    /// Repeated keywords are kept once, at their first position.
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let mut patterns: Vec<(String, Regex)> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            if patterns.iter().any(|(k, _)| k == keyword) {
                continue;
            }
            let regex = RegexBuilder::new(&regex::escape(keyword))
                .case_insensitive(true)
                .build()?;
            patterns.push((keyword.clone(), regex));
        }
        Ok(Self { patterns })
    }

    pub fn match_text(&self, text: &str) -> KeywordMatch {
        let (found, missing): (Vec<_>, Vec<_>) = self
            .patterns
            .iter()
            .partition(|(_, regex)| regex.is_match(text));

        KeywordMatch {
            found: found.into_iter().map(|(k, _)| k.clone()).collect(),
            missing: missing.into_iter().map(|(k, _)| k.clone()).collect(),
        }
    }
}

impl KeywordMatch {
    /// One-line feedback for the candidate.
    pub fn summary(&self) -> String {
        if self.missing.is_empty() {
            return "Great match!".to_string();
        }
        format!(
            "Your resume matches {} out of {} key skills. Consider adding: {}.",
            self.found.len(),
            self.found.len() + self.missing.len(),
            self.missing.join(", ")
        )
    }
}
