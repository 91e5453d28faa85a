use hotwords_core::CoreError;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// A normalized keyword with its whole-word matcher.
#[derive(Debug, Clone)]
pub struct Keyword {
    normalized: String,
    pattern: Regex,
}

impl Keyword {
    fn compile(normalized: String) -> Result<Self, CoreError> {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&normalized))).map_err(|e| {
            CoreError::InvalidInput {
                message: format!("keyword '{}' cannot be matched: {}", normalized, e),
            }
        })?;

        Ok(Self {
            normalized,
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Whole-word occurrences in `lowered`, which must already be lowercase.
    pub fn occurrences(&self, lowered: &str) -> u64 {
        self.pattern.find_iter(lowered).count() as u64
    }
}

/// Distinct lowercase keywords in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Trims and lowercases each keyword, drops blanks, and collapses
    /// case-insensitive duplicates.
    pub fn new<I, S>(raw: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();

        for word in raw {
            let normalized = word.as_ref().trim().to_lowercase();
            if normalized.is_empty() {
                debug!("Skipping blank keyword");
                continue;
            }
            if seen.insert(normalized.clone()) {
                keywords.push(Keyword::compile(normalized)?);
            }
        }

        Ok(Self { keywords })
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }
}
