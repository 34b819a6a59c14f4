//! Composite ID validation rules.
//!
//! Length bounds, forbidden regex patterns and minimum counts per character
//! class. All rules are evaluated and every failure is reported at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

const DIGITS: &str = "0123456789";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

const DEFAULT_MIN_LENGTH: usize = 8;
const DEFAULT_MAX_LENGTH: usize = 128;
const DEFAULT_FORBIDDEN_PATTERNS: &[&str] = &[r"(?i)password", r"^0+$", r"^9+$"];

/// Minimum number of characters an ID must contain from a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClassRequirement {
    /// Characters that count towards the requirement.
    pub chars: String,
    /// Minimum number of occurrences.
    pub min_count: usize,
    /// Human-readable description, e.g. "at least one digit".
    pub description: String,
}

impl CharClassRequirement {
    /// Creates a requirement.
    pub fn new(chars: impl Into<String>, min_count: usize, description: impl Into<String>) -> Self {
        Self {
            chars: chars.into(),
            min_count,
            description: description.into(),
        }
    }

    /// At least one ASCII digit.
    pub fn digit() -> Self {
        Self::new(DIGITS, 1, "at least one digit")
    }

    /// At least one ASCII uppercase letter.
    pub fn uppercase() -> Self {
        Self::new(UPPERCASE, 1, "at least one uppercase letter")
    }

    /// At least one ASCII lowercase letter.
    pub fn lowercase() -> Self {
        Self::new(LOWERCASE, 1, "at least one lowercase letter")
    }
}

/// A single unmet rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("ID is too short: expected at least {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("ID is too long: expected at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("ID matches forbidden pattern `{pattern}`")]
    ForbiddenPattern { pattern: String },

    #[error("weak ID: must contain {description} (found {found}, need {required})")]
    MissingCharClass {
        description: String,
        required: usize,
        found: usize,
    },
}

/// Every rule an ID failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ID failed validation: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// The failed rules, in evaluation order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// True if a forbidden pattern matched or a character class was missing.
    pub fn is_weak(&self) -> bool {
        self.violations.iter().any(|v| {
            matches!(
                v,
                Violation::ForbiddenPattern { .. } | Violation::MissingCharClass { .. }
            )
        })
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configurable ID validator.
///
/// Independent of the generator; use it as an optional post-filter.
#[derive(Debug, Clone)]
pub struct IdValidator {
    min_length: usize,
    max_length: usize,
    requirements: Vec<CharClassRequirement>,
    forbidden_patterns: Vec<Regex>,
}

impl Default for IdValidator {
    fn default() -> Self {
        let forbidden_patterns = DEFAULT_FORBIDDEN_PATTERNS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();

        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            requirements: vec![
                CharClassRequirement::digit(),
                CharClassRequirement::uppercase(),
                CharClassRequirement::lowercase(),
            ],
            forbidden_patterns,
        }
    }
}

impl IdValidator {
    /// Creates a validator with no rules beyond a non-empty ID.
    pub fn permissive() -> Self {
        Self {
            min_length: 1,
            max_length: usize::MAX,
            requirements: Vec::new(),
            forbidden_patterns: Vec::new(),
        }
    }

    /// Sets the minimum length in characters; zero is ignored.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        if min_length > 0 {
            self.min_length = min_length;
        }
        self
    }

    /// Sets the maximum length in characters; zero is ignored.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        if max_length > 0 {
            self.max_length = max_length;
        }
        self
    }

    /// Adds a pattern that rejects any ID it matches.
    pub fn with_forbidden_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.forbidden_patterns.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Replaces the character-class requirements.
    pub fn with_requirements(mut self, requirements: Vec<CharClassRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    /// Replaces the character-class requirements in place.
    pub fn customize_required_char_set(&mut self, requirements: Vec<CharClassRequirement>) {
        self.requirements = requirements;
    }

    /// Minimum length in characters.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Maximum length in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Character-class requirements, in evaluation order.
    pub fn requirements(&self) -> &[CharClassRequirement] {
        &self.requirements
    }

    /// Source text of the forbidden patterns.
    pub fn forbidden_patterns(&self) -> impl Iterator<Item = &str> {
        self.forbidden_patterns.iter().map(Regex::as_str)
    }

    /// Checks `id` against every rule.
    pub fn validate(&self, id: &str) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        let length = id.chars().count();
        if length < self.min_length {
            violations.push(Violation::TooShort {
                min: self.min_length,
                actual: length,
            });
        }
        if length > self.max_length {
            violations.push(Violation::TooLong {
                max: self.max_length,
                actual: length,
            });
        }

        for pattern in &self.forbidden_patterns {
            if pattern.is_match(id) {
                violations.push(Violation::ForbiddenPattern {
                    pattern: pattern.as_str().to_string(),
                });
            }
        }

        let mut counts: HashMap<char, usize> = HashMap::new();
        for c in id.chars() {
            *counts.entry(c).or_default() += 1;
        }
        for requirement in &self.requirements {
            let found: usize = requirement
                .chars
                .chars()
                .filter_map(|c| counts.get(&c))
                .sum();
            if found < requirement.min_count {
                violations.push(Violation::MissingCharClass {
                    description: requirement.description.clone(),
                    required: requirement.min_count,
                    found,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(violations = violations.len(), "ID failed validation");
            Err(ValidationError { violations })
        }
    }
}
