//! Character-level complexity analysis of an ID.
//!
//! Descriptive only: a high Shannon entropy over one short string says
//! little about how the string was produced.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Counts per character class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharClassCounts {
    /// Lowercase letters.
    pub lowercase: usize,
    /// Uppercase letters.
    pub uppercase: usize,
    /// Decimal digits.
    pub digits: usize,
    /// Everything else.
    pub symbols: usize,
}

/// Complexity report for a single ID.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityReport {
    /// Length in characters.
    pub length: usize,
    /// Per-class character counts.
    pub complexity: CharClassCounts,
    /// Number of distinct characters.
    pub unique_characters: usize,
    /// Shannon entropy in bits per symbol.
    pub entropy: f64,
    /// Occurrences of each character.
    pub character_counts: BTreeMap<String, usize>,
}

impl ComplexityReport {
    /// Analyzes `id`.
    pub fn analyze(id: &str) -> Self {
        let mut complexity = CharClassCounts::default();
        let mut counts: BTreeMap<char, usize> = BTreeMap::new();

        for c in id.chars() {
            if c.is_lowercase() {
                complexity.lowercase += 1;
            } else if c.is_uppercase() {
                complexity.uppercase += 1;
            } else if c.is_numeric() {
                complexity.digits += 1;
            } else {
                complexity.symbols += 1;
            }
            *counts.entry(c).or_default() += 1;
        }

        let length = id.chars().count();

        Self {
            length,
            complexity,
            unique_characters: counts.len(),
            entropy: Self::shannon_entropy(counts.values().copied(), length),
            character_counts: counts
                .into_iter()
                .map(|(c, n)| (c.to_string(), n))
                .collect(),
        }
    }

    fn shannon_entropy(counts: impl Iterator<Item = usize>, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }

        let n = total as f64;
        counts
            .map(|count| {
                let p = count as f64 / n;
                -p * p.log2()
            })
            .sum()
    }
}

impl fmt::Display for ComplexityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "length:            {}", self.length)?;
        writeln!(f, "lowercase:         {}", self.complexity.lowercase)?;
        writeln!(f, "uppercase:         {}", self.complexity.uppercase)?;
        writeln!(f, "digits:            {}", self.complexity.digits)?;
        writeln!(f, "symbols:           {}", self.complexity.symbols)?;
        writeln!(f, "unique characters: {}", self.unique_characters)?;
        write!(f, "entropy:           {:.4} bits/symbol", self.entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_id() {
        let report = ComplexityReport::analyze("aB3-aB3-");

        assert_eq!(report.length, 8);
        assert_eq!(
            report.complexity,
            CharClassCounts {
                lowercase: 2,
                uppercase: 2,
                digits: 2,
                symbols: 2,
            }
        );
        assert_eq!(report.unique_characters, 4);
        // Four symbols, equally likely.
        assert!((report.entropy - 2.0).abs() < 1e-12);
        assert_eq!(report.character_counts.get("a"), Some(&2));
        assert_eq!(report.character_counts.get("-"), Some(&2));
    }

    #[test]
    fn test_constant_id_has_zero_entropy() {
        let report = ComplexityReport::analyze("00000000");
        assert_eq!(report.unique_characters, 1);
        assert_eq!(report.entropy, 0.0);
        assert_eq!(report.complexity.digits, 8);
    }

    #[test]
    fn test_empty_id() {
        let report = ComplexityReport::analyze("");
        assert_eq!(report.length, 0);
        assert_eq!(report.entropy, 0.0);
        assert!(report.character_counts.is_empty());
    }

    #[test]
    fn test_serializes_to_toml() {
        let report = ComplexityReport::analyze("ab");
        let text = toml::to_string(&report).unwrap();
        assert!(text.contains("unique_characters = 2"));
        assert!(text.contains("[complexity]"));
    }
}
