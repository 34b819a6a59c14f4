//! Generator configuration.
//!
//! A [`GeneratorConfig`] is immutable once built. Every field has a
//! documented default and can be overridden independently through
//! [`GeneratorConfigBuilder`]; defaults are plain constants and factory
//! functions, so no instance can affect another.
//!
//! A TOML file format ([`FileConfig`]) covers the CLI use case.

use super::issuer::GenerateError;
use crate::entropy::{default_sources, source_by_name, EntropySource};
use crate::validate::{CharClassRequirement, IdValidator};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Digits, lowercase and uppercase ASCII letters (62 symbols).
pub const DEFAULT_ALPHABET: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Default identifier length.
pub const DEFAULT_SIZE: usize = 21;
/// Default wall-clock budget for one `generate` call.
pub const DEFAULT_MAX_GENERATION_TIME: Duration = Duration::from_secs(5);
/// Default fraction of the ID space the retry loop may probe.
pub const DEFAULT_UNIQUENESS_PRESSURE: f64 = 0.99;
/// Default number of issued IDs remembered before the memory is reset.
pub const DEFAULT_MAX_ISSUED: usize = 10_000;

/// Ordered symbols that identifiers are composed of.
///
/// Symbols are Unicode scalar values. Repeated symbols are kept as given:
/// a symbol listed twice is drawn twice as often.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Creates an alphabet from the characters of `symbols`, in order.
    pub fn new(symbols: &str) -> Self {
        Self {
            symbols: symbols.chars().collect(),
        }
    }

    /// Number of symbols, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the alphabet has no symbols.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Returns true if `c` is one of the symbols.
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Returns the symbols in order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}

impl From<&str> for Alphabet {
    fn from(symbols: &str) -> Self {
        Self::new(symbols)
    }
}

impl From<String> for Alphabet {
    fn from(symbols: String) -> Self {
        Self::new(&symbols)
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.symbols.into_iter().collect()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Immutable generator configuration.
#[derive(Clone)]
pub struct GeneratorConfig {
    alphabet: Alphabet,
    size: usize,
    sources: Vec<Arc<dyn EntropySource>>,
    max_generation_time: Duration,
    uniqueness_pressure: f64,
    max_issued: Option<usize>,
}

impl GeneratorConfig {
    /// Starts a builder holding every default.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// The symbols identifiers are drawn from.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Target identifier length in symbols.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entropy sources sampled once per `generate` call.
    pub fn sources(&self) -> &[Arc<dyn EntropySource>] {
        &self.sources
    }

    /// Wall-clock budget for one `generate` call.
    pub fn max_generation_time(&self) -> Duration {
        self.max_generation_time
    }

    /// Fraction of the ID space the retry loop may probe.
    pub fn uniqueness_pressure(&self) -> f64 {
        self.uniqueness_pressure
    }

    /// Issued-ID memory cap; `None` never resets.
    pub fn max_issued(&self) -> Option<usize> {
        self.max_issued
    }

    /// Checks the values `generate` depends on.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.alphabet.len() < 2 {
            return Err(GenerateError::InvalidAlphabet {
                len: self.alphabet.len(),
            });
        }
        if self.size == 0 {
            return Err(GenerateError::InvalidSize);
        }
        let pressure = self.uniqueness_pressure;
        if !(pressure > 0.0 && pressure <= 1.0) {
            return Err(GenerateError::InvalidUniquenessPressure(pressure));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("GeneratorConfig")
            .field("alphabet", &self.alphabet.to_string())
            .field("size", &self.size)
            .field("sources", &sources)
            .field("max_generation_time", &self.max_generation_time)
            .field("uniqueness_pressure", &self.uniqueness_pressure)
            .field("max_issued", &self.max_issued)
            .finish()
    }
}

/// Builder for [`GeneratorConfig`].
///
/// Values are stored as given; [`GeneratorConfig::validate`] (run by every
/// `generate` call) rejects unusable ones.
#[derive(Clone)]
pub struct GeneratorConfigBuilder {
    alphabet: Alphabet,
    size: usize,
    sources: Vec<Arc<dyn EntropySource>>,
    max_generation_time: Duration,
    uniqueness_pressure: f64,
    max_issued: Option<usize>,
}

impl Default for GeneratorConfigBuilder {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            size: DEFAULT_SIZE,
            sources: Vec::new(),
            max_generation_time: DEFAULT_MAX_GENERATION_TIME,
            uniqueness_pressure: DEFAULT_UNIQUENESS_PRESSURE,
            max_issued: Some(DEFAULT_MAX_ISSUED),
        }
    }
}

impl GeneratorConfigBuilder {
    /// Sets the alphabet.
    pub fn alphabet(mut self, alphabet: impl Into<Alphabet>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Sets the identifier length.
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Lowers the size to `min_size` when `0 < min_size < size`.
    pub fn min_size(mut self, min_size: usize) -> Self {
        if min_size > 0 && min_size < self.size {
            self.size = min_size;
        }
        self
    }

    /// Raises the size to `max_size` when `max_size > size`.
    pub fn max_size(mut self, max_size: usize) -> Self {
        if max_size > self.size {
            self.size = max_size;
        }
        self
    }

    /// Replaces the entropy sources. An empty list selects the defaults.
    pub fn sources(mut self, sources: Vec<Arc<dyn EntropySource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Appends one entropy source.
    pub fn source(mut self, source: Arc<dyn EntropySource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Sets the wall-clock budget for one `generate` call.
    pub fn max_generation_time(mut self, max_generation_time: Duration) -> Self {
        self.max_generation_time = max_generation_time;
        self
    }

    /// Sets the fraction of the ID space the retry loop may probe.
    pub fn uniqueness_pressure(mut self, uniqueness_pressure: f64) -> Self {
        self.uniqueness_pressure = uniqueness_pressure;
        self
    }

    /// Caps the issued-ID memory; it is reset once it holds `max_issued` IDs.
    pub fn max_issued(mut self, max_issued: usize) -> Self {
        self.max_issued = Some(max_issued);
        self
    }

    /// Never resets the issued-ID memory. Memory grows without bound.
    pub fn unbounded_issued(mut self) -> Self {
        self.max_issued = None;
        self
    }

    /// Builds the configuration, substituting the default entropy set for an
    /// empty source list.
    pub fn build(self) -> GeneratorConfig {
        let sources = if self.sources.is_empty() {
            default_sources()
        } else {
            self.sources
        };
        GeneratorConfig {
            alphabet: self.alphabet,
            size: self.size,
            sources,
            max_generation_time: self.max_generation_time,
            uniqueness_pressure: self.uniqueness_pressure,
            max_issued: self.max_issued,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid generator configuration: {0}")]
    Invalid(#[from] GenerateError),
    #[error("unknown entropy source: {0}")]
    UnknownEntropySource(String),
    #[error("invalid forbidden pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub generator: GeneratorSection,
    #[serde(default)]
    pub validator: ValidatorSection,
}

/// `[generator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub alphabet: Alphabet,
    pub size: usize,
    /// Budget per `generate` call in milliseconds.
    pub max_generation_ms: u64,
    pub uniqueness_pressure: f64,
    /// Issued-ID memory cap; 0 never resets.
    pub max_issued: usize,
    /// Built-in entropy source names; empty selects the defaults.
    pub entropy: Vec<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            size: DEFAULT_SIZE,
            max_generation_ms: DEFAULT_MAX_GENERATION_TIME.as_millis() as u64,
            uniqueness_pressure: DEFAULT_UNIQUENESS_PRESSURE,
            max_issued: DEFAULT_MAX_ISSUED,
            entropy: Vec::new(),
        }
    }
}

impl GeneratorSection {
    /// Resolves source names and builds a [`GeneratorConfig`].
    pub fn to_config(&self) -> Result<GeneratorConfig, ConfigError> {
        let sources = self
            .entropy
            .iter()
            .map(|name| {
                source_by_name(name).ok_or_else(|| ConfigError::UnknownEntropySource(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let builder = GeneratorConfig::builder()
            .alphabet(self.alphabet.clone())
            .size(self.size)
            .sources(sources)
            .max_generation_time(Duration::from_millis(self.max_generation_ms))
            .uniqueness_pressure(self.uniqueness_pressure);
        let builder = match self.max_issued {
            0 => builder.unbounded_issued(),
            cap => builder.max_issued(cap),
        };

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

/// `[validator]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSection {
    pub min_length: usize,
    pub max_length: usize,
    /// Patterns added on top of the built-in ones.
    pub forbidden_patterns: Vec<String>,
    /// Replaces the default character-class requirements when present.
    pub required: Option<Vec<CharClassRequirement>>,
}

impl Default for ValidatorSection {
    fn default() -> Self {
        let defaults = IdValidator::default();
        Self {
            min_length: defaults.min_length(),
            max_length: defaults.max_length(),
            forbidden_patterns: Vec::new(),
            required: None,
        }
    }
}

impl ValidatorSection {
    /// Builds the validator described by this section.
    pub fn to_validator(&self) -> Result<IdValidator, ConfigError> {
        let mut validator = IdValidator::default()
            .with_min_length(self.min_length)
            .with_max_length(self.max_length);
        for pattern in &self.forbidden_patterns {
            validator = validator.with_forbidden_pattern(pattern)?;
        }
        if let Some(required) = &self.required {
            validator = validator.with_requirements(required.clone());
        }
        Ok(validator)
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.generator.to_config()?;
        config.validator.to_validator()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alphabet().len(), 62);
        assert_eq!(config.size(), 21);
        assert_eq!(config.max_generation_time(), Duration::from_secs(5));
        assert_eq!(config.uniqueness_pressure(), 0.99);
        assert_eq!(config.max_issued(), Some(10_000));
        assert_eq!(config.sources().len(), default_sources().len());
    }

    #[test]
    fn test_short_alphabet_invalid() {
        let config = GeneratorConfig::builder().alphabet("x").build();
        assert!(matches!(
            config.validate(),
            Err(GenerateError::InvalidAlphabet { len: 1 })
        ));
    }

    #[test]
    fn test_zero_size_invalid() {
        let config = GeneratorConfig::builder().size(0).build();
        assert!(matches!(config.validate(), Err(GenerateError::InvalidSize)));
    }

    #[test]
    fn test_pressure_bounds() {
        for pressure in [0.0, -0.5, 1.5, f64::NAN] {
            let config = GeneratorConfig::builder().uniqueness_pressure(pressure).build();
            assert!(matches!(
                config.validate(),
                Err(GenerateError::InvalidUniquenessPressure(_))
            ));
        }
        let config = GeneratorConfig::builder().uniqueness_pressure(1.0).build();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_and_max_size() {
        assert_eq!(GeneratorConfig::builder().min_size(8).build().size(), 8);
        assert_eq!(GeneratorConfig::builder().min_size(40).build().size(), 21);
        assert_eq!(GeneratorConfig::builder().max_size(32).build().size(), 32);
        assert_eq!(GeneratorConfig::builder().max_size(10).build().size(), 21);
    }

    #[test]
    fn test_duplicate_symbols_are_kept() {
        let alphabet = Alphabet::new("aab");
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbols(), &['a', 'a', 'b']);
        assert_eq!(alphabet.to_string(), "aab");
    }

    #[test]
    fn test_builders_are_independent() {
        let custom = GeneratorConfig::builder().alphabet("01").size(4).build();
        let default = GeneratorConfig::default();

        assert_eq!(custom.alphabet().len(), 2);
        assert_eq!(default.alphabet().len(), 62);
        assert_eq!(default.size(), DEFAULT_SIZE);
    }

    #[test]
    fn test_file_config_parses_sections() {
        let config = FileConfig::from_toml(
            r#"
            [generator]
            alphabet = "0123456789abcdef"
            size = 12
            max_generation_ms = 250
            max_issued = 0
            entropy = ["timestamp", "uuid"]

            [validator]
            min_length = 10
            forbidden_patterns = ['\d{4}']
            "#,
        )
        .unwrap();

        let generator = config.generator.to_config().unwrap();
        assert_eq!(generator.alphabet().len(), 16);
        assert_eq!(generator.size(), 12);
        assert_eq!(generator.max_generation_time(), Duration::from_millis(250));
        assert_eq!(generator.max_issued(), None);
        assert_eq!(generator.sources().len(), 2);

        let validator = config.validator.to_validator().unwrap();
        assert_eq!(validator.min_length(), 10);
    }

    #[test]
    fn test_file_config_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        let generator = config.generator.to_config().unwrap();
        assert_eq!(generator.size(), DEFAULT_SIZE);
        assert_eq!(generator.max_issued(), Some(DEFAULT_MAX_ISSUED));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result = FileConfig::from_toml("[generator]\nentropy = [\"tea_leaves\"]\n");
        assert!(matches!(result, Err(ConfigError::UnknownEntropySource(name)) if name == "tea_leaves"));
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[generator]\nsize = 0\n"),
            Err(ConfigError::Invalid(GenerateError::InvalidSize))
        ));
        assert!(matches!(
            FileConfig::from_toml("[validator]\nforbidden_patterns = [\"(\"]\n"),
            Err(ConfigError::InvalidPattern(_))
        ));
        assert!(matches!(
            FileConfig::from_toml("[generator\n"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
