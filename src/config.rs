//! Project configuration: extraction parameters, directory layout and LLM
//! provider settings, persisted as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "concepts.toml";

/// Output format for per-subject results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Both,
}

impl OutputFormat {
    pub fn writes_csv(&self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_json(&self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

/// Tuning knobs of the extraction strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum final score for a hybrid concept to be kept.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Maximum concepts per question (hybrid strategy).
    #[serde(default = "default_max_concepts")]
    pub max_concepts: usize,
    /// Ranked phrases must be longer than this many characters.
    #[serde(default = "default_min_concept_length")]
    pub min_concept_length: usize,
    #[serde(default = "default_true")]
    pub use_patterns: bool,
    #[serde(default = "default_true")]
    pub use_fuzzy_matching: bool,
    /// How many top ranked phrases the hybrid strategy considers.
    #[serde(default = "default_max_ranked_phrases")]
    pub max_ranked_phrases: usize,
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Extra stopwords, one per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopwords_file: Option<PathBuf>,
    /// TOML file replacing the built-in knowledge base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_file: Option<PathBuf>,
}

fn default_confidence_threshold() -> f32 {
    0.5
}
fn default_max_concepts() -> usize {
    10
}
fn default_min_concept_length() -> usize {
    3
}
fn default_true() -> bool {
    true
}
fn default_max_ranked_phrases() -> usize {
    15
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            max_concepts: default_max_concepts(),
            min_concept_length: default_min_concept_length(),
            use_patterns: true,
            use_fuzzy_matching: true,
            max_ranked_phrases: default_max_ranked_phrases(),
            output_format: OutputFormat::default(),
            stopwords_file: None,
            knowledge_base_file: None,
        }
    }
}

/// Where inputs live and outputs go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Question CSVs, one per subject (`<subject>.csv`).
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
    /// Concept dictionaries (`<subject>_concepts.csv`).
    #[serde(default = "default_dictionaries_dir")]
    pub dictionaries_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    #[serde(default = "default_batch_output_dir")]
    pub batch_output_dir: PathBuf,
}

fn default_resources_dir() -> PathBuf {
    "resources".into()
}
fn default_dictionaries_dir() -> PathBuf {
    "dictionaries".into()
}
fn default_output_dir() -> PathBuf {
    "output".into()
}
fn default_logs_dir() -> PathBuf {
    "logs".into()
}
fn default_batch_output_dir() -> PathBuf {
    "batch_output".into()
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            resources_dir: default_resources_dir(),
            dictionaries_dir: default_dictionaries_dir(),
            output_dir: default_output_dir(),
            logs_dir: default_logs_dir(),
            batch_output_dir: default_batch_output_dir(),
        }
    }
}

impl DirectoryConfig {
    /// Same layout with every relative directory resolved against `base`.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            resources_dir: base.join(&self.resources_dir),
            dictionaries_dir: base.join(&self.dictionaries_dir),
            output_dir: base.join(&self.output_dir),
            logs_dir: base.join(&self.logs_dir),
            batch_output_dir: base.join(&self.batch_output_dir),
        }
    }

    pub fn questions_file(&self, subject: &str) -> PathBuf {
        self.resources_dir.join(format!("{subject}.csv"))
    }

    pub fn dictionary_file(&self, subject: &str) -> PathBuf {
        self.dictionaries_dir.join(format!("{subject}_concepts.csv"))
    }

    fn all(&self) -> [&Path; 5] {
        [
            &self.resources_dir,
            &self.dictionaries_dir,
            &self.output_dir,
            &self.logs_dir,
            &self.batch_output_dir,
        ]
    }
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// The built-in knowledge-base strategy.
    #[default]
    Simulated,
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable consulted when no key is configured.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Simulated => None,
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    150
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LlmConfig {
    /// The configured key, or the provider's environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.provider
                    .api_key_env()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub directories: DirectoryConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl ProjectConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDir {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }

    /// Check the configuration and return every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let ex = &self.extraction;
        if !(0.0..=1.0).contains(&ex.confidence_threshold) {
            issues.push("confidence_threshold must be between 0 and 1".to_string());
        }
        if ex.max_concepts < 1 {
            issues.push("max_concepts must be at least 1".to_string());
        }
        if ex.max_ranked_phrases < 1 {
            issues.push("max_ranked_phrases must be at least 1".to_string());
        }
        for dir in [&self.directories.resources_dir, &self.directories.dictionaries_dir] {
            if !dir.exists() {
                issues.push(format!("Required directory does not exist: {}", dir.display()));
            }
        }
        if self.llm.provider != LlmProvider::Simulated && self.llm.resolved_api_key().is_none() {
            issues.push(format!("API key required for provider: {}", self.llm.provider));
        }
        issues
    }

    /// Create every configured directory.
    pub fn create_directories(&self) -> ConfigResult<()> {
        for dir in self.directories.all() {
            std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [extraction]
            confidence_threshold = 0.7
            output_format = "both"

            [llm]
            provider = "anthropic"
            "#,
        )
        .unwrap();
        assert_eq!(config.extraction.confidence_threshold, 0.7);
        assert_eq!(config.extraction.max_concepts, 10);
        assert_eq!(config.extraction.output_format, OutputFormat::Both);
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.directories.resources_dir, PathBuf::from("resources"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("concepts.toml");
        let mut config = ProjectConfig::default();
        config.extraction.max_concepts = 4;
        config.llm.provider = LlmProvider::OpenAi;
        config.save(&path).unwrap();
        assert_eq!(ProjectConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_gives_defaults_but_bad_toml_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(ProjectConfig::load_or_default(&missing).unwrap(), ProjectConfig::default());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[extraction\nmax_concepts = ").unwrap();
        assert!(matches!(
            ProjectConfig::load_or_default(&bad),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validate_reports_ranges_and_directories() {
        let dir = TempDir::new().unwrap();
        let mut config = ProjectConfig::default();
        config.directories = config.directories.rooted_at(dir.path());
        config.extraction.confidence_threshold = 1.5;
        config.extraction.max_concepts = 0;

        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("confidence_threshold")));
        assert!(issues.iter().any(|i| i.contains("max_concepts")));
        assert!(issues.iter().any(|i| i.contains("Required directory")));

        config.create_directories().unwrap();
        config.extraction = ExtractionConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn explicit_api_key_satisfies_network_provider() {
        let dir = TempDir::new().unwrap();
        let mut config = ProjectConfig::default();
        config.directories = config.directories.rooted_at(dir.path());
        config.create_directories().unwrap();
        config.llm.provider = LlmProvider::Anthropic;
        config.llm.api_key = Some("key".into());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn subject_file_conventions() {
        let dirs = DirectoryConfig::default();
        assert_eq!(dirs.questions_file("history"), PathBuf::from("resources/history.csv"));
        assert_eq!(
            dirs.dictionary_file("history"),
            PathBuf::from("dictionaries/history_concepts.csv")
        );
    }
}
