//! Configuration loader implementation

use crate::document::{IniDocument, Section};
use crate::parser::parse_str;
use crate::schema::{LintSettings, LINT_SECTION};
use crate::validation::{ConfigValidator, ValidationReport};
use anyhow::{Context, Result};
use figment::providers::Env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use types::utils::normalize_key;
use types::{ConfigError, LintConfigError, SettingValue};

/// Prefix of environment variables overriding lint options
pub const ENV_PREFIX: &str = "LINTCFG_";

/// Files searched per directory during discovery, in priority order
pub const CANDIDATE_FILES: [&str; 3] = ["setup.cfg", "tox.ini", ".flake8"];

/// Commented configuration written by [`ConfigLoader::create_example`]
pub const EXAMPLE_CONFIG: &str = include_str!("../fixtures/flake8.ini");

/// A parsed file together with its typed lint settings
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Source file, `None` when loaded from a string
    pub path: Option<PathBuf>,
    /// Every section as written in the file
    pub document: IniDocument,
    /// Typed lint section with overrides applied
    pub settings: LintSettings,
}

impl LoadedConfig {
    /// Raw typed value of an option in the lint section
    pub fn setting(&self, name: &str) -> Option<&SettingValue> {
        self.document.lint_section().and_then(|section| section.get(name))
    }

    pub fn validate(&self) -> ValidationReport {
        ConfigValidator::validate(&self.settings)
    }
}

/// Configuration loader that handles INI files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load, override from the environment and validate a configuration file
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<LoadedConfig> {
        let config = Self::load_unchecked(config_path)?;
        Self::check(&config)?;
        Ok(config)
    }

    /// Load and override from the environment without validating
    pub fn load_unchecked<P: AsRef<Path>>(config_path: P) -> Result<LoadedConfig> {
        let config_path = config_path.as_ref();

        // Check if config file exists
        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        let text = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Unreadable {
            path: config_path.display().to_string(),
            message: e.to_string(),
        })?;
        let document = parse_str(&text)?;

        let section = Self::lint_section_or_empty(&document);
        let settings: LintSettings = LintSettings::figment(&section)
            // Override with environment variables (LINTCFG_MAX_LINE_LENGTH -> max-line-length)
            .merge(Env::prefixed(ENV_PREFIX).map(|key| normalize_key(key.as_str()).into()))
            .extract()
            .context("Failed to parse configuration")?;

        info!(
            path = %config_path.display(),
            sections = document.sections().count(),
            suppressed = settings.suppressed().len(),
            "Configuration loaded"
        );

        Ok(LoadedConfig {
            path: Some(config_path.to_path_buf()),
            document,
            settings,
        })
    }

    /// Load configuration from string (no environment overrides)
    pub fn load_from_str(content: &str) -> Result<LoadedConfig> {
        let document = parse_str(content)?;
        let settings = LintSettings::from_section(&Self::lint_section_or_empty(&document))
            .context("Failed to parse configuration from string")?;

        let config = LoadedConfig {
            path: None,
            document,
            settings,
        };
        Self::check(&config)?;
        Ok(config)
    }

    /// Find the nearest configuration file with a `[flake8]` section
    ///
    /// Each directory from `start` up to the filesystem root is searched for
    /// [`CANDIDATE_FILES`] in order.
    pub fn discover<P: AsRef<Path>>(start: P) -> Result<Option<PathBuf>> {
        let start = start
            .as_ref()
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", start.as_ref().display()))?;

        for dir in start.ancestors() {
            for name in CANDIDATE_FILES {
                let candidate = dir.join(name);
                if !candidate.is_file() {
                    continue;
                }

                let text = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("Failed to read {}", candidate.display()))?;
                let document = parse_str(&text)
                    .with_context(|| format!("Failed to parse {}", candidate.display()))?;

                if document.has_lint_section() {
                    debug!(path = %candidate.display(), "Discovered configuration");
                    return Ok(Some(candidate));
                }
                debug!(path = %candidate.display(), "No [{}] section, skipping", LINT_SECTION);
            }
        }

        Ok(None)
    }

    /// Get default configuration
    pub fn default() -> LintSettings {
        LintSettings::default()
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> types::Result<()> {
        let path = path.as_ref();
        std::fs::write(path, EXAMPLE_CONFIG).map_err(|e| LintConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Fail on validation errors, log warnings
    fn check(config: &LoadedConfig) -> Result<()> {
        let report = config.validate();
        for warning in &report.warnings {
            warn!(field = %warning.field, "{}", warning.message);
        }

        if let Some(error) = report.errors.first() {
            return Err(ConfigError::ValidationError {
                field: error.field.clone(),
                message: error.message.clone(),
            }
            .into());
        }

        debug!("{}", report.summary());
        Ok(())
    }

    fn lint_section_or_empty(document: &IniDocument) -> Section {
        document
            .lint_section()
            .cloned()
            .unwrap_or_else(|| Section::new(Some(LINT_SECTION.to_string())))
    }
}
