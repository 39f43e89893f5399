//! Command-line surface and command handlers

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{ConfigLoader, IniDocument, LintSettings, LoadedConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use types::LintConfigError;

/// Process exit status for success
pub const EXIT_OK: u8 = 0;
/// Process exit status for invalid configuration or nothing discovered
pub const EXIT_FAILURE: u8 = 1;

/// Inspect and validate flake8-style lint configuration
#[derive(Parser, Debug)]
#[command(name = "lintcfg", version, about)]
pub struct Cli {
    /// Configuration file; discovered from the current directory when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format; falls back to LOG_FORMAT, then pretty
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective lint settings
    Show {
        #[arg(long, value_enum, default_value_t = OutputFormat::Ini)]
        format: OutputFormat,
    },
    /// Validate the configuration; exits with 1 on errors
    Check,
    /// Report whether each code is in the effective suppression set
    Suppressed {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Print the configuration file that would be used
    Discover {
        /// Directory to start from (default: current directory)
        dir: Option<PathBuf>,
    },
    /// Write an example configuration file
    Init { path: PathBuf },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ini,
    Json,
    Yaml,
}

/// Dispatch a parsed command line, writing results to `out`; returns the exit status
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<u8> {
    match cli.command {
        Command::Show { format } => {
            let config = ConfigLoader::load(resolve_path(cli.config.as_deref())?)?;
            let rendered = render(&config.settings, format)?;
            write!(out, "{}", rendered)?;
            Ok(EXIT_OK)
        }
        Command::Check => {
            let config = ConfigLoader::load_unchecked(resolve_path(cli.config.as_deref())?)?;
            check(&config, out)
        }
        Command::Suppressed { codes } => {
            let config = ConfigLoader::load(resolve_path(cli.config.as_deref())?)?;
            let suppressed = config.settings.suppressed();
            for code in &codes {
                let status = if suppressed.contains(code) { "suppressed" } else { "reported" };
                writeln!(out, "{}: {}", code, status)?;
            }
            Ok(EXIT_OK)
        }
        Command::Discover { dir } => {
            let start = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to read current directory")?,
            };
            match ConfigLoader::discover(&start)? {
                Some(path) => {
                    writeln!(out, "{}", path.display())?;
                    Ok(EXIT_OK)
                }
                None => {
                    writeln!(out, "No configuration found from {}", start.display())?;
                    Ok(EXIT_FAILURE)
                }
            }
        }
        Command::Init { path } => {
            if path.exists() {
                bail!("Refusing to overwrite existing file {}", path.display());
            }
            ConfigLoader::create_example(&path)?;
            info!(path = %path.display(), "Example configuration written");
            writeln!(out, "Wrote {}", path.display())?;
            Ok(EXIT_OK)
        }
    }
}

fn check(config: &LoadedConfig, out: &mut dyn Write) -> Result<u8> {
    let report = config.validate();
    for issue in &report.errors {
        writeln!(out, "error: {}: {}", issue.field, issue.message)?;
    }
    for issue in &report.warnings {
        writeln!(out, "warning: {}: {}", issue.field, issue.message)?;
    }
    writeln!(out, "{}", report.summary())?;

    Ok(if report.is_valid() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    })
}

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    ConfigLoader::discover(&cwd)?.ok_or_else(|| {
        anyhow!(
            "No setup.cfg, tox.ini or .flake8 with a [flake8] section found from {}",
            cwd.display()
        )
    })
}

/// Render settings in the requested format
pub fn render(settings: &LintSettings, format: OutputFormat) -> types::Result<String> {
    match format {
        OutputFormat::Ini => Ok(IniDocument::from(settings.to_section()).to_ini_string()),
        OutputFormat::Json => serde_json::to_string_pretty(settings)
            .map(|json| json + "\n")
            .map_err(|e| LintConfigError::Serialization(e.to_string())),
        OutputFormat::Yaml => {
            serde_yaml::to_string(settings)
                .map_err(|e| LintConfigError::Serialization(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(".flake8");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> (u8, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        let code = run(cli, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_format_values() {
        let cli = Cli::try_parse_from(["lintcfg", "--log-format", "json", "check"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));

        let cli = Cli::try_parse_from(["lintcfg", "check"]).unwrap();
        assert_eq!(cli.log_format, None);

        assert!(Cli::try_parse_from(["lintcfg", "--log-format", "xml", "check"]).is_err());
    }

    #[test]
    fn test_show_ini() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[flake8]\nmax-line-length = 88\nextend-ignore = S101 D\n");
        let (code, output) = run_args(&["lintcfg", "--config", path.to_str().unwrap(), "show"]);
        assert_eq!(code, EXIT_OK);
        assert!(output.starts_with(
            "[flake8]\nmax-line-length = 88\nextend-ignore =\n    D\n    S101\n"
        ));
    }

    #[test]
    fn test_render_formats() {
        let config = ConfigLoader::load_from_str("[flake8]\nextend-ignore = D\n").unwrap();

        let json = render(&config.settings, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["extend-ignore"], serde_json::json!(["D"]));

        let yaml = render(&config.settings, OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("max-line-length: 79"));
    }

    #[test]
    fn test_check_exit_codes() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[flake8]\nextend-ignore = D bad-code\n");
        let (code, output) = run_args(&["lintcfg", "check", "--config", path.to_str().unwrap()]);
        assert_eq!(code, EXIT_FAILURE);
        assert!(output.contains("error: extend-ignore: Error code 'bad-code'"));
        assert!(output.ends_with("Validation: 1 errors, 0 warnings\n"));

        let path = write_config(&dir, "[flake8]\nextend-ignore = D\n");
        let (code, _) = run_args(&["lintcfg", "check", "--config", path.to_str().unwrap()]);
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_suppressed() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[flake8]\nignore = E203\nextend-ignore = S101\n");
        let (_, output) = run_args(&[
            "lintcfg",
            "--config",
            path.to_str().unwrap(),
            "suppressed",
            "S101",
            "E203",
            "E501",
        ]);
        assert_eq!(output, "S101: suppressed\nE203: suppressed\nE501: reported\n");
    }

    #[test]
    fn test_discover_and_init() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("setup.cfg");
        let (code, _) = run_args(&["lintcfg", "init", target.to_str().unwrap()]);
        assert_eq!(code, EXIT_OK);

        let (code, output) = run_args(&["lintcfg", "discover", dir.path().to_str().unwrap()]);
        assert_eq!(code, EXIT_OK);
        assert!(output.trim_end().ends_with("setup.cfg"));

        // Init never overwrites
        let cli = Cli::try_parse_from(["lintcfg", "init", target.to_str().unwrap()]).unwrap();
        assert!(run(cli, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.cfg");
        let cli = Cli::try_parse_from(["lintcfg", "--config", missing.to_str().unwrap(), "show"])
            .unwrap();
        let err = run(cli, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }
}
