use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where source documents live and which file names are eligible.
///
/// A file qualifies when its name is `prefix`, then a number in
/// `min_number..=max_number`, then anything, then `.extension`
/// (e.g. `OSP7.docx`).
#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_min_number")]
    pub min_number: u32,
    #[serde(default = "default_max_number")]
    pub max_number: u32,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            prefix: default_prefix(),
            min_number: default_min_number(),
            max_number: default_max_number(),
            extension: default_extension(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_prefix() -> String {
    "OSP".to_string()
}
fn default_min_number() -> u32 {
    1
}
fn default_max_number() -> u32 {
    12
}
fn default_extension() -> String {
    "docx".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    crate::matcher::DEFAULT_THRESHOLD
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_not_found_message")]
    pub not_found_message: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            not_found_message: default_not_found_message(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_not_found_message() -> String {
    "Ответ не найден (нет достаточно похожих вопросов).".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Loads `path` if it exists; otherwise logs a warning and uses defaults.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }
    tracing::warn!(
        path = %path.display(),
        "config file not found, using built-in defaults"
    );
    Ok(Config::default())
}

fn validate(config: &Config) -> Result<()> {
    let corpus = &config.corpus;
    if corpus.prefix.is_empty() {
        anyhow::bail!("corpus.prefix must not be empty");
    }
    if corpus.extension.is_empty() {
        anyhow::bail!("corpus.extension must not be empty");
    }
    if corpus.min_number > corpus.max_number {
        anyhow::bail!(
            "corpus.min_number ({}) must be <= corpus.max_number ({})",
            corpus.min_number,
            corpus.max_number
        );
    }

    if !(0.0..=1.0).contains(&config.matching.threshold) {
        anyhow::bail!("matching.threshold must be in [0.0, 1.0]");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("qaf.toml");
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn empty_file_yields_defaults() {
        let (_tmp, path) = write_config("");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.corpus.dir, PathBuf::from("docs"));
        assert_eq!(cfg.corpus.prefix, "OSP");
        assert_eq!((cfg.corpus.min_number, cfg.corpus.max_number), (1, 12));
        assert_eq!(cfg.corpus.extension, "docx");
        assert_eq!(cfg.matching.threshold, 0.5);
        assert_eq!(cfg.server.bind, "127.0.0.1:5000");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let (_tmp, path) = write_config(
            r#"[corpus]
dir = "/srv/questions"
max_number = 3

[matching]
threshold = 0.7
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.corpus.dir, PathBuf::from("/srv/questions"));
        assert_eq!(cfg.corpus.max_number, 3);
        assert_eq!(cfg.corpus.prefix, "OSP");
        assert_eq!(cfg.matching.threshold, 0.7);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let (_tmp, path) = write_config("[matching]\nthreshold = 1.5\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("matching.threshold"));
    }

    #[test]
    fn inverted_number_range_is_rejected() {
        let (_tmp, path) = write_config("[corpus]\nmin_number = 5\nmax_number = 2\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("corpus.min_number"));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let (_tmp, path) = write_config("[corpus]\nprefix = \"\"\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.corpus.prefix, "OSP");
    }

    #[test]
    fn malformed_file_is_an_error_even_with_fallback() {
        let (_tmp, path) = write_config("[corpus\n");
        assert!(load_or_default(&path).is_err());
    }
}
