//! Startup corpus loading.
//!
//! The source directory is scanned once (non-recursively) for eligible
//! documents. Each file is read through [`extract`](crate::extract) and
//! [`parse`](crate::parse); the pairs of all files are concatenated in file
//! name order. A file that cannot be read is logged and skipped.

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{Config, CorpusConfig};
use crate::extract;
use crate::parse::{self, QaPair};

/// Eligible source file names: `<prefix><number>*.<extension>` with the
/// number inside an inclusive range.
#[derive(Debug, Clone)]
pub struct FileNamePattern {
    prefix: String,
    min_number: u32,
    max_number: u32,
    glob: GlobMatcher,
}

impl FileNamePattern {
    pub fn new(prefix: &str, min_number: u32, max_number: u32, extension: &str) -> Result<Self> {
        let pattern = format!(
            "{}*.{}",
            globset::escape(prefix),
            globset::escape(extension)
        );
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid file name pattern: {}", pattern))?
            .compile_matcher();
        Ok(Self {
            prefix: prefix.to_string(),
            min_number,
            max_number,
            glob,
        })
    }

    pub fn from_config(config: &CorpusConfig) -> Result<Self> {
        Self::new(
            &config.prefix,
            config.min_number,
            config.max_number,
            &config.extension,
        )
    }

    pub fn matches(&self, file_name: &str) -> bool {
        if !self.glob.is_match(file_name) {
            return false;
        }
        let Some(rest) = file_name.strip_prefix(&self.prefix) else {
            return false;
        };
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..digits_end]
            .parse::<u32>()
            .map(|n| (self.min_number..=self.max_number).contains(&n))
            .unwrap_or(false)
    }
}

/// Counters from a corpus load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Files whose names matched the pattern.
    pub files_scanned: usize,
    pub files_loaded: usize,
    pub files_skipped: usize,
    pub pairs: usize,
}

/// All known pairs, built once and never modified.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pairs: Vec<QaPair>,
    report: LoadReport,
}

impl Corpus {
    /// Builds a corpus from pairs already in memory.
    pub fn from_pairs(pairs: Vec<QaPair>) -> Self {
        let report = LoadReport {
            pairs: pairs.len(),
            ..LoadReport::default()
        };
        Self { pairs, report }
    }

    pub fn pairs(&self) -> &[QaPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Scans `dir` for files matching `pattern` and extracts their pairs.
///
/// Fails only when the directory itself cannot be listed; unreadable
/// documents are skipped.
pub fn load_corpus(dir: &Path, pattern: &FileNamePattern) -> Result<Corpus> {
    if !dir.is_dir() {
        bail!("Corpus directory does not exist: {}", dir.display());
    }

    let files = eligible_files(dir, pattern)?;
    let mut report = LoadReport {
        files_scanned: files.len(),
        ..LoadReport::default()
    };
    let mut pairs = Vec::new();

    for path in files {
        match extract::read_paragraph_lines(&path) {
            Ok(lines) => {
                let extracted = parse::extract_pairs(&lines);
                tracing::debug!(
                    path = %path.display(),
                    lines = lines.len(),
                    pairs = extracted.len(),
                    "document loaded"
                );
                pairs.extend(extracted);
                report.files_loaded += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable document");
                report.files_skipped += 1;
            }
        }
    }

    report.pairs = pairs.len();
    if pairs.is_empty() {
        tracing::warn!(dir = %dir.display(), "corpus is empty, every query will miss");
    } else {
        tracing::info!(
            files = report.files_loaded,
            skipped = report.files_skipped,
            pairs = report.pairs,
            "corpus loaded"
        );
    }

    Ok(Corpus { pairs, report })
}

/// Loads the corpus described by `[corpus]`.
pub fn load_from_config(config: &Config) -> Result<Corpus> {
    let pattern = FileNamePattern::from_config(&config.corpus)?;
    load_corpus(&config.corpus.dir, &pattern)
}

fn eligible_files(dir: &Path, pattern: &FileNamePattern) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if pattern.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// `qaf load`: load the corpus and print what was found.
pub fn run_load(config: &Config) -> Result<()> {
    let corpus = load_from_config(config)?;
    let report = corpus.report();
    println!("Corpus directory: {}", config.corpus.dir.display());
    println!("{:<16} {}", "FILES MATCHED", report.files_scanned);
    println!("{:<16} {}", "FILES LOADED", report.files_loaded);
    println!("{:<16} {}", "FILES SKIPPED", report.files_skipped);
    println!("{:<16} {}", "PAIRS", report.pairs);
    Ok(())
}

/// `qaf pairs`: print extracted pairs, optionally only the first `limit`.
pub fn run_pairs(config: &Config, limit: Option<usize>) -> Result<()> {
    let corpus = load_from_config(config)?;
    if corpus.is_empty() {
        println!("No pairs.");
        return Ok(());
    }
    let shown = limit.unwrap_or(corpus.len()).min(corpus.len());
    for (i, pair) in corpus.pairs().iter().take(shown).enumerate() {
        let answer = if pair.has_answer() {
            pair.answer.as_str()
        } else {
            "(no answer)"
        };
        println!("{}. Q: {}", i + 1, pair.question);
        println!("   A: {}", answer);
    }
    if shown < corpus.len() {
        println!("... {} more", corpus.len() - shown);
    }
    Ok(())
}
