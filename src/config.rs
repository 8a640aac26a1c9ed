//! TOML configuration.
//!
//! Only `[db]` and `[site]` are required; every other section has defaults.
//! See `config/linkpilot.example.toml` for an annotated sample.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use linkpilot_core::links::{SiteContext, DEFAULT_EXCLUDED_PREFIXES};
use linkpilot_core::models::primary_types;
use linkpilot_core::score::{SuggestParams, DEFAULT_PER_TERM_LIMIT, DEFAULT_SUGGESTION_LIMIT};
use linkpilot_core::signals::{ExclusionSignals, MetaContains, MetaEquals};
use linkpilot_core::terms::DEFAULT_KEYWORD_LIMIT;
use linkpilot_core::EngineSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub orphans: OrphansConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub import: Option<ImportConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub base_url: String,
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
    #[serde(default)]
    pub resolve_relative_links: bool,
}

fn default_excluded_prefixes() -> Vec<String> {
    DEFAULT_EXCLUDED_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_keyword_limit")]
    pub keyword_limit: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_per_term_limit")]
    pub per_term_limit: usize,
    #[serde(default = "primary_types")]
    pub suggestion_types: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            per_term_limit: DEFAULT_PER_TERM_LIMIT,
            suggestion_types: primary_types(),
        }
    }
}

fn default_keyword_limit() -> usize {
    DEFAULT_KEYWORD_LIMIT
}
fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}
fn default_per_term_limit() -> usize {
    DEFAULT_PER_TERM_LIMIT
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrphansConfig {
    #[serde(default = "primary_types")]
    pub post_types: Vec<String>,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

impl Default for OrphansConfig {
    fn default() -> Self {
        Self {
            post_types: primary_types(),
            per_page: default_per_page(),
        }
    }
}

fn default_per_page() -> usize {
    linkpilot_core::graph::DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

/// `[indexing]`: which metadata flags exclude a document from suggestions.
///
/// When `signals` is absent the built-in SEO plugin flags are used; an
/// explicit list (even an empty one) replaces them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct IndexingConfig {
    #[serde(default)]
    pub signals: Option<Vec<SignalConfig>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum SignalConfig {
    Equals { key: String, equals: String },
    Contains { key: String, contains: String },
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.json".to_string()]
}

impl Config {
    /// Site context built from `[site]`.
    pub fn site_context(&self) -> Result<SiteContext> {
        Ok(SiteContext::new(&self.site.base_url)?
            .with_excluded_prefixes(self.site.excluded_prefixes.clone())
            .with_relative_resolution(self.site.resolve_relative_links))
    }

    pub fn exclusion_signals(&self) -> ExclusionSignals {
        let Some(signals) = &self.indexing.signals else {
            return ExclusionSignals::with_defaults();
        };
        let mut chain = ExclusionSignals::new();
        for signal in signals {
            match signal {
                SignalConfig::Equals { key, equals } => {
                    chain.register(Box::new(MetaEquals::new(key.as_str(), equals.as_str())))
                }
                SignalConfig::Contains { key, contains } => {
                    chain.register(Box::new(MetaContains::new(key.as_str(), contains.as_str())))
                }
            }
        }
        chain
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            keyword_limit: self.analysis.keyword_limit,
            suggest: SuggestParams {
                limit: self.analysis.suggestion_limit,
                per_term_limit: self.analysis.per_term_limit,
                types: self.analysis.suggestion_types.clone(),
            },
            stats_types: self.analysis.suggestion_types.clone(),
            orphan_types: self.orphans.post_types.clone(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate site
    config.site_context()?;

    // Validate analysis
    if config.analysis.keyword_limit == 0 {
        anyhow::bail!("analysis.keyword_limit must be >= 1");
    }
    if config.analysis.suggestion_limit == 0 {
        anyhow::bail!("analysis.suggestion_limit must be >= 1");
    }
    if config.analysis.per_term_limit == 0 {
        anyhow::bail!("analysis.per_term_limit must be >= 1");
    }
    if config.analysis.suggestion_types.is_empty() {
        anyhow::bail!("analysis.suggestion_types must not be empty");
    }

    // Validate orphans
    if config.orphans.per_page == 0 {
        anyhow::bail!("orphans.per_page must be >= 1");
    }
    if config.orphans.post_types.is_empty() {
        anyhow::bail!("orphans.post_types must not be empty");
    }

    Ok(config)
}
