//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::clustering::{
    ClusteringEngine, ConstantSimilarity, DEFAULT_SIMILARITY, StoppingCriteria,
};
use crate::domain::graph::{KnowledgeGraph, TraversalDirection};
use crate::domain::parsing::{IncompleteRecordPolicy, ResponseParser};

/// Default target cluster size used to derive the cluster-count limit
pub const DEFAULT_NODES_PER_CLUSTER: usize = 7;

/// kgraph configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub incomplete_records: IncompleteRecordPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    pub nodes_per_cluster: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clusters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    pub traversal: TraversalDirection,
    pub semantic_similarity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub normalize_input: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            nodes_per_cluster: DEFAULT_NODES_PER_CLUSTER,
            max_clusters: None,
            max_distance: None,
            traversal: TraversalDirection::Both,
            semantic_similarity: DEFAULT_SIMILARITY,
        }
    }
}

impl ParserConfig {
    /// Parser configured with this policy
    pub fn parser(&self) -> ResponseParser {
        ResponseParser::new().with_policy(self.incomplete_records)
    }
}

impl ClusteringConfig {
    /// Stopping criteria for a particular graph
    ///
    /// An explicit `max_clusters` wins; otherwise the limit is derived from
    /// `nodes_per_cluster`.
    pub fn criteria_for(&self, graph: &KnowledgeGraph) -> StoppingCriteria {
        match self.max_clusters {
            Some(max_clusters) => StoppingCriteria {
                max_clusters,
                max_distance: self.max_distance,
            },
            None => StoppingCriteria::for_graph(graph, self.nodes_per_cluster, self.max_distance),
        }
    }

    /// Engine using the configured traversal and placeholder similarity
    pub fn engine(&self) -> ClusteringEngine {
        ClusteringEngine::new()
            .with_direction(self.traversal)
            .with_similarity(ConstantSimilarity::new(self.semantic_similarity))
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.nodes_per_cluster == 0 {
            return Err(anyhow!("clustering.nodes_per_cluster must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.semantic_similarity) {
            return Err(anyhow!(
                "clustering.semantic_similarity must be between 0.0 and 1.0"
            ));
        }
        if let Some(max) = self.max_distance {
            if max.is_nan() || max < 0.0 {
                return Err(anyhow!("clustering.max_distance must be non-negative"));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("KGRAPH_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("kgraph")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.clustering.validate()
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "parser.incomplete_records" => Ok(self.parser.incomplete_records.to_string()),

            "clustering.nodes_per_cluster" => Ok(self.clustering.nodes_per_cluster.to_string()),
            "clustering.max_clusters" => Ok(display_optional(self.clustering.max_clusters)),
            "clustering.max_distance" => Ok(display_optional(self.clustering.max_distance)),
            "clustering.traversal" => Ok(self.clustering.traversal.to_string()),
            "clustering.semantic_similarity" => {
                Ok(self.clustering.semantic_similarity.to_string())
            }

            "extraction.normalize_input" => Ok(self.extraction.normalize_input.to_string()),
            "extraction.system_prompt" => Ok(self
                .extraction
                .system_prompt
                .clone()
                .unwrap_or_else(|| "(built-in)".to_string())),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `kgraph config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "parser.incomplete_records" => {
                self.parser.incomplete_records =
                    IncompleteRecordPolicy::parse(value).ok_or_else(|| {
                        anyhow!("Invalid incomplete_records policy: {}. Valid options: skip, abort", value)
                    })?;
            }

            "clustering.nodes_per_cluster" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Invalid nodes_per_cluster value: {}", value))?;
                if size == 0 {
                    return Err(anyhow!("nodes_per_cluster must be at least 1"));
                }
                self.clustering.nodes_per_cluster = size;
            }
            "clustering.max_clusters" => {
                self.clustering.max_clusters = parse_optional(value)
                    .with_context(|| format!("Invalid max_clusters value: {}", value))?;
            }
            "clustering.max_distance" => {
                let max: Option<f64> = parse_optional(value)
                    .with_context(|| format!("Invalid max_distance value: {}", value))?;
                if max.is_some_and(|m| m.is_nan() || m < 0.0) {
                    return Err(anyhow!("max_distance must be non-negative"));
                }
                self.clustering.max_distance = max;
            }
            "clustering.traversal" => {
                self.clustering.traversal = TraversalDirection::parse(value).ok_or_else(|| {
                    anyhow!("Invalid traversal: {}. Valid options: outgoing, both", value)
                })?;
            }
            "clustering.semantic_similarity" => {
                let similarity: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid semantic_similarity value: {}", value))?;
                if !(0.0..=1.0).contains(&similarity) {
                    return Err(anyhow!("semantic_similarity must be between 0.0 and 1.0"));
                }
                self.clustering.semantic_similarity = similarity;
            }

            "extraction.normalize_input" => {
                self.extraction.normalize_input = value
                    .parse()
                    .with_context(|| format!("Invalid normalize_input value: {}", value))?;
            }
            "extraction.system_prompt" => {
                self.extraction.system_prompt = match value.trim() {
                    "" | "none" => None,
                    prompt => Some(prompt.to_string()),
                };
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `kgraph config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "parser.incomplete_records",
            "clustering.nodes_per_cluster",
            "clustering.max_clusters",
            "clustering.max_distance",
            "clustering.traversal",
            "clustering.semantic_similarity",
            "extraction.normalize_input",
            "extraction.system_prompt",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Whether `key` still holds its built-in default
    pub fn is_default(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.get(key)? == Config::default().get(key)?)
    }

    /// Reset configuration to defaults
    ///
    /// Returns the path of the removed file, or `None` when no file existed.
    pub fn reset() -> anyhow::Result<Option<PathBuf>> {
        let path = Self::config_path()?;
        Ok(Self::reset_at(&path)?.then_some(path))
    }

    /// Remove the config file at `path`, reporting whether one was there
    pub fn reset_at(path: &Path) -> anyhow::Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        Ok(true)
    }
}

fn display_optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}

fn parse_optional<T: std::str::FromStr>(value: &str) -> anyhow::Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value.trim() {
        "" | "none" | "unset" => Ok(None),
        v => Ok(Some(v.parse::<T>()?)),
    }
}
