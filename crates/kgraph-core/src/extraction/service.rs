//! Knowledge graph extraction from free text
//!
//! Sends the text to a language model wrapped in the extraction prompt, parses
//! the model's records into a graph and clusters the result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{ClusteringConfig, Config};
use crate::domain::clustering::{ClusteringEngine, StopReason};
use crate::domain::graph::KnowledgeGraph;
use crate::domain::parsing::{ResponseParser, SkippedRecord};
use crate::error::{Error, Result};
use crate::text::TextNormalizer;

use super::model::LanguageModel;
use super::prompt::PromptTemplate;

/// Everything one extraction produced
#[derive(Debug)]
pub struct ExtractionReport {
    /// The clustered graph, with `build_duration` set
    pub graph: KnowledgeGraph,
    /// Records that produced an edge
    pub records_applied: usize,
    /// Records the parser dropped
    pub skipped: Vec<SkippedRecord>,
    /// Merges performed by the clustering pass
    pub merges: usize,
    /// Why clustering stopped
    pub stop_reason: StopReason,
}

/// Orchestrates prompt, model, parser and clustering
#[derive(Clone)]
pub struct KnowledgeExtractor {
    model: Arc<dyn LanguageModel>,
    template: PromptTemplate,
    parser: ResponseParser,
    engine: ClusteringEngine,
    clustering: ClusteringConfig,
    normalize_input: bool,
}

impl KnowledgeExtractor {
    /// Extractor with default settings
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self::configured(model, &Config::default())
    }

    /// Extractor configured from the persisted settings
    pub fn from_config(model: Arc<dyn LanguageModel>, config: &Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        Ok(Self::configured(model, config))
    }

    fn configured(model: Arc<dyn LanguageModel>, config: &Config) -> Self {
        let template = config
            .extraction
            .system_prompt
            .as_deref()
            .map(PromptTemplate::new)
            .unwrap_or_default();

        Self {
            model,
            template,
            parser: config.parser.parser(),
            engine: config.clustering.engine(),
            clustering: config.clustering.clone(),
            normalize_input: config.extraction.normalize_input,
        }
    }

    /// Replace the clustering engine, keeping the configured stopping criteria
    pub fn with_engine(mut self, engine: ClusteringEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Prompt that would be sent for `text`
    pub fn prompt_for(&self, text: &str) -> String {
        if self.normalize_input {
            self.template
                .construct_final_prompt(&TextNormalizer::process(text))
        } else {
            self.template.construct_final_prompt(text)
        }
    }

    /// Build a clustered graph for `owner_id` from `text`
    pub async fn extract(&self, owner_id: &str, text: &str) -> Result<KnowledgeGraph> {
        self.extract_detailed(owner_id, text)
            .await
            .map(|report| report.graph)
    }

    /// Build a clustered graph, reporting parse and clustering details
    pub async fn extract_detailed(&self, owner_id: &str, text: &str) -> Result<ExtractionReport> {
        if owner_id.trim().is_empty() {
            return Err(Error::InvalidInput("owner id must not be empty".to_string()));
        }

        let started = Instant::now();
        info!(owner_id, text_len = text.len(), "Extracting knowledge graph");

        let prompt = self.prompt_for(text);
        debug!(owner_id, prompt_len = prompt.len(), "Sending prompt");

        let response = self.model.complete(&prompt).await?;
        debug!(owner_id, response_len = response.len(), "Model responded");

        let outcome = self.parser.parse_detailed(owner_id, &response)?;
        let mut graph = outcome.graph;

        let criteria = self.clustering.criteria_for(&graph);
        let clustering = self.engine.annotate(&mut graph, &criteria);

        graph.build_duration = started.elapsed();

        info!(
            owner_id,
            graph_id = %graph.id,
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            cluster_count = graph.clusters.len(),
            elapsed_ms = graph.build_duration.as_millis() as u64,
            "Knowledge graph built"
        );

        Ok(ExtractionReport {
            graph,
            records_applied: outcome.records_applied,
            skipped: outcome.skipped,
            merges: clustering.merges,
            stop_reason: clustering.stop_reason,
        })
    }
}
