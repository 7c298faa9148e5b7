//! Shared types for pipeline stages.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::core::PipelineStage;

/// Result wrapper for stage processing operations.
///
/// Every stage returns its data together with the metrics it collected, so
/// the reader can report per-stage timings without each stage logging them.
#[derive(Debug, Clone)]
pub struct StageResult<T> {
    /// The processed data from the stage
    pub data: T,
    /// Performance and outcome metrics for the stage
    pub metrics: StageMetrics,
}

impl<T> StageResult<T> {
    /// Create a new stage result with the given data and metrics
    pub fn new(data: T, metrics: StageMetrics) -> Self {
        Self { data, metrics }
    }
}

/// Metrics collected during stage processing.
#[derive(Debug, Clone, Serialize)]
pub struct StageMetrics {
    pub stage: PipelineStageName,
    /// Time taken to process the stage
    pub processing_time: Option<Duration>,
    /// Number of items successfully processed
    pub success_count: usize,
    /// Number of items that failed processing
    pub failure_count: usize,
    /// Additional stage-specific details
    pub additional_info: BTreeMap<String, String>,
}

/// Serialisable name of a [`PipelineStage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct PipelineStageName(pub PipelineStage);

impl From<PipelineStageName> for String {
    fn from(name: PipelineStageName) -> Self {
        name.0.to_string()
    }
}

impl StageMetrics {
    /// Create new metrics with the given counts
    pub fn new(stage: PipelineStage, success_count: usize, failure_count: usize) -> Self {
        Self {
            stage: PipelineStageName(stage),
            processing_time: None,
            success_count,
            failure_count,
            additional_info: BTreeMap::new(),
        }
    }

    /// Set the processing time from a start instant
    pub fn finished(mut self, start: Instant) -> Self {
        self.processing_time = Some(start.elapsed());
        self
    }

    /// Add additional information to the metrics
    pub fn with_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }

    /// Get the total number of items processed
    pub fn total_count(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Get the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            0.0
        } else {
            (self.success_count as f64 / total as f64) * 100.0
        }
    }
}
