//! Batch runner.
//!
//! Processes every record in a registry one at a time, in registry order.
//! A failing image is logged with its path and skipped; the remaining
//! images are still processed. Only a failing registry query aborts the run.

use super::records::RecordRegistry;
use super::BatchError;
use crate::watermark::{WatermarkError, WatermarkProcessor};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default file name prefix for outputs.
pub const DEFAULT_OUTPUT_PREFIX: &str = "watermarked-";

/// Output path for `source`: same directory, file name prefixed.
pub fn output_path(source: &Path, prefix: &str) -> PathBuf {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}", prefix, file_name);
    match source.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedImage {
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedImage>,
    pub failed: Vec<FailedImage>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs one watermark configuration over every registered image.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    processor: WatermarkProcessor,
    output_prefix: String,
}

impl BatchRunner {
    pub fn new(processor: WatermarkProcessor) -> Self {
        Self {
            processor,
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn output_prefix(&self) -> &str {
        &self.output_prefix
    }

    /// Watermark every record in `registry` and write the outputs.
    pub async fn run(&self, registry: &dyn RecordRegistry) -> Result<BatchReport, BatchError> {
        tracing::info!("Adding watermark to images");

        let records = registry.records()?;
        let mut report = BatchReport::default();

        for record in records {
            let source = record.original_path;
            match self.process_one(&source).await {
                Ok(output) => {
                    tracing::info!(output = %output.display(), "Created watermarked image");
                    report.processed.push(ProcessedImage { source, output });
                }
                Err(e) => {
                    tracing::error!(
                        path = %source.display(),
                        error = %e,
                        "Error processing image"
                    );
                    report.failed.push(FailedImage {
                        source,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            processed = report.processed.len(),
            failed = report.failed.len(),
            "Watermark batch finished"
        );

        Ok(report)
    }

    async fn process_one(&self, source: &Path) -> Result<PathBuf, WatermarkError> {
        let bytes = self.processor.process_file(source).await?;
        let output = output_path(source, &self.output_prefix);
        tokio::fs::write(&output, bytes)
            .await
            .map_err(|e| WatermarkError::io(&output, e))?;
        Ok(output)
    }
}
