//! Relocation orchestrator
//!
//! Runs one image through `extension check -> detect -> classify -> copy`.
//! Rejected extensions and rejected images are successful outcomes; only
//! detector and copy failures surface as [`RelocationError`].

use crate::config::{ClassifierConfig, DESTINATION_PREFIX, RelocationConfig, STAGING_PREFIX};
use crate::error::{RelocationError, RelocationResult};
use crate::judge::{CatImageJudge, Judgement};
use crate::traits::{LabelDetector, ObjectCopier};
use crate::types::{ClassificationResult, ImageReference};
use std::sync::Arc;

/// Terminal success states of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationOutcome {
    RejectedExtension,
    /// Classified but not accepted; nothing was copied
    Skipped(ClassificationResult),
    Copied {
        classification: ClassificationResult,
        destination_bucket: String,
        destination_key: String,
    },
}

/// Destination key for an accepted staging key: a leading `tmp/` is replaced
/// by `cat-images/`. Keys outside the staging prefix keep their full path.
pub fn destination_key(source_key: &str) -> String {
    let relative = source_key
        .strip_prefix(STAGING_PREFIX)
        .unwrap_or(source_key);
    format!("{}{}", DESTINATION_PREFIX, relative)
}

pub struct CatImageRelocator {
    judge: CatImageJudge,
    copier: Arc<dyn ObjectCopier>,
    config: RelocationConfig,
}

impl CatImageRelocator {
    pub fn new(
        detector: Arc<dyn LabelDetector>,
        copier: Arc<dyn ObjectCopier>,
        classifier: ClassifierConfig,
        config: RelocationConfig,
    ) -> Self {
        Self {
            judge: CatImageJudge::new(detector, classifier),
            copier,
            config,
        }
    }

    pub fn config(&self) -> &RelocationConfig {
        &self.config
    }

    /// Process a single image event
    #[tracing::instrument(skip(self), fields(bucket = %reference.bucket, key = %reference.key))]
    pub async fn relocate(&self, reference: &ImageReference) -> RelocationResult<RelocationOutcome> {
        let judgement = self.judge.judge(reference).await.map_err(|source| {
            tracing::error!(error = %source, "Label detection failed");
            RelocationError::DetectionFailed {
                bucket: reference.bucket.clone(),
                key: reference.key.clone(),
                source,
            }
        })?;

        let classification = match judgement {
            Judgement::RejectedExtension => return Ok(RelocationOutcome::RejectedExtension),
            Judgement::Classified(result) if !result.is_accepted => {
                tracing::info!("Not an acceptable cat image, skipping");
                return Ok(RelocationOutcome::Skipped(result));
            }
            Judgement::Classified(result) => result,
        };

        let destination_key = destination_key(&reference.key);

        self.copier
            .copy_object(
                &self.config.trigger_bucket,
                &reference.key,
                &self.config.destination_bucket,
                &destination_key,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Copy to destination failed");
                RelocationError::CopyFailed(e)
            })?;

        tracing::info!(
            destination_bucket = %self.config.destination_bucket,
            destination_key = %destination_key,
            "Copied cat image"
        );

        Ok(RelocationOutcome::Copied {
            classification,
            destination_bucket: self.config.destination_bucket.clone(),
            destination_key,
        })
    }

    /// Process events one after another in delivery order.
    ///
    /// A failed event does not stop the batch; each result is returned in the
    /// position of its event so the caller can decide what to redrive.
    pub async fn relocate_batch(
        &self,
        references: &[ImageReference],
    ) -> Vec<RelocationResult<RelocationOutcome>> {
        let mut results = Vec::with_capacity(references.len());
        for reference in references {
            results.push(self.relocate(reference).await);
        }
        results
    }
}
