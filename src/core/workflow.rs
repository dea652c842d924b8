use crate::core::archiver::Archiver;
use crate::core::caption::caption_for;
use crate::core::normalizer::ImageNormalizer;
use crate::core::selector::FileSelector;
use crate::domain::model::{ProcessedImage, PublishedPost, RunOutcome};
use crate::domain::ports::Publisher;
use crate::utils::error::BotError;
use std::fs;

/// One select → normalize → publish → archive pass.
pub struct PostingWorkflow<P: Publisher> {
    selector: FileSelector,
    normalizer: ImageNormalizer,
    publisher: P,
    archiver: Archiver,
}

impl<P: Publisher> PostingWorkflow<P> {
    pub fn new(
        selector: FileSelector,
        normalizer: ImageNormalizer,
        publisher: P,
        archiver: Archiver,
    ) -> Self {
        Self {
            selector,
            normalizer,
            publisher,
            archiver,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Runs one pass. Never fails: every stage error is logged and returned as an outcome.
    pub async fn run_once(&self) -> RunOutcome {
        tracing::info!("Starting publish run");

        let selected = {
            let mut rng = rand::thread_rng();
            self.selector.select(&mut rng)
        };
        let selection = match selected {
            Ok(selection) => selection,
            Err(e) => {
                report("selection", &e);
                return RunOutcome::NothingToPublish(e);
            }
        };
        let file_name = selection.file_name;

        let processed = match self
            .normalizer
            .normalize(self.selector.source_dir(), &file_name)
        {
            Ok(processed) => processed,
            Err(e) => {
                report("normalization", &e);
                return RunOutcome::Failed(e);
            }
        };

        let caption = caption_for(&processed.path.to_string_lossy());
        let image = match fs::read(&processed.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let e = BotError::NormalizationError {
                    message: format!("cannot read {}: {}", processed.path.display(), e),
                };
                report("normalization", &e);
                self.cleanup(&processed);
                return RunOutcome::Failed(e);
            }
        };

        tracing::info!("Publishing '{}'", caption);
        let receipt = match self
            .publisher
            .publish(&image, &processed.mime, &caption)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                report("publish", &e);
                self.cleanup(&processed);
                return RunOutcome::Failed(e);
            }
        };
        tracing::info!("Published {} ({})", receipt.uri, file_name);

        let archived_to = match self.archiver.archive(&processed) {
            Ok(path) => Some(path),
            Err(e) => {
                report("archive", &e);
                None
            }
        };

        RunOutcome::Published(PublishedPost {
            file_name,
            caption,
            receipt,
            archived_to,
        })
    }

    fn cleanup(&self, processed: &ProcessedImage) {
        if let Err(e) = self.archiver.discard(processed) {
            tracing::warn!("Could not remove processed copy: {}", e);
        }
    }
}

fn report(stage: &str, e: &BotError) {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?})",
        stage,
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
}
