use crate::utils::error::BotError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker prepended to the transient copy that gets uploaded.
pub const PROCESSED_PREFIX: &str = "processed_";

/// A file picked from the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub file_name: String,
    pub attempts: usize,
}

/// The upload-ready copy of an original image, living next to it in the source directory.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub original: String,
    pub path: PathBuf,
    pub mime: String,
    pub reencoded: bool,
}

/// Reference to a created post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone)]
pub struct PublishedPost {
    pub file_name: String,
    pub caption: String,
    pub receipt: PostReceipt,
    /// `None` when the post went out but moving the original failed.
    pub archived_to: Option<PathBuf>,
}

/// Result of one scheduled run. Runs never error out; failures are captured here.
#[derive(Debug)]
pub enum RunOutcome {
    Published(PublishedPost),
    /// Selection failed, so nothing reached the network.
    NothingToPublish(BotError),
    Failed(BotError),
}

impl RunOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, RunOutcome::Published(_))
    }
}
