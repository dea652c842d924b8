pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::bluesky::{BlueskyClient, BlueskyPublisher, Credentials};
pub use config::BotConfig;
pub use crate::core::{
    archiver::Archiver,
    normalizer::ImageNormalizer,
    scheduler::{Schedule, Scheduler},
    selector::FileSelector,
    validator::{FilenameValidator, PatternMatch},
    workflow::PostingWorkflow,
};
pub use utils::error::{BotError, Result};
