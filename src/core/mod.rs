pub mod archiver;
pub mod caption;
pub mod normalizer;
pub mod scheduler;
pub mod selector;
pub mod validator;
pub mod workflow;

pub use crate::domain::model::{ProcessedImage, RunOutcome, Selection};
pub use crate::domain::ports::Publisher;
pub use crate::utils::error::Result;
