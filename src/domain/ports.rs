use crate::domain::model::PostReceipt;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A social network account that can receive one image post.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, image: &[u8], mime: &str, caption: &str) -> Result<PostReceipt>;
}
