use crate::vc::types::Entry;
use promo_common::Result;

/// The two remote operations the poll loop needs.
#[async_trait::async_trait]
pub trait PromoFeed: Send + Sync {
    /// Fetch the first page of the hashtag timeline, newest first.
    async fn fetch_timeline(&self) -> Result<Vec<Entry>>;

    /// Post `text` as a comment on the post with `post_id`.
    async fn add_comment(&self, post_id: i64, text: &str) -> Result<()>;
}
