use async_trait::async_trait;

/// External supplier of raw script text by title. Retrieval (scraping,
/// catalogs, fuzzy matching, on-disk caching) lives entirely behind this
/// boundary; the pipeline only consumes the resolved text.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// `Ok(None)` means no script could be found for the title.
    async fn fetch(&self, title: &str) -> anyhow::Result<Option<String>>;
}
