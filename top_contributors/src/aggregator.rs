use crate::api::{Client, Contributor, CountTier, Error, Result, SearchEnvelope};
use derive_more::Constructor;
use log::debug;
use std::sync::Arc;

const FIRST_PAGE_NUMBER: u32 = 1;

/// Page size used to reach items 101..150: pages 1 and 2 of this size cover
/// the first full page, so page 3 starts right after it.
const TAIL_PAGE_SIZE: u32 = 50;
const TAIL_PAGE_NUMBER: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
struct Page {
    page_no: u32,
    page_size: u32,
}

/// Fetches the top contributors of a location, stitching together at most
/// two upstream pages.
pub struct TopContributors<CLIENT>
where
    CLIENT: Client,
{
    client: Arc<CLIENT>,
}

impl<CLIENT> Clone for TopContributors<CLIENT>
where
    CLIENT: Client,
{
    fn clone(&self) -> Self {
        TopContributors {
            client: self.client.clone(),
        }
    }
}

impl<CLIENT> TopContributors<CLIENT>
where
    CLIENT: 'static + Client,
{
    pub fn new(client: CLIENT) -> Self {
        TopContributors {
            client: Arc::new(client),
        }
    }

    /// Validates `count` against the allowed tiers before doing any request.
    pub async fn fetch_top_contributors(&self, location: &str, count: u32) -> Result<Vec<Contributor>> {
        let tier = CountTier::try_from(count)?;
        self.fetch(location, tier).await
    }

    /// Returns at most `tier.count()` contributors in upstream order. Fewer are
    /// returned only when upstream runs out of results.
    pub async fn fetch(&self, location: &str, tier: CountTier) -> Result<Vec<Contributor>> {
        if location.trim().is_empty() {
            return Err(Error::MissingParameter("location"));
        }

        let first = Page::new(FIRST_PAGE_NUMBER, tier.page_limit());
        let head = self.search_page(location, first).await?;
        if !needs_tail(tier, head.items.len()) {
            let contributors: Vec<Contributor> = head.into_contributors().collect();
            debug!("Found {} contributors in {}", contributors.len(), location);
            return Ok(contributors);
        }

        let tail = self
            .search_page(location, Page::new(TAIL_PAGE_NUMBER, TAIL_PAGE_SIZE))
            .await?;
        let contributors: Vec<Contributor> = head.into_contributors().chain(tail.into_contributors()).collect();
        debug!("Found {} contributors in {}", contributors.len(), location);
        Ok(contributors)
    }

    async fn search_page(&self, location: &str, page: Page) -> Result<SearchEnvelope> {
        debug!(
            "Searching {} page {} of size {}",
            location, page.page_no, page.page_size
        );
        let envelope = self
            .client
            .search_users(location, page.page_size, page.page_no)
            .await?;
        if envelope.incomplete {
            debug!("Upstream reported incomplete results for {}", location);
        }
        Ok(envelope)
    }
}

/// A second request is needed only when the tier exceeds one page and the
/// first page came back full.
fn needs_tail(tier: CountTier, first_page_len: usize) -> bool {
    let limit = tier.page_limit();
    limit != tier.count() && first_page_len >= limit as usize
}
