//! Page-by-page collection of list endpoints.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::{EndpointRequest, FetchResult, HttpClient};

/// Anything that can answer a JSON GET for an endpoint.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches one page.
    async fn get_json(&self, request: &EndpointRequest) -> FetchResult<Value>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn get_json(&self, request: &EndpointRequest) -> FetchResult<Value> {
        Self::get_json(self, request).await
    }
}

/// Page size and optional page ceiling for a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    page_size: u32,
    max_pages: Option<u32>,
}

impl PageLimits {
    /// Collects pages of `page_size` until the listing is exhausted.
    #[must_use]
    pub const fn unbounded(page_size: u32) -> Self {
        Self {
            page_size,
            max_pages: None,
        }
    }

    /// Collects at most `max_pages` pages of `page_size`.
    #[must_use]
    pub const fn bounded(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size,
            max_pages: Some(max_pages),
        }
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Page ceiling, if any.
    #[must_use]
    pub const fn max_pages(&self) -> Option<u32> {
        self.max_pages
    }
}

/// Collects items from consecutive pages starting at page 1.
///
/// Stops at the first empty or short page, at the page ceiling, or at the
/// first page that fails or is not a JSON array. Items gathered before a
/// failure are kept.
pub async fn fetch_all(
    source: &dyn PageSource,
    request: &EndpointRequest,
    limits: PageLimits,
) -> Vec<Value> {
    let page_size = usize::try_from(limits.page_size).unwrap_or(usize::MAX);
    let mut items = Vec::new();
    let mut page: u32 = 1;

    loop {
        if let Some(max_pages) = limits.max_pages
            && page > max_pages
        {
            break;
        }

        let paged = request.paged(page, limits.page_size);
        let batch = match source.get_json(&paged).await {
            FetchResult::Success(Value::Array(batch)) => batch,
            FetchResult::Success(_) => {
                tracing::warn!(
                    "page {page} of {} was not a JSON array; stopping",
                    request.path()
                );
                break;
            }
            _ => break,
        };

        let received = batch.len();
        items.extend(batch);
        if received == 0 || received < page_size {
            break;
        }
        page = page.saturating_add(1);
    }

    items
}

/// Collects pages and decodes each item as `T`, skipping items that do not
/// decode.
pub async fn fetch_all_as<T: DeserializeOwned>(
    source: &dyn PageSource,
    request: &EndpointRequest,
    limits: PageLimits,
) -> Vec<T> {
    fetch_all(source, request, limits)
        .await
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                tracing::debug!("skipping undecodable item from {}: {error}", request.path());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::{Value, json};

    use super::{PageLimits, PageSource, fetch_all, fetch_all_as};
    use crate::http::{EndpointRequest, FetchResult};

    /// Serves `total` numbered items in pages and records requested pages.
    struct NumberedSource {
        total: usize,
        fail_on_page: Option<u32>,
        requested: Mutex<Vec<u32>>,
    }

    impl NumberedSource {
        fn new(total: usize) -> Self {
            Self {
                total,
                fail_on_page: None,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().expect("lock should not be poisoned").clone()
        }
    }

    #[async_trait]
    impl PageSource for NumberedSource {
        async fn get_json(&self, request: &EndpointRequest) -> FetchResult<Value> {
            let cursor = request.cursor().expect("requests should be paged");
            self.requested
                .lock()
                .expect("lock should not be poisoned")
                .push(cursor.page);
            if self.fail_on_page == Some(cursor.page) {
                return FetchResult::StatusError {
                    code: 502,
                    body: "bad gateway".to_owned(),
                };
            }

            let size = cursor.per_page as usize;
            let start = (cursor.page as usize - 1) * size;
            let end = (start + size).min(self.total);
            let items: Vec<Value> = (start..end).map(|index| json!({"id": index})).collect();
            FetchResult::Success(Value::Array(items))
        }
    }

    #[rstest]
    #[case::empty(0, 10, None, 0, 1)]
    #[case::single_short_page(3, 10, None, 3, 1)]
    #[case::exact_multiple(20, 10, None, 20, 3)]
    #[case::ragged(25, 10, None, 25, 3)]
    #[case::capped_by_ceiling(95, 10, Some(4), 40, 4)]
    #[case::ceiling_above_need(15, 10, Some(10), 15, 2)]
    #[tokio::test]
    async fn collects_min_of_total_and_ceiling(
        #[case] total: usize,
        #[case] page_size: u32,
        #[case] max_pages: Option<u32>,
        #[case] expected_items: usize,
        #[case] expected_requests: usize,
    ) {
        let source = NumberedSource::new(total);
        let limits = max_pages.map_or_else(
            || PageLimits::unbounded(page_size),
            |max| PageLimits::bounded(page_size, max),
        );

        let items = fetch_all(&source, &EndpointRequest::new("/items"), limits).await;

        assert_eq!(items.len(), expected_items);
        assert_eq!(source.requested().len(), expected_requests);
        assert_eq!(items.first(), (total > 0).then(|| json!({"id": 0})).as_ref());
    }

    #[rstest]
    #[tokio::test]
    async fn failure_keeps_items_from_earlier_pages() {
        let source = NumberedSource {
            fail_on_page: Some(2),
            ..NumberedSource::new(30)
        };

        let items = fetch_all(
            &source,
            &EndpointRequest::new("/items"),
            PageLimits::unbounded(10),
        )
        .await;

        assert_eq!(items.len(), 10);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[derive(Debug, Deserialize, PartialEq, Eq)]
    struct Numbered {
        id: u64,
    }

    struct MixedSource;

    #[async_trait]
    impl PageSource for MixedSource {
        async fn get_json(&self, _request: &EndpointRequest) -> FetchResult<Value> {
            FetchResult::Success(json!([{"id": 1}, {"name": "no id"}, {"id": 3}]))
        }
    }

    #[rstest]
    #[tokio::test]
    async fn typed_collection_skips_undecodable_items() {
        let items: Vec<Numbered> = fetch_all_as(
            &MixedSource,
            &EndpointRequest::new("/items"),
            PageLimits::bounded(3, 1),
        )
        .await;

        assert_eq!(items, vec![Numbered { id: 1 }, Numbered { id: 3 }]);
    }
}
