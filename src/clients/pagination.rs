//! Walking paged collections.
//!
//! Paged endpoints return one page per call together with a marker saying
//! whether another page follows. [`walk_pages`] requests pages in order,
//! concatenates their items, and stops the first time a page reports no
//! successor. Every page is a separate call through the full request
//! pipeline, so each one is rate limited and retried on its own.

use std::future::Future;

use crate::clients::api_client::ApiClient;
use crate::clients::errors::ApiError;
use crate::models::{Order, OrdersPage};
use crate::validation::validate_customer_id;

/// Upper bound on the number of pages one walk will request.
pub const MAX_PAGES: u32 = 1000;

/// A response body holding one page of items.
pub trait Paginated {
    /// The element type collected across pages.
    type Item;

    /// Splits the page into its items and whether another page follows.
    fn into_page(self) -> (Vec<Self::Item>, bool);
}

impl Paginated for OrdersPage {
    type Item = Order;

    fn into_page(self) -> (Vec<Order>, bool) {
        let has_next = self.has_next();
        (self.results, has_next)
    }
}

/// Fetches pages `first_page`, `first_page + 1`, ... until one reports no
/// next page, returning all items in page order.
///
/// # Errors
///
/// Propagates the first error returned by `fetch`; items from earlier pages
/// are discarded. Returns [`ApiError::Decode`] if the server still reports a
/// next page after [`MAX_PAGES`] pages.
pub async fn walk_pages<P, F, Fut>(first_page: u32, mut fetch: F) -> Result<Vec<P::Item>, ApiError>
where
    P: Paginated,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<P, ApiError>>,
{
    let mut items = Vec::new();
    let mut page = first_page;

    for fetched in 1..=MAX_PAGES {
        let (mut page_items, has_next) = fetch(page).await?.into_page();
        items.append(&mut page_items);

        if !has_next {
            tracing::debug!(pages = fetched, items = items.len(), "pagination complete");
            return Ok(items);
        }
        page = page.saturating_add(1);
    }

    tracing::warn!(max_pages = MAX_PAGES, "server kept reporting a next page, giving up");
    Err(ApiError::Decode {
        code: 200,
        message: format!("pagination did not terminate after {MAX_PAGES} pages"),
    })
}

impl ApiClient {
    /// Fetches every order across all pages, oldest page first.
    ///
    /// The customer ID is validated once before the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a malformed ID, otherwise the
    /// first error any page fails with.
    pub async fn get_all_orders(&self, customer_id: &str) -> Result<Vec<Order>, ApiError> {
        validate_customer_id(customer_id).into_result("customer_id")?;
        walk_pages(1, |page| self.list_orders(customer_id, page)).await
    }
}
