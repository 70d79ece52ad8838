//! Browsing stored arrays: paged listing or point lookup by id.
//!
//! Every change of query parameters hands out a [`FetchTicket`] stamped with
//! a new generation. Results are applied only when their ticket is still the
//! latest one, so a slow response for a superseded query never overwrites the
//! state of a newer one.

use bucket_client::{GatewayError, RemoteArrayGateway};
use bucket_model::{ArrayId, PAGE_SIZE, Page};

/// What the browser is asking the store for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Point lookup with the search text as typed.
    Lookup(String),
    /// One page of the full listing.
    Listing { page: u32 },
}

/// A pending fetch for one query generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: Query,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// What the browser currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrowseState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Loaded(Page),
    /// The last fetch failed; holds the message for display.
    Failed(String),
}

/// Navigation controls for a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub current: u32,
    pub last: u32,
    pub first_enabled: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub last_enabled: bool,
}

impl PageControls {
    /// Controls for `page`, or `None` when everything fits on one page or
    /// the page is a point lookup.
    pub fn for_page(page: &Page) -> Option<Self> {
        let total = page.total_count?;
        if total <= PAGE_SIZE as u64 {
            return None;
        }
        let current = page.page_number;
        let has_more = page.is_full();
        Some(Self {
            current,
            last: page.page_count(),
            first_enabled: current > 1,
            prev_enabled: current > 1,
            next_enabled: has_more,
            last_enabled: has_more,
        })
    }
}

/// Query state and latest result for the stored-array collection.
#[derive(Debug, Clone)]
pub struct CollectionBrowser {
    search: Option<String>,
    page: u32,
    generation: u64,
    state: BrowseState,
}

impl Default for CollectionBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionBrowser {
    pub fn new() -> Self {
        Self {
            search: None,
            page: 1,
            generation: 0,
            state: BrowseState::Idle,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// The loaded page, if the last applied fetch succeeded.
    pub fn current(&self) -> Option<&Page> {
        match &self.state {
            BrowseState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            BrowseState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn controls(&self) -> Option<PageControls> {
        self.current().and_then(PageControls::for_page)
    }

    pub fn query(&self) -> Query {
        match &self.search {
            Some(text) => Query::Lookup(text.clone()),
            None => Query::Listing { page: self.page },
        }
    }

    /// Start a new generation for the current query.
    pub fn request(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            query: self.query(),
        }
    }

    /// Move to another listing page. Returns a ticket only if the page changed.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page == 0 || page == self.page {
            return None;
        }
        self.page = page;
        Some(self.request())
    }

    /// Set or clear the search id. Empty text clears it. Returns a ticket
    /// only if the search changed.
    pub fn set_search(&mut self, text: Option<&str>) -> Option<FetchTicket> {
        let search = text.filter(|t| !t.is_empty()).map(str::to_string);
        if search == self.search {
            return None;
        }
        self.search = search;
        Some(self.request())
    }

    /// Run the fetch for `ticket`.
    ///
    /// A lookup for a missing id, or for text that is not an id at all, is an
    /// empty page rather than an error.
    pub async fn fetch(
        gateway: &dyn RemoteArrayGateway,
        ticket: &FetchTicket,
    ) -> Result<Page, GatewayError> {
        match &ticket.query {
            Query::Listing { page } => gateway.list(*page).await,
            Query::Lookup(text) => {
                let Ok(id) = text.parse::<ArrayId>() else {
                    tracing::debug!("Search text is not an array id");
                    return Ok(Page::lookup(None));
                };
                match gateway.read(id).await {
                    Ok(record) => Ok(Page::lookup(Some(record))),
                    Err(err) if err.is_not_found() => Ok(Page::lookup(None)),
                    Err(err) => Err(err),
                }
            }
        }
    }

    /// Apply a fetch result. Results for superseded tickets are dropped and
    /// `false` is returned.
    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<Page, GatewayError>) -> bool {
        if ticket.generation != self.generation {
            tracing::warn!(
                ticket = ticket.generation,
                latest = self.generation,
                "Ignoring stale browse result"
            );
            return false;
        }
        self.state = match result {
            Ok(page) => {
                tracing::debug!(items = page.items.len(), total = ?page.total_count, "Browse result applied");
                BrowseState::Loaded(page)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to load arrays");
                BrowseState::Failed(err.user_message().to_string())
            }
        };
        true
    }

    /// Fetch the current query and apply the result.
    pub async fn refresh(&mut self, gateway: &dyn RemoteArrayGateway) -> bool {
        let ticket = self.request();
        let result = Self::fetch(gateway, &ticket).await;
        self.apply(&ticket, result)
    }
}
