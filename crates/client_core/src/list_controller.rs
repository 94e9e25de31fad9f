use std::sync::Arc;

use serde::de::DeserializeOwned;
use shared::{
    domain::ItemId,
    error::ValidationError,
    protocol::{
        FilterPatch, FilterState, ItemOperation, ListQuery, PageMode, DEFAULT_PAGE_SIZE,
    },
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    config::Settings,
    error::ListError,
    page::parse_page,
    scroll::{ScrollPosition, DEFAULT_NEAR_BOTTOM_THRESHOLD_PX},
    transport::ListTransport,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;
pub const DEFAULT_LOAD_FALLBACK: &str = "Failed to load items";
pub const DEFAULT_MUTATE_FALLBACK: &str = "Failed to update item";

#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    /// Response field holding the page's items, e.g. `messages` or `reports`.
    pub items_field: String,
    pub page_size: u32,
    pub near_bottom_threshold_px: f64,
    pub load_fallback: String,
    pub mutate_fallback: String,
}

impl ListOptions {
    pub fn new(items_field: impl Into<String>) -> Self {
        Self {
            items_field: items_field.into(),
            page_size: DEFAULT_PAGE_SIZE,
            near_bottom_threshold_px: DEFAULT_NEAR_BOTTOM_THRESHOLD_PX,
            load_fallback: DEFAULT_LOAD_FALLBACK.into(),
            mutate_fallback: DEFAULT_MUTATE_FALLBACK.into(),
        }
    }

    pub fn from_settings(items_field: impl Into<String>, settings: &Settings) -> Self {
        Self {
            page_size: settings.page_size.max(1),
            near_bottom_threshold_px: settings.near_bottom_threshold_px,
            ..Self::new(items_field)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Reset,
    Loading {
        page: u32,
        mode: PageMode,
    },
    Loaded {
        page: u32,
        mode: PageMode,
        item_count: usize,
        total_pages: u32,
    },
    LoadFailed {
        page: u32,
        message: String,
    },
    StaleResponseDiscarded {
        page: u32,
    },
    MutationSucceeded {
        id: ItemId,
    },
    MutationFailed {
        id: ItemId,
        message: String,
    },
}

/// Whether a completed fetch was applied to the list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer filter change or reload was issued while this request was in
    /// flight; its response was dropped.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    Empty,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    pub filter: FilterState,
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
}

impl<T> ListSnapshot<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Items already loaded stay `Ready` after a failed load more; the banner
    /// text is still in `error`.
    pub fn view_state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else if !self.items.is_empty() {
            ViewState::Ready
        } else if let Some(message) = &self.error {
            ViewState::Error(message.clone())
        } else {
            ViewState::Empty
        }
    }
}

struct ListState<T> {
    filter: FilterState,
    items: Vec<T>,
    current_page: u32,
    total_pages: u32,
    loading: bool,
    loading_more: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> ListState<T> {
    fn new() -> Self {
        Self {
            filter: FilterState::default(),
            items: Vec::new(),
            current_page: 1,
            total_pages: 1,
            loading: false,
            loading_more: false,
            error: None,
            generation: 0,
        }
    }

    fn reset(&mut self) {
        self.items.clear();
        self.current_page = 1;
        self.total_pages = 1;
        self.loading_more = false;
        self.generation += 1;
    }
}

struct PendingFetch {
    query: ListQuery,
    mode: PageMode,
    generation: u64,
}

pub struct ListController<T> {
    transport: Arc<dyn ListTransport>,
    options: ListOptions,
    inner: Mutex<ListState<T>>,
    events: broadcast::Sender<ListEvent>,
}

impl<T> ListController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(transport: Arc<dyn ListTransport>, options: ListOptions) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            transport,
            options,
            inner: Mutex::new(ListState::new()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let guard = self.inner.lock().await;
        ListSnapshot {
            filter: guard.filter.clone(),
            items: guard.items.clone(),
            current_page: guard.current_page,
            total_pages: guard.total_pages,
            loading: guard.loading,
            loading_more: guard.loading_more,
            error: guard.error.clone(),
        }
    }

    /// Merges `patch` into the filters, clears the list and reloads page 1.
    pub async fn set_filter(&self, patch: FilterPatch) -> Result<FetchOutcome, ListError> {
        let pending = {
            let mut guard = self.inner.lock().await;
            guard.filter.apply(patch);
            guard.reset();
            self.begin_fetch(&mut guard, 1, PageMode::Replace)
        };
        let _ = self.events.send(ListEvent::Reset);
        self.run_fetch(pending).await
    }

    /// Clears the list and reloads page 1 with the current filters.
    pub async fn refresh(&self) -> Result<FetchOutcome, ListError> {
        self.set_filter(FilterPatch::default()).await
    }

    pub async fn fetch_page(&self, page: u32, mode: PageMode) -> Result<FetchOutcome, ListError> {
        if page == 0 {
            return Err(ValidationError::InvalidPage.into());
        }
        let pending = {
            let mut guard = self.inner.lock().await;
            self.begin_fetch(&mut guard, page, mode)
        };
        self.run_fetch(pending).await
    }

    /// Returns whether a request was issued.
    pub async fn on_scroll_near_bottom(&self) -> Result<bool, ListError> {
        let pending = {
            let mut guard = self.inner.lock().await;
            if guard.loading || guard.loading_more || guard.current_page >= guard.total_pages {
                return Ok(false);
            }
            let next = guard.current_page + 1;
            self.begin_fetch(&mut guard, next, PageMode::Append)
        };
        self.run_fetch(pending).await?;
        Ok(true)
    }

    pub async fn on_scroll(&self, position: ScrollPosition) -> Result<bool, ListError> {
        if !position.is_near_bottom(self.options.near_bottom_threshold_px) {
            return Ok(false);
        }
        self.on_scroll_near_bottom().await
    }

    /// A failed reload after a successful mutation lands in `error` only.
    pub async fn mutate_item(
        &self,
        id: &ItemId,
        operation: &ItemOperation,
    ) -> Result<(), ListError> {
        id.validate()?;
        operation.validate()?;

        if let Err(err) = self.transport.send_mutation(id, operation).await {
            let message = err.user_message(&self.options.mutate_fallback);
            warn!(%id, error = %err, "item mutation failed");
            let _ = self.events.send(ListEvent::MutationFailed {
                id: id.clone(),
                message,
            });
            return Err(err);
        }

        info!(%id, action = operation.action().unwrap_or("delete"), "item mutated");
        let _ = self
            .events
            .send(ListEvent::MutationSucceeded { id: id.clone() });

        if let Err(err) = self.refresh().await {
            warn!(error = %err, "reload after mutation failed");
        }
        Ok(())
    }

    fn begin_fetch(&self, state: &mut ListState<T>, page: u32, mode: PageMode) -> PendingFetch {
        match mode {
            PageMode::Replace => {
                state.generation += 1;
                state.loading = true;
                state.loading_more = false;
            }
            PageMode::Append => state.loading_more = true,
        }
        state.error = None;
        PendingFetch {
            query: ListQuery::from_filter(&state.filter, page, self.options.page_size),
            mode,
            generation: state.generation,
        }
    }

    async fn run_fetch(&self, pending: PendingFetch) -> Result<FetchOutcome, ListError> {
        let PendingFetch {
            query,
            mode,
            generation,
        } = pending;
        let page = query.page;
        debug!(page, ?mode, generation, "list fetch started");
        let _ = self.events.send(ListEvent::Loading { page, mode });

        let result = match self.transport.fetch_page(&query).await {
            Ok(body) => parse_page::<T>(body, &self.options.items_field, page),
            Err(err) => Err(err),
        };

        let mut guard = self.inner.lock().await;
        if guard.generation != generation {
            drop(guard);
            warn!(page, generation, "discarding stale list response");
            let _ = self.events.send(ListEvent::StaleResponseDiscarded { page });
            return Ok(FetchOutcome::Discarded);
        }

        match mode {
            PageMode::Replace => guard.loading = false,
            PageMode::Append => guard.loading_more = false,
        }

        match result {
            Ok(response) => {
                let item_count = response.items.len();
                match mode {
                    PageMode::Replace => guard.items = response.items,
                    PageMode::Append => guard.items.extend(response.items),
                }
                guard.current_page = response.current_page;
                guard.total_pages = response.total_pages;
                let total_pages = guard.total_pages;
                drop(guard);

                debug!(page, item_count, total_pages, "list fetch applied");
                let _ = self.events.send(ListEvent::Loaded {
                    page,
                    mode,
                    item_count,
                    total_pages,
                });
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                let message = err.user_message(&self.options.load_fallback);
                guard.error = Some(message.clone());
                drop(guard);

                warn!(page, error = %err, "list fetch failed");
                let _ = self.events.send(ListEvent::LoadFailed { page, message });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
