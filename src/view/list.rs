use uuid::Uuid;

use super::{RemoteData, RequestToken};

/// Anything listable: records expose their id for delete bookkeeping.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageMode {
    /// The controller paginates; every page change re-requests.
    Server,
    /// The full set is fetched once and sliced locally.
    Client,
}

/// What the view needs fetched: issued by `begin_load`/`set_page`, resolved
/// by `resolve_load` with the same token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub token: RequestToken,
    /// 1-based page to request (always 1 in client mode)
    pub page: u32,
    pub limit: u32,
}

/// A controller list response: one page (server mode) or everything (client
/// mode), plus the size of the full filtered set.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

/// Confirmed second phase of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: Uuid,
}

/// List screen state: a fetched collection, pagination, and a two-phase
/// delete flow, with stale responses dropped by token.
#[derive(Debug)]
pub struct ListState<T> {
    mode: PageMode,
    page: u32,
    page_size: u32,
    total_count: usize,
    data: RemoteData<Vec<T>>,
    pending_delete: Option<Uuid>,
    delete_in_flight: Option<Uuid>,
    error: Option<String>,
    generation: u64,
    attached: bool,
}

impl<T: Keyed + Clone> ListState<T> {
    pub fn server_paged(page_size: u32) -> Self {
        Self::new(PageMode::Server, page_size)
    }

    pub fn client_paged(page_size: u32) -> Self {
        Self::new(PageMode::Client, page_size)
    }

    fn new(mode: PageMode, page_size: u32) -> Self {
        Self {
            mode,
            page: 1,
            page_size: page_size.max(1),
            total_count: 0,
            data: RemoteData::Idle,
            pending_delete: None,
            delete_in_flight: None,
            error: None,
            generation: 0,
            attached: true,
        }
    }

    /// Start (or restart) the fetch for the current page. Supersedes any
    /// response still in flight: only the newest token will be accepted.
    pub fn begin_load(&mut self) -> PageRequest {
        self.generation += 1;
        self.data = RemoteData::Loading;
        self.error = None;
        PageRequest {
            token: RequestToken(self.generation),
            page: match self.mode {
                PageMode::Server => self.page,
                PageMode::Client => 1,
            },
            limit: self.page_size,
        }
    }

    /// Apply a fetch response. Stale tokens and responses arriving after
    /// `detach` are dropped on the floor.
    pub fn resolve_load(&mut self, token: RequestToken, result: Result<PageResult<T>, String>) {
        if !self.attached || token.0 != self.generation {
            return;
        }
        match result {
            Ok(page) => {
                self.total_count = match self.mode {
                    PageMode::Server => page.total_count,
                    PageMode::Client => page.items.len(),
                };
                self.data = RemoteData::Loaded(page.items);
            }
            Err(message) => {
                self.data = RemoteData::Failed(message);
            }
        }
    }

    /// Move to a page. Server mode answers with a request to run; client
    /// mode just re-slices what is already held.
    pub fn set_page(&mut self, page: u32) -> Option<PageRequest> {
        let clamped = page.clamp(1, self.page_count().max(1) as u32);
        self.page = clamped;
        match self.mode {
            PageMode::Server => Some(self.begin_load()),
            PageMode::Client => None,
        }
    }

    /// Rows the screen should render right now.
    pub fn visible(&self) -> &[T] {
        let Some(items) = self.data.value() else {
            return &[];
        };
        match self.mode {
            PageMode::Server => items,
            PageMode::Client => {
                let start = ((self.page as usize) - 1) * self.page_size as usize;
                let end = (start + self.page_size as usize).min(items.len());
                if start >= items.len() {
                    &[]
                } else {
                    &items[start..end]
                }
            }
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size as usize)
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_loading()
    }

    /// The message a screen should show, if any: a failed load or the last
    /// failed delete.
    pub fn error(&self) -> Option<&str> {
        self.data.error().or(self.error.as_deref())
    }

    // ========================================
    // Two-phase delete
    // ========================================

    /// Phase one: the user asked to delete a row; nothing is sent yet.
    pub fn request_delete(&mut self, id: Uuid) {
        let exists = self.data.value().is_some_and(|items| items.iter().any(|i| i.key() == id));
        if exists && self.delete_in_flight.is_none() {
            self.pending_delete = Some(id);
        }
    }

    pub fn pending_delete(&self) -> Option<Uuid> {
        self.pending_delete
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Phase two: the user confirmed. Returns the call to make, and disables
    /// further confirms until it resolves.
    pub fn confirm_delete(&mut self) -> Option<DeleteRequest> {
        if self.delete_in_flight.is_some() {
            return None;
        }
        let id = self.pending_delete.take()?;
        self.delete_in_flight = Some(id);
        Some(DeleteRequest { id })
    }

    /// On success the row leaves local state directly; no re-fetch.
    pub fn resolve_delete(&mut self, id: Uuid, result: Result<(), String>) {
        if !self.attached || self.delete_in_flight != Some(id) {
            return;
        }
        self.delete_in_flight = None;
        match result {
            Ok(()) => {
                if let RemoteData::Loaded(items) = &mut self.data {
                    items.retain(|item| item.key() != id);
                }
                self.total_count = self.total_count.saturating_sub(1);
                // Stepping off a now-empty trailing page
                let pages = self.page_count().max(1);
                if self.page as usize > pages {
                    self.page = pages as u32;
                }
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    /// The user navigated away: pending responses must not touch this state.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}
