//! The live search session: combiner, accumulator, pagination and cursor
//! wired together behind one owner.
//!
//! Every mutation happens through `&mut self` on a single task, so the four
//! pieces are always observed in a consistent state. Fetches themselves run
//! elsewhere; their results come back through [`PhotoSearch::apply`].

use tracing::{debug, info, warn};

use super::PickerError;
use super::accumulator::{PageOutcome, ResultAccumulator};
use super::combiner::{FetchRequest, QueryPageCombiner};
use super::cursor::{Cursor, NavDirection};
use super::pagination::PaginationDriver;
use crate::model::types::{Photo, PhotoId};
use crate::provider::ProviderError;

/// Photos requested per page.
pub const PAGE_SIZE: u32 = 42;

/// A completed fetch, tagged with the request that produced it.
#[derive(Debug)]
pub struct PageResponse {
    pub request: FetchRequest,
    pub result: Result<Vec<Photo>, ProviderError>,
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct PickerView<'a> {
    pub query: &'a str,
    pub photos: &'a [Photo],
    pub active: Option<usize>,
    pub loading: bool,
    pub no_results: bool,
    pub exhausted: bool,
    pub error: Option<&'a str>,
}

impl<'a> PickerView<'a> {
    /// Photos with their `is_active` flag; at most one tile is active.
    pub fn tiles(&self) -> impl Iterator<Item = (&'a Photo, bool)> + 'a {
        let active = self.active;
        self.photos
            .iter()
            .enumerate()
            .map(move |(i, photo)| (photo, active == Some(i)))
    }
}

#[derive(Debug, Default)]
pub struct PhotoSearch {
    combiner: QueryPageCombiner,
    results: ResultAccumulator,
    pagination: PaginationDriver,
    cursor: Cursor,
    last_error: Option<String>,
}

impl PhotoSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the picker: empty query, page 1.
    pub fn activate(&mut self) -> FetchRequest {
        let request = self.combiner.activate();
        self.begin_session(&request);
        request
    }

    pub fn is_active(&self) -> bool {
        self.combiner.is_active()
    }

    /// Returns `None` when the query matches the live session and nothing failed.
    pub fn set_query(&mut self, query: impl Into<String>) -> Option<FetchRequest> {
        let query = query.into();
        if !self.combiner.is_active() {
            self.combiner.activate();
        } else if query == self.combiner.query() && self.last_error.is_none() {
            debug!(query = %query, "query_unchanged");
            return None;
        }
        let request = self.combiner.set_query(query);
        self.begin_session(&request);
        Some(request)
    }

    /// Scroll threshold reached. Returns the next page request, if one may start.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.combiner.is_active() {
            return None;
        }
        let page = self.pagination.on_load_more_signal()?;
        debug!(query = %self.combiner.query(), page, "load_more");
        Some(self.combiner.set_page(page))
    }

    fn begin_session(&mut self, request: &FetchRequest) {
        self.results.reset(request.query.clone(), request.generation);
        self.pagination.reset();
        self.cursor.reset();
        self.last_error = None;
        info!(
            query = %request.query,
            generation = request.generation,
            "session_start"
        );
    }

    /// Fold a completed fetch into the session.
    ///
    /// Responses from an older generation are dropped silently, errors
    /// included. A failure for the live session is returned so the caller
    /// can report it; the session itself stays usable.
    pub fn apply(&mut self, response: PageResponse) -> Result<PageOutcome, PickerError> {
        let PageResponse { request, result } = response;
        if request.generation != self.results.generation() {
            debug!(
                query = %request.query,
                page = request.page,
                generation = request.generation,
                "stale_page"
            );
            return Ok(PageOutcome::Stale);
        }

        let photos = match result {
            Ok(photos) => photos,
            Err(source) => {
                self.pagination.on_page_failed(request.page);
                self.last_error = Some(source.to_string());
                warn!(
                    query = %request.query,
                    page = request.page,
                    error = %source,
                    "page_failed"
                );
                return Err(PickerError::SearchFetch {
                    query: request.query,
                    page: request.page,
                    source,
                });
            }
        };

        let count = photos.len();
        let outcome = self
            .results
            .on_page_result(request.generation, request.page, photos);
        match outcome {
            PageOutcome::Appended { added } => {
                self.pagination.on_page_settled(request.page, count);
                self.last_error = None;
                self.cursor.list_changed(self.results.len());
                info!(
                    query = %request.query,
                    page = request.page,
                    added,
                    total = self.results.len(),
                    "page_appended"
                );
            }
            PageOutcome::Parked => {
                self.pagination.on_page_settled(request.page, count);
            }
            PageOutcome::Duplicate => {
                debug!(page = request.page, "duplicate_page");
            }
            PageOutcome::Stale => {}
        }
        Ok(outcome)
    }

    pub fn navigate(&mut self, direction: NavDirection) {
        self.cursor.navigate(direction, self.results.len());
    }

    /// Move the cursor to the photo with `id`. Returns false if it is not listed.
    pub fn focus(&mut self, id: &PhotoId) -> bool {
        let position = self.results.position_of(id);
        self.cursor.focus(position, self.results.len());
        position.is_some()
    }

    pub fn photos(&self) -> &[Photo] {
        self.results.photos()
    }

    pub fn photo(&self, id: &PhotoId) -> Option<&Photo> {
        self.results
            .position_of(id)
            .and_then(|i| self.results.photos().get(i))
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn active_photo(&self) -> Option<&Photo> {
        self.cursor
            .index()
            .and_then(|i| self.results.photos().get(i))
    }

    pub fn is_active_index(&self, index: usize) -> bool {
        self.cursor.is_active(index)
    }

    pub fn query(&self) -> &str {
        self.combiner.query()
    }

    pub fn page(&self) -> u32 {
        self.pagination.page()
    }

    pub fn generation(&self) -> u64 {
        self.combiner.generation()
    }

    pub fn is_loading(&self) -> bool {
        self.pagination.is_loading()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pagination.is_exhausted()
    }

    /// Nothing is loading and the session holds no photos.
    pub fn no_results(&self) -> bool {
        !self.is_loading() && self.results.is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn view(&self) -> PickerView<'_> {
        PickerView {
            query: self.combiner.query(),
            photos: self.results.photos(),
            active: self.cursor.index(),
            loading: self.is_loading(),
            no_results: self.no_results(),
            exhausted: self.is_exhausted(),
            error: self.last_error(),
        }
    }
}
