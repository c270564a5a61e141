//! Drives a [`PhotoSearch`] against a provider.
//!
//! Front-ends feed [`PickerEvent`]s into [`PickerRuntime::handle`]. Fetches and
//! download resolutions are spawned onto a [`JoinSet`] and report back over an
//! mpsc channel; the front-end folds those reports in with
//! [`next_message`](PickerRuntime::next_message) or
//! [`drain`](PickerRuntime::drain). All session state is mutated here, one
//! event at a time.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, warn};

use crate::model::types::{Asset, PhotoId};
use crate::provider::{PhotoProvider, ProviderError};
use crate::search::{
    Arrow, FetchRequest, PAGE_SIZE, PageResponse, PhotoSearch, PickerError, PickerView,
};
use crate::select::SelectionResolver;

/// Input from the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    QueryChanged(String),
    ScrollThresholdReached,
    PhotoClicked(PhotoId),
    PhotoFocused(PhotoId),
    ArrowKey(Arrow),
    /// Enter on the active photo.
    SelectActive,
    CloseRequested,
}

/// Receives the outcome of a picker session.
pub trait PickerHost {
    /// Chosen assets. The picker always hands over a batch of one.
    fn on_select(&mut self, assets: Vec<Asset>);

    fn on_close(&mut self);

    fn on_error(&mut self, error: &PickerError) {
        let _ = error;
    }
}

enum Message {
    Page(PageResponse),
    Selected(Result<Asset, PickerError>),
}

pub struct PickerRuntime<P: PhotoProvider> {
    search: PhotoSearch,
    provider: Arc<P>,
    resolver: SelectionResolver,
    tasks: JoinSet<()>,
    fetches: HashMap<Id, FetchRequest>,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    selection_error: Option<String>,
    closed: bool,
}

impl<P: PhotoProvider> PickerRuntime<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            search: PhotoSearch::new(),
            provider,
            resolver: SelectionResolver::new(),
            tasks: JoinSet::new(),
            fetches: HashMap::new(),
            tx,
            rx,
            selection_error: None,
            closed: false,
        }
    }

    /// Open the picker and request the first page of the default query.
    /// Must be called from within a tokio runtime.
    pub fn activate(&mut self) {
        self.closed = false;
        let request = self.search.activate();
        self.dispatch(request);
    }

    pub fn handle<H: PickerHost>(&mut self, event: PickerEvent, host: &mut H) {
        if self.closed {
            debug!(?event, "event_after_close");
            return;
        }
        match event {
            PickerEvent::QueryChanged(query) => {
                if let Some(request) = self.search.set_query(query) {
                    self.selection_error = None;
                    self.dispatch(request);
                }
            }
            PickerEvent::ScrollThresholdReached => {
                if let Some(request) = self.search.load_more() {
                    self.dispatch(request);
                }
            }
            PickerEvent::PhotoFocused(id) => {
                self.search.focus(&id);
            }
            PickerEvent::ArrowKey(arrow) => self.search.navigate(arrow.into()),
            PickerEvent::PhotoClicked(id) => {
                if self.search.focus(&id) {
                    self.start_selection();
                }
            }
            PickerEvent::SelectActive => self.start_selection(),
            PickerEvent::CloseRequested => {
                self.shutdown();
                host.on_close();
            }
        }
    }

    fn dispatch(&mut self, request: FetchRequest) {
        debug!(
            query = %request.query,
            page = request.page,
            generation = request.generation,
            "fetch_dispatched"
        );
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let tagged = request.clone();
        let handle = self.tasks.spawn(async move {
            let result = provider
                .search(&request.query, request.page, PAGE_SIZE)
                .await;
            let _ = tx.send(Message::Page(PageResponse { request, result }));
        });
        self.fetches.insert(handle.id(), tagged);
    }

    fn start_selection(&mut self) {
        if self.resolver.is_resolving() {
            debug!("selection_in_flight");
            return;
        }
        let Some(photo) = self.search.active_photo().cloned() else {
            return;
        };
        self.selection_error = None;
        let tx = self.tx.clone();
        let resolving = self
            .resolver
            .select_owned(Arc::clone(&self.provider), photo);
        self.tasks.spawn(async move {
            let _ = tx.send(Message::Selected(resolving.await));
        });
    }

    /// Wait for one spawned task to report back and apply its result.
    /// Returns false once nothing is left in flight.
    pub async fn next_message<H: PickerHost>(&mut self, host: &mut H) -> bool {
        loop {
            if let Ok(message) = self.rx.try_recv() {
                self.apply(message, host);
                return true;
            }
            if self.tasks.is_empty() {
                return false;
            }
            tokio::select! {
                biased;
                Some(message) = self.rx.recv() => {
                    self.apply(message, host);
                    return true;
                }
                joined = self.tasks.join_next_with_id() => {
                    if let Some(joined) = joined {
                        self.reap(joined, host);
                    }
                }
            }
        }
    }

    /// Apply every report that is already waiting. Never blocks.
    pub fn drain<H: PickerHost>(&mut self, host: &mut H) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message, host);
            applied += 1;
        }
        while let Some(joined) = self.tasks.try_join_next_with_id() {
            self.reap(joined, host);
        }
        applied
    }

    /// Wait until no page fetch is pending for the live session.
    pub async fn settle<H: PickerHost>(&mut self, host: &mut H) {
        while self.search.is_loading() {
            if !self.next_message(host).await {
                break;
            }
        }
    }

    /// Wait until every spawned task has finished and reported.
    pub async fn run_until_idle<H: PickerHost>(&mut self, host: &mut H) {
        while self.next_message(host).await {}
    }

    fn apply<H: PickerHost>(&mut self, message: Message, host: &mut H) {
        match message {
            Message::Page(response) => {
                if let Err(err) = self.search.apply(response) {
                    host.on_error(&err);
                }
            }
            Message::Selected(Ok(asset)) => {
                if !self.closed {
                    host.on_select(vec![asset]);
                }
            }
            Message::Selected(Err(err)) => {
                self.selection_error = Some(err.to_string());
                host.on_error(&err);
            }
        }
    }

    fn reap<H: PickerHost>(&mut self, joined: Result<(Id, ()), JoinError>, host: &mut H) {
        let id = match &joined {
            Ok((id, ())) => *id,
            Err(err) => err.id(),
        };
        let request = self.fetches.remove(&id);
        let Err(err) = joined else {
            return;
        };
        if err.is_cancelled() {
            return;
        }
        warn!(error = %err, "task_panicked");
        if let Some(request) = request {
            let response = PageResponse {
                request,
                result: Err(ProviderError::Other(format!("fetch task failed: {err}"))),
            };
            if let Err(err) = self.search.apply(response) {
                host.on_error(&err);
            }
        }
    }

    /// Abort everything in flight. Later events are ignored until
    /// [`activate`](Self::activate) is called again.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
        self.fetches.clear();
        while self.rx.try_recv().is_ok() {}
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True while a fetch or a download resolution is outstanding.
    pub fn is_busy(&self) -> bool {
        self.search.is_loading() || self.resolver.is_resolving()
    }

    pub fn is_resolving(&self) -> bool {
        self.resolver.is_resolving()
    }

    pub fn search(&self) -> &PhotoSearch {
        &self.search
    }

    pub fn view(&self) -> PickerView<'_> {
        let mut view = self.search.view();
        view.loading = self.is_busy();
        view.no_results = !view.loading && view.photos.is_empty();
        if view.error.is_none() {
            view.error = self.selection_error.as_deref();
        }
        view
    }
}
