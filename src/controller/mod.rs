use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::pager::{Paginator, DEFAULT_PAGE_SIZE};
use crate::render::{self, RenderMode, LOAD_ERROR_MESSAGE};
use crate::scroll::{ScrollController, ScrollEvent, DEFAULT_SCROLL_THRESHOLD};
use crate::source::{DataSource, FetchContext, SourceError};
use crate::surface::{Region, Surface};

pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Ready,
    Loading,
    /// Terminal: an empty page was returned, nothing more is loaded.
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { page: usize, records: usize },
    Exhausted { page: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerOptions {
    pub page_size: usize,
    pub load_delay: Duration,
    pub scroll_threshold: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_delay: DEFAULT_LOAD_DELAY,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("invalid page_size {value}, expected positive integer")]
    InvalidPageSize { value: usize },
}

/// Owns the session: the sorted records, the next page to load and whether
/// a load is in flight or the data has run out.
#[derive(Debug)]
pub struct PageController<S, D> {
    source: S,
    surface: D,
    pager: Paginator,
    scroll: ScrollController,
    load_delay: Duration,
    current_page: usize,
    state: LoadState,
    pages_requested: usize,
}

impl<S, D> PageController<S, D>
where
    S: DataSource,
    D: Surface,
{
    pub fn new(source: S, surface: D, options: ControllerOptions) -> Result<Self, ControllerError> {
        if options.page_size == 0 {
            return Err(ControllerError::InvalidPageSize {
                value: options.page_size,
            });
        }
        Ok(Self {
            source,
            surface,
            pager: Paginator::empty(options.page_size),
            scroll: ScrollController::new(options.scroll_threshold),
            load_delay: options.load_delay,
            current_page: 1,
            state: LoadState::Ready,
            pages_requested: 0,
        })
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pages_requested(&self) -> usize {
        self.pages_requested
    }

    pub fn record_count(&self) -> usize {
        self.pager.len()
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn into_surface(self) -> D {
        self.surface
    }

    /// Fetches every record, sorts them and draws the first page. On failure
    /// the error region shows a generic message and the error is returned to
    /// the caller for diagnostics.
    pub async fn initial_load(&mut self) -> Result<usize, SourceError> {
        self.surface.set_visible(Region::InitialLoader, true);
        self.surface.set_visible(Region::Listing, false);
        self.surface.set_visible(Region::ErrorMessage, false);

        let ctx = FetchContext {
            viewport_width: self.surface.viewport().width,
        };
        let result = match self.source.fetch_all(&ctx).await {
            Ok(records) => {
                self.pager = Paginator::new(records, self.pager.page_size());
                self.pages_requested += 1;
                render::render(&mut self.surface, self.pager.page(1), RenderMode::Replace);
                self.current_page = 2;
                tracing::info!(
                    records = self.pager.len(),
                    pages = self.pager.total_pages(),
                    "promotions loaded"
                );
                Ok(self.pager.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch promotion data");
                self.surface.set_error_text(LOAD_ERROR_MESSAGE);
                self.surface.set_visible(Region::ErrorMessage, true);
                Err(e)
            }
        };

        self.surface.set_visible(Region::InitialLoader, false);
        self.surface.set_visible(Region::Listing, true);
        result
    }

    /// Enters `Loading` unless a load is already in flight or the data has
    /// run out. Returns whether a load was started.
    pub fn begin_load(&mut self) -> bool {
        match self.state {
            LoadState::Loading | LoadState::Exhausted => {
                tracing::trace!(state = ?self.state, "load trigger ignored");
                false
            }
            LoadState::Ready => {
                self.state = LoadState::Loading;
                self.surface.set_visible(Region::MiniLoader, true);
                true
            }
        }
    }

    /// Completes the load started by [`Self::begin_load`]. Returns `None` if
    /// no load was in flight.
    pub fn finish_load(&mut self) -> Option<LoadOutcome> {
        if self.state != LoadState::Loading {
            return None;
        }
        let page = self.current_page;
        self.pages_requested += 1;
        let records = self.pager.page(page);
        let outcome = if records.is_empty() {
            self.state = LoadState::Exhausted;
            tracing::info!(page, "no more promotions");
            LoadOutcome::Exhausted { page }
        } else {
            let count = records.len();
            render::render(&mut self.surface, records, RenderMode::Append);
            self.current_page += 1;
            self.state = LoadState::Ready;
            tracing::debug!(page, records = count, "page appended");
            LoadOutcome::Appended {
                page,
                records: count,
            }
        };
        self.surface.set_visible(Region::MiniLoader, false);
        Some(outcome)
    }

    pub async fn load_more(&mut self) -> Option<LoadOutcome> {
        if !self.begin_load() {
            return None;
        }
        tokio::time::sleep(self.load_delay).await;
        self.finish_load()
    }

    /// Moves the viewport and starts a load when it lands near the bottom.
    pub fn handle_scroll(&mut self, event: ScrollEvent) -> bool {
        let target = event.target(&self.surface.viewport());
        self.surface.scroll_to(target);
        if !self.scroll.should_load(&self.surface.viewport()) {
            return false;
        }
        self.begin_load()
    }

    /// Processes scroll events until the sender side closes. A load that is
    /// in flight when the channel closes still completes.
    pub async fn run(&mut self, mut events: mpsc::Receiver<ScrollEvent>) {
        let mut pending: Option<std::pin::Pin<Box<tokio::time::Sleep>>> = None;
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if self.handle_scroll(event) {
                            pending = Some(Box::pin(tokio::time::sleep(self.load_delay)));
                        }
                    }
                    None => {
                        if let Some(delay) = pending.take() {
                            delay.await;
                            self.finish_load();
                        }
                        break;
                    }
                },
                () = async {
                    match pending.as_mut() {
                        Some(delay) => delay.await,
                        None => std::future::pending().await,
                    }
                }, if pending.is_some() => {
                    pending = None;
                    self.finish_load();
                }
            }
        }
    }
}
