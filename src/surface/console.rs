use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{MemoryDocument, Region, Surface, Viewport};
use crate::render::{ListingItem, ListingPatch};

/// A [`MemoryDocument`] whose loader regions are mirrored to terminal
/// spinners, for headless sessions run from the command line.
pub struct ConsoleDocument {
    inner: MemoryDocument,
    show_spinners: bool,
    initial_loader: Option<ProgressBar>,
    mini_loader: Option<ProgressBar>,
}

impl ConsoleDocument {
    pub fn new(inner: MemoryDocument, show_spinners: bool) -> Self {
        Self {
            inner,
            show_spinners,
            initial_loader: None,
            mini_loader: None,
        }
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.inner
    }

    pub fn into_document(mut self) -> MemoryDocument {
        for pb in [self.initial_loader.take(), self.mini_loader.take()]
            .into_iter()
            .flatten()
        {
            pb.finish_and_clear();
        }
        self.inner
    }

    fn toggle_spinner(&mut self, region: Region, visible: bool) {
        let show = self.show_spinners;
        let (slot, message) = match region {
            Region::InitialLoader => (&mut self.initial_loader, "loading promotions"),
            Region::MiniLoader => (&mut self.mini_loader, "loading more"),
            Region::Listing | Region::ErrorMessage => return,
        };
        if visible {
            if slot.is_none() {
                *slot = Some(spinner(show, message));
            }
        } else if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

fn spinner(show: bool, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if show {
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}

impl Surface for ConsoleDocument {
    fn set_visible(&mut self, region: Region, visible: bool) {
        self.toggle_spinner(region, visible);
        self.inner.set_visible(region, visible);
    }

    fn apply(&mut self, patch: ListingPatch) {
        if let ListingPatch::Append(items) | ListingPatch::Replace(items) = &patch {
            for card in items.iter().filter_map(ListingItem::as_card) {
                tracing::debug!(title = %card.title, date = %card.date_label, "card");
            }
        }
        self.inner.apply(patch);
    }

    fn set_error_text(&mut self, text: &str) {
        self.inner.set_error_text(text);
    }

    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }

    fn scroll_to(&mut self, y: f64) {
        self.inner.scroll_to(y);
    }
}

impl std::fmt::Debug for ConsoleDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleDocument")
            .field("inner", &self.inner)
            .field("show_spinners", &self.show_spinners)
            .finish()
    }
}
