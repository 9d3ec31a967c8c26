pub mod console;

use std::collections::BTreeSet;

use crate::render::{CardView, ListingItem, ListingPatch};

pub use console::ConsoleDocument;

pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

/// Addressable regions of the page. Each one is either shown or hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    InitialLoader,
    Listing,
    ErrorMessage,
    MiniLoader,
}

impl Region {
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::InitialLoader => "initial-loader",
            Self::Listing => "promotion-list",
            Self::ErrorMessage => "error-message",
            Self::MiniLoader => "mini-loader-container",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub inner_height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

/// The page the controller draws into.
pub trait Surface {
    fn set_visible(&mut self, region: Region, visible: bool);
    fn apply(&mut self, patch: ListingPatch);
    fn set_error_text(&mut self, text: &str);
    fn viewport(&self) -> Viewport;
    fn scroll_to(&mut self, y: f64);
}

// responsive card grid, used to derive how tall the document is
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub card_height: f64,
    pub row_gap: f64,
    pub placeholder_height: f64,
    pub chrome_height: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            card_height: 232.0,
            row_gap: 32.0,
            placeholder_height: 88.0,
            chrome_height: 240.0,
        }
    }
}

impl GridLayout {
    pub fn columns_for(&self, width: f64) -> usize {
        if width < 640.0 {
            1
        } else if width < 768.0 {
            2
        } else if width < 1024.0 {
            3
        } else {
            4
        }
    }

    pub fn listing_height(&self, width: f64, items: &[ListingItem]) -> f64 {
        let cards = items.iter().filter(|i| i.as_card().is_some()).count();
        let placeholders = items.len() - cards;
        let rows = cards.div_ceil(self.columns_for(width));
        rows as f64 * (self.card_height + self.row_gap)
            + placeholders as f64 * self.placeholder_height
    }
}

#[derive(Clone, Debug)]
pub struct MemoryDocument {
    layout: GridLayout,
    width: f64,
    inner_height: f64,
    scroll_y: f64,
    visible: BTreeSet<Region>,
    items: Vec<ListingItem>,
    error_text: String,
}

impl MemoryDocument {
    pub fn new(width: f64, inner_height: f64) -> Self {
        Self::with_layout(width, inner_height, GridLayout::default())
    }

    pub fn with_layout(width: f64, inner_height: f64, layout: GridLayout) -> Self {
        let mut visible = BTreeSet::new();
        visible.insert(Region::InitialLoader);
        Self {
            layout,
            width,
            inner_height,
            scroll_y: 0.0,
            visible,
            items: Vec::new(),
            error_text: String::new(),
        }
    }

    pub fn is_visible(&self, region: Region) -> bool {
        self.visible.contains(&region)
    }

    pub fn items(&self) -> &[ListingItem] {
        &self.items
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardView> {
        self.items.iter().filter_map(ListingItem::as_card)
    }

    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn placeholder_count(&self) -> usize {
        self.items.len() - self.card_count()
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    pub fn document_height(&self) -> f64 {
        let content = self.layout.chrome_height
            + self.layout.listing_height(self.width, &self.items);
        content.max(self.inner_height)
    }

    /// Reports a load failure for the card image at `index`. Returns whether
    /// the fallback graphic was swapped in.
    pub fn fail_image(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(ListingItem::Card(card)) => card.image.on_error(),
            _ => false,
        }
    }

    pub fn to_html(&self) -> String {
        crate::render::page::render_document(self)
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.inner_height).max(0.0)
    }
}

impl Surface for MemoryDocument {
    fn set_visible(&mut self, region: Region, visible: bool) {
        if visible {
            self.visible.insert(region);
        } else {
            self.visible.remove(&region);
        }
    }

    fn apply(&mut self, patch: ListingPatch) {
        match patch {
            ListingPatch::Replace(items) => {
                self.items = items;
                self.scroll_y = self.scroll_y.min(self.max_scroll());
            }
            ListingPatch::Append(items) => self.items.extend(items),
            ListingPatch::Unchanged => {}
        }
    }

    fn set_error_text(&mut self, text: &str) {
        self.error_text = text.to_string();
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            inner_height: self.inner_height,
            scroll_y: self.scroll_y,
            document_height: self.document_height(),
        }
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }
}
