pub mod page;

use serde::Serialize;

use crate::model::PromotionRecord;
use crate::surface::Surface;

pub const FALLBACK_IMAGE_URL: &str =
    "https://placehold.co/400x200/e2e8f0/adb5bd?text=Image+Not+Found";
pub const EMPTY_LISTING_MESSAGE: &str = "There are no promotions in progress.";
pub const LOAD_ERROR_MESSAGE: &str =
    "Something went wrong while loading promotions. Please try again in a moment.";

const LINK_TARGET: &str = "_blank";
const LINK_REL: &str = "noopener noreferrer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Replace,
    Append,
}

/// Thumbnail with a one-shot fallback: the first load failure swaps in the
/// placeholder graphic, later failures are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageView {
    pub src: String,
    pub alt: String,
    pub fallback_src: String,
    fallback_armed: bool,
}

impl ImageView {
    pub fn new(src: &str, alt: &str) -> Self {
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
            fallback_src: FALLBACK_IMAGE_URL.to_string(),
            fallback_armed: true,
        }
    }

    pub fn on_error(&mut self) -> bool {
        if !self.fallback_armed {
            return false;
        }
        self.fallback_armed = false;
        self.src = self.fallback_src.clone();
        true
    }

    pub fn fallback_armed(&self) -> bool {
        self.fallback_armed
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub href: String,
    pub target: &'static str,
    pub rel: &'static str,
    pub image: ImageView,
    pub title: String,
    pub date_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingItem {
    Card(CardView),
    Placeholder { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingPatch {
    Replace(Vec<ListingItem>),
    Append(Vec<ListingItem>),
    Unchanged,
}

pub fn card_view(record: &PromotionRecord) -> CardView {
    CardView {
        href: record.link_url.clone(),
        target: LINK_TARGET,
        rel: LINK_REL,
        image: ImageView::new(&record.image_url, &record.title),
        title: record.title.clone(),
        date_label: record.date_label(),
    }
}

/// Maps a page of records to the change it makes to the listing.
pub fn view(page: &[PromotionRecord], mode: RenderMode) -> ListingPatch {
    let cards = || {
        page.iter()
            .map(|r| ListingItem::Card(card_view(r)))
            .collect::<Vec<_>>()
    };
    match (mode, page.is_empty()) {
        (RenderMode::Replace, true) => ListingPatch::Replace(vec![ListingItem::Placeholder {
            message: EMPTY_LISTING_MESSAGE.to_string(),
        }]),
        (RenderMode::Replace, false) => ListingPatch::Replace(cards()),
        (RenderMode::Append, true) => ListingPatch::Unchanged,
        (RenderMode::Append, false) => ListingPatch::Append(cards()),
    }
}

pub fn render<S: Surface>(surface: &mut S, page: &[PromotionRecord], mode: RenderMode) {
    surface.apply(view(page, mode));
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// the inline handler clears itself before swapping src so a broken
// fallback cannot loop
fn fallback_handler(fallback_src: &str) -> String {
    let quoted = fallback_src.replace('\\', "\\\\").replace('\'', "\\'");
    escape_html(&format!("this.onerror=null;this.src='{quoted}';"))
}

impl CardView {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="bg-white overflow-hidden">
  <a href="{href}" target="{target}" rel="{rel}" class="group">
    <div class="overflow-hidden rounded-lg">
      <img src="{src}" alt="{alt}" class="w-full h-40 object-cover group-hover:scale-105 transition-transform duration-300" onerror="{onerror}">
    </div>
    <div class="pt-4">
      <h2 class="text-base font-bold text-gray-800 truncate">{title}</h2>
      <p class="text-sm text-gray-500 mt-1">{date}</p>
    </div>
  </a>
</div>
"#,
            href = escape_html(&self.href),
            target = self.target,
            rel = self.rel,
            src = escape_html(&self.image.src),
            alt = escape_html(&self.image.alt),
            onerror = fallback_handler(&self.image.fallback_src),
            title = escape_html(&self.title),
            date = escape_html(&self.date_label),
        )
    }
}

impl ListingItem {
    pub fn to_html(&self) -> String {
        match self {
            Self::Card(card) => card.to_html(),
            Self::Placeholder { message } => format!(
                "<p class=\"col-span-full text-center text-gray-500 py-10\">{}</p>\n",
                escape_html(message)
            ),
        }
    }

    pub fn as_card(&self) -> Option<&CardView> {
        match self {
            Self::Card(card) => Some(card),
            Self::Placeholder { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(title: &str) -> PromotionRecord {
        PromotionRecord {
            title: title.to_string(),
            image_url: "https://img.example/a.png".to_string(),
            link_url: "https://promo.example/1".to_string(),
            create_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            order_seq: 1,
        }
    }

    #[test]
    fn empty_replace_is_single_placeholder() {
        let ListingPatch::Replace(items) = view(&[], RenderMode::Replace) else {
            panic!("expected replace patch");
        };
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|item| item.as_card().is_none()));
    }

    #[test]
    fn empty_append_is_noop() {
        assert_eq!(view(&[], RenderMode::Append), ListingPatch::Unchanged);
    }

    #[test]
    fn card_carries_link_and_label() {
        let card = card_view(&record("Spring sale"));
        assert_eq!(card.href, "https://promo.example/1");
        assert_eq!(card.target, "_blank");
        assert_eq!(card.rel, "noopener noreferrer");
        assert_eq!(card.image.alt, "Spring sale");
        assert_eq!(card.date_label, "2025.03.20 ~");
    }

    #[test]
    fn image_fallback_fires_once() {
        let mut image = ImageView::new("https://img.example/broken.png", "x");
        assert!(image.on_error());
        assert_eq!(image.src, FALLBACK_IMAGE_URL);
        assert!(!image.fallback_armed());
        assert!(!image.on_error());
        assert_eq!(image.src, FALLBACK_IMAGE_URL);
    }

    #[test]
    fn card_markup_escapes_values() {
        let html = card_view(&record("<b>50% & more</b>")).to_html();
        assert!(html.contains("&lt;b&gt;50% &amp; more&lt;/b&gt;"));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(html.contains("this.onerror=null;"));
        assert!(html.contains("2025.03.20 ~"));
        assert!(!html.contains("<b>"));
    }
}
