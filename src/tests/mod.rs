use std::cell::Cell;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::controller::{ControllerOptions, LoadOutcome, LoadState, PageController};
use crate::model::PromotionRecord;
use crate::pager::{self, Paginator};
use crate::render::LOAD_ERROR_MESSAGE;
use crate::scroll::ScrollEvent;
use crate::source::{
    DataSource, ErrorKind, FetchContext, LiveOptions, LiveSource, MockSource, SourceError,
};
use crate::surface::{MemoryDocument, Region};

struct CountingSource {
    records: Vec<PromotionRecord>,
    calls: Cell<usize>,
    last_width: Cell<f64>,
}

impl CountingSource {
    fn new(records: Vec<PromotionRecord>) -> Self {
        Self {
            records,
            calls: Cell::new(0),
            last_width: Cell::new(0.0),
        }
    }
}

impl DataSource for CountingSource {
    async fn fetch_all(&self, ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        self.last_width.set(ctx.viewport_width);
        Ok(self.records.clone())
    }
}

impl DataSource for &CountingSource {
    async fn fetch_all(&self, ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        (**self).fetch_all(ctx).await
    }
}

struct FailingSource;

impl DataSource for FailingSource {
    async fn fetch_all(&self, _ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        Err(SourceError::HttpStatus {
            endpoint: "http://inventory.invalid/".to_string(),
            status: 503,
        })
    }
}

fn seeded(count: usize) -> Vec<PromotionRecord> {
    MockSource::new(count, Some(2025)).generate()
}

fn session<S: DataSource>(source: S) -> PageController<S, MemoryDocument> {
    PageController::new(
        source,
        MemoryDocument::new(1280.0, 800.0),
        ControllerOptions::default(),
    )
    .unwrap()
}

#[test]
fn pages_reconstruct_sorted_mock_data() {
    for count in [0, 1, 11, 12, 13, 100, 257] {
        let sorted = pager::sort_records(seeded(count));
        let mut rebuilt = Vec::new();
        for p in 1.. {
            let page = pager::page(&sorted, p, 12);
            if page.is_empty() {
                break;
            }
            assert!(page.len() <= 12);
            rebuilt.extend_from_slice(page);
        }
        assert_eq!(rebuilt, sorted, "count {count}");
    }
}

#[test]
fn sorted_mock_data_is_ordered() {
    let sorted = pager::sort_records(seeded(100));
    for pair in sorted.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.order_seq <= b.order_seq);
        if a.order_seq == b.order_seq {
            assert!(a.create_date >= b.create_date);
        }
    }
}

#[test]
fn hundred_records_end_on_page_nine() {
    let paginator = Paginator::new(seeded(100), 12);
    let ninth = paginator.page(9);
    assert_eq!(ninth.len(), 4);
    assert_eq!(ninth, &paginator.records()[96..100]);
    assert!(paginator.page(10).is_empty());
}

#[tokio::test(start_paused = true)]
async fn fetches_once_with_viewport_width() {
    let source = CountingSource::new(seeded(30));
    let mut c = PageController::new(
        &source,
        MemoryDocument::new(375.0, 640.0),
        ControllerOptions::default(),
    )
    .unwrap();
    c.initial_load().await.unwrap();
    c.load_more().await;
    c.load_more().await;
    assert_eq!(c.surface().card_count(), 30);
    drop(c);
    assert_eq!(source.calls.get(), 1);
    assert_eq!(source.last_width.get(), 375.0);
}

#[tokio::test]
async fn empty_source_shows_placeholder() {
    let mut c = session(CountingSource::new(Vec::new()));
    assert_eq!(c.initial_load().await.unwrap(), 0);
    assert_eq!(c.surface().placeholder_count(), 1);
    assert_eq!(c.surface().card_count(), 0);
    assert_eq!(c.current_page(), 2);
}

#[tokio::test]
async fn failed_fetch_shows_error_region() {
    let mut c = session(FailingSource);
    let err = c.initial_load().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);

    let doc = c.surface();
    assert!(doc.is_visible(Region::ErrorMessage));
    assert!(doc.is_visible(Region::Listing));
    assert!(!doc.is_visible(Region::InitialLoader));
    assert_eq!(doc.error_text(), LOAD_ERROR_MESSAGE);
    assert_eq!(doc.items().len(), 0);
    assert_eq!(c.current_page(), 1);
    assert_eq!(c.state(), LoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_leaves_empty_collection() {
    let mut c = session(FailingSource);
    let _ = c.initial_load().await;
    assert_eq!(c.load_more().await, Some(LoadOutcome::Exhausted { page: 1 }));
    assert_eq!(c.surface().card_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn end_of_data_latches() {
    let mut c = session(CountingSource::new(seeded(13)));
    c.initial_load().await.unwrap();
    assert_eq!(
        c.load_more().await,
        Some(LoadOutcome::Appended {
            page: 2,
            records: 1
        })
    );
    assert_eq!(c.load_more().await, Some(LoadOutcome::Exhausted { page: 3 }));
    assert_eq!(c.state(), LoadState::Exhausted);

    let requested = c.pages_requested();
    for _ in 0..5 {
        assert_eq!(c.load_more().await, None);
        assert!(!c.handle_scroll(ScrollEvent::ToBottom));
    }
    assert_eq!(c.current_page(), 3);
    assert_eq!(c.pages_requested(), requested);
    assert_eq!(c.surface().card_count(), 13);
    assert!(!c.surface().is_visible(Region::MiniLoader));
}

#[tokio::test(start_paused = true)]
async fn scroll_burst_loads_one_page_per_cycle() {
    let mut c = session(CountingSource::new(seeded(100)));
    c.initial_load().await.unwrap();
    assert_eq!(c.pages_requested(), 1);

    let (tx, rx) = mpsc::channel(8);
    for _ in 0..3 {
        tx.send(ScrollEvent::ToBottom).await.unwrap();
    }
    drop(tx);
    c.run(rx).await;

    assert_eq!(c.pages_requested(), 2);
    assert_eq!(c.current_page(), 3);
    assert_eq!(c.surface().card_count(), 24);
    assert_eq!(c.state(), LoadState::Ready);
}

#[tokio::test(start_paused = true)]
async fn paced_scrolls_load_until_exhausted() {
    let mut c = session(CountingSource::new(seeded(100)));
    c.initial_load().await.unwrap();

    let (tx, rx) = mpsc::channel(4);
    let reader = crate::scroll::drive(
        tx,
        crate::scroll::reader_script(20),
        Duration::from_millis(600),
    );
    let (sent, ()) = tokio::join!(reader, c.run(rx));

    assert_eq!(sent, 20);
    assert_eq!(c.surface().card_count(), 100);
    assert_eq!(c.state(), LoadState::Exhausted);
    assert_eq!(c.current_page(), 10);
    // one initial page, eight appends, one empty page
    assert_eq!(c.pages_requested(), 10);
}

#[tokio::test(start_paused = true)]
async fn scroll_far_from_bottom_does_not_load() {
    let mut c = session(CountingSource::new(seeded(100)));
    c.initial_load().await.unwrap();
    assert!(!c.handle_scroll(ScrollEvent::To(0.0)));
    assert!(!c.handle_scroll(ScrollEvent::By(10.0)));
    assert_eq!(c.state(), LoadState::Ready);
    assert!(c.handle_scroll(ScrollEvent::ToBottom));
    assert_eq!(c.state(), LoadState::Loading);
}

#[test]
fn image_failure_swaps_to_fallback_once() {
    let mut doc = MemoryDocument::new(1280.0, 800.0);
    crate::render::render(
        &mut doc,
        &seeded(2),
        crate::render::RenderMode::Replace,
    );
    assert!(doc.fail_image(1));
    assert!(!doc.fail_image(1));
    assert!(!doc.fail_image(5));
    let cards: Vec<_> = doc.cards().collect();
    assert_eq!(cards[1].image.src, crate::render::FALLBACK_IMAGE_URL);
    assert_ne!(cards[0].image.src, crate::render::FALLBACK_IMAGE_URL);
}

#[test]
fn date_label_for_record() {
    let record = PromotionRecord {
        title: "t".to_string(),
        image_url: String::new(),
        link_url: "#".to_string(),
        create_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        order_seq: 1,
    };
    assert_eq!(record.date_label(), "2025.03.20 ~");
}

// answers exactly one HTTP request with `status` and `body`, and hands back
// the request body it received
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let request_body = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break String::new();
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let head = text[..split].to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                let body = &text[split + 4..];
                if body.len() >= length {
                    break body.to_string();
                }
            }
        };
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request_body
    });
    (format!("http://{addr}/api/inventory/getInventoryList"), handle)
}

fn live(endpoint: String) -> LiveSource {
    LiveSource::new(LiveOptions {
        endpoint,
        ..LiveOptions::default()
    })
    .unwrap()
}

#[tokio::test]
async fn live_source_posts_context_code() {
    let (endpoint, server) = serve_once(
        "200 OK",
        r#"{"data":{"list":[{"title":"a","imageUrl":"i","linkUrl":"l","createDate":"2025-03-20","orderSeq":1}]}}"#,
    )
    .await;
    let records = live(endpoint)
        .fetch_all(&FetchContext {
            viewport_width: 375.0,
        })
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "a");
    assert_eq!(server.await.unwrap(), r#"{"uniqCode":"TV_IV_C_TOPBANNER"}"#);
}

#[tokio::test]
async fn live_source_reports_http_status() {
    let (endpoint, server) = serve_once("500 Internal Server Error", "{}").await;
    let err = live(endpoint)
        .fetch_all(&FetchContext {
            viewport_width: 1280.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::HttpStatus { status: 500, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(server.await.unwrap(), r#"{"uniqCode":"TV_IV_C_P_TOPBANNER"}"#);
}

#[tokio::test]
async fn live_source_reports_decode_error() {
    let (endpoint, _server) = serve_once("200 OK", r#"{"data":"#).await;
    let err = live(endpoint)
        .fetch_all(&FetchContext {
            viewport_width: 1280.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}
